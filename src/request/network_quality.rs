use super::config::NetworkQualityConfig;
use dashmap::DashMap;
use std::net::IpAddr;
use std::time::Duration;

/// Per-remote-address EWMA of connection latency, used to reject new
/// requests from peers whose recent connections have been consistently slow.
pub struct NetworkQualityGate {
    config: NetworkQualityConfig,
    ewma_ms: DashMap<IpAddr, f64>,
}

impl NetworkQualityGate {
    pub fn new(config: NetworkQualityConfig) -> Self {
        Self {
            config,
            ewma_ms: DashMap::new(),
        }
    }

    pub fn record_latency(&self, ip: IpAddr, latency: Duration) {
        let sample = latency.as_secs_f64() * 1000.0;
        let mut entry = self.ewma_ms.entry(ip).or_insert(sample);
        *entry = self.config.ewma_alpha * sample + (1.0 - self.config.ewma_alpha) * *entry;
    }

    pub fn should_reject(&self, ip: IpAddr) -> bool {
        if !self.config.reject_on_poor_connection {
            return false;
        }
        let Some(avg) = self.ewma_ms.get(&ip) else {
            return false;
        };
        *avg > self.config.latency_threshold.as_secs_f64() * 1000.0
    }

    pub fn reject_status(&self) -> u16 {
        self.config.reject_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))
    }

    #[test]
    fn rejects_only_once_enabled_and_threshold_crossed() {
        let config = NetworkQualityConfig {
            reject_on_poor_connection: true,
            latency_threshold: Duration::from_millis(100),
            ewma_alpha: 1.0,
            ..NetworkQualityConfig::default()
        };
        let gate = NetworkQualityGate::new(config);
        assert!(!gate.should_reject(ip()));
        gate.record_latency(ip(), Duration::from_millis(500));
        assert!(gate.should_reject(ip()));
    }

    #[test]
    fn disabled_gate_never_rejects() {
        let gate = NetworkQualityGate::new(NetworkQualityConfig::default());
        gate.record_latency(ip(), Duration::from_secs(5));
        assert!(!gate.should_reject(ip()));
    }
}
