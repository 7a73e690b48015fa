use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NetworkQualityConfig {
    pub reject_on_poor_connection: bool,
    pub latency_threshold: Duration,
    pub reject_status: u16,
    pub ewma_alpha: f64,
}

impl Default for NetworkQualityConfig {
    fn default() -> Self {
        Self {
            reject_on_poor_connection: false,
            latency_threshold: Duration::from_millis(500),
            reject_status: 503,
            ewma_alpha: 0.2,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RequestManagerConfig {
    /// Default per-request timeout, overridden per-route via `route_timeouts`.
    pub default_timeout: Duration,
    pub route_timeouts: HashMap<String, Duration>,
    pub max_concurrent_total: u32,
    pub max_concurrent_per_ip: u32,
    pub max_body_bytes: usize,
    pub max_url_length: usize,
    pub lifecycle_tracking: bool,
    pub stage_warning_threshold: Duration,
    pub network_quality: NetworkQualityConfig,
}

impl Default for RequestManagerConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            route_timeouts: HashMap::new(),
            max_concurrent_total: 10_000,
            max_concurrent_per_ip: 100,
            max_body_bytes: 10 * 1024 * 1024,
            max_url_length: 8 * 1024,
            lifecycle_tracking: true,
            stage_warning_threshold: Duration::from_millis(200),
            network_quality: NetworkQualityConfig::default(),
        }
    }
}

impl RequestManagerConfig {
    pub fn timeout_for(&self, route_path: &str) -> Duration {
        self.route_timeouts
            .get(route_path)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}
