use super::error::RejectionReason;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct Shared {
    total: AtomicU32,
    total_cap: u32,
    per_ip: DashMap<IpAddr, AtomicU32>,
    per_ip_cap: u32,
}

/// Tracks in-flight request counts, globally and per remote address.
#[derive(Clone)]
pub struct ConcurrencyTracker {
    inner: Arc<Shared>,
}

/// Releases its slot when dropped, regardless of how the request finished.
pub struct ConcurrencySlot {
    shared: Arc<Shared>,
    ip: IpAddr,
}

impl ConcurrencyTracker {
    pub fn new(total_cap: u32, per_ip_cap: u32) -> Self {
        Self {
            inner: Arc::new(Shared {
                total: AtomicU32::new(0),
                total_cap,
                per_ip: DashMap::new(),
                per_ip_cap,
            }),
        }
    }

    pub fn try_admit(&self, ip: IpAddr) -> Result<ConcurrencySlot, RejectionReason> {
        if self.inner.total.fetch_add(1, Ordering::AcqRel) >= self.inner.total_cap {
            self.inner.total.fetch_sub(1, Ordering::AcqRel);
            return Err(RejectionReason::GlobalConcurrencyExceeded);
        }

        let entry = self.inner.per_ip.entry(ip).or_insert_with(|| AtomicU32::new(0));
        if entry.fetch_add(1, Ordering::AcqRel) >= self.inner.per_ip_cap {
            entry.fetch_sub(1, Ordering::AcqRel);
            self.inner.total.fetch_sub(1, Ordering::AcqRel);
            return Err(RejectionReason::PerIpConcurrencyExceeded);
        }

        Ok(ConcurrencySlot {
            shared: Arc::clone(&self.inner),
            ip,
        })
    }

    pub fn active_total(&self) -> u32 {
        self.inner.total.load(Ordering::Acquire)
    }

    pub fn active_for(&self, ip: IpAddr) -> u32 {
        self.inner
            .per_ip
            .get(&ip)
            .map(|c| c.load(Ordering::Acquire))
            .unwrap_or(0)
    }
}

impl Drop for ConcurrencySlot {
    fn drop(&mut self) {
        self.shared.total.fetch_sub(1, Ordering::AcqRel);
        if let Some(counter) = self.shared.per_ip.get(&self.ip) {
            counter.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn ip(n: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, n))
    }

    #[test]
    fn admits_within_caps_and_releases_on_drop() {
        let tracker = ConcurrencyTracker::new(2, 2);
        let a = tracker.try_admit(ip(1)).unwrap();
        let b = tracker.try_admit(ip(1)).unwrap();
        assert_eq!(tracker.active_total(), 2);
        assert!(tracker.try_admit(ip(1)).is_err());
        drop(a);
        assert_eq!(tracker.active_total(), 1);
        drop(b);
        assert_eq!(tracker.active_total(), 0);
    }

    #[test]
    fn per_ip_cap_is_independent_of_total_cap() {
        let tracker = ConcurrencyTracker::new(10, 1);
        let _a = tracker.try_admit(ip(1)).unwrap();
        assert_eq!(
            tracker.try_admit(ip(1)).unwrap_err(),
            RejectionReason::PerIpConcurrencyExceeded
        );
        assert!(tracker.try_admit(ip(2)).is_ok());
    }
}
