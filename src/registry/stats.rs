//! Route engine statistics: registration totals plus resolve-time counters.
//! Resolve counters use a relaxed-ordering atomic snapshot model -- exactness
//! under concurrent resolves is not required, only a representative sample.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Smoothing factor for the exponentially-weighted average resolve time.
const EWMA_ALPHA: f64 = 0.1;

#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStatsSnapshot {
    pub registered: usize,
    pub static_routes: usize,
    pub dynamic_routes: usize,
    pub executions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub avg_resolve_time_ns: f64,
}

#[derive(Debug, Default)]
pub struct RegistryStats {
    executions: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    avg_resolve_time_ns: Mutex<f64>,
}

impl RegistryStats {
    pub fn record_resolve(&self, elapsed_ns: f64, cache_hit: bool) {
        self.executions.fetch_add(1, Ordering::Relaxed);
        if cache_hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
        let mut avg = self.avg_resolve_time_ns.lock();
        *avg = if self.executions.load(Ordering::Relaxed) == 1 {
            elapsed_ns
        } else {
            EWMA_ALPHA * elapsed_ns + (1.0 - EWMA_ALPHA) * *avg
        };
    }

    pub fn snapshot(&self, radix: crate::radix::RadixStats) -> RegistryStatsSnapshot {
        RegistryStatsSnapshot {
            registered: radix.registered,
            static_routes: radix.static_routes,
            dynamic_routes: radix.dynamic_routes,
            executions: self.executions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            avg_resolve_time_ns: *self.avg_resolve_time_ns.lock(),
        }
    }
}
