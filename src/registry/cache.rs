//! Predictive per-(method, concrete-path) route cache. Frequently-resolved
//! concrete paths (e.g. the same `/users/42` hit repeatedly) bypass the
//! radix walk entirely once they cross the admission threshold.

use crate::enums::HttpMethod;
use crate::types::RouteMatch;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

const ADMISSION_THRESHOLD: u64 = 3;
const DEFAULT_CAPACITY: usize = 1000;

struct CacheSlot {
    route_match: RouteMatch,
    access_count: AtomicU64,
}

/// Not admitted until the same key has been looked up `ADMISSION_THRESHOLD`
/// times; bounded, least-accessed-first eviction once full. Rebuilding the
/// cache is advisory only and never changes resolution semantics.
pub struct PredictiveCache {
    capacity: usize,
    entries: DashMap<String, CacheSlot>,
    pending_access_counts: DashMap<String, u64>,
}

impl PredictiveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: DashMap::new(),
            pending_access_counts: DashMap::new(),
        }
    }

    fn key(method: HttpMethod, path: &str) -> String {
        format!("{method}:{path}")
    }

    /// Looks up a cached match, bumping its access counter on hit.
    pub fn get(&self, method: HttpMethod, path: &str) -> Option<RouteMatch> {
        let key = Self::key(method, path);
        let slot = self.entries.get(&key)?;
        slot.access_count.fetch_add(1, Ordering::Relaxed);
        Some(slot.route_match.clone())
    }

    /// Records a radix-walk resolution that missed the cache, admitting the
    /// key once it has been seen `ADMISSION_THRESHOLD` times.
    pub fn observe_miss(&self, method: HttpMethod, path: &str, route_match: &RouteMatch) {
        let key = Self::key(method, path);
        if self.entries.contains_key(&key) {
            return;
        }
        let count = {
            let mut entry = self.pending_access_counts.entry(key.clone()).or_insert(0);
            *entry += 1;
            *entry
        };
        if count < ADMISSION_THRESHOLD {
            return;
        }
        self.pending_access_counts.remove(&key);
        if self.entries.len() >= self.capacity {
            self.evict_least_accessed();
        }
        self.entries.insert(
            key,
            CacheSlot {
                route_match: route_match.clone(),
                access_count: AtomicU64::new(1),
            },
        );
    }

    fn evict_least_accessed(&self) {
        let Some(victim) = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().access_count.load(Ordering::Relaxed))
            .map(|entry| entry.key().clone())
        else {
            return;
        };
        self.entries.remove(&victim);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.pending_access_counts.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PredictiveCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteMatch;

    fn rm(key: u32) -> RouteMatch {
        RouteMatch::new(key, Vec::new())
    }

    #[test]
    fn admits_only_after_third_access() {
        let cache = PredictiveCache::new(10);
        let m = rm(1);
        cache.observe_miss(HttpMethod::Get, "/a", &m);
        cache.observe_miss(HttpMethod::Get, "/a", &m);
        assert!(cache.get(HttpMethod::Get, "/a").is_none());
        cache.observe_miss(HttpMethod::Get, "/a", &m);
        assert!(cache.get(HttpMethod::Get, "/a").is_some());
    }

    #[test]
    fn evicts_least_accessed_when_full() {
        let cache = PredictiveCache::new(1);
        let a = rm(1);
        let b = rm(2);
        for _ in 0..3 {
            cache.observe_miss(HttpMethod::Get, "/a", &a);
        }
        assert!(cache.get(HttpMethod::Get, "/a").is_some());
        for _ in 0..3 {
            cache.observe_miss(HttpMethod::Get, "/b", &b);
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.get(HttpMethod::Get, "/b").is_some());
    }
}
