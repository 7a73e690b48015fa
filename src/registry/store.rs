//! Public-ish registry facade combining the radix tree, the predictive
//! cache and resolve statistics behind one lock. Mutation takes a brief
//! write lock; resolution only takes a read lock around the radix walk
//! itself (the predictive cache and stats are lock-free concurrent
//! structures), matching the route tree's read-mostly concurrency model.

use super::cache::PredictiveCache;
use super::stats::{RegistryStats, RegistryStatsSnapshot};
use crate::enums::HttpMethod;
use crate::handler::HandlerChain;
use crate::pattern::KindRegistry;
use crate::radix::{CompiledRoute, RadixResult, RadixTree};
use crate::types::{RouteKey, RouteMatch};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

pub struct RouteRegistry {
    tree: RwLock<RadixTree>,
    cache: PredictiveCache,
    stats: RegistryStats,
}

impl RouteRegistry {
    pub fn new(kinds: Arc<KindRegistry>) -> Self {
        Self {
            tree: RwLock::new(RadixTree::new(kinds)),
            cache: PredictiveCache::default(),
            stats: RegistryStats::default(),
        }
    }

    pub fn register(
        &self,
        method: HttpMethod,
        path: &str,
        chain: HandlerChain,
        priority: u32,
        metadata: Value,
    ) -> RadixResult<RouteKey> {
        let mut tree = self.tree.write();
        let key = tree.insert(method, path, chain, priority, metadata)?;
        drop(tree);
        self.cache.clear();
        Ok(key)
    }

    /// Registers a batch of routes under a single write lock, clearing the
    /// predictive cache once afterward instead of once per entry.
    pub fn register_bulk(
        &self,
        entries: Vec<(HttpMethod, String, HandlerChain, u32, Value)>,
    ) -> RadixResult<Vec<RouteKey>> {
        let mut tree = self.tree.write();
        let keys = tree.insert_bulk(entries)?;
        drop(tree);
        self.cache.clear();
        Ok(keys)
    }

    pub fn remove(&self, method: HttpMethod, path: &str) -> RadixResult<CompiledRoute> {
        let mut tree = self.tree.write();
        let removed = tree.remove(method, path)?;
        drop(tree);
        self.cache.clear();
        Ok(removed)
    }

    pub fn resolve(&self, method: HttpMethod, normalized_path: &str) -> Option<RouteMatch> {
        let start = Instant::now();

        if let Some(hit) = self.cache.get(method, normalized_path) {
            self.stats
                .record_resolve(start.elapsed().as_nanos() as f64, true);
            return Some(hit);
        }

        let result = self.tree.read().resolve(method, normalized_path);
        self.stats
            .record_resolve(start.elapsed().as_nanos() as f64, false);
        if let Some(route_match) = &result {
            self.cache
                .observe_miss(method, normalized_path, route_match);
        }
        result
    }

    pub fn get_route(&self, key: RouteKey) -> Option<CompiledRoute> {
        self.tree.read().get(key).cloned()
    }

    pub fn list(&self) -> Vec<CompiledRoute> {
        self.tree.read().list().cloned().collect()
    }

    pub fn visualize(&self) -> String {
        self.tree.read().visualize()
    }

    pub fn stats(&self) -> RegistryStatsSnapshot {
        self.stats.snapshot(self.tree.read().stats())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
