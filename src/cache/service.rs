use super::config::CacheConfig;
use super::crypto::CipherEnvelope;
use super::entry::{CacheEntryMeta, Tier};
use super::key::{namespaced, validate_key};
use super::memory::MemoryTier;
use super::redis_tier::RedisTier;
use super::stats::{CacheStats, CacheStatsSnapshot, HealthStatus};
use super::strategy::CacheStrategy;
use super::tags::TagIndex;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast;

pub use super::stats::CacheEvent;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Memory-first cache with an optional Redis tier, tag invalidation and
/// at-rest encryption. Get/set never propagate tier failures to the caller:
/// a failed get degrades to a miss, a failed set returns `false`.
pub struct HybridCache {
    config: CacheConfig,
    memory: MemoryTier,
    redis: Option<RedisTier>,
    cipher: Option<CipherEnvelope>,
    tags: TagIndex,
    meta: DashMap<String, CacheEntryMeta>,
    stats: CacheStats,
    events: broadcast::Sender<CacheEvent>,
}

#[derive(Default)]
pub struct SetOptions {
    pub ttl: Option<Duration>,
    pub tags: Vec<String>,
}

impl HybridCache {
    pub async fn new(config: CacheConfig) -> Self {
        let redis = if config.strategy.uses_redis() {
            match RedisTier::connect(&config.redis_url, config.redis_db).await {
                Ok(tier) => Some(tier),
                Err(err) => {
                    tracing::warn!(error = %err, "cache redis tier unavailable at startup; continuing memory-only");
                    None
                }
            }
        } else {
            None
        };
        let cipher = config
            .security_enabled
            .then(|| CipherEnvelope::new(&config.master_key));
        let tags = if redis.is_some() {
            TagIndex::redis()
        } else {
            TagIndex::memory()
        };
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            memory: MemoryTier::new(),
            redis,
            cipher,
            tags,
            meta: DashMap::new(),
            stats: CacheStats::default(),
            config,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: CacheEvent) {
        let _ = self.events.send(event);
    }

    fn record_access(&self, nskey: &str, tier: Tier) -> bool {
        let mut entry = self
            .meta
            .entry(nskey.to_string())
            .or_insert_with(|| CacheEntryMeta::new(tier, 0));
        entry.record_access();
        entry.tier = tier;
        let became_hot = !entry.hot && entry.access_count >= self.config.hot_access_threshold;
        if became_hot {
            entry.hot = true;
        }
        became_hot || entry.hot
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        if validate_key(key).is_err() {
            return None;
        }
        let nskey = namespaced(key);

        if self.config.strategy.uses_memory()
            && let Some(value) = self.memory.get(&nskey)
        {
            self.stats.memory_hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            self.record_access(&nskey, Tier::Memory);
            return Some(value);
        }
        self.stats.memory_misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let Some(redis) = self.redis.as_ref().filter(|_| self.config.strategy.uses_redis()) else {
            return None;
        };

        let fetched = match redis.get_with_ttl(&nskey).await {
            Ok(v) => v,
            Err(err) => {
                self.emit(CacheEvent::CacheError {
                    message: err.to_string(),
                });
                None
            }
        };
        let Some((raw, ttl)) = fetched else {
            self.stats.redis_misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            return None;
        };
        self.stats.redis_hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let plaintext = match &self.cipher {
            Some(cipher) => match cipher.open(&raw) {
                Ok(p) => p,
                Err(_) => {
                    self.emit(CacheEvent::SuspiciousAccess { key: key.to_string() });
                    self.meta.remove(&nskey);
                    return None;
                }
            },
            None => raw,
        };
        let value: Value = serde_json::from_slice(&plaintext).ok()?;

        let is_hot = self.record_access(&nskey, Tier::Redis);
        if is_hot && self.config.strategy == CacheStrategy::Hybrid {
            // Cap the promoted entry's lifetime at memory_ttl so a long-lived
            // redis key doesn't pin memory indefinitely, but never outlive
            // the time actually left on the redis key.
            let promoted_ttl = match ttl {
                Some(remaining) => Some(remaining.min(self.config.memory_ttl)),
                None => Some(self.config.memory_ttl),
            };
            self.memory.set(&nskey, value.clone(), promoted_ttl, Vec::new());
            self.stats.promotions.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
        Some(value)
    }

    pub async fn set(&self, key: &str, value: Value, opts: SetOptions) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        let nskey = namespaced(key);
        let mut ok = true;

        if self.config.strategy.uses_memory() {
            self.memory
                .set(&nskey, value.clone(), opts.ttl, opts.tags.clone());
        }

        if self.config.strategy.uses_redis()
            && let Some(redis) = &self.redis
        {
            ok = match serde_json::to_vec(&value) {
                Ok(plain) => {
                    let payload = match &self.cipher {
                        Some(cipher) => cipher.seal(&plain).unwrap_or(plain),
                        None => plain,
                    };
                    redis.set_ex(&nskey, &payload, opts.ttl).await.is_ok()
                }
                Err(_) => false,
            };
        }

        for tag in &opts.tags {
            let _ = self.tags.associate(self.redis.as_ref(), tag, &nskey).await;
        }

        self.meta
            .entry(nskey)
            .or_insert_with(|| CacheEntryMeta::new(Tier::Memory, value.to_string().len()));
        self.stats.sets.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        ok
    }

    pub async fn delete(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        let nskey = namespaced(key);
        let mem_removed = self.memory.delete(&nskey);
        let redis_removed = match &self.redis {
            Some(redis) if self.config.strategy.uses_redis() => redis.delete(&nskey).await.unwrap_or(false),
            _ => false,
        };
        self.meta.remove(&nskey);
        mem_removed || redis_removed
    }

    pub async fn exists(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        let nskey = namespaced(key);
        if self.memory.exists(&nskey) {
            return true;
        }
        match &self.redis {
            Some(redis) if self.config.strategy.uses_redis() => redis.exists(&nskey).await.unwrap_or(false),
            _ => false,
        }
    }

    pub async fn clear(&self) {
        self.memory.clear();
        if let Some(redis) = &self.redis {
            let _ = redis.clear_namespace("XyPriss:v2:*").await;
        }
        self.meta.clear();
    }

    /// Invalidates every key tagged `t` for each `t` in `tags`; returns the
    /// total number of distinct keys removed.
    pub async fn invalidate_by_tags(&self, tags: &[String]) -> usize {
        let mut removed = 0usize;
        for tag in tags {
            let members = self.tags.members(self.redis.as_ref(), tag).await.unwrap_or_default();
            for member in &members {
                self.memory.delete(member);
                if let Some(redis) = &self.redis {
                    let _ = redis.delete(member).await;
                }
                self.meta.remove(member);
                removed += 1;
            }
            let _ = self.tags.clear_tag(self.redis.as_ref(), tag).await;
            self.emit(CacheEvent::CacheInvalidated {
                tag: tag.clone(),
                count: members.len(),
            });
        }
        removed
    }

    pub async fn mget(&self, keys: &[String]) -> HashMap<String, Value> {
        if keys.is_empty() {
            return HashMap::new();
        }
        let fetched = futures::future::join_all(keys.iter().map(|key| async move { (key.clone(), self.get(key).await) })).await;
        fetched
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect()
    }

    /// Reports success only if every single-key write succeeded.
    pub async fn mset(&self, entries: Vec<(String, Value, SetOptions)>) -> bool {
        let results = futures::future::join_all(entries.into_iter().map(|(key, value, opts)| async move { self.set(&key, value, opts).await })).await;
        results.into_iter().all(|ok| ok)
    }

    pub async fn get_ttl(&self, key: &str) -> Option<Duration> {
        let nskey = namespaced(key);
        if self.config.strategy.uses_memory()
            && let Some(ttl) = self.memory.get_ttl(&nskey)
        {
            return Some(ttl);
        }
        match &self.redis {
            Some(redis) if self.config.strategy.uses_redis() => redis.get_ttl(&nskey).await.ok().flatten(),
            _ => None,
        }
    }

    pub async fn expire(&self, key: &str, ttl: Duration) -> bool {
        let nskey = namespaced(key);
        let mem = self.memory.expire(&nskey, ttl);
        let redis = match &self.redis {
            Some(redis) if self.config.strategy.uses_redis() => redis.expire(&nskey, ttl).await.unwrap_or(false),
            _ => false,
        };
        mem || redis
    }

    pub async fn keys(&self, pattern: &str) -> Vec<String> {
        if self.config.strategy.uses_redis()
            && let Some(redis) = &self.redis
        {
            return redis.scan_keys(pattern).await.unwrap_or_default();
        }
        self.memory.keys_matching(pattern)
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn health(&self) -> HealthStatus {
        let redis_connected = match &self.redis {
            Some(redis) => redis.health_check().await,
            None => true,
        };
        let usage_pct = if self.config.memory_capacity_hint == 0 {
            0.0
        } else {
            self.memory.len() as f64 / self.config.memory_capacity_hint as f64
        };
        self.stats
            .health(usage_pct, self.config.strategy.uses_redis(), redis_connected)
    }
}
