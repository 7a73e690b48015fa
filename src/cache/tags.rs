//! Tag index: which keys belong to which tag, for batch invalidation.
//! Lives in Redis when Redis is in play (so it survives process restarts
//! and is shared across workers); falls back to an in-memory set otherwise.

use super::error::CacheResult;
use super::key::tag_set_key;
use super::redis_tier::RedisTier;
use dashmap::DashMap;
use std::collections::HashSet;
use std::time::Duration;

const TAG_SET_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Default)]
struct MemoryTagIndex {
    sets: DashMap<String, HashSet<String>>,
}

pub enum TagIndex {
    Memory(MemoryTagIndex),
    Redis,
}

impl TagIndex {
    pub fn memory() -> Self {
        TagIndex::Memory(MemoryTagIndex::default())
    }

    pub fn redis() -> Self {
        TagIndex::Redis
    }

    pub async fn associate(&self, redis: Option<&RedisTier>, tag: &str, namespaced_key: &str) -> CacheResult<()> {
        match (self, redis) {
            (TagIndex::Redis, Some(redis)) => {
                redis.sadd(&tag_set_key(tag), namespaced_key, TAG_SET_TTL).await
            }
            _ => {
                if let TagIndex::Memory(idx) = self {
                    idx.sets
                        .entry(tag.to_string())
                        .or_default()
                        .insert(namespaced_key.to_string());
                }
                Ok(())
            }
        }
    }

    pub async fn members(&self, redis: Option<&RedisTier>, tag: &str) -> CacheResult<Vec<String>> {
        match (self, redis) {
            (TagIndex::Redis, Some(redis)) => redis.smembers(&tag_set_key(tag)).await,
            _ => {
                if let TagIndex::Memory(idx) = self {
                    Ok(idx
                        .sets
                        .get(tag)
                        .map(|s| s.iter().cloned().collect())
                        .unwrap_or_default())
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }

    pub async fn clear_tag(&self, redis: Option<&RedisTier>, tag: &str) -> CacheResult<()> {
        match (self, redis) {
            (TagIndex::Redis, Some(redis)) => {
                redis.delete(&tag_set_key(tag)).await?;
                Ok(())
            }
            _ => {
                if let TagIndex::Memory(idx) = self {
                    idx.sets.remove(tag);
                }
                Ok(())
            }
        }
    }
}
