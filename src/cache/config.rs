use super::strategy::CacheStrategy;
use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheConfig {
    pub strategy: CacheStrategy,
    pub redis_url: String,
    pub redis_db: i64,
    pub security_enabled: bool,
    pub master_key: [u8; 32],
    pub memory_ttl: Duration,
    pub memory_capacity_hint: usize,
    pub hot_access_threshold: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strategy: CacheStrategy::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_db: 0,
            security_enabled: false,
            master_key: [0u8; 32],
            memory_ttl: Duration::from_secs(5 * 60),
            memory_capacity_hint: 10_000,
            hot_access_threshold: 10,
        }
    }
}
