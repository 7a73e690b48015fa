#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CacheStrategy {
    Memory,
    Redis,
    Hybrid,
}

impl CacheStrategy {
    pub fn uses_memory(self) -> bool {
        matches!(self, CacheStrategy::Memory | CacheStrategy::Hybrid)
    }

    pub fn uses_redis(self) -> bool {
        matches!(self, CacheStrategy::Redis | CacheStrategy::Hybrid)
    }
}
