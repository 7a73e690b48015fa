use thiserror::Error;

/// Internal cache failure kinds. Per the failure-semantics contract these
/// never reach callers directly: `get` degrades to `None`, `set` to `false`;
/// only [`crate::cache::HybridCache::health`] and telemetry observe this type.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache key is empty")]
    EmptyKey,
    #[error("cache key exceeds 512 characters ({len} given)")]
    KeyTooLong { len: usize },
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("encryption error: {0}")]
    Encryption(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("integrity check failed for key '{key}'")]
    Tampered { key: String },
}

pub type CacheResult<T> = Result<T, CacheError>;
