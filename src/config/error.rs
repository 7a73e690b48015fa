use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config path '{0}' is outside the working directory")]
    PathTraversal(String),
    #[error("config file too large: {len} bytes (max {max} bytes)")]
    TooLarge { len: u64, max: u64 },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
