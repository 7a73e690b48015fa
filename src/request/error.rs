use thiserror::Error;

/// Reasons admission can be refused before a request reaches the route
/// engine or handler chain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("global concurrency limit exceeded")]
    GlobalConcurrencyExceeded,
    #[error("per-IP concurrency limit exceeded")]
    PerIpConcurrencyExceeded,
    #[error("request body exceeds the configured maximum")]
    PayloadTooLarge,
    #[error("request URL exceeds the configured maximum length")]
    UrlTooLong,
    #[error("recent connection quality from this peer is below threshold")]
    PoorConnection,
}

impl RejectionReason {
    /// HTTP status the caller should respond with if it surfaces this
    /// rejection directly rather than invoking a custom overflow handler.
    pub fn status_code(self, poor_connection_status: u16) -> u16 {
        match self {
            RejectionReason::GlobalConcurrencyExceeded => 429,
            RejectionReason::PerIpConcurrencyExceeded => 429,
            RejectionReason::PayloadTooLarge => 413,
            RejectionReason::UrlTooLong => 414,
            RejectionReason::PoorConnection => poor_connection_status,
        }
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("admission rejected: {0}")]
    Rejected(#[from] RejectionReason),
    #[error("request exceeded its timeout")]
    Timeout,
}

pub const TIMEOUT_STATUS: u16 = 408;
