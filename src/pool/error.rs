use thiserror::Error;

/// Classification of a task's own failure, used to decide retryability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskErrorKind {
    InvalidInput,
    PermissionDenied,
    UnsupportedType,
    OversizePayload,
    Other(String),
}

impl TaskErrorKind {
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            TaskErrorKind::InvalidInput
                | TaskErrorKind::PermissionDenied
                | TaskErrorKind::UnsupportedType
                | TaskErrorKind::OversizePayload
        )
    }
}

impl std::fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskErrorKind::InvalidInput => write!(f, "invalid input"),
            TaskErrorKind::PermissionDenied => write!(f, "permission denied"),
            TaskErrorKind::UnsupportedType => write!(f, "unsupported task type"),
            TaskErrorKind::OversizePayload => write!(f, "oversize payload"),
            TaskErrorKind::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("task queue is full")]
    QueueFull,
    #[error("task timed out")]
    Timeout,
    #[error("task {0} is not registered with this pool")]
    UnknownOperation(String),
    #[error("task failed: {0}")]
    Task(TaskErrorKind),
    #[error("task failed after exhausting retries: {0}")]
    RetriesExhausted(TaskErrorKind),
    #[error("a timeout of zero is not a valid task deadline")]
    InvalidTimeout,
    #[error("pool is shutting down")]
    ShuttingDown,
}

pub type PoolResult = Result<serde_json::Value, PoolError>;
