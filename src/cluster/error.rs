use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to spawn worker process: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("worker {0:?} is not known to the supervisor")]
    UnknownWorker(crate::types::WorkerId),
    #[error("no healthy worker available")]
    NoHealthyWorker,
    #[error("ipc encryption error: {0}")]
    Ipc(String),
}

pub type ClusterResult<T> = Result<T, ClusterError>;
