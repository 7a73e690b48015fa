mod error;
mod executor;
mod pool;
mod queue;
mod subpool;
mod task;

pub use error::{PoolError, PoolResult, TaskErrorKind};
pub use executor::{OperationFn, OperationRegistry};
pub use pool::{WorkerTaskPool, WorkerTaskPoolConfig};
pub use subpool::SubPoolConfig;
pub use task::{Task, TaskId, TaskKind, TaskStatus};
