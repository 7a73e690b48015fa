mod error;
mod ipc;
mod lb;
mod supervisor;
mod worker;

pub use error::{ClusterError, ClusterResult};
pub use ipc::{try_read_message, write_message, IpcCipher, IpcMessage, WorkerBootConfig, WorkerIpcClient};
pub use lb::{LoadBalanceStrategy, LoadBalancer};
pub use supervisor::{ClusterConfig, ClusterSupervisor, WorkerCount};
pub use worker::{WorkerHealth, WorkerProcess};
