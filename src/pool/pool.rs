use super::error::{PoolError, PoolResult};
use super::executor::OperationRegistry;
use super::subpool::{SubPool, SubPoolConfig};
use super::task::{Task, TaskId, TaskKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorkerTaskPoolConfig {
    pub cpu: SubPoolConfig,
    pub io: SubPoolConfig,
    pub max_concurrent_tasks: usize,
    pub shutdown_grace_period: Duration,
}

impl Default for WorkerTaskPoolConfig {
    fn default() -> Self {
        Self {
            cpu: SubPoolConfig::default(),
            io: SubPoolConfig::default(),
            max_concurrent_tasks: 16,
            shutdown_grace_period: Duration::from_secs(10),
        }
    }
}

/// Two typed sub-pools sharing one global concurrency cap. See
/// [`SubPool::worker_loop`] for dispatch and work-stealing; this type only
/// owns submission, ID allocation and coordinated shutdown.
pub struct WorkerTaskPool {
    cpu: Arc<SubPool>,
    io: Arc<SubPool>,
    next_id: AtomicU64,
    shutdown_grace_period: Duration,
}

impl WorkerTaskPool {
    pub fn new(config: WorkerTaskPoolConfig) -> Self {
        let global_permits = Arc::new(Semaphore::new(config.max_concurrent_tasks));
        let cpu = SubPool::new(
            TaskKind::Cpu,
            config.cpu,
            global_permits.clone(),
            config.max_concurrent_tasks,
        );
        let io = SubPool::new(
            TaskKind::Io,
            config.io,
            global_permits,
            config.max_concurrent_tasks,
        );
        cpu.link_sibling(io.clone());
        io.link_sibling(cpu.clone());
        Self {
            cpu,
            io,
            next_id: AtomicU64::new(1),
            shutdown_grace_period: config.shutdown_grace_period,
        }
    }

    pub fn cpu_operations(&self) -> &OperationRegistry {
        self.cpu.operations()
    }

    pub fn io_operations(&self) -> &OperationRegistry {
        self.io.operations()
    }

    fn sub_pool(&self, kind: TaskKind) -> &Arc<SubPool> {
        match kind {
            TaskKind::Cpu => &self.cpu,
            TaskKind::Io => &self.io,
        }
    }

    /// Submits a task, returning a receiver that resolves with the task's
    /// outcome. A zero timeout is rejected outright rather than silently
    /// treated as "no timeout".
    pub fn submit(
        &self,
        kind: TaskKind,
        operation: impl Into<String>,
        payload: serde_json::Value,
        priority: u8,
        timeout: Duration,
    ) -> Result<tokio::sync::oneshot::Receiver<PoolResult>, PoolError> {
        if timeout.is_zero() {
            return Err(PoolError::InvalidTimeout);
        }
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = Task::new(id, kind, operation, payload)
            .with_priority(priority)
            .with_timeout(timeout);
        self.sub_pool(kind).submit(task)
    }

    pub fn queue_len(&self, kind: TaskKind) -> usize {
        self.sub_pool(kind).queue_len()
    }

    pub fn active_workers(&self, kind: TaskKind) -> usize {
        self.sub_pool(kind).active_workers()
    }

    /// Drains both sub-pools concurrently, waiting up to the shutdown grace
    /// period before returning regardless of stragglers.
    pub async fn shutdown(&self) {
        tokio::join!(
            self.cpu.drain(self.shutdown_grace_period),
            self.io.drain(self.shutdown_grace_period)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn submitted_task_runs_registered_operation() {
        let pool = WorkerTaskPool::new(WorkerTaskPoolConfig::default());
        pool.cpu_operations().register("echo", |payload| async move { Ok(payload) });
        let rx = pool
            .submit(TaskKind::Cpu, "echo", json!({ "hello": "world" }), 0, Duration::from_secs(1))
            .unwrap();
        let result = rx.await.unwrap().unwrap();
        assert_eq!(result, json!({ "hello": "world" }));
    }

    #[tokio::test]
    async fn unknown_operation_fails_fast() {
        let pool = WorkerTaskPool::new(WorkerTaskPoolConfig::default());
        let rx = pool
            .submit(TaskKind::Io, "does_not_exist", json!(null), 0, Duration::from_secs(1))
            .unwrap();
        let result = rx.await.unwrap();
        assert!(matches!(result, Err(PoolError::UnknownOperation(op)) if op == "does_not_exist"));
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected_at_submission() {
        let pool = WorkerTaskPool::new(WorkerTaskPoolConfig::default());
        let result = pool.submit(TaskKind::Cpu, "echo", json!(null), 0, Duration::ZERO);
        assert!(matches!(result, Err(PoolError::InvalidTimeout)));
    }

    #[tokio::test]
    async fn shutdown_returns_once_workers_drain() {
        let pool = WorkerTaskPool::new(WorkerTaskPoolConfig::default());
        pool.cpu_operations().register("echo", |payload| async move { Ok(payload) });
        let rx = pool
            .submit(TaskKind::Cpu, "echo", json!(1), 0, Duration::from_secs(1))
            .unwrap();
        rx.await.unwrap().unwrap();
        pool.shutdown().await;
        assert_eq!(pool.active_workers(TaskKind::Cpu), 0);
    }
}
