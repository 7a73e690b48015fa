use super::error::{PoolError, PoolResult};
use super::executor::OperationRegistry;
use super::queue::{PriorityQueue, QueuedTask};
use super::task::{Task, TaskKind};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubPoolConfig {
    pub min_workers: usize,
    pub max_workers: usize,
    pub queue_capacity: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub retryable_timeouts: bool,
    pub idle_timeout: Duration,
}

impl Default for SubPoolConfig {
    fn default() -> Self {
        Self {
            min_workers: 1,
            max_workers: 8,
            queue_capacity: 1024,
            max_retries: 3,
            retry_delay: Duration::from_millis(50),
            retryable_timeouts: true,
            idle_timeout: Duration::from_secs(60),
        }
    }
}

/// Work-stealing steal threshold: an idle worker only looks at the sibling
/// sub-pool's queue once global concurrency pressure crosses this fraction.
const STEAL_PRESSURE_THRESHOLD: f64 = 0.75;

pub struct SubPool {
    pub kind: TaskKind,
    queue: Mutex<PriorityQueue>,
    notify: Notify,
    operations: OperationRegistry,
    active_workers: AtomicUsize,
    draining: AtomicBool,
    config: SubPoolConfig,
    global_permits: Arc<Semaphore>,
    global_capacity: usize,
    sibling: OnceLock<Arc<SubPool>>,
}

impl SubPool {
    pub fn new(kind: TaskKind, config: SubPoolConfig, global_permits: Arc<Semaphore>, global_capacity: usize) -> Arc<Self> {
        let operations = OperationRegistry::default();
        let pool = Arc::new(Self {
            kind,
            queue: Mutex::new(PriorityQueue::new(config.queue_capacity)),
            notify: Notify::new(),
            operations,
            active_workers: AtomicUsize::new(0),
            draining: AtomicBool::new(false),
            config,
            global_permits,
            global_capacity,
            sibling: OnceLock::new(),
        });
        pool.clone().spawn_workers(pool.config.min_workers);
        pool
    }

    pub fn link_sibling(&self, sibling: Arc<SubPool>) {
        let _ = self.sibling.set(sibling);
    }

    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::Relaxed)
    }

    fn global_pressure(&self) -> f64 {
        let available = self.global_permits.available_permits();
        let in_use = self.global_capacity.saturating_sub(available);
        in_use as f64 / self.global_capacity.max(1) as f64
    }

    pub fn submit(self: &Arc<Self>, task: Task) -> Result<tokio::sync::oneshot::Receiver<PoolResult>, PoolError> {
        if self.draining.load(Ordering::Relaxed) {
            return Err(PoolError::ShuttingDown);
        }
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.queue.lock().push(task, tx)?;
        if self.active_workers.load(Ordering::Relaxed) < self.config.max_workers
            && self.queue_len() > self.active_workers.load(Ordering::Relaxed)
        {
            self.clone().spawn_workers(1);
        }
        self.notify.notify_one();
        Ok(rx)
    }

    fn spawn_workers(self: Arc<Self>, count: usize) {
        for _ in 0..count {
            if self.active_workers.fetch_add(1, Ordering::Relaxed) >= self.config.max_workers {
                self.active_workers.fetch_sub(1, Ordering::Relaxed);
                return;
            }
            let me = self.clone();
            tokio::spawn(async move { me.worker_loop().await });
        }
    }

    /// A worker drains its own queue; once empty, it only peeks the sibling
    /// sub-pool's queue if global pressure exceeds the steal threshold.
    /// Idle past `idle_timeout` retires the worker unless it would drop the
    /// pool below `min_workers`.
    async fn worker_loop(self: Arc<Self>) {
        loop {
            if let Some(queued) = self.queue.lock().pop() {
                self.run_task(queued).await;
                continue;
            }

            if self.global_pressure() > STEAL_PRESSURE_THRESHOLD
                && let Some(sibling) = self.sibling.get()
                && let Some(queued) = sibling.queue.lock().pop()
            {
                sibling.run_task(queued).await;
                continue;
            }

            let waited = tokio::time::timeout(self.config.idle_timeout, self.notify.notified()).await;
            if waited.is_err() {
                let current = self.active_workers.load(Ordering::Relaxed);
                if current > self.config.min_workers {
                    self.active_workers.fetch_sub(1, Ordering::Relaxed);
                    return;
                }
            }
            if self.draining.load(Ordering::Relaxed) && self.queue.lock().is_empty() {
                self.active_workers.fetch_sub(1, Ordering::Relaxed);
                return;
            }
        }
    }

    async fn run_task(self: &Arc<Self>, queued: QueuedTask) {
        let _permit = self
            .global_permits
            .acquire()
            .await
            .expect("global task semaphore is never closed");
        let QueuedTask { task, result_tx, .. } = queued;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let Some(op) = self.operations.get(&task.operation) else {
                let _ = result_tx.send(Err(PoolError::UnknownOperation(task.operation.clone())));
                return;
            };
            match tokio::time::timeout(task.timeout, op(task.payload.clone())).await {
                Ok(Ok(value)) => {
                    let _ = result_tx.send(Ok(value));
                    return;
                }
                Ok(Err(kind)) => {
                    if kind.is_retryable() && attempt <= self.config.max_retries {
                        tokio::time::sleep(self.config.retry_delay * attempt).await;
                        continue;
                    }
                    let _ = result_tx.send(Err(PoolError::RetriesExhausted(kind)));
                    return;
                }
                Err(_elapsed) => {
                    if self.config.retryable_timeouts && attempt <= self.config.max_retries {
                        tokio::time::sleep(self.config.retry_delay * attempt).await;
                        continue;
                    }
                    let _ = result_tx.send(Err(PoolError::Timeout));
                    return;
                }
            }
        }
    }

    pub async fn drain(&self, grace_period: Duration) {
        self.draining.store(true, Ordering::Relaxed);
        self.notify.notify_waiters();
        let _ = tokio::time::timeout(grace_period, async {
            while self.active_workers.load(Ordering::Relaxed) > 0 {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await;
    }
}
