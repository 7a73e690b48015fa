//! Master-process worker orchestration: spawn, health-check, respawn,
//! load-balance, graceful shutdown. Only ever runs in the master process;
//! workers re-exec the same binary with `CLUSTER_MODE=true`.

use super::error::{ClusterError, ClusterResult};
use super::ipc::{try_read_message, write_message, IpcCipher, IpcMessage, WorkerBootConfig};
use super::lb::{LoadBalanceStrategy, LoadBalancer};
use super::worker::{WorkerHealth, WorkerProcess};
use crate::types::WorkerId;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub enum WorkerCount {
    Fixed(usize),
    Auto,
}

impl WorkerCount {
    pub fn resolve(self) -> usize {
        match self {
            WorkerCount::Fixed(n) => n.max(1),
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClusterConfig {
    pub worker_count: WorkerCount,
    pub base_port: u16,
    pub heartbeat_interval: Duration,
    pub missed_heartbeats_unhealthy: u32,
    pub shutdown_grace_period: Duration,
    pub max_restarts_per_window: u32,
    pub restart_window: Duration,
    pub auto_respawn: bool,
    pub lb_strategy: LoadBalanceStrategy,
    /// When set, supervisor<->worker IPC frames are sealed with this key
    /// instead of travelling as plain JSON over the pipe.
    pub ipc_encryption_key: Option<[u8; 32]>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            worker_count: WorkerCount::Auto,
            base_port: 3000,
            heartbeat_interval: Duration::from_secs(10),
            missed_heartbeats_unhealthy: 3,
            shutdown_grace_period: Duration::from_secs(10),
            max_restarts_per_window: 5,
            restart_window: Duration::from_secs(60),
            auto_respawn: true,
            lb_strategy: LoadBalanceStrategy::RoundRobin,
            ipc_encryption_key: None,
        }
    }
}

struct ManagedWorker {
    process: WorkerProcess,
    child: Child,
    stdin: Option<ChildStdin>,
    restart_history: Vec<Instant>,
}

pub struct ClusterSupervisor {
    config: ClusterConfig,
    workers: Mutex<HashMap<WorkerId, ManagedWorker>>,
    lb: LoadBalancer,
    next_id: AtomicU32,
    next_seq: AtomicU64,
    cipher: Option<Arc<IpcCipher>>,
}

impl ClusterSupervisor {
    pub fn new(config: ClusterConfig) -> Self {
        let lb = LoadBalancer::new(config.lb_strategy);
        let cipher = config.ipc_encryption_key.as_ref().map(|key| Arc::new(IpcCipher::new(key)));
        Self {
            config,
            workers: Mutex::new(HashMap::new()),
            lb,
            next_id: AtomicU32::new(1),
            next_seq: AtomicU64::new(1),
            cipher,
        }
    }

    pub async fn start(self: &Arc<Self>) -> ClusterResult<()> {
        let count = self.config.worker_count.resolve();
        for _ in 0..count {
            self.spawn_one().await?;
        }
        Ok(())
    }

    async fn spawn_one(self: &Arc<Self>) -> ClusterResult<WorkerId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let port = self.config.base_port + id as u16;
        let boot = WorkerBootConfig {
            worker_id: id,
            port,
            cache: None,
            ipc_key: self.config.ipc_encryption_key,
        };
        let config_json = serde_json::to_string(&boot).unwrap_or_default();

        let exe = std::env::current_exe().map_err(ClusterError::Spawn)?;
        let mut child = Command::new(exe)
            .env("CLUSTER_MODE", "true")
            .env("WORKER_ID", id.to_string())
            .env("WORKER_PORT", port.to_string())
            .env("XYPRISS_SERVER_CONFIG", config_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(ClusterError::Spawn)?;

        let pid = child.id().unwrap_or(0);
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let process = WorkerProcess::new(id, pid, port);
        self.workers.lock().await.insert(
            id,
            ManagedWorker {
                process,
                child,
                stdin,
                restart_history: Vec::new(),
            },
        );
        tracing::info!(worker_id = id, pid, port, "spawned cluster worker");

        if let Some(stdout) = stdout {
            let supervisor = Arc::clone(self);
            tokio::spawn(async move { supervisor.read_heartbeats(id, stdout).await });
        }

        Ok(id)
    }

    /// Reads framed `IpcMessage`s from one worker's stdout until it closes
    /// or sends something malformed; heartbeats update the worker's health,
    /// everything else is dropped (the worker->supervisor channel currently
    /// only carries heartbeats).
    async fn read_heartbeats(self: Arc<Self>, id: WorkerId, mut stdout: tokio::process::ChildStdout) {
        loop {
            match try_read_message(&mut stdout, self.cipher.as_deref()).await {
                Ok(Some(IpcMessage::Heartbeat { load, .. })) => {
                    self.record_heartbeat(id, load as u32).await;
                }
                Ok(Some(_)) => continue,
                Ok(None) => {
                    tracing::debug!(worker_id = id, "worker closed its ipc stream");
                    return;
                }
                Err(err) => {
                    tracing::warn!(worker_id = id, error = %err, "ipc read error from worker; stopping heartbeat reader");
                    return;
                }
            }
        }
    }

    pub async fn record_heartbeat(&self, id: WorkerId, load: u32) {
        let mut workers = self.workers.lock().await;
        if let Some(managed) = workers.get_mut(&id) {
            managed.process.last_heartbeat = Instant::now();
            managed.process.missed_heartbeats = 0;
            managed.process.active_connections = load;
            if managed.process.health == WorkerHealth::Starting {
                managed.process.health = WorkerHealth::Ready;
            }
        }
    }

    /// One pass of the reconciliation loop: mark stale workers unhealthy,
    /// reap and respawn the ones already marked, within the restart budget.
    pub async fn reconcile(self: &Arc<Self>) -> ClusterResult<()> {
        let stale_deadline = self.config.heartbeat_interval * self.config.missed_heartbeats_unhealthy;
        let mut to_respawn = Vec::new();

        {
            let mut workers = self.workers.lock().await;
            for managed in workers.values_mut() {
                if managed.process.health == WorkerHealth::Stopped {
                    continue;
                }
                if managed.process.last_heartbeat.elapsed() > stale_deadline {
                    managed.process.missed_heartbeats += 1;
                    if managed.process.missed_heartbeats >= self.config.missed_heartbeats_unhealthy {
                        managed.process.health = WorkerHealth::Unhealthy;
                    }
                }
                if managed.process.health == WorkerHealth::Unhealthy {
                    to_respawn.push(managed.process.id);
                }
            }
        }

        for id in to_respawn {
            self.reap_and_respawn(id).await?;
        }
        Ok(())
    }

    async fn reap_and_respawn(self: &Arc<Self>, id: WorkerId) -> ClusterResult<()> {
        let restart_count = {
            let mut workers = self.workers.lock().await;
            let Some(mut managed) = workers.remove(&id) else {
                return Ok(());
            };
            let _ = managed.child.start_kill();
            let _ = managed.child.wait().await;
            managed.process.health = WorkerHealth::Stopped;

            let now = Instant::now();
            let exhausted = prune_and_check_budget(
                &mut managed.restart_history,
                now,
                self.config.restart_window,
                self.config.max_restarts_per_window,
            );

            if !self.config.auto_respawn || exhausted {
                tracing::warn!(worker_id = id, "worker crash-loop budget exhausted; not respawning");
                return Ok(());
            }
            managed.restart_history.len() as u32
        };

        let backoff = Duration::from_millis(200) * 2u32.pow(restart_count.min(6));
        tokio::time::sleep(backoff).await;
        let new_id = self.spawn_one().await?;
        tracing::info!(old_worker_id = id, new_worker_id = new_id, "respawned worker");
        Ok(())
    }

    /// Read-only snapshot of every known worker, for the admin metrics
    /// endpoint and tests; not used on the request hot path.
    pub async fn worker_snapshot(&self) -> Vec<WorkerProcess> {
        self.workers.lock().await.values().map(|m| m.process.clone()).collect()
    }

    pub async fn pick_worker(&self) -> ClusterResult<WorkerId> {
        let workers = self.workers.lock().await;
        let snapshot: Vec<WorkerProcess> = workers.values().map(|m| m.process.clone()).collect();
        self.lb
            .pick(&snapshot)
            .map(|w| w.id)
            .ok_or(ClusterError::NoHealthyWorker)
    }

    /// Signals every worker to stop over its ipc stdin, waits up to the
    /// grace period for it to exit voluntarily, then force-kills stragglers.
    pub async fn shutdown(&self) {
        let mut workers = self.workers.lock().await;

        for managed in workers.values_mut() {
            if let Some(stdin) = managed.stdin.as_mut() {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                if let Err(err) = write_message(stdin, &IpcMessage::Shutdown { seq }, self.cipher.as_deref()).await {
                    tracing::warn!(worker_id = managed.process.id, error = %err, "failed to signal worker shutdown; will force-kill after grace period");
                }
            }
        }

        let deadline = Instant::now() + self.config.shutdown_grace_period;
        for managed in workers.values_mut() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let exited = tokio::time::timeout(remaining, managed.child.wait()).await.is_ok();
            if !exited {
                let _ = managed.child.start_kill();
                let _ = managed.child.wait().await;
            }
            managed.process.health = WorkerHealth::Stopped;
        }
    }

    /// Listens for SIGTERM/SIGINT/SIGHUP and runs `shutdown` on the first
    /// one received.
    pub async fn wait_for_shutdown_signal(self: &Arc<Self>) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
            let mut sighup = signal(SignalKind::hangup()).expect("failed to register SIGHUP handler");
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                _ = sighup.recv() => tracing::info!("received SIGHUP"),
                _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT"),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        self.shutdown().await;
    }
}

/// Drops restart timestamps older than `window`, then reports whether the
/// remaining count has already reached `max` — i.e. whether one more respawn
/// would be allowed. Pulled out of `reap_and_respawn` so the crash-loop
/// budget can be tested without spawning a real worker process.
fn prune_and_check_budget(history: &mut Vec<Instant>, now: Instant, window: Duration, max: u32) -> bool {
    history.retain(|t| now.duration_since(*t) < window);
    history.len() as u32 >= max
}
