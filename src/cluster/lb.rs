use super::worker::WorkerProcess;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoadBalanceStrategy {
    RoundRobin,
    WeightedLeastConnections,
}

/// Picks the next worker for an incoming connection. Round-robin keeps a
/// rotating cursor; weighted-least-connections normalizes active
/// connections by weight and breaks ties by lower PID.
pub struct LoadBalancer {
    strategy: LoadBalanceStrategy,
    cursor: AtomicUsize,
}

impl LoadBalancer {
    pub fn new(strategy: LoadBalanceStrategy) -> Self {
        Self {
            strategy,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn pick<'a>(&self, workers: &'a [WorkerProcess]) -> Option<&'a WorkerProcess> {
        let eligible: Vec<&WorkerProcess> = workers.iter().filter(|w| w.is_selectable()).collect();
        if eligible.is_empty() {
            return None;
        }
        match self.strategy {
            LoadBalanceStrategy::RoundRobin => {
                let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % eligible.len();
                Some(eligible[idx])
            }
            LoadBalanceStrategy::WeightedLeastConnections => eligible
                .into_iter()
                .min_by(|a, b| {
                    let load_a = a.active_connections as f64 / a.weight.max(1) as f64;
                    let load_b = b.active_connections as f64 / b.weight.max(1) as f64;
                    load_a
                        .partial_cmp(&load_b)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.pid.cmp(&b.pid))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::worker::WorkerHealth;

    fn ready_worker(id: u32, pid: u32, active_connections: u32, weight: u32) -> WorkerProcess {
        let mut worker = WorkerProcess::new(id, pid, 3000 + id as u16);
        worker.health = WorkerHealth::Ready;
        worker.active_connections = active_connections;
        worker.weight = weight;
        worker
    }

    #[test]
    fn no_eligible_workers_returns_none() {
        let lb = LoadBalancer::new(LoadBalanceStrategy::RoundRobin);
        let starting = WorkerProcess::new(1, 100, 3001);
        assert!(lb.pick(&[starting]).is_none());
    }

    #[test]
    fn round_robin_cycles_through_eligible_workers() {
        let lb = LoadBalancer::new(LoadBalanceStrategy::RoundRobin);
        let workers = vec![ready_worker(1, 100, 0, 1), ready_worker(2, 101, 0, 1)];
        let first = lb.pick(&workers).unwrap().id;
        let second = lb.pick(&workers).unwrap().id;
        assert_ne!(first, second);
    }

    #[test]
    fn round_robin_skips_unselectable_workers() {
        let lb = LoadBalancer::new(LoadBalanceStrategy::RoundRobin);
        let mut unhealthy = WorkerProcess::new(1, 100, 3001);
        unhealthy.health = WorkerHealth::Unhealthy;
        let ready = ready_worker(2, 101, 0, 1);
        let workers = vec![unhealthy, ready];
        for _ in 0..3 {
            assert_eq!(lb.pick(&workers).unwrap().id, 2);
        }
    }

    #[test]
    fn weighted_least_connections_picks_lowest_normalized_load() {
        let lb = LoadBalancer::new(LoadBalanceStrategy::WeightedLeastConnections);
        let workers = vec![ready_worker(1, 100, 8, 2), ready_worker(2, 101, 2, 1)];
        // worker 1: 8/2=4.0 load, worker 2: 2/1=2.0 load -- worker 2 wins.
        assert_eq!(lb.pick(&workers).unwrap().id, 2);
    }
}
