use serde_json::Value;
use std::time::{Duration, Instant};

pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_PRIORITY: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Cpu,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

/// A unit of work submitted to the pool. `priority` is clamped to `0..=9`;
/// higher runs first. `timeout` defaults to 30s; a caller-supplied zero
/// timeout is rejected at submission (see [`super::error::PoolError::InvalidTimeout`]).
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub operation: String,
    pub payload: Value,
    pub priority: u8,
    pub submitted_at: Instant,
    pub timeout: Duration,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind, operation: impl Into<String>, payload: Value) -> Self {
        Self {
            id,
            kind,
            operation: operation.into(),
            payload,
            priority: 0,
            submitted_at: Instant::now(),
            timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.min(MAX_PRIORITY);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_clamps_to_max() {
        let task = Task::new(TaskId(1), TaskKind::Cpu, "op", Value::Null).with_priority(255);
        assert_eq!(task.priority, MAX_PRIORITY);
    }

    #[test]
    fn priority_under_max_is_unchanged() {
        let task = Task::new(TaskId(1), TaskKind::Cpu, "op", Value::Null).with_priority(3);
        assert_eq!(task.priority, 3);
    }

    #[test]
    fn new_task_defaults_to_zero_priority_and_default_timeout() {
        let task = Task::new(TaskId(1), TaskKind::Io, "op", Value::Null);
        assert_eq!(task.priority, 0);
        assert_eq!(task.timeout, DEFAULT_TASK_TIMEOUT);
    }
}
