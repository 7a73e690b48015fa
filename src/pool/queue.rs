use super::task::Task;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

pub struct QueuedTask {
    pub task: Task,
    pub result_tx: tokio::sync::oneshot::Sender<super::error::PoolResult>,
    sequence: u64,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.sequence == other.sequence
    }
}
impl Eq for QueuedTask {}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first; lower sequence (earlier submission) first within a band.
        self.task
            .priority
            .cmp(&other.task.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A bounded priority queue: pop always returns the highest-priority item,
/// breaking ties by submission order (FIFO within a priority band).
pub struct PriorityQueue {
    heap: BinaryHeap<QueuedTask>,
    capacity: usize,
    next_sequence: AtomicU64,
}

impl PriorityQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity,
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn push(
        &mut self,
        task: Task,
        result_tx: tokio::sync::oneshot::Sender<super::error::PoolResult>,
    ) -> Result<(), super::error::PoolError> {
        if self.heap.len() >= self.capacity {
            return Err(super::error::PoolError::QueueFull);
        }
        let sequence = self.next_sequence.fetch_add(1, AtomicOrdering::Relaxed);
        self.heap.push(QueuedTask {
            task,
            result_tx,
            sequence,
        });
        Ok(())
    }

    pub fn pop(&mut self) -> Option<QueuedTask> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
