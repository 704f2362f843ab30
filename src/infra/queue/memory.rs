//! In-memory earliest-deadline-first queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{SchedulerError, Task, TaskQueue};

/// Default depth used by [`InMemoryQueue::default`].
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Heap entry ordered by `(deadline, sequence)`, smallest first.
struct DeadlineEntry {
    deadline_ms: u128,
    sequence: u64,
    task: Task,
}

impl PartialEq for DeadlineEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_ms == other.deadline_ms && self.sequence == other.sequence
    }
}

impl Eq for DeadlineEntry {}

impl PartialOrd for DeadlineEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeadlineEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for max-heap: earliest deadline, then earliest insertion.
        other
            .deadline_ms
            .cmp(&self.deadline_ms)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// In-memory queue storing tasks in a binary heap.
/// This provides O(log n) insert and O(log n) pop.
pub struct InMemoryQueue {
    max_depth: usize,
    /// Next insertion sequence; only breaks deadline ties.
    next_sequence: u64,
    tasks: BinaryHeap<DeadlineEntry>,
}

impl InMemoryQueue {
    /// Create a new in-memory queue with a maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            next_sequence: 0,
            tasks: BinaryHeap::with_capacity(max_depth.min(1024)),
        }
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TaskQueue for InMemoryQueue {
    fn insert(&mut self, deadline_ms: u128, task: Task) -> Result<(), SchedulerError> {
        if self.len() >= self.max_depth() {
            return Err(SchedulerError::QueueFull(format!(
                "max queue depth {} reached",
                self.max_depth
            )));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.tasks.push(DeadlineEntry {
            deadline_ms,
            sequence,
            task,
        });
        Ok(())
    }

    fn pop_earliest(&mut self) -> Result<Task, SchedulerError> {
        self.tasks
            .pop()
            .map(|entry| entry.task)
            .ok_or(SchedulerError::EmptyQueue)
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}
