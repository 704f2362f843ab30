//! Simulated execution: hands resources back once admitted tasks finish.
//!
//! The scheduler keeps reservations for the rest of its pass. This executor
//! plays the role of the runtime that later observes simulated completion
//! and releases what each task held.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::core::{ScheduleOutcome, SharedResourcePool, Task};
use crate::util::serde::{ResourceRequirement, TaskId};

/// A reservation held by an admitted task until its completion time.
#[derive(Debug, Clone)]
struct Reservation {
    completion_time_ms: u128,
    sequence: u64,
    task_id: TaskId,
    requirement: ResourceRequirement,
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.completion_time_ms == other.completion_time_ms && self.sequence == other.sequence
    }
}

impl Eq for Reservation {}

impl PartialOrd for Reservation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reservation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.completion_time_ms
            .cmp(&other.completion_time_ms)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Releases resources for admitted tasks as simulated time advances.
pub struct SimulatedExecutor {
    pool: SharedResourcePool,
    running: BinaryHeap<Reverse<Reservation>>,
    next_sequence: u64,
}

impl SimulatedExecutor {
    /// Create an executor releasing into `pool`.
    pub fn new(pool: SharedResourcePool) -> Self {
        Self {
            pool,
            running: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Start tracking every admitted task of a pass.
    pub fn track(&mut self, outcome: &ScheduleOutcome) {
        for task in &outcome.admitted {
            self.track_task(task);
        }
    }

    /// Start tracking one admitted task. Tasks without a completion time are
    /// ignored.
    pub fn track_task(&mut self, task: &Task) {
        let Some(completion_time_ms) = task.completion_time_ms() else {
            tracing::debug!("task {} not admitted, nothing to track", task.id);
            return;
        };
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.running.push(Reverse(Reservation {
            completion_time_ms,
            sequence,
            task_id: task.id,
            requirement: task.requirement.clone(),
        }));
    }

    /// Tasks still holding resources.
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Earliest pending completion time, if any.
    pub fn next_completion_ms(&self) -> Option<u128> {
        self.running.peek().map(|r| r.0.completion_time_ms)
    }

    /// Release every task finished by `now_ms` and return their ids in
    /// completion order.
    pub fn release_due(&mut self, now_ms: u128) -> Vec<TaskId> {
        let mut finished = Vec::new();
        while self
            .running
            .peek()
            .is_some_and(|r| r.0.completion_time_ms <= now_ms)
        {
            let Some(Reverse(reservation)) = self.running.pop() else {
                break;
            };
            self.pool.release(&reservation.requirement);
            tracing::info!(
                "task {} completed at {}, resources released",
                reservation.task_id,
                reservation.completion_time_ms
            );
            finished.push(reservation.task_id);
        }
        finished
    }
}
