//! Admission queue abstraction.

use crate::core::{SchedulerError, Task};

/// Deadline-ordered admission queue.
///
/// Implementations pop the task with the smallest deadline first and break
/// exact ties in insertion order. A task's key never changes once inserted.
pub trait TaskQueue {
    /// Insert a task keyed by its deadline.
    fn insert(&mut self, deadline_ms: u128, task: Task) -> Result<(), SchedulerError>;
    /// Remove and return the earliest-deadline task.
    fn pop_earliest(&mut self) -> Result<Task, SchedulerError>;
    /// Maximum depth allowed for this queue.
    fn max_depth(&self) -> usize;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
