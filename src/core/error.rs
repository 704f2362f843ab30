//! Error types for scheduler operations.
//!
//! Only malformed input and queue misuse are errors. Deadline misses,
//! resource shortfalls and unresolved dependencies are reported as
//! [`crate::core::RejectionReason`] values in the schedule outcome.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Task failed validation at enqueue time.
    #[error("invalid task: {0}")]
    InvalidTask(String),
    /// Pop was called on an empty queue.
    #[error("queue is empty")]
    EmptyQueue,
    /// Queue is at its configured depth.
    #[error("queue full: {0}")]
    QueueFull(String),
    /// Configuration could not be turned into components.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
