//! Wall-clock helpers.
//!
//! The scheduler never reads the clock itself; callers sample it here and pass
//! the value into [`crate::core::Scheduler::schedule`].

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. Returns 0 if the system clock is set
/// before the epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
