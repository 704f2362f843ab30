//! Tests for error types

use prometheus_admission::core::SchedulerError;

#[test]
fn test_invalid_task_error() {
    let err = SchedulerError::InvalidTask("task 3 has no deadline".to_string());
    assert_eq!(format!("{err}"), "invalid task: task 3 has no deadline");
}

#[test]
fn test_empty_queue_error() {
    assert_eq!(format!("{}", SchedulerError::EmptyQueue), "queue is empty");
}

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull("max queue depth 2 reached".to_string());
    assert_eq!(format!("{err}"), "queue full: max queue depth 2 reached");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("bad".to_string());
    assert_eq!(format!("{err}"), "config error: bad");
}
