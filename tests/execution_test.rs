//! Integration tests for releasing resources between passes.
//!
//! The scheduler keeps reservations after a pass; a simulated executor
//! releases them as completion times elapse so later passes can reuse them.

use prometheus_admission::core::{
    RejectionReason, ResourcePool, Scheduler, SharedResourcePool, SimulatedExecutor, Task,
};
use prometheus_admission::util::serde::ResourceRequirement;

#[test]
fn test_capacity_returns_for_next_pass() {
    let pool = SharedResourcePool::new(ResourcePool::with_capacity(2));
    let mut scheduler = Scheduler::new(pool.clone());
    let mut executor = SimulatedExecutor::new(pool.clone());

    scheduler
        .enqueue(
            Task::new(1, "first")
                .with_duration_ms(100)
                .with_deadline_ms(1_000)
                .with_requirement(ResourceRequirement::units(2)),
        )
        .unwrap();
    let first = scheduler.schedule(0).unwrap();
    executor.track(&first);

    scheduler
        .enqueue(Task::new(2, "second").with_duration_ms(10).with_deadline_ms(1_000))
        .unwrap();
    let blocked = scheduler.schedule(50).unwrap();
    assert_eq!(
        blocked.rejections.get(&2),
        Some(&RejectionReason::InsufficientResources)
    );

    assert_eq!(executor.release_due(100), vec![1]);

    scheduler
        .enqueue(Task::new(2, "second").with_duration_ms(10).with_deadline_ms(1_000))
        .unwrap();
    let retried = scheduler.schedule(100).unwrap();
    assert_eq!(retried.admitted_ids(), vec![2]);
    assert_eq!(retried.admitted[0].completion_time_ms(), Some(110));
}

#[test]
fn test_named_resources_released_individually() {
    let pool = SharedResourcePool::new(ResourcePool::with_named(["gpu0", "gpu1"]));
    let mut scheduler = Scheduler::new(pool.clone());
    scheduler
        .enqueue(
            Task::new(1, "a")
                .with_duration_ms(5)
                .with_deadline_ms(10)
                .with_requirement(ResourceRequirement::named(["gpu0"])),
        )
        .unwrap();
    scheduler
        .enqueue(
            Task::new(2, "b")
                .with_duration_ms(50)
                .with_deadline_ms(10)
                .with_requirement(ResourceRequirement::named(["gpu1"])),
        )
        .unwrap();
    let outcome = scheduler.schedule(0).unwrap();
    assert_eq!(outcome.admitted.len(), 2);

    let mut executor = SimulatedExecutor::new(pool.clone());
    executor.track(&outcome);
    assert_eq!(executor.release_due(5), vec![1]);
    pool.with(|p| {
        assert!(p.is_available("gpu0"));
        assert!(!p.is_available("gpu1"));
    });
}
