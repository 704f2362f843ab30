//! Tests for builder modules

use prometheus_admission::builders::{build_pool, SchedulerBuilder};
use prometheus_admission::config::{PoolConfig, SchedulerConfig};
use prometheus_admission::core::{
    AuditAction, ResourcePool, SchedulerError, SharedAuditSink, SharedResourcePool, Task,
};

#[test]
fn test_build_pool_fungible() {
    let pool = build_pool(&PoolConfig::fungible(5));
    assert_eq!(pool.total_capacity(), 5);
    assert_eq!(pool.available_capacity(), 5);
}

#[test]
fn test_builder_applies_queue_depth() {
    let mut config = SchedulerConfig::new(PoolConfig::fungible(5));
    config.max_queue_depth = 1;
    let mut scheduler = SchedulerBuilder::new(config).build().unwrap();

    scheduler
        .enqueue(Task::new(1, "a").with_duration_ms(1).with_deadline_ms(10))
        .unwrap();
    let second = scheduler.enqueue(Task::new(2, "b").with_duration_ms(1).with_deadline_ms(10));
    assert!(matches!(second, Err(SchedulerError::QueueFull(_))));
}

#[test]
fn test_builder_shares_pool_and_audit() {
    let pool = SharedResourcePool::new(ResourcePool::with_capacity(3));
    let sink = SharedAuditSink::new(16);
    let builder = SchedulerBuilder::new(SchedulerConfig::new(PoolConfig::fungible(3)))
        .with_pool(pool.clone())
        .with_audit(Box::new(sink.clone()));
    assert_eq!(builder.config().max_requeues, None);
    let mut scheduler = builder.build().unwrap();

    scheduler
        .enqueue(Task::new(1, "a").with_duration_ms(1).with_deadline_ms(10))
        .unwrap();
    let outcome = scheduler.schedule(0).unwrap();

    assert_eq!(outcome.admitted_ids(), vec![1]);
    assert_eq!(pool.with(ResourcePool::available_capacity), 2);
    let actions: Vec<AuditAction> = sink.events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Enqueue, AuditAction::Admit]);
}
