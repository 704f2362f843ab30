//! Tests for configuration validation

use prometheus_admission::config::{PoolConfig, ResourceModelConfig, SchedulerConfig};

#[test]
fn test_pool_config_validation() {
    assert!(PoolConfig::fungible(4).validate().is_ok());
    assert!(PoolConfig::named(["gpu0"]).validate().is_ok());
}

#[test]
fn test_pool_config_invalid_capacity() {
    assert!(PoolConfig::fungible(0).validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_queue_depth() {
    let mut config = SchedulerConfig::new(PoolConfig::fungible(4));
    config.max_queue_depth = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_requeue_cap() {
    let mut config = SchedulerConfig::new(PoolConfig::fungible(4));
    config.max_requeues = Some(0);
    assert!(config.validate().is_err());
    config.max_requeues = Some(2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "pool": {
            "resources": { "model": "named", "resources": ["r1", "r2", "r3"] }
        },
        "max_queue_depth": 64
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.pool.resources,
        ResourceModelConfig::Named {
            resources: vec!["r1".into(), "r2".into(), "r3".into()]
        }
    );
    assert_eq!(config.max_queue_depth, 64);
    assert_eq!(config.max_requeues, None);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    let json = r#"{ "pool": { "resources": { "model": "fungible", "capacity": 0 } } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("capacity"));

    assert!(SchedulerConfig::from_json_str("{").is_err());
}
