//! Tests for utility functions

use prometheus_admission::util::{
    init_tracing, now_ms, ResourceModel, ResourceRequirement, TaskId,
};

#[test]
fn test_requirement_models() {
    assert_eq!(ResourceRequirement::units(3).model(), ResourceModel::Fungible);
    assert_eq!(
        ResourceRequirement::named(["a", "b"]).model(),
        ResourceModel::Named
    );
    assert_eq!(ResourceRequirement::default(), ResourceRequirement::Units(1));
}

#[test]
fn test_named_requirement_deduplicates() {
    let requirement = ResourceRequirement::named(["b", "a", "b"]);
    assert_eq!(requirement.to_string(), "[a, b]");
}

#[test]
fn test_requirement_serde_shape() {
    let json = serde_json::to_string(&ResourceRequirement::named(["gpu0"])).unwrap();
    assert_eq!(json, r#"{"named":["gpu0"]}"#);
    let parsed: ResourceRequirement = serde_json::from_str(r#"{"units":4}"#).unwrap();
    assert_eq!(parsed, ResourceRequirement::Units(4));
}

#[test]
fn test_clock_and_tracing() {
    init_tracing();
    init_tracing();
    assert!(now_ms() > 0);
    let id: TaskId = 12345;
    assert_eq!(id, 12345);
}
