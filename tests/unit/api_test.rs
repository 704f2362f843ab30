//! Tests for API request/response models

use prometheus_admission::core::{ResourcePool, Scheduler, SchedulerError};
use prometheus_admission::runtime::{submit_task, ReportStatus, ScheduleReport, TaskSubmission};
use prometheus_admission::util::serde::ResourceRequirement;

fn submission(json: &str) -> TaskSubmission {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_submission_defaults() {
    let req = submission(r#"{ "task_id": 1, "name": "a", "duration_ms": 5, "deadline_ms": 100 }"#);
    assert_eq!(req.requirement, ResourceRequirement::Units(1));
    assert!(req.dependencies.is_empty());
    assert!(req.description.is_empty());
}

#[test]
fn test_submit_without_deadline_is_invalid() {
    let mut scheduler = Scheduler::new(ResourcePool::with_capacity(1));
    let req = submission(r#"{ "task_id": 1, "name": "a", "duration_ms": 5, "deadline_ms": null }"#);
    assert!(matches!(
        submit_task(&mut scheduler, req),
        Err(SchedulerError::InvalidTask(_))
    ));
}

#[test]
fn test_report_lists_admitted_then_skipped() {
    let mut scheduler = Scheduler::new(ResourcePool::with_capacity(1));
    for json in [
        r#"{ "task_id": 9, "name": "late", "duration_ms": 5, "deadline_ms": 10 }"#,
        r#"{ "task_id": 3, "name": "crowded", "duration_ms": 5, "deadline_ms": 300 }"#,
        r#"{ "task_id": 5, "name": "first", "duration_ms": 5, "deadline_ms": 200,
             "requirement": { "units": 1 } }"#,
    ] {
        submit_task(&mut scheduler, submission(json)).unwrap();
    }

    let outcome = scheduler.schedule(100).unwrap();
    let report = ScheduleReport::from(&outcome);

    assert_eq!(report.scheduled(), 1);
    let ids: Vec<u64> = report.entries.iter().map(|e| e.task_id).collect();
    assert_eq!(ids, vec![5, 3, 9]);
    assert_eq!(report.entries[0].status, ReportStatus::Scheduled);
    assert_eq!(report.entries[0].completion_time_ms, Some(105));
    assert_eq!(report.entries[1].reason.as_deref(), Some("insufficient resources"));
    assert_eq!(report.entries[2].reason.as_deref(), Some("exceeded deadline 10"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["entries"][1]["status"], "skipped");
}
