//! API-facing request/response models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{ScheduleOutcome, Scheduler, SchedulerError, Task, TaskQueue};
use crate::util::serde::{ResourceRequirement, TaskId};

/// Task submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSubmission {
    /// Task identifier.
    pub task_id: TaskId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Deadline (ms since epoch).
    pub deadline_ms: Option<u128>,
    /// Prerequisite task ids.
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
    /// Resource requirement; one fungible unit if omitted.
    #[serde(default)]
    pub requirement: ResourceRequirement,
}

impl From<TaskSubmission> for Task {
    fn from(req: TaskSubmission) -> Self {
        let mut task = Self::new(req.task_id, req.name)
            .with_description(req.description)
            .with_duration_ms(req.duration_ms)
            .with_dependencies(req.dependencies)
            .with_requirement(req.requirement);
        task.deadline_ms = req.deadline_ms;
        task
    }
}

/// Enqueue a submission on a scheduler.
pub fn submit_task<Q: TaskQueue>(
    scheduler: &mut Scheduler<Q>,
    req: TaskSubmission,
) -> Result<(), SchedulerError> {
    scheduler.enqueue(req.into())
}

/// Final status of a task in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Admitted.
    Scheduled,
    /// Not admitted.
    Skipped,
}

/// One line of a schedule report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Task identifier.
    pub task_id: TaskId,
    /// Task name.
    pub name: String,
    /// Outcome.
    pub status: ReportStatus,
    /// Completion time for admitted tasks.
    pub completion_time_ms: Option<u128>,
    /// Skip message for rejected tasks.
    pub reason: Option<String>,
}

/// Structured pass result for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Pass identifier.
    pub pass_id: String,
    /// Time the pass was evaluated at.
    pub current_time_ms: u128,
    /// Admitted tasks in admission order, then rejected tasks by id.
    pub entries: Vec<ReportEntry>,
}

impl ScheduleReport {
    /// Number of admitted entries.
    pub fn scheduled(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == ReportStatus::Scheduled)
            .count()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&ScheduleOutcome> for ScheduleReport {
    fn from(outcome: &ScheduleOutcome) -> Self {
        let admitted = outcome.admitted.iter().map(|task| ReportEntry {
            task_id: task.id,
            name: task.name.clone(),
            status: ReportStatus::Scheduled,
            completion_time_ms: task.completion_time_ms(),
            reason: None,
        });

        let mut rejected: Vec<&Task> = outcome.rejected.iter().collect();
        rejected.sort_by_key(|task| task.id);
        let rejected = rejected.into_iter().map(|task| ReportEntry {
            task_id: task.id,
            name: task.name.clone(),
            status: ReportStatus::Skipped,
            completion_time_ms: None,
            reason: outcome.rejections.get(&task.id).map(ToString::to_string),
        });

        Self {
            pass_id: outcome.pass_id.clone(),
            current_time_ms: outcome.current_time_ms,
            entries: admitted.chain(rejected).collect(),
        }
    }
}
