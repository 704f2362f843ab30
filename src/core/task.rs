//! Task model: an immutable work description plus its admission outcome.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;
use crate::util::serde::{ResourceRequirement, TaskId};

/// A candidate unit of work.
///
/// Everything except the completion time is fixed once the task is enqueued.
/// The completion time is recorded by the scheduler at admission and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, used for dependency references.
    pub id: TaskId,
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Simulated run time in milliseconds. Must be positive.
    pub duration_ms: u64,
    /// Absolute deadline in milliseconds since epoch. Required at enqueue.
    pub deadline_ms: Option<u128>,
    /// Tasks that must be admitted before this one.
    pub dependencies: BTreeSet<TaskId>,
    /// Resources reserved on admission.
    pub requirement: ResourceRequirement,
    completion_time_ms: Option<u128>,
}

impl Task {
    /// Create a task with no duration, deadline or dependencies and a
    /// requirement of one fungible unit.
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            duration_ms: 0,
            deadline_ms: None,
            dependencies: BTreeSet::new(),
            requirement: ResourceRequirement::default(),
            completion_time_ms: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the duration in milliseconds.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the absolute deadline in milliseconds since epoch.
    #[must_use]
    pub fn with_deadline_ms(mut self, deadline_ms: u128) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Add a single prerequisite.
    #[must_use]
    pub fn with_dependency(mut self, id: TaskId) -> Self {
        self.dependencies.insert(id);
        self
    }

    /// Add several prerequisites.
    #[must_use]
    pub fn with_dependencies(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies.extend(ids);
        self
    }

    /// Set the resource requirement.
    #[must_use]
    pub fn with_requirement(mut self, requirement: ResourceRequirement) -> Self {
        self.requirement = requirement;
        self
    }

    /// Projected completion time, present only once admitted.
    pub const fn completion_time_ms(&self) -> Option<u128> {
        self.completion_time_ms
    }

    /// Whether the scheduler has admitted this task.
    pub const fn is_admitted(&self) -> bool {
        self.completion_time_ms.is_some()
    }

    /// Check the fields the scheduler relies on.
    pub fn validate(&self) -> Result<u128, SchedulerError> {
        if self.duration_ms == 0 {
            return Err(SchedulerError::InvalidTask(format!(
                "task {} has a zero duration",
                self.id
            )));
        }
        self.deadline_ms.ok_or_else(|| {
            SchedulerError::InvalidTask(format!("task {} has no deadline", self.id))
        })
    }

    /// Record admission at `admitted_at_ms`. Has no effect on a task that is
    /// already admitted. The completion time saturates at `u128::MAX`.
    pub(crate) fn admit(&mut self, admitted_at_ms: u128) -> u128 {
        *self
            .completion_time_ms
            .get_or_insert(admitted_at_ms.saturating_add(u128::from(self.duration_ms)))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {}", self.name)?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;
        match self.deadline_ms {
            Some(deadline) => writeln!(f, "Deadline: {deadline}")?,
            None => writeln!(f, "Deadline: none")?,
        }
        writeln!(f, "Description: {}", self.description)?;
        write!(f, "Required Resources: {}", self.requirement)?;
        if let Some(done) = self.completion_time_ms {
            write!(f, "\nCompletion: {done}")?;
        }
        Ok(())
    }
}
