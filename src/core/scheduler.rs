//! Earliest-deadline-first admission pass.
//!
//! [`Scheduler::schedule`] drains the queue once. Each popped task is gated on
//! its dependencies, then its deadline, then a reservation against the shared
//! pool, and ends up either admitted or rejected with exactly one reason.
//!
//! A task whose dependencies are not yet admitted is parked under its
//! smallest missing prerequisite and re-inserted (same deadline, new
//! sequence) once that prerequisite is admitted, since nothing else can
//! change the gate's answer for it. A re-inserted task that is still blocked
//! parks again under its next missing prerequisite, so each task is requeued
//! at most once per dependency. Tasks still parked when the queue drains can
//! never be satisfied within the pass and are rejected. Requeues per task
//! are additionally capped by the requeue bound.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    build_audit_event, AuditAction, AuditSink, DependencyGate, SchedulerError, SharedResourcePool,
    Task, TaskQueue,
};
use crate::infra::queue::InMemoryQueue;
use crate::util::serde::TaskId;

/// Why a task was not admitted. Rejections are terminal for the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The deadline was already behind the pass's current time.
    DeadlineExceeded {
        /// The task's deadline.
        deadline_ms: u128,
    },
    /// The pool could not satisfy the requirement in full.
    InsufficientResources,
    /// Some prerequisites were never admitted in this pass.
    UnresolvedDependency {
        /// Prerequisites still unadmitted at rejection time, ascending.
        missing: Vec<TaskId>,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadlineExceeded { deadline_ms } => {
                write!(f, "exceeded deadline {deadline_ms}")
            }
            Self::InsufficientResources => f.write_str("insufficient resources"),
            Self::UnresolvedDependency { missing } => {
                let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
                write!(f, "unresolved dependencies [{}]", ids.join(", "))
            }
        }
    }
}

/// Final decision for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    /// Resources reserved; completes at the given time.
    Admitted {
        /// Admission time plus duration.
        completion_time_ms: u128,
    },
    /// Not admitted.
    Rejected(RejectionReason),
}

/// Tunables for a scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerLimits {
    /// Optional lower cap on requeues per task. The effective bound is the
    /// smaller of this and the number of tasks in the pass.
    pub max_requeues: Option<usize>,
}

/// Result of one scheduling pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Identifier of the pass, shared with its audit events.
    pub pass_id: String,
    /// Time the pass was evaluated at.
    pub current_time_ms: u128,
    /// Admitted tasks in admission order.
    pub admitted: Vec<Task>,
    /// Rejection reason per non-admitted task.
    pub rejections: BTreeMap<TaskId, RejectionReason>,
    /// Rejected tasks in rejection order.
    pub rejected: Vec<Task>,
    /// Total dependency requeues performed.
    pub requeues: usize,
}

impl ScheduleOutcome {
    fn new(pass_id: String, current_time_ms: u128) -> Self {
        Self {
            pass_id,
            current_time_ms,
            admitted: Vec::new(),
            rejections: BTreeMap::new(),
            rejected: Vec::new(),
            requeues: 0,
        }
    }

    /// Ids of admitted tasks in admission order.
    pub fn admitted_ids(&self) -> Vec<TaskId> {
        self.admitted.iter().map(|t| t.id).collect()
    }

    /// Whether `id` was admitted.
    pub fn is_admitted(&self, id: TaskId) -> bool {
        self.admitted.iter().any(|t| t.id == id)
    }

    /// Decision for `id`, or `None` if it was not part of the pass.
    pub fn outcome_of(&self, id: TaskId) -> Option<AdmissionOutcome> {
        if let Some(reason) = self.rejections.get(&id) {
            return Some(AdmissionOutcome::Rejected(reason.clone()));
        }
        self.admitted
            .iter()
            .find(|t| t.id == id)
            .and_then(Task::completion_time_ms)
            .map(|completion_time_ms| AdmissionOutcome::Admitted { completion_time_ms })
    }

    /// Number of tasks decided in the pass.
    pub fn total(&self) -> usize {
        self.admitted.len() + self.rejections.len()
    }
}

fn new_pass_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Admission scheduler owning its queue and a handle to the resource pool.
pub struct Scheduler<Q = InMemoryQueue> {
    queue: Q,
    pool: SharedResourcePool,
    pending: HashSet<TaskId>,
    limits: SchedulerLimits,
    audit: Option<Box<dyn AuditSink>>,
    pass_id: String,
}

impl Scheduler<InMemoryQueue> {
    /// Create a scheduler with the default in-memory queue.
    pub fn new(pool: impl Into<SharedResourcePool>) -> Self {
        Self::with_queue(pool, InMemoryQueue::default())
    }
}

impl<Q: TaskQueue> Scheduler<Q> {
    /// Create a scheduler over a specific queue backend.
    pub fn with_queue(pool: impl Into<SharedResourcePool>, queue: Q) -> Self {
        Self {
            queue,
            pool: pool.into(),
            pending: HashSet::new(),
            limits: SchedulerLimits::default(),
            audit: None,
            pass_id: new_pass_id(),
        }
    }

    /// Replace the limits.
    #[must_use]
    pub fn with_limits(mut self, limits: SchedulerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Handle to the pool this scheduler reserves from.
    pub const fn pool(&self) -> &SharedResourcePool {
        &self.pool
    }

    /// Current limits.
    pub const fn limits(&self) -> &SchedulerLimits {
        &self.limits
    }

    /// Tasks waiting for the next pass.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Validate a task and insert it keyed by its deadline.
    ///
    /// Fails with [`SchedulerError::InvalidTask`] on a zero duration, a
    /// missing deadline, an id already pending, a task that was already
    /// admitted, or a requirement for the other resource model.
    pub fn enqueue(&mut self, task: Task) -> Result<(), SchedulerError> {
        let deadline_ms = task.validate()?;
        if task.is_admitted() {
            return Err(SchedulerError::InvalidTask(format!(
                "task {} was already admitted",
                task.id
            )));
        }
        if self.pending.contains(&task.id) {
            return Err(SchedulerError::InvalidTask(format!(
                "task {} is already queued",
                task.id
            )));
        }
        let pool_model = self.pool.model();
        if task.requirement.model() != pool_model {
            return Err(SchedulerError::InvalidTask(format!(
                "task {} needs {} resources but the pool is {}",
                task.id,
                task.requirement.model(),
                pool_model
            )));
        }

        let id = task.id;
        self.queue.insert(deadline_ms, task)?;
        self.pending.insert(id);
        tracing::debug!("task {} enqueued (deadline={})", id, deadline_ms);
        self.record(id, AuditAction::Enqueue, None);
        Ok(())
    }

    /// Run one admission pass at `current_time_ms`, draining the queue.
    ///
    /// Every enqueued task ends up in exactly one of `admitted` or
    /// `rejections`. Resources stay reserved after the pass; releasing them
    /// is up to the caller.
    ///
    /// Blocked tasks are only woken by the admission of the prerequisite they
    /// wait on, so a pass costs O((n + r) log n) heap operations for `n`
    /// tasks and `r` dependency edges, including reverse dependency chains.
    /// Completion times saturate at `u128::MAX`.
    pub fn schedule(&mut self, current_time_ms: u128) -> Result<ScheduleOutcome, SchedulerError> {
        let pass_id = std::mem::replace(&mut self.pass_id, new_pass_id());
        let distinct = self.pending.len();
        let bound = self
            .limits
            .max_requeues
            .map_or(distinct, |cap| cap.min(distinct));
        self.pending.clear();

        let mut outcome = ScheduleOutcome::new(pass_id, current_time_ms);
        let mut admitted_ids: HashSet<TaskId> = HashSet::with_capacity(distinct);
        let mut requeue_counts: HashMap<TaskId, usize> = HashMap::new();
        let mut parked: BTreeMap<TaskId, Vec<Task>> = BTreeMap::new();

        tracing::debug!(
            "pass {} starting with {} tasks (requeue bound {})",
            outcome.pass_id,
            distinct,
            bound
        );

        while !self.queue.is_empty() {
            let mut task = self.queue.pop_earliest()?;

            if !DependencyGate::is_satisfied(&task, &admitted_ids) {
                let missing = DependencyGate::missing(&task, &admitted_ids);
                let count = requeue_counts.entry(task.id).or_insert(0);
                *count += 1;
                if *count > bound {
                    self.reject(
                        &mut outcome,
                        task,
                        RejectionReason::UnresolvedDependency { missing },
                    );
                    continue;
                }
                outcome.requeues += 1;
                tracing::debug!("task {} waiting on dependencies (requeue {})", task.id, count);
                let detail = Some(format!("requeue {count}"));
                self.record_in(&outcome.pass_id, task.id, AuditAction::Requeue, detail);
                if let Some(&blocker) = missing.first() {
                    parked.entry(blocker).or_default().push(task);
                }
                continue;
            }

            if let Some(deadline_ms) = task.deadline_ms.filter(|d| *d < current_time_ms) {
                self.reject(
                    &mut outcome,
                    task,
                    RejectionReason::DeadlineExceeded { deadline_ms },
                );
                continue;
            }

            if !self.pool.try_reserve(&task.requirement) {
                self.reject(&mut outcome, task, RejectionReason::InsufficientResources);
                continue;
            }

            let completion = task.admit(current_time_ms);
            let id = task.id;
            admitted_ids.insert(id);
            tracing::info!("task {} admitted, completes at {}", id, completion);
            let detail = Some(format!("completes at {completion}"));
            self.record_in(&outcome.pass_id, id, AuditAction::Admit, detail);
            outcome.admitted.push(task);

            for waiting in parked.remove(&id).unwrap_or_default() {
                let deadline_ms = waiting.deadline_ms.unwrap_or(current_time_ms);
                self.queue.insert(deadline_ms, waiting)?;
            }
        }

        for task in parked.into_values().flatten() {
            let missing = DependencyGate::missing(&task, &admitted_ids);
            self.reject(
                &mut outcome,
                task,
                RejectionReason::UnresolvedDependency { missing },
            );
        }

        tracing::info!(
            "pass {} finished: {} admitted, {} rejected, {} requeues",
            outcome.pass_id,
            outcome.admitted.len(),
            outcome.rejections.len(),
            outcome.requeues
        );
        Ok(outcome)
    }

    fn reject(&mut self, outcome: &mut ScheduleOutcome, task: Task, reason: RejectionReason) {
        tracing::warn!("task {} ({}) skipped: {}", task.id, task.name, reason);
        self.record_in(
            &outcome.pass_id,
            task.id,
            AuditAction::Reject,
            Some(reason.to_string()),
        );
        outcome.rejections.insert(task.id, reason);
        outcome.rejected.push(task);
    }

    fn record(&mut self, task_id: TaskId, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(self.pass_id.clone(), task_id, action, detail));
        }
    }

    fn record_in(
        &mut self,
        pass_id: &str,
        task_id: TaskId,
        action: AuditAction,
        detail: Option<String>,
    ) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(pass_id, task_id, action, detail));
        }
    }
}
