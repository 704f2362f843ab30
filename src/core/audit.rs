//! Audit trail of admission decisions.
//!
//! Every enqueue, requeue, admission and rejection can be recorded to an
//! [`AuditSink`]. The in-memory sink keeps a bounded window for tests and
//! development.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::TaskId;

/// What happened to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Accepted into the queue.
    Enqueue,
    /// Put back because a dependency was not yet admitted.
    Requeue,
    /// Admitted with resources reserved.
    Admit,
    /// Rejected for the pass.
    Reject,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enqueue => "enqueue",
            Self::Requeue => "requeue",
            Self::Admit => "admit",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Scheduling pass the event belongs to. Enqueue events carry the id of
    /// the pass they will be scheduled in.
    pub pass_id: String,
    /// Related task identifier.
    pub task_id: TaskId,
    /// Action taken.
    pub action: AuditAction,
    /// Wall-clock timestamp in milliseconds.
    pub created_at_ms: u128,
    /// Additional context, such as the rejection reason.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink forwarding to a shared buffer, so a caller can keep reading events
/// after handing the sink to a scheduler.
#[derive(Clone)]
pub struct SharedAuditSink {
    inner: Arc<Mutex<InMemoryAuditSink>>,
}

impl SharedAuditSink {
    /// Create a shared sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryAuditSink::new(max_events))),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().events()
    }
}

impl AuditSink for SharedAuditSink {
    fn record(&mut self, event: AuditEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build an audit event with a fresh event id.
pub fn build_audit_event(
    pass_id: impl Into<String>,
    task_id: TaskId,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        pass_id: pass_id.into(),
        task_id,
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
