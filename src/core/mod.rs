//! Core scheduling abstractions and capacity accounting.

pub mod audit;
pub mod dependency;
pub mod error;
pub mod executor;
pub mod queue;
pub mod resource_pool;
pub mod scheduler;
pub mod task;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, SharedAuditSink,
};
pub use dependency::DependencyGate;
pub use error::{AppResult, SchedulerError};
pub use executor::SimulatedExecutor;
pub use queue::TaskQueue;
pub use resource_pool::{PoolSnapshot, ResourcePool, SharedResourcePool};
pub use scheduler::{
    AdmissionOutcome, RejectionReason, ScheduleOutcome, Scheduler, SchedulerLimits,
};
pub use task::Task;
