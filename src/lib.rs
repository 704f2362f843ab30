//! # Prometheus Admission
//!
//! Single-node admission scheduling for the Prometheus AI Platform.
//!
//! Given a set of candidate tasks, each with a duration, a deadline, a
//! resource requirement and optional prerequisites, the scheduler decides an
//! admission order and either admits each task (reserving its resources and
//! recording a projected completion time) or rejects it with one reason:
//! deadline exceeded, insufficient resources, or unresolved dependency.
//!
//! ## Admission Policy
//!
//! - **Earliest deadline first**: tasks pop in deadline order, ties in
//!   insertion order
//! - **Dependency gating**: a task is eligible only after all prerequisites
//!   are admitted; waiting tasks are requeued after each admission and the
//!   pass always terminates
//! - **All-or-nothing reservation**: fungible unit counts or exclusive named
//!   resources, never partially acquired
//! - **Explicit time**: `schedule` takes the current time, so passes are
//!   deterministic
//!
//! ```rust
//! use prometheus_admission::core::{RejectionReason, ResourcePool, Scheduler, Task};
//!
//! let mut scheduler = Scheduler::new(ResourcePool::with_capacity(1));
//! scheduler.enqueue(Task::new(1, "a").with_duration_ms(10).with_deadline_ms(101))?;
//! scheduler.enqueue(Task::new(2, "b").with_duration_ms(10).with_deadline_ms(102))?;
//!
//! let outcome = scheduler.schedule(100)?;
//! assert_eq!(outcome.admitted_ids(), vec![1]);
//! assert_eq!(outcome.rejections[&2], RejectionReason::InsufficientResources);
//! # Ok::<(), prometheus_admission::core::SchedulerError>(())
//! ```
//!
//! Resources stay reserved after a pass. [`crate::core::SimulatedExecutor`] releases
//! them once simulated completion times pass.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models for the pool and scheduler limits.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// Infrastructure adapters for queue backends.
pub mod infra;
/// API request/response models.
pub mod runtime;
/// Shared utilities.
pub mod util;
