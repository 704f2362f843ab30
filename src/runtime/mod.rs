//! API surface consumed by presentation and intake collaborators.

pub mod api;

pub use api::{submit_task, ReportEntry, ReportStatus, ScheduleReport, TaskSubmission};
