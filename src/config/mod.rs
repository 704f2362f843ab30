//! Configuration models for the resource pool and scheduler limits.

pub mod pool;

pub use pool::{PoolConfig, ResourceModelConfig, SchedulerConfig};
