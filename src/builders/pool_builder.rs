//! Builders to construct pools and schedulers from configuration.

use crate::config::{PoolConfig, ResourceModelConfig, SchedulerConfig};
use crate::core::{AuditSink, ResourcePool, Scheduler, SchedulerError, SharedResourcePool};
use crate::infra::queue::InMemoryQueue;

/// Build a resource pool from its configuration.
pub fn build_pool(cfg: &PoolConfig) -> ResourcePool {
    match &cfg.resources {
        ResourceModelConfig::Fungible { capacity } => ResourcePool::with_capacity(*capacity),
        ResourceModelConfig::Named { resources } => {
            ResourcePool::with_named(resources.iter().cloned())
        }
    }
}

/// Assembles a [`Scheduler`] from a [`SchedulerConfig`].
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    pool: Option<SharedResourcePool>,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from a configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pool: None,
            audit: None,
        }
    }

    /// Configuration being built.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Reserve from an existing pool handle instead of building one from the
    /// configuration. The handle must use the configured resource model.
    #[must_use]
    pub fn with_pool(mut self, pool: SharedResourcePool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and build the scheduler.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.config
            .validate()
            .map_err(|e| SchedulerError::Config(format!("config invalid: {e}")))?;

        let pool = match self.pool {
            Some(pool) => {
                if pool.model() != self.config.pool.model() {
                    return Err(SchedulerError::Config(format!(
                        "pool handle is {} but configuration selects {}",
                        pool.model(),
                        self.config.pool.model()
                    )));
                }
                pool
            }
            None => SharedResourcePool::new(build_pool(&self.config.pool)),
        };

        let queue = InMemoryQueue::new(self.config.max_queue_depth);
        let scheduler = Scheduler::with_queue(pool, queue).with_limits(self.config.limits());
        tracing::debug!(
            "built scheduler ({} pool, depth {})",
            self.config.pool.model(),
            self.config.max_queue_depth
        );
        Ok(match self.audit {
            Some(audit) => scheduler.with_audit(audit),
            None => scheduler,
        })
    }
}
