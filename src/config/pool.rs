//! Pool and scheduler configuration structures.

use std::collections::HashSet;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, SchedulerLimits};
use crate::infra::queue::memory::DEFAULT_MAX_DEPTH;
use crate::util::serde::{ResourceId, ResourceModel};

/// Env var holding a fungible capacity.
pub const ENV_POOL_CAPACITY: &str = "ADMISSION_POOL_CAPACITY";
/// Env var holding comma-separated named resource ids.
pub const ENV_POOL_RESOURCES: &str = "ADMISSION_POOL_RESOURCES";
/// Env var holding the queue depth.
pub const ENV_MAX_QUEUE_DEPTH: &str = "ADMISSION_MAX_QUEUE_DEPTH";
/// Env var holding the per-task requeue cap.
pub const ENV_MAX_REQUEUES: &str = "ADMISSION_MAX_REQUEUES";

/// Resource model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ResourceModelConfig {
    /// Countable interchangeable units.
    Fungible {
        /// Total units.
        capacity: u32,
    },
    /// Exclusive named resources.
    Named {
        /// Resource ids, all initially available.
        resources: Vec<ResourceId>,
    },
}

/// Pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Resource model and its capacity.
    pub resources: ResourceModelConfig,
}

const fn default_max_queue_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Pool the scheduler reserves from.
    pub pool: PoolConfig,
    /// Maximum queued tasks before enqueue fails.
    #[serde(default = "default_max_queue_depth")]
    pub max_queue_depth: usize,
    /// Optional per-task requeue cap.
    #[serde(default)]
    pub max_requeues: Option<usize>,
}

impl PoolConfig {
    /// Fungible pool with `capacity` units.
    pub const fn fungible(capacity: u32) -> Self {
        Self {
            resources: ResourceModelConfig::Fungible { capacity },
        }
    }

    /// Named pool over `resources`.
    pub fn named<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ResourceId>,
    {
        Self {
            resources: ResourceModelConfig::Named {
                resources: resources.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Model this configuration selects.
    pub const fn model(&self) -> ResourceModel {
        match self.resources {
            ResourceModelConfig::Fungible { .. } => ResourceModel::Fungible,
            ResourceModelConfig::Named { .. } => ResourceModel::Named,
        }
    }

    /// Validate pool configuration values.
    pub fn validate(&self) -> Result<(), String> {
        match &self.resources {
            ResourceModelConfig::Fungible { capacity } => {
                if *capacity == 0 {
                    return Err("capacity must be greater than 0".into());
                }
            }
            ResourceModelConfig::Named { resources } => {
                if resources.is_empty() {
                    return Err("at least one named resource must be defined".into());
                }
                let mut seen = HashSet::with_capacity(resources.len());
                for id in resources {
                    if id.trim().is_empty() {
                        return Err("resource ids must not be blank".into());
                    }
                    if !seen.insert(id.as_str()) {
                        return Err(format!("duplicate resource `{id}`"));
                    }
                }
            }
        }
        Ok(())
    }
}

impl SchedulerConfig {
    /// Configuration with default queue depth and no requeue cap.
    pub const fn new(pool: PoolConfig) -> Self {
        Self {
            pool,
            max_queue_depth: DEFAULT_MAX_DEPTH,
            max_requeues: None,
        }
    }

    /// Scheduler limits derived from this configuration.
    pub const fn limits(&self) -> SchedulerLimits {
        SchedulerLimits {
            max_requeues: self.max_requeues,
        }
    }

    /// Validate the pool and scheduler limits.
    pub fn validate(&self) -> Result<(), String> {
        self.pool
            .validate()
            .map_err(|e| format!("pool invalid: {e}"))?;
        if self.max_queue_depth == 0 {
            return Err("max_queue_depth must be greater than 0".into());
        }
        if self.max_requeues == Some(0) {
            return Err("max_requeues must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first if one exists.
    pub fn from_env() -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// A fungible capacity takes precedence over a named resource list.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pool = if let Some(raw) = lookup(ENV_POOL_CAPACITY) {
            let capacity = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{ENV_POOL_CAPACITY}=`{raw}` is not a valid capacity"))?;
            PoolConfig::fungible(capacity)
        } else if let Some(raw) = lookup(ENV_POOL_RESOURCES) {
            PoolConfig::named(
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_owned),
            )
        } else {
            bail!("one of {ENV_POOL_CAPACITY} or {ENV_POOL_RESOURCES} must be set");
        };

        let max_queue_depth = lookup(ENV_MAX_QUEUE_DEPTH)
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("{ENV_MAX_QUEUE_DEPTH}=`{raw}` is not a number"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_DEPTH);

        let max_requeues = lookup(ENV_MAX_REQUEUES)
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("{ENV_MAX_REQUEUES}=`{raw}` is not a number"))
            })
            .transpose()?;

        let cfg = Self {
            pool,
            max_queue_depth,
            max_requeues,
        };
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
