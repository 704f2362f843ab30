//! Resource pool with all-or-nothing reservation.
//!
//! A pool uses one of two models: a fungible unit count, or a set of named
//! resources that are each held exclusively. Reservations either commit in
//! full or leave the pool untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::serde::{ResourceId, ResourceModel, ResourceRequirement};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Capacity {
    Fungible { total: u32, available: u32 },
    Named(BTreeMap<ResourceId, bool>),
}

/// Tracks available capacity for admission.
///
/// The pool records availability only. Which task holds what is the
/// caller's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    capacity: Capacity,
}

/// Point-in-time view of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PoolSnapshot {
    /// Fungible counts.
    Fungible {
        /// Configured capacity.
        total: u32,
        /// Units not currently reserved.
        available: u32,
    },
    /// Named resource availability.
    Named {
        /// Resource id to availability flag.
        resources: BTreeMap<ResourceId, bool>,
    },
}

impl ResourcePool {
    /// Fungible pool with `total` units, all available.
    pub const fn with_capacity(total: u32) -> Self {
        Self {
            capacity: Capacity::Fungible {
                total,
                available: total,
            },
        }
    }

    /// Named pool where every listed resource starts available.
    pub fn with_named<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ResourceId>,
    {
        Self {
            capacity: Capacity::Named(ids.into_iter().map(|id| (id.into(), true)).collect()),
        }
    }

    /// Model this pool was built with.
    pub const fn model(&self) -> ResourceModel {
        match self.capacity {
            Capacity::Fungible { .. } => ResourceModel::Fungible,
            Capacity::Named(_) => ResourceModel::Named,
        }
    }

    /// Units currently free. For named pools, the number of free resources.
    pub fn available_capacity(&self) -> u32 {
        match &self.capacity {
            Capacity::Fungible { available, .. } => *available,
            Capacity::Named(resources) => {
                let free = resources.values().filter(|free| **free).count();
                u32::try_from(free).unwrap_or(u32::MAX)
            }
        }
    }

    /// Configured capacity. For named pools, the number of resources.
    pub fn total_capacity(&self) -> u32 {
        match &self.capacity {
            Capacity::Fungible { total, .. } => *total,
            Capacity::Named(resources) => u32::try_from(resources.len()).unwrap_or(u32::MAX),
        }
    }

    /// Whether the named resource exists and is free.
    pub fn is_available(&self, id: &str) -> bool {
        match &self.capacity {
            Capacity::Fungible { .. } => false,
            Capacity::Named(resources) => resources.get(id).copied().unwrap_or(false),
        }
    }

    /// Check sufficiency and, only if sufficient, commit the reservation.
    ///
    /// Returns false and leaves the pool unchanged when the requirement cannot
    /// be met in full, including when it targets the other resource model.
    pub fn try_reserve(&mut self, requirement: &ResourceRequirement) -> bool {
        match (&mut self.capacity, requirement) {
            (Capacity::Fungible { available, .. }, ResourceRequirement::Units(count)) => {
                if *count > *available {
                    return false;
                }
                *available -= *count;
                true
            }
            (Capacity::Named(resources), ResourceRequirement::Named(ids)) => {
                // All must be free before any is flipped.
                let all_free = ids
                    .iter()
                    .all(|id| resources.get(id).copied().unwrap_or(false));
                if !all_free {
                    return false;
                }
                for id in ids {
                    if let Some(free) = resources.get_mut(id) {
                        *free = false;
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Return a reservation to the pool.
    ///
    /// Fungible release saturates at the total capacity. Named ids the pool
    /// does not know are ignored.
    pub fn release(&mut self, requirement: &ResourceRequirement) {
        let model = self.model();
        match (&mut self.capacity, requirement) {
            (Capacity::Fungible { total, available }, ResourceRequirement::Units(count)) => {
                let restored = available.saturating_add(*count);
                if restored > *total {
                    tracing::warn!(
                        "release of {} units overflows pool (available={}, total={})",
                        count,
                        available,
                        total
                    );
                }
                *available = restored.min(*total);
            }
            (Capacity::Named(resources), ResourceRequirement::Named(ids)) => {
                for id in ids {
                    match resources.get_mut(id) {
                        Some(free) => *free = true,
                        None => tracing::warn!("release of unknown resource {}", id),
                    }
                }
            }
            (_, other) => {
                tracing::warn!(
                    "release of {} requirement ignored by {} pool",
                    other.model(),
                    model
                );
            }
        }
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> PoolSnapshot {
        match &self.capacity {
            Capacity::Fungible { total, available } => PoolSnapshot::Fungible {
                total: *total,
                available: *available,
            },
            Capacity::Named(resources) => PoolSnapshot::Named {
                resources: resources.clone(),
            },
        }
    }
}

/// Cloneable handle to a pool shared between the scheduler and whoever
/// releases resources later.
///
/// Every reservation and release runs inside one `parking_lot::Mutex`
/// critical section, so concurrent reservations can never both observe the
/// same free capacity.
#[derive(Debug, Clone)]
pub struct SharedResourcePool {
    inner: Arc<Mutex<ResourcePool>>,
}

impl SharedResourcePool {
    /// Wrap a pool.
    pub fn new(pool: ResourcePool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// See [`ResourcePool::try_reserve`].
    pub fn try_reserve(&self, requirement: &ResourceRequirement) -> bool {
        self.inner.lock().try_reserve(requirement)
    }

    /// See [`ResourcePool::release`].
    pub fn release(&self, requirement: &ResourceRequirement) {
        self.inner.lock().release(requirement);
    }

    /// Model of the wrapped pool.
    pub fn model(&self) -> ResourceModel {
        self.inner.lock().model()
    }

    /// Current state of the wrapped pool.
    pub fn snapshot(&self) -> PoolSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with the pool locked.
    pub fn with<R>(&self, f: impl FnOnce(&ResourcePool) -> R) -> R {
        f(&*self.inner.lock())
    }
}

impl From<ResourcePool> for SharedResourcePool {
    fn from(pool: ResourcePool) -> Self {
        Self::new(pool)
    }
}
