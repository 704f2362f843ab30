//! Serializable identity and requirement types shared across the crate.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique task identifier.
pub type TaskId = u64;

/// Identifier of a named, exclusively assigned resource.
pub type ResourceId = String;

/// Which resource model a pool or requirement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceModel {
    /// Interchangeable countable capacity.
    Fungible,
    /// Individually identified exclusive units.
    Named,
}

impl fmt::Display for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fungible => f.write_str("fungible"),
            Self::Named => f.write_str("named"),
        }
    }
}

/// Resources a task needs for the whole of its admission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRequirement {
    /// A count of fungible capacity units.
    Units(u32),
    /// Named resources that must all be free at the same time.
    Named(BTreeSet<ResourceId>),
}

impl ResourceRequirement {
    /// Requirement for `count` fungible units.
    pub const fn units(count: u32) -> Self {
        Self::Units(count)
    }

    /// Requirement for a set of named resources.
    pub fn named<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ResourceId>,
    {
        Self::Named(ids.into_iter().map(Into::into).collect())
    }

    /// The resource model this requirement targets.
    pub const fn model(&self) -> ResourceModel {
        match self {
            Self::Units(_) => ResourceModel::Fungible,
            Self::Named(_) => ResourceModel::Named,
        }
    }
}

impl Default for ResourceRequirement {
    fn default() -> Self {
        Self::Units(1)
    }
}

impl fmt::Display for ResourceRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Units(count) => write!(f, "{count}"),
            Self::Named(ids) => {
                let joined: Vec<&str> = ids.iter().map(String::as_str).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}
