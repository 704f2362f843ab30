//! Dependency gate: a task is eligible only once all prerequisites are admitted.

use std::collections::HashSet;

use crate::core::Task;
use crate::util::serde::TaskId;

/// Pure check of a task's prerequisites against the admitted set.
pub struct DependencyGate;

impl DependencyGate {
    /// True iff every dependency of `task` is in `admitted`.
    pub fn is_satisfied(task: &Task, admitted: &HashSet<TaskId>) -> bool {
        task.dependencies.iter().all(|dep| admitted.contains(dep))
    }

    /// Dependencies of `task` not yet admitted, in ascending id order.
    pub fn missing(task: &Task, admitted: &HashSet<TaskId>) -> Vec<TaskId> {
        task.dependencies
            .iter()
            .filter(|dep| !admitted.contains(dep))
            .copied()
            .collect()
    }
}
