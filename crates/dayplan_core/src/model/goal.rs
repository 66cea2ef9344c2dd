//! Read-only goal reference consumed by the deletion guard.

use crate::model::info::TaskId;
use serde::{Deserialize, Serialize};

/// Minimal projection of an externally owned goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRef {
    /// Template id the goal targets.
    pub target_task_id: TaskId,
    /// User-facing goal name, shown when a deletion is blocked.
    pub name: String,
}

impl GoalRef {
    pub fn new(target_task_id: TaskId, name: impl Into<String>) -> Self {
        Self {
            target_task_id,
            name: name.into(),
        }
    }

    pub fn targets(&self, task_id: TaskId) -> bool {
        self.target_task_id == task_id
    }
}
