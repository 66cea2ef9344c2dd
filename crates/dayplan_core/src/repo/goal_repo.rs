//! Goal directory contract consumed by the deletion guard.
//!
//! Goals are owned outside this crate; the core only reads them.

use crate::model::goal::GoalRef;
use crate::model::info::TaskId;
use std::sync::{PoisonError, RwLock};

/// Read-only view over all goals.
pub trait GoalDirectory: Send + Sync {
    fn all_goals(&self) -> Vec<GoalRef>;

    /// Names of goals targeting `task_id`, in directory order.
    fn goal_names_targeting(&self, task_id: TaskId) -> Vec<String> {
        self.all_goals()
            .into_iter()
            .filter(|goal| goal.targets(task_id))
            .map(|goal| goal.name)
            .collect()
    }
}

/// In-process goal directory.
#[derive(Debug, Default)]
pub struct InMemoryGoalDirectory {
    goals: RwLock<Vec<GoalRef>>,
}

impl InMemoryGoalDirectory {
    pub fn new(goals: Vec<GoalRef>) -> Self {
        Self {
            goals: RwLock::new(goals),
        }
    }

    pub fn add_goal(&self, goal: GoalRef) {
        self.goals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(goal);
    }

    /// Drops every goal targeting `task_id`; returns how many were removed.
    pub fn remove_goals_targeting(&self, task_id: TaskId) -> usize {
        let mut goals = self.goals.write().unwrap_or_else(PoisonError::into_inner);
        let before = goals.len();
        goals.retain(|goal| !goal.targets(task_id));
        before - goals.len()
    }
}

impl GoalDirectory for InMemoryGoalDirectory {
    fn all_goals(&self) -> Vec<GoalRef> {
        self.goals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{GoalDirectory, InMemoryGoalDirectory};
    use crate::model::goal::GoalRef;
    use uuid::Uuid;

    #[test]
    fn goal_names_targeting_filters_by_task() {
        let report = Uuid::new_v4();
        let other = Uuid::new_v4();
        let goals = InMemoryGoalDirectory::new(vec![
            GoalRef::new(report, "Ship Q3 report"),
            GoalRef::new(other, "Run 5k"),
            GoalRef::new(report, "Inbox zero"),
        ]);

        assert_eq!(
            goals.goal_names_targeting(report),
            vec!["Ship Q3 report".to_string(), "Inbox zero".to_string()]
        );
        assert_eq!(goals.remove_goals_targeting(report), 2);
        assert!(goals.goal_names_targeting(report).is_empty());
    }
}
