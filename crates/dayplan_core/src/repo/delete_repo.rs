//! Template deletion strategy with goal-dependency guard.
//!
//! # Responsibility
//! - Remove templates alone, instances by template, or both together.
//! - Expose the goal guard query so callers can explain a blocked delete.
//!
//! # Invariants
//! - `delete_task_completely` never mutates anything while a goal targets
//!   the template.
//! - The cascading removal of a template and its instances happens under one
//!   write lock.
//! - `delete_from_available` leaves instances in place (orphaned).

use crate::model::info::TaskId;
use crate::model::task::{TaskInstance, TaskTemplate};
use crate::repo::goal_repo::GoalDirectory;
use crate::repo::task_book::TaskBook;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// Data access for deleting templates and their instances.
pub trait DeleteTaskRepository {
    fn exists_in_available(&self, template: &TaskTemplate) -> bool;
    fn exists_in_today(&self, instance: &TaskInstance) -> bool;
    fn template_exists_in_today(&self, template_id: TaskId) -> bool;
    fn delete_from_available(&self, template: &TaskTemplate) -> bool;
    fn delete_all_todays_tasks_with_template(&self, template_id: TaskId) -> bool;
    fn delete_task_completely(&self, template_id: TaskId) -> bool;
    fn get_goal_names_targeting_task(&self, template_id: TaskId) -> Vec<String>;
    fn get_todays_tasks_by_template(&self, template_id: TaskId) -> Vec<TaskInstance>;
    fn get_all_todays_tasks(&self) -> Vec<TaskInstance>;
}

/// In-memory delete strategy over a shared task book.
#[derive(Clone)]
pub struct InMemoryDeleteTaskRepository {
    book: TaskBook,
    goals: Arc<dyn GoalDirectory>,
}

impl InMemoryDeleteTaskRepository {
    pub fn new(book: TaskBook, goals: Arc<dyn GoalDirectory>) -> Self {
        Self { book, goals }
    }
}

impl DeleteTaskRepository for InMemoryDeleteTaskRepository {
    fn exists_in_available(&self, template: &TaskTemplate) -> bool {
        self.book.read(|c| c.templates.contains_key(&template.id()))
    }

    fn exists_in_today(&self, instance: &TaskInstance) -> bool {
        self.book.read(|c| c.instances.contains_key(&instance.id()))
    }

    fn template_exists_in_today(&self, template_id: TaskId) -> bool {
        self.book.read(|c| {
            c.instances
                .values()
                .any(|i| i.template_task_id() == template_id)
        })
    }

    fn delete_from_available(&self, template: &TaskTemplate) -> bool {
        let id = template.id();
        let removed = self.book.write(|c| c.templates.remove(&id)).is_some();
        debug!("event=template_delete module=repo task_id={id} removed={removed}");
        removed
    }

    fn delete_all_todays_tasks_with_template(&self, template_id: TaskId) -> bool {
        let removed = self
            .book
            .write(|c| remove_instances_of(&mut c.instances, template_id));
        debug!(
            "event=today_delete_by_template module=repo template_id={template_id} removed={removed}"
        );
        removed > 0
    }

    fn delete_task_completely(&self, template_id: TaskId) -> bool {
        let blocking = self.goals.goal_names_targeting(template_id);
        if !blocking.is_empty() {
            info!(
                "event=template_delete_cascade module=repo status=blocked task_id={template_id} goals={}",
                blocking.len()
            );
            return false;
        }

        let (template_removed, instances_removed) = self.book.write(|c| {
            let template_removed = c.templates.remove(&template_id).is_some();
            let instances_removed = remove_instances_of(&mut c.instances, template_id);
            (template_removed, instances_removed)
        });
        info!(
            "event=template_delete_cascade module=repo status=ok task_id={template_id} template_removed={template_removed} instances_removed={instances_removed}"
        );
        template_removed || instances_removed > 0
    }

    fn get_goal_names_targeting_task(&self, template_id: TaskId) -> Vec<String> {
        self.goals.goal_names_targeting(template_id)
    }

    fn get_todays_tasks_by_template(&self, template_id: TaskId) -> Vec<TaskInstance> {
        self.book
            .read(|c| c.sorted_instances(|i| i.template_task_id() == template_id))
    }

    fn get_all_todays_tasks(&self) -> Vec<TaskInstance> {
        self.book.read(|c| c.sorted_instances(|_| true))
    }
}

fn remove_instances_of(
    instances: &mut HashMap<TaskId, TaskInstance>,
    template_id: TaskId,
) -> usize {
    let before = instances.len();
    instances.retain(|_, instance| instance.template_task_id() != template_id);
    before - instances.len()
}
