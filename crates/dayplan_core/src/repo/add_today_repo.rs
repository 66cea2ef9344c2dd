//! Add-to-today strategy.
//!
//! # Responsibility
//! - Instantiate templates into dated, prioritized instances.
//! - Answer duplicate and membership predicates over today's list.
//!
//! # Invariants
//! - Each new instance gets its own id and a deep copy of the template info.
//! - `begin_date` is the due date when that date is already past, else today.
//! - Exact-duplicate matching treats unset priority/due date as equal to
//!   unset, and never equal to a set value.

use crate::clock::Clock;
use crate::model::info::TaskId;
use crate::model::task::{Priority, TaskInstance, TaskTemplate};
use crate::repo::task_book::TaskBook;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

/// Data access for adding templates to today's list.
pub trait AddToTodayRepository {
    fn get_available_task_by_id(&self, id: TaskId) -> Option<TaskTemplate>;
    fn add_task_to_today(
        &self,
        template: &TaskTemplate,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> TaskInstance;
    fn is_task_in_todays_list(&self, template_id: TaskId) -> bool;
    fn is_task_in_todays_list_and_not_overdue(&self, template_id: TaskId) -> bool;
    fn is_exact_duplicate_in_todays_list(
        &self,
        template_id: TaskId,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> bool;
    fn get_all_available_tasks_with_details(&self) -> Vec<TaskTemplate>;
}

/// In-memory add-to-today strategy over a shared task book.
#[derive(Clone)]
pub struct InMemoryAddToTodayRepository {
    book: TaskBook,
    clock: Arc<dyn Clock>,
}

impl InMemoryAddToTodayRepository {
    pub fn new(book: TaskBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }
}

impl AddToTodayRepository for InMemoryAddToTodayRepository {
    fn get_available_task_by_id(&self, id: TaskId) -> Option<TaskTemplate> {
        self.book.read(|c| c.templates.get(&id).cloned())
    }

    fn add_task_to_today(
        &self,
        template: &TaskTemplate,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> TaskInstance {
        let today = self.clock.today();
        let instance = TaskInstance::from_template(template, priority, due_date, today);
        self.book
            .write(|c| c.instances.insert(instance.id(), instance.clone()));
        debug!(
            "event=today_add module=repo status=ok task_id={} template_id={} overdue={}",
            instance.id(),
            template.id(),
            instance.is_overdue(today)
        );
        instance
    }

    fn is_task_in_todays_list(&self, template_id: TaskId) -> bool {
        self.book.read(|c| {
            c.instances
                .values()
                .any(|i| i.template_task_id() == template_id)
        })
    }

    fn is_task_in_todays_list_and_not_overdue(&self, template_id: TaskId) -> bool {
        let today = self.clock.today();
        self.book.read(|c| {
            c.instances
                .values()
                .any(|i| i.template_task_id() == template_id && !i.is_overdue(today))
        })
    }

    fn is_exact_duplicate_in_todays_list(
        &self,
        template_id: TaskId,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> bool {
        self.book.read(|c| {
            c.instances.values().any(|i| {
                i.template_task_id() == template_id
                    && i.priority() == priority
                    && i.due_date() == due_date
            })
        })
    }

    fn get_all_available_tasks_with_details(&self) -> Vec<TaskTemplate> {
        self.book.read(|c| c.sorted_templates(|_| true))
    }
}
