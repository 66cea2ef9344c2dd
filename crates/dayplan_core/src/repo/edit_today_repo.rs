//! Edit strategy for today's instances.
//!
//! Only priority and due date are mutable once an instance exists; its
//! name, description and category change through template propagation only.

use crate::clock::Clock;
use crate::model::info::TaskId;
use crate::model::task::{Priority, TaskInstance};
use crate::repo::task_book::TaskBook;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

/// Data access for rescheduling instances.
pub trait EditTodayRepository {
    fn get_today_task_by_id(&self, id: TaskId) -> Option<TaskInstance>;
    fn update_today_task_priority_and_due_date(
        &self,
        id: TaskId,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> bool;
    /// A due date is valid when unset or not before today.
    fn is_valid_due_date(&self, due_date: Option<NaiveDate>) -> bool;
}

#[derive(Clone)]
pub struct InMemoryEditTodayRepository {
    book: TaskBook,
    clock: Arc<dyn Clock>,
}

impl InMemoryEditTodayRepository {
    pub fn new(book: TaskBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }
}

impl EditTodayRepository for InMemoryEditTodayRepository {
    fn get_today_task_by_id(&self, id: TaskId) -> Option<TaskInstance> {
        self.book.read(|c| c.instances.get(&id).cloned())
    }

    fn update_today_task_priority_and_due_date(
        &self,
        id: TaskId,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> bool {
        let updated = self.book.write(|c| match c.instances.get_mut(&id) {
            Some(instance) => {
                instance.reschedule(priority, due_date);
                true
            }
            None => false,
        });
        debug!("event=today_reschedule module=repo task_id={id} updated={updated}");
        updated
    }

    fn is_valid_due_date(&self, due_date: Option<NaiveDate>) -> bool {
        due_date.map_or(true, |due| due >= self.clock.today())
    }
}
