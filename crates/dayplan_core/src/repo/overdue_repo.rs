//! Overdue query strategy.
//!
//! # Invariants
//! - An instance is overdue when it has a due date before today and is not
//!   completed. Completed instances are excluded regardless of date.
//! - The windowed query keeps due dates in `[today - days_back, today)`.

use crate::clock::Clock;
use crate::model::task::TaskInstance;
use crate::repo::task_book::TaskBook;
use chrono::{Days, NaiveDate};
use std::sync::Arc;

/// Data access for overdue instances.
pub trait OverdueTaskRepository {
    fn get_overdue_tasks(&self, days_back: u32) -> Vec<TaskInstance>;
    fn get_all_overdue_tasks(&self) -> Vec<TaskInstance>;
}

#[derive(Clone)]
pub struct InMemoryOverdueTaskRepository {
    book: TaskBook,
    clock: Arc<dyn Clock>,
}

impl InMemoryOverdueTaskRepository {
    pub fn new(book: TaskBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }
}

impl OverdueTaskRepository for InMemoryOverdueTaskRepository {
    fn get_overdue_tasks(&self, days_back: u32) -> Vec<TaskInstance> {
        let today = self.clock.today();
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(days_back)))
            .unwrap_or(NaiveDate::MIN);
        self.book.read(|c| {
            c.sorted_instances(|i| {
                i.is_overdue(today) && i.due_date().is_some_and(|due| due >= cutoff)
            })
        })
    }

    fn get_all_overdue_tasks(&self) -> Vec<TaskInstance> {
        let today = self.clock.today();
        self.book.read(|c| c.sorted_instances(|i| i.is_overdue(today)))
    }
}
