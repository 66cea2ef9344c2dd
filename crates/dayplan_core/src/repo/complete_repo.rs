//! Completion toggle strategy.

use crate::clock::Clock;
use crate::model::info::TaskId;
use crate::repo::task_book::TaskBook;
use log::debug;
use std::sync::Arc;

/// Data access for marking instances complete or incomplete.
pub trait MarkCompleteRepository {
    /// Returns `false` when the instance does not exist.
    fn update_task_completion_status(&self, id: TaskId, completed: bool) -> bool;
}

#[derive(Clone)]
pub struct InMemoryMarkCompleteRepository {
    book: TaskBook,
    clock: Arc<dyn Clock>,
}

impl InMemoryMarkCompleteRepository {
    pub fn new(book: TaskBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }
}

impl MarkCompleteRepository for InMemoryMarkCompleteRepository {
    fn update_task_completion_status(&self, id: TaskId, completed: bool) -> bool {
        let now = self.clock.now();
        let updated = self.book.write(|c| match c.instances.get_mut(&id) {
            Some(instance) => {
                instance.set_completed(completed, now);
                true
            }
            None => false,
        });
        debug!("event=today_completion module=repo task_id={id} completed={completed} updated={updated}");
        updated
    }
}
