//! Single-instance removal strategy. Templates are never touched here.

use crate::model::info::TaskId;
use crate::repo::task_book::TaskBook;
use log::debug;

pub trait RemoveFromTodayRepository {
    /// Removes one instance; `false` when it was not present.
    fn remove_from_todays_list(&self, id: TaskId) -> bool;
}

#[derive(Debug, Clone)]
pub struct InMemoryRemoveFromTodayRepository {
    book: TaskBook,
}

impl InMemoryRemoveFromTodayRepository {
    pub fn new(book: TaskBook) -> Self {
        Self { book }
    }
}

impl RemoveFromTodayRepository for InMemoryRemoveFromTodayRepository {
    fn remove_from_todays_list(&self, id: TaskId) -> bool {
        let removed = self.book.write(|c| c.instances.remove(&id)).is_some();
        debug!("event=today_remove module=repo task_id={id} removed={removed}");
        removed
    }
}
