//! Template creation strategy.
//!
//! # Responsibility
//! - Insert new templates into the template store.
//! - Answer the `(name, category)` uniqueness predicate.
//!
//! # Invariants
//! - `save_task_available` inserts unconditionally; callers check
//!   `task_exists_with_name_and_category` first.
//! - Name and category comparisons are case-insensitive, with missing or
//!   blank categories treated as the same uncategorized bucket.

use crate::model::info::{normalize_category_id, TaskId};
use crate::model::task::TaskTemplate;
use crate::repo::task_book::TaskBook;
use log::debug;

/// Data access for creating templates.
pub trait CreateTaskRepository {
    fn save_task_available(&self, template: TaskTemplate) -> TaskId;
    fn task_exists_with_name_and_category(&self, name: &str, category_id: Option<&str>) -> bool;
    fn get_all_available_task_templates(&self) -> Vec<TaskTemplate>;
    fn get_task_available_by_id(&self, id: TaskId) -> Option<TaskTemplate>;
    fn get_available_task_count(&self) -> usize;
    fn exists(&self, id: TaskId) -> bool;
}

/// In-memory create strategy over a shared task book.
#[derive(Debug, Clone)]
pub struct InMemoryCreateTaskRepository {
    book: TaskBook,
}

impl InMemoryCreateTaskRepository {
    pub fn new(book: TaskBook) -> Self {
        Self { book }
    }
}

impl CreateTaskRepository for InMemoryCreateTaskRepository {
    fn save_task_available(&self, template: TaskTemplate) -> TaskId {
        let id = template.id();
        let replaced = self
            .book
            .write(|c| c.templates.insert(id, template))
            .is_some();
        debug!("event=template_save module=repo status=ok task_id={id} replaced={replaced}");
        id
    }

    fn task_exists_with_name_and_category(&self, name: &str, category_id: Option<&str>) -> bool {
        let category = normalize_category_id(category_id);
        self.book.read(|c| {
            c.templates
                .values()
                .any(|t| t.info().matches_name_and_category(name, &category))
        })
    }

    fn get_all_available_task_templates(&self) -> Vec<TaskTemplate> {
        self.book.read(|c| c.sorted_templates(|_| true))
    }

    fn get_task_available_by_id(&self, id: TaskId) -> Option<TaskTemplate> {
        self.book.read(|c| c.templates.get(&id).cloned())
    }

    fn get_available_task_count(&self) -> usize {
        self.book.template_count()
    }

    fn exists(&self, id: TaskId) -> bool {
        self.book.read(|c| c.templates.contains_key(&id))
    }
}
