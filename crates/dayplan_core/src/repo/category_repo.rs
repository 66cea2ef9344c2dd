//! Category reference maintenance across templates and instances.
//!
//! # Responsibility
//! - Find records by loose category id.
//! - Re-point or clear category references before a category is removed.
//!
//! # Invariants
//! - A missing or blank category id selects the uncategorized bucket.
//! - Any other category id matches by exact equality, untrimmed.
//! - `clear_category_references` updates both collections under one write
//!   lock and changes no record outside the target category.

use crate::model::info::{normalize_category_id, TaskId};
use crate::model::task::{TaskInstance, TaskTemplate};
use crate::repo::task_book::TaskBook;
use log::{debug, info};

/// Counts of records whose category was cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCascadeReport {
    pub templates: usize,
    pub instances: usize,
}

impl CategoryCascadeReport {
    pub fn total(&self) -> usize {
        self.templates + self.instances
    }
}

/// Data access for category cascades over task records.
pub trait TaskCategoryRepository {
    fn find_available_tasks_by_category(&self, category_id: Option<&str>) -> Vec<TaskTemplate>;
    fn find_todays_tasks_by_category(&self, category_id: Option<&str>) -> Vec<TaskInstance>;
    fn update_available_task_category(&self, id: TaskId, new_category_id: Option<&str>) -> bool;
    fn update_todays_task_category(&self, id: TaskId, new_category_id: Option<&str>) -> bool;
    /// Clears every reference to `category_id` in both collections at once.
    fn clear_category_references(&self, category_id: &str) -> CategoryCascadeReport;

    fn find_available_tasks_with_empty_category(&self) -> Vec<TaskTemplate> {
        self.find_available_tasks_by_category(None)
    }

    fn find_todays_tasks_with_empty_category(&self) -> Vec<TaskInstance> {
        self.find_todays_tasks_by_category(None)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryTaskCategoryRepository {
    book: TaskBook,
}

impl InMemoryTaskCategoryRepository {
    pub fn new(book: TaskBook) -> Self {
        Self { book }
    }
}

impl TaskCategoryRepository for InMemoryTaskCategoryRepository {
    fn find_available_tasks_by_category(&self, category_id: Option<&str>) -> Vec<TaskTemplate> {
        let category = lookup_key(category_id);
        self.book
            .read(|c| c.sorted_templates(|t| t.info().category() == category))
    }

    fn find_todays_tasks_by_category(&self, category_id: Option<&str>) -> Vec<TaskInstance> {
        let category = lookup_key(category_id);
        self.book
            .read(|c| c.sorted_instances(|i| i.info().category() == category))
    }

    fn update_available_task_category(&self, id: TaskId, new_category_id: Option<&str>) -> bool {
        let updated = self.book.write(|c| match c.templates.get_mut(&id) {
            Some(template) => {
                let info = template.info().with_category(new_category_id);
                template.replace_info(info);
                true
            }
            None => false,
        });
        debug!("event=template_category module=repo task_id={id} updated={updated}");
        updated
    }

    fn update_todays_task_category(&self, id: TaskId, new_category_id: Option<&str>) -> bool {
        let updated = self.book.write(|c| match c.instances.get_mut(&id) {
            Some(instance) => {
                let info = instance.info().with_category(new_category_id);
                instance.replace_info(info);
                true
            }
            None => false,
        });
        debug!("event=today_category module=repo task_id={id} updated={updated}");
        updated
    }

    fn clear_category_references(&self, category_id: &str) -> CategoryCascadeReport {
        let category = normalize_category_id(Some(category_id));
        if category.is_empty() {
            return CategoryCascadeReport::default();
        }

        let report = self.book.write(|c| {
            let mut report = CategoryCascadeReport::default();
            for template in c.templates.values_mut() {
                if template.info().category() == category {
                    let info = template.info().with_category(None);
                    template.replace_info(info);
                    report.templates += 1;
                }
            }
            for instance in c.instances.values_mut() {
                if instance.info().category() == category {
                    let info = instance.info().with_category(None);
                    instance.replace_info(info);
                    report.instances += 1;
                }
            }
            report
        });
        info!(
            "event=category_cascade module=repo status=ok templates={} instances={}",
            report.templates, report.instances
        );
        report
    }
}

fn lookup_key(category_id: Option<&str>) -> &str {
    match category_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => "",
    }
}
