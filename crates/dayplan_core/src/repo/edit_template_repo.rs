//! Template edit strategy with propagation to live instances.
//!
//! # Responsibility
//! - Replace a template's name/description/category/one-time values.
//! - Push the same values to every instance created from that template.
//!
//! # Invariants
//! - Template and instance updates happen under one write lock.
//! - Instances of other templates are never touched.
//! - Invalid new values leave both collections unchanged.

use crate::model::info::{normalize_category_id, TaskId};
use crate::repo::task_book::TaskBook;
use log::{debug, warn};

/// Data access for editing templates.
pub trait EditTemplateRepository {
    fn update_available_task(
        &self,
        id: TaskId,
        name: &str,
        description: &str,
        category_id: Option<&str>,
        one_time: bool,
    ) -> bool;

    fn task_exists_with_name_and_category_excluding(
        &self,
        name: &str,
        category_id: Option<&str>,
        exclude_id: TaskId,
    ) -> bool;
}

/// In-memory edit-template strategy over a shared task book.
#[derive(Debug, Clone)]
pub struct InMemoryEditTemplateRepository {
    book: TaskBook,
}

impl InMemoryEditTemplateRepository {
    pub fn new(book: TaskBook) -> Self {
        Self { book }
    }
}

impl EditTemplateRepository for InMemoryEditTemplateRepository {
    fn update_available_task(
        &self,
        id: TaskId,
        name: &str,
        description: &str,
        category_id: Option<&str>,
        one_time: bool,
    ) -> bool {
        self.book.write(|c| {
            let Some(template) = c.templates.get_mut(&id) else {
                debug!("event=template_update module=repo status=not_found task_id={id}");
                return false;
            };

            let info = match template.info().with_details(name, description, category_id) {
                Ok(info) => info,
                Err(err) => {
                    warn!("event=template_update module=repo status=rejected task_id={id} error={err}");
                    return false;
                }
            };
            template.set_one_time(one_time);

            let mut propagated = 0usize;
            for instance in c
                .instances
                .values_mut()
                .filter(|instance| instance.template_task_id() == id)
            {
                instance.replace_info(info.clone());
                instance.set_one_time(one_time);
                propagated += 1;
            }
            template.replace_info(info);

            debug!(
                "event=template_update module=repo status=ok task_id={id} propagated={propagated}"
            );
            true
        })
    }

    fn task_exists_with_name_and_category_excluding(
        &self,
        name: &str,
        category_id: Option<&str>,
        exclude_id: TaskId,
    ) -> bool {
        let category = normalize_category_id(category_id);
        self.book.read(|c| {
            c.templates
                .values()
                .filter(|t| t.id() != exclude_id)
                .any(|t| t.info().matches_name_and_category(name, &category))
        })
    }
}
