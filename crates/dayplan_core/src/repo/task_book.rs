//! Shared template and instance collections.
//!
//! # Responsibility
//! - Own the template store and the instance store behind one lock.
//! - Give strategies scoped read/write access to both collections.
//!
//! # Invariants
//! - Every strategy call acquires the lock once, so multi-collection
//!   cascades are atomic to concurrent readers.
//! - Templates are keyed by `template.id()`, instances by `instance.id()`.
//! - Listings are sorted deterministically, never in hash order.

use crate::model::info::TaskId;
use crate::model::task::{TaskInstance, TaskTemplate};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The two task collections.
#[derive(Debug, Default)]
pub struct TaskCollections {
    pub(crate) templates: HashMap<TaskId, TaskTemplate>,
    pub(crate) instances: HashMap<TaskId, TaskInstance>,
}

impl TaskCollections {
    pub(crate) fn sorted_templates<'a>(
        &'a self,
        filter: impl Fn(&TaskTemplate) -> bool,
    ) -> Vec<TaskTemplate> {
        let mut templates: Vec<&'a TaskTemplate> =
            self.templates.values().filter(|t| filter(t)).collect();
        templates.sort_by(|a, b| {
            a.info()
                .name()
                .to_lowercase()
                .cmp(&b.info().name().to_lowercase())
                .then_with(|| a.id().cmp(&b.id()))
        });
        templates.into_iter().cloned().collect()
    }

    /// Instances sorted by due date (undated last), then name, then id.
    pub(crate) fn sorted_instances<'a>(
        &'a self,
        filter: impl Fn(&TaskInstance) -> bool,
    ) -> Vec<TaskInstance> {
        let mut instances: Vec<&'a TaskInstance> =
            self.instances.values().filter(|i| filter(i)).collect();
        instances.sort_by(|a, b| {
            let a_due = (a.due_date().is_none(), a.due_date());
            let b_due = (b.due_date().is_none(), b.due_date());
            a_due
                .cmp(&b_due)
                .then_with(|| {
                    a.info()
                        .name()
                        .to_lowercase()
                        .cmp(&b.info().name().to_lowercase())
                })
                .then_with(|| a.id().cmp(&b.id()))
        });
        instances.into_iter().cloned().collect()
    }
}

/// Cloneable handle to the shared task collections.
///
/// Every strategy implementation holds a clone of the same book.
#[derive(Debug, Clone, Default)]
pub struct TaskBook {
    inner: Arc<RwLock<TaskCollections>>,
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from previously persisted records.
    pub fn from_records(
        templates: impl IntoIterator<Item = TaskTemplate>,
        instances: impl IntoIterator<Item = TaskInstance>,
    ) -> Self {
        let collections = TaskCollections {
            templates: templates.into_iter().map(|t| (t.id(), t)).collect(),
            instances: instances.into_iter().map(|i| (i.id(), i)).collect(),
        };
        Self {
            inner: Arc::new(RwLock::new(collections)),
        }
    }

    /// Runs `f` with shared access to both collections.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&TaskCollections) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` with exclusive access to both collections.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&mut TaskCollections) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn template_count(&self) -> usize {
        self.read(|c| c.templates.len())
    }

    pub fn instance_count(&self) -> usize {
        self.read(|c| c.instances.len())
    }

    /// One consistent copy of both collections, taken under a single lock.
    pub fn records(&self) -> (Vec<TaskTemplate>, Vec<TaskInstance>) {
        self.read(|c| (c.sorted_templates(|_| true), c.sorted_instances(|_| true)))
    }
}
