//! Snapshot persistence service.
//!
//! # Responsibility
//! - Save and restore the task book through a `SnapshotRepository`.
//! - Emit `snapshot_save` / `snapshot_load` events with duration and counts.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::repo::snapshot_repo::{RepoResult, SnapshotRepository, SnapshotStats};
use crate::repo::task_book::TaskBook;
use log::{error, info};
use std::time::Instant;

/// Use-case service wrapper for task snapshots.
pub struct SnapshotService<R: SnapshotRepository> {
    repo: R,
}

impl<R: SnapshotRepository> SnapshotService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists the current contents of `book`.
    pub fn save(&self, book: &TaskBook) -> RepoResult<SnapshotStats> {
        let started_at = Instant::now();
        match self.repo.save_snapshot(book) {
            Ok(stats) => {
                info!(
                    "event=snapshot_save module=service status=ok duration_ms={} templates={} instances={}",
                    started_at.elapsed().as_millis(),
                    stats.templates,
                    stats.instances
                );
                Ok(stats)
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Rebuilds a task book from the last saved snapshot.
    pub fn load(&self) -> RepoResult<TaskBook> {
        let started_at = Instant::now();
        match self.repo.load_snapshot() {
            Ok(book) => {
                info!(
                    "event=snapshot_load module=service status=ok duration_ms={} templates={} instances={}",
                    started_at.elapsed().as_millis(),
                    book.template_count(),
                    book.instance_count()
                );
                Ok(book)
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
