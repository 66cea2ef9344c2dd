//! Data-access strategies over the shared task collections.
//!
//! # Responsibility
//! - Define one narrow contract per capability (create, edit, add to today,
//!   reschedule, complete, remove, delete, overdue, category cascade).
//! - Provide in-memory implementations sharing one `TaskBook`.
//! - Persist and restore snapshots of the collections.
//!
//! # Invariants
//! - Business-rule failures surface as `bool`/`Option`/empty results, never
//!   as errors or panics.
//! - Every strategy call is atomic with respect to the task book lock.

pub mod add_today_repo;
pub mod category_repo;
pub mod complete_repo;
pub mod create_repo;
pub mod delete_repo;
pub mod edit_template_repo;
pub mod edit_today_repo;
pub mod goal_repo;
pub mod overdue_repo;
pub mod remove_today_repo;
pub mod snapshot_repo;
pub mod task_book;
