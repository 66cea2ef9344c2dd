//! Core task lifecycle logic for dayplan.
//! This crate is the single source of truth for template/instance invariants.

pub mod clock;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use context::TaskContext;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::goal::GoalRef;
pub use model::info::{
    normalize_category_id, TaskId, TaskInfo, TaskValidationError, MAX_DESCRIPTION_CHARS,
    MAX_NAME_CHARS,
};
pub use model::task::{Priority, TaskInstance, TaskInstanceParts, TaskTemplate};
pub use repo::add_today_repo::{AddToTodayRepository, InMemoryAddToTodayRepository};
pub use repo::category_repo::{
    CategoryCascadeReport, InMemoryTaskCategoryRepository, TaskCategoryRepository,
};
pub use repo::complete_repo::{InMemoryMarkCompleteRepository, MarkCompleteRepository};
pub use repo::create_repo::{CreateTaskRepository, InMemoryCreateTaskRepository};
pub use repo::delete_repo::{DeleteTaskRepository, InMemoryDeleteTaskRepository};
pub use repo::edit_template_repo::{EditTemplateRepository, InMemoryEditTemplateRepository};
pub use repo::edit_today_repo::{EditTodayRepository, InMemoryEditTodayRepository};
pub use repo::goal_repo::{GoalDirectory, InMemoryGoalDirectory};
pub use repo::overdue_repo::{InMemoryOverdueTaskRepository, OverdueTaskRepository};
pub use repo::remove_today_repo::{InMemoryRemoveFromTodayRepository, RemoveFromTodayRepository};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SnapshotStats, SqliteSnapshotRepository,
};
pub use repo::task_book::TaskBook;
pub use service::snapshot_service::SnapshotService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
