//! Explicitly constructed task context.
//!
//! Owns one task book, one clock and one goal directory, and hands out
//! strategy implementations bound to them. Callers pass the context around
//! instead of reaching for process-wide state.

use crate::clock::{Clock, SystemClock};
use crate::config::{CoreConfig, DEFAULT_OVERDUE_WINDOW_DAYS};
use crate::model::task::TaskInstance;
use crate::repo::add_today_repo::InMemoryAddToTodayRepository;
use crate::repo::category_repo::InMemoryTaskCategoryRepository;
use crate::repo::complete_repo::InMemoryMarkCompleteRepository;
use crate::repo::create_repo::InMemoryCreateTaskRepository;
use crate::repo::delete_repo::InMemoryDeleteTaskRepository;
use crate::repo::edit_template_repo::InMemoryEditTemplateRepository;
use crate::repo::edit_today_repo::InMemoryEditTodayRepository;
use crate::repo::goal_repo::{GoalDirectory, InMemoryGoalDirectory};
use crate::repo::overdue_repo::{InMemoryOverdueTaskRepository, OverdueTaskRepository};
use crate::repo::remove_today_repo::InMemoryRemoveFromTodayRepository;
use crate::repo::task_book::TaskBook;
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskContext {
    book: TaskBook,
    clock: Arc<dyn Clock>,
    goals: Arc<dyn GoalDirectory>,
    overdue_window_days: u32,
}

impl TaskContext {
    pub fn new(book: TaskBook, clock: Arc<dyn Clock>, goals: Arc<dyn GoalDirectory>) -> Self {
        Self {
            book,
            clock,
            goals,
            overdue_window_days: DEFAULT_OVERDUE_WINDOW_DAYS,
        }
    }

    /// Like `new`, with the overdue look-back taken from `config`.
    pub fn from_config(
        config: &CoreConfig,
        book: TaskBook,
        clock: Arc<dyn Clock>,
        goals: Arc<dyn GoalDirectory>,
    ) -> Self {
        Self {
            overdue_window_days: config.overdue_window_days,
            ..Self::new(book, clock, goals)
        }
    }

    /// Empty book, system clock, no goals.
    pub fn with_system_clock() -> Self {
        Self::new(
            TaskBook::new(),
            Arc::new(SystemClock),
            Arc::new(InMemoryGoalDirectory::default()),
        )
    }

    pub fn book(&self) -> &TaskBook {
        &self.book
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn overdue_window_days(&self) -> u32 {
        self.overdue_window_days
    }

    /// Overdue instances within the configured look-back window.
    pub fn recent_overdue_tasks(&self) -> Vec<TaskInstance> {
        self.overdue().get_overdue_tasks(self.overdue_window_days)
    }

    pub fn create(&self) -> InMemoryCreateTaskRepository {
        InMemoryCreateTaskRepository::new(self.book.clone())
    }

    pub fn edit_template(&self) -> InMemoryEditTemplateRepository {
        InMemoryEditTemplateRepository::new(self.book.clone())
    }

    pub fn add_to_today(&self) -> InMemoryAddToTodayRepository {
        InMemoryAddToTodayRepository::new(self.book.clone(), self.clock.clone())
    }

    pub fn edit_today(&self) -> InMemoryEditTodayRepository {
        InMemoryEditTodayRepository::new(self.book.clone(), self.clock.clone())
    }

    pub fn mark_complete(&self) -> InMemoryMarkCompleteRepository {
        InMemoryMarkCompleteRepository::new(self.book.clone(), self.clock.clone())
    }

    pub fn remove_from_today(&self) -> InMemoryRemoveFromTodayRepository {
        InMemoryRemoveFromTodayRepository::new(self.book.clone())
    }

    pub fn delete(&self) -> InMemoryDeleteTaskRepository {
        InMemoryDeleteTaskRepository::new(self.book.clone(), self.goals.clone())
    }

    pub fn overdue(&self) -> InMemoryOverdueTaskRepository {
        InMemoryOverdueTaskRepository::new(self.book.clone(), self.clock.clone())
    }

    pub fn categories(&self) -> InMemoryTaskCategoryRepository {
        InMemoryTaskCategoryRepository::new(self.book.clone())
    }
}
