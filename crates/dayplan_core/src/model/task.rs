//! Task template and task instance models.
//!
//! # Responsibility
//! - Define reusable templates and the dated instances created from them.
//! - Own completion timestamp bookkeeping and derived overdue status.
//!
//! # Invariants
//! - `TaskTemplate::id()` is always `info.id()`.
//! - An instance owns a deep copy of its template info, never a shared one.
//! - Instance ids are generated independently of the template id.
//! - `completed_at` is set iff `completed` is true.
//! - Overdue is derived from a caller-supplied `today`; it is never stored.

use crate::model::info::{TaskId, TaskInfo, TaskValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority assigned to an instance. Unset priority is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Reusable task definition without per-day state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    info: TaskInfo,
    planned_due_date: Option<NaiveDate>,
    one_time: bool,
}

impl TaskTemplate {
    pub fn new(info: TaskInfo, planned_due_date: Option<NaiveDate>, one_time: bool) -> Self {
        Self {
            info,
            planned_due_date,
            one_time,
        }
    }

    /// Identity of the template, derived from its info.
    pub fn id(&self) -> TaskId {
        self.info.id()
    }

    pub fn info(&self) -> &TaskInfo {
        &self.info
    }

    pub fn planned_due_date(&self) -> Option<NaiveDate> {
        self.planned_due_date
    }

    pub fn is_one_time(&self) -> bool {
        self.one_time
    }

    /// Replaces info while keeping identity stable.
    ///
    /// Callers must pass info derived from the current one (`with_*`).
    pub(crate) fn replace_info(&mut self, info: TaskInfo) {
        debug_assert_eq!(info.id(), self.info.id());
        self.info = info;
    }

    pub(crate) fn set_one_time(&mut self, one_time: bool) {
        self.one_time = one_time;
    }
}

/// Dated, prioritized, completable copy of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskInstanceParts", into = "TaskInstanceParts")]
pub struct TaskInstance {
    id: TaskId,
    template_task_id: TaskId,
    info: TaskInfo,
    priority: Option<Priority>,
    begin_date: NaiveDate,
    due_date: Option<NaiveDate>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    one_time: bool,
}

/// Raw instance fields used when rebuilding from persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInstanceParts {
    pub id: TaskId,
    pub template_task_id: TaskId,
    pub info: TaskInfo,
    pub priority: Option<Priority>,
    pub begin_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub one_time: bool,
}

impl TaskInstance {
    /// Instantiates `template` for the day `today`.
    ///
    /// A due date already in the past becomes the begin date, so backfilled
    /// instances start out overdue.
    pub fn from_template(
        template: &TaskTemplate,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let begin_date = match due_date {
            Some(due) if due < today => due,
            _ => today,
        };
        Self {
            id: Uuid::new_v4(),
            template_task_id: template.id(),
            info: template.info().clone(),
            priority,
            begin_date,
            due_date,
            completed: false,
            completed_at: None,
            one_time: template.is_one_time(),
        }
    }

    /// Rebuilds an instance from stored fields, validating invariants.
    pub fn from_parts(parts: TaskInstanceParts) -> Result<Self, TaskValidationError> {
        if parts.id.is_nil() || parts.template_task_id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if parts.completed != parts.completed_at.is_some() {
            return Err(TaskValidationError::CompletionMismatch {
                completed: parts.completed,
            });
        }
        Ok(Self {
            id: parts.id,
            template_task_id: parts.template_task_id,
            info: parts.info,
            priority: parts.priority,
            begin_date: parts.begin_date,
            due_date: parts.due_date,
            completed: parts.completed,
            completed_at: parts.completed_at,
            one_time: parts.one_time,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn template_task_id(&self) -> TaskId {
        self.template_task_id
    }

    pub fn info(&self) -> &TaskInfo {
        &self.info
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn begin_date(&self) -> NaiveDate {
        self.begin_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_one_time(&self) -> bool {
        self.one_time
    }

    /// Derived status: due date passed and not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Sets completion, stamping `at` on completion and clearing it otherwise.
    ///
    /// Re-completing an already completed instance keeps the first timestamp.
    pub(crate) fn set_completed(&mut self, completed: bool, at: DateTime<Utc>) {
        match (self.completed, completed) {
            (false, true) => self.completed_at = Some(at),
            (_, false) => self.completed_at = None,
            (true, true) => {}
        }
        self.completed = completed;
    }

    pub(crate) fn reschedule(&mut self, priority: Option<Priority>, due_date: Option<NaiveDate>) {
        self.priority = priority;
        self.due_date = due_date;
    }

    pub(crate) fn replace_info(&mut self, info: TaskInfo) {
        self.info = info;
    }

    pub(crate) fn set_one_time(&mut self, one_time: bool) {
        self.one_time = one_time;
    }

    pub(crate) fn into_parts(self) -> TaskInstanceParts {
        TaskInstanceParts {
            id: self.id,
            template_task_id: self.template_task_id,
            info: self.info,
            priority: self.priority,
            begin_date: self.begin_date,
            due_date: self.due_date,
            completed: self.completed,
            completed_at: self.completed_at,
            one_time: self.one_time,
        }
    }
}

impl TryFrom<TaskInstanceParts> for TaskInstance {
    type Error = TaskValidationError;

    fn try_from(value: TaskInstanceParts) -> Result<Self, Self::Error> {
        Self::from_parts(value)
    }
}

impl From<TaskInstance> for TaskInstanceParts {
    fn from(value: TaskInstance) -> Self {
        value.into_parts()
    }
}
