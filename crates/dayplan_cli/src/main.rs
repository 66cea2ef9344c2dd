//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `dayplan_core` linkage.
//! - Run a short in-memory lifecycle probe with deterministic output.
//!
//! # Invariants
//! - `probe=ok` is printed only when every probe check passed.

use chrono::NaiveDate;
use dayplan_core::{
    AddToTodayRepository, CreateTaskRepository, FixedClock, InMemoryGoalDirectory,
    MarkCompleteRepository, OverdueTaskRepository, Priority, TaskBook, TaskContext, TaskInfo,
    TaskTemplate, TaskValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
enum ProbeError {
    Validation(TaskValidationError),
    Check(&'static str),
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Check(check) => write!(f, "check failed: {check}"),
        }
    }
}

impl Error for ProbeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Check(_) => None,
        }
    }
}

impl From<TaskValidationError> for ProbeError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

fn main() {
    println!("dayplan_core ping={}", dayplan_core::ping());
    println!("dayplan_core version={}", dayplan_core::core_version());

    match lifecycle_probe() {
        Ok(overdue) => println!("dayplan_core probe=ok overdue={overdue}"),
        Err(err) => {
            eprintln!("dayplan_core probe=error error={err}");
            std::process::exit(1);
        }
    }
}

fn lifecycle_probe() -> Result<usize, ProbeError> {
    let today = NaiveDate::from_ymd_opt(2026, 1, 15).ok_or(ProbeError::Check("probe date"))?;
    let context = TaskContext::new(
        TaskBook::new(),
        Arc::new(FixedClock::new(today)),
        Arc::new(InMemoryGoalDirectory::default()),
    );

    let template = TaskTemplate::new(TaskInfo::new("Probe", "smoke check", None)?, None, false);
    context.create().save_task_available(template.clone());

    let add = context.add_to_today();
    let late = add.add_task_to_today(&template, Some(Priority::High), today.pred_opt());
    let done = add.add_task_to_today(&template, None, today.pred_opt());
    if !context
        .mark_complete()
        .update_task_completion_status(done.id(), true)
    {
        return Err(ProbeError::Check("completed instance must exist"));
    }

    let overdue = context.overdue().get_all_overdue_tasks();
    if overdue.len() != 1 || overdue[0].id() != late.id() {
        return Err(ProbeError::Check("only the incomplete backfilled instance is overdue"));
    }
    Ok(overdue.len())
}
