//! Snapshot persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist one consistent copy of both task collections.
//! - Rebuild a task book from persisted rows.
//!
//! # Invariants
//! - A save replaces both tables inside one transaction.
//! - A save reads the book once, under a single lock.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Dates are stored as `YYYY-MM-DD`; completion timestamps as RFC 3339
//!   UTC text with nanoseconds, so a save/load cycle is lossless.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::info::{TaskId, TaskInfo, TaskValidationError};
use crate::model::task::{Priority, TaskInstance, TaskInstanceParts, TaskTemplate};
use crate::repo::task_book::TaskBook;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row counts written by one snapshot save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub templates: usize,
    pub instances: usize,
}

/// Repository interface for task snapshots.
pub trait SnapshotRepository {
    fn save_snapshot(&self, book: &TaskBook) -> RepoResult<SnapshotStats>;
    fn load_snapshot(&self) -> RepoResult<TaskBook>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn save_snapshot(&self, book: &TaskBook) -> RepoResult<SnapshotStats> {
        let (templates, instances) = book.records();
        let stats = SnapshotStats {
            templates: templates.len(),
            instances: instances.len(),
        };

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM task_instances;", [])?;
        tx.execute("DELETE FROM task_templates;", [])?;

        for template in &templates {
            insert_template(&tx, template)?;
        }
        for instance in instances {
            insert_instance(&tx, instance)?;
        }
        tx.commit()?;

        Ok(stats)
    }

    fn load_snapshot(&self) -> RepoResult<TaskBook> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, category, planned_due_date, is_one_time
             FROM task_templates
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, template_task_id, info_id, name, description, category, priority,
                    begin_date, due_date, completed, completed_at, one_time
             FROM task_instances
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut instances = Vec::new();
        while let Some(row) = rows.next()? {
            instances.push(parse_instance_row(row)?);
        }

        Ok(TaskBook::from_records(templates, instances))
    }
}

fn insert_template(tx: &Transaction<'_>, template: &TaskTemplate) -> RepoResult<()> {
    let info = template.info();
    tx.execute(
        "INSERT INTO task_templates (
            id, name, description, category, planned_due_date, is_one_time
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            template.id().to_string(),
            info.name(),
            info.description(),
            info.category(),
            template.planned_due_date().map(format_date),
            bool_to_int(template.is_one_time()),
        ],
    )?;
    Ok(())
}

fn insert_instance(tx: &Transaction<'_>, instance: TaskInstance) -> RepoResult<()> {
    let parts = instance.into_parts();
    tx.execute(
        "INSERT INTO task_instances (
            id, template_task_id, info_id, name, description, category, priority,
            begin_date, due_date, completed, completed_at, one_time
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
        params![
            parts.id.to_string(),
            parts.template_task_id.to_string(),
            parts.info.id().to_string(),
            parts.info.name(),
            parts.info.description(),
            parts.info.category(),
            parts.priority.map(Priority::as_str),
            format_date(parts.begin_date),
            parts.due_date.map(format_date),
            bool_to_int(parts.completed),
            parts.completed_at.map(format_timestamp),
            bool_to_int(parts.one_time),
        ],
    )?;
    Ok(())
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<TaskTemplate> {
    let id = parse_id(row, "id", "task_templates")?;
    let category: String = row.get("category")?;
    let info = TaskInfo::with_id(
        id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("description")?,
        Some(category.as_str()),
    )?;
    let planned_due_date = parse_optional_date(row, "planned_due_date", "task_templates")?;
    let one_time = parse_bool(row, "is_one_time", "task_templates")?;
    Ok(TaskTemplate::new(info, planned_due_date, one_time))
}

fn parse_instance_row(row: &Row<'_>) -> RepoResult<TaskInstance> {
    let category: String = row.get("category")?;
    let info = TaskInfo::with_id(
        parse_id(row, "info_id", "task_instances")?,
        row.get::<_, String>("name")?,
        row.get::<_, String>("description")?,
        Some(category.as_str()),
    )?;

    let priority = match row.get::<_, Option<String>>("priority")? {
        Some(value) => Some(Priority::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid priority `{value}` in task_instances.priority"
            ))
        })?),
        None => None,
    };

    let begin_text: String = row.get("begin_date")?;
    let begin_date = parse_date(&begin_text, "task_instances.begin_date")?;

    let completed_at = match row.get::<_, Option<String>>("completed_at")? {
        Some(text) => Some(parse_timestamp(&text, "task_instances.completed_at")?),
        None => None,
    };

    let instance = TaskInstance::from_parts(TaskInstanceParts {
        id: parse_id(row, "id", "task_instances")?,
        template_task_id: parse_id(row, "template_task_id", "task_instances")?,
        info,
        priority,
        begin_date,
        due_date: parse_optional_date(row, "due_date", "task_instances")?,
        completed: parse_bool(row, "completed", "task_instances")?,
        completed_at,
        one_time: parse_bool(row, "one_time", "task_instances")?,
    })?;
    Ok(instance)
}

fn parse_id(row: &Row<'_>, column: &str, table: &str) -> RepoResult<TaskId> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn parse_date(text: &str, location: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {location}")))
}

fn parse_optional_date(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Ok(Some(parse_date(&text, &format!("{table}.{column}"))?)),
        None => Ok(None),
    }
}

fn parse_bool(row: &Row<'_>, column: &str, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {table}.{column}"
        ))),
    }
}

fn parse_timestamp(text: &str, location: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{text}` in {location}")))
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
