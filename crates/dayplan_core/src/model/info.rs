//! Shared task info value.
//!
//! # Responsibility
//! - Hold the identity/name/description/category fragment shared by
//!   templates and instances.
//! - Reject invalid field values at construction time.
//!
//! # Invariants
//! - `id` is never nil.
//! - `name` is trimmed, non-blank and at most `MAX_NAME_CHARS` characters.
//! - `description` is at most `MAX_DESCRIPTION_CHARS` characters.
//! - `category` is trimmed; an absent or blank category is stored as `""`.
//! - Values are immutable; updates produce a new copy.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for templates, instances and info fragments.
pub type TaskId = Uuid;

/// Maximum name length, counted in characters.
pub const MAX_NAME_CHARS: usize = 20;
/// Maximum description length, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

/// Construction-time validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Identifier is the nil UUID.
    NilId,
    /// Name is empty after trimming.
    BlankName,
    /// Name exceeds `MAX_NAME_CHARS`.
    NameTooLong { chars: usize, max: usize },
    /// Description exceeds `MAX_DESCRIPTION_CHARS`.
    DescriptionTooLong { chars: usize, max: usize },
    /// `completed_at` presence disagrees with the `completed` flag.
    CompletionMismatch { completed: bool },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankName => write!(f, "task name must not be blank"),
            Self::NameTooLong { chars, max } => {
                write!(f, "task name has {chars} characters, limit is {max}")
            }
            Self::DescriptionTooLong { chars, max } => {
                write!(f, "task description has {chars} characters, limit is {max}")
            }
            Self::CompletionMismatch { completed: true } => {
                write!(f, "completed task must carry a completion timestamp")
            }
            Self::CompletionMismatch { completed: false } => {
                write!(f, "incomplete task must not carry a completion timestamp")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Normalizes a loose category reference.
///
/// `None` and blank values collapse to `""`, the uncategorized bucket.
pub fn normalize_category_id(category_id: Option<&str>) -> String {
    category_id.map(str::trim).unwrap_or_default().to_string()
}

/// Identity, name, description and category of one task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskInfoRecord", into = "TaskInfoRecord")]
pub struct TaskInfo {
    id: TaskId,
    name: String,
    description: String,
    category: String,
}

impl TaskInfo {
    /// Creates info with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: Option<&str>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), name, description, category_id)
    }

    /// Creates info with a caller-provided id.
    ///
    /// Used by persistence restore paths where identity already exists.
    pub fn with_id(
        id: TaskId,
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: Option<&str>,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self {
            id,
            name: validate_name(name.into())?,
            description: validate_description(description.into())?,
            category: normalize_category_id(category_id),
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category id; `""` means uncategorized.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }

    /// Returns a copy with a new name.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, TaskValidationError> {
        Ok(Self {
            name: validate_name(name.into())?,
            ..self.clone()
        })
    }

    /// Returns a copy with new name, description and category, keeping the id.
    pub fn with_details(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: Option<&str>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(self.id, name, description, category_id)
    }

    /// Returns a copy pointing at another category.
    ///
    /// Category ids are loose references, so this never fails.
    pub fn with_category(&self, category_id: Option<&str>) -> Self {
        Self {
            category: normalize_category_id(category_id),
            ..self.clone()
        }
    }

    /// Case-insensitive `(name, category)` identity used for uniqueness checks.
    pub(crate) fn matches_name_and_category(&self, name: &str, category_id: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
            && self.category.to_lowercase() == category_id.to_lowercase()
    }
}

fn validate_name(name: String) -> Result<String, TaskValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::BlankName);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(TaskValidationError::NameTooLong {
            chars,
            max: MAX_NAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

fn validate_description(description: String) -> Result<String, TaskValidationError> {
    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(TaskValidationError::DescriptionTooLong {
            chars,
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    Ok(description)
}

#[derive(Serialize, Deserialize)]
struct TaskInfoRecord {
    id: TaskId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<String>,
}

impl TryFrom<TaskInfoRecord> for TaskInfo {
    type Error = TaskValidationError;

    fn try_from(value: TaskInfoRecord) -> Result<Self, Self::Error> {
        Self::with_id(
            value.id,
            value.name,
            value.description,
            value.category.as_deref(),
        )
    }
}

impl From<TaskInfo> for TaskInfoRecord {
    fn from(value: TaskInfo) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            category: Some(value.category),
        }
    }
}
