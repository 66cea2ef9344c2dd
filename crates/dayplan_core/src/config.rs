//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe logging, snapshot storage and overdue window settings.
//! - Load settings from a JSON file, filling missing keys with defaults.
//!
//! # Invariants
//! - `log_level` must be one of `trace|debug|info|warn|error`.
//! - `log_dir` and `db_path`, when set, must be absolute paths.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_OVERDUE_WINDOW_DAYS: u32 = 7;

/// Errors from loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for one core instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub log_level: String,
    /// Rolling log directory. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Snapshot database file. Snapshots are kept in memory when unset.
    pub db_path: Option<PathBuf>,
    /// Default look-back for windowed overdue queries.
    pub overdue_window_days: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            overdue_window_days: DEFAULT_OVERDUE_WINDOW_DAYS,
        }
    }
}

impl CoreConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates JSON config text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        for (key, path) in [("log_dir", &self.log_dir), ("db_path", &self.db_path)] {
            if let Some(path) = path {
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid(format!(
                        "{key} must be an absolute path, got `{}`",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}
