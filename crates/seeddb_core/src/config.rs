//! Runtime configuration for the seeding entry points.
//!
//! # Responsibility
//! - Resolve database location, logical store name and logging options.
//! - Keep environment parsing out of the store and seed modules.
//!
//! # Invariants
//! - Blank values fall back to defaults.
//! - An unsupported log level is an error, never silently downgraded.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SEEDDB_DB_PATH";
pub const DB_NAME_ENV: &str = "SEEDDB_DB_NAME";
pub const LOG_LEVEL_ENV: &str = "SEEDDB_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SEEDDB_LOG_DIR";

pub const DEFAULT_DB_NAME: &str = "dinosaur-facts";
const DEFAULT_DB_FILE_NAME: &str = "dinosaur-facts.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub db_path: PathBuf,
    pub db_name: String,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<String>,
}

impl SeedConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the raw value for a key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let db_name = value(DB_NAME_ENV).unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        let log_level = match value(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(|message| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                message,
            })?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            db_name,
            log_level,
            log_dir: value(LOG_DIR_ENV),
        })
    }
}
