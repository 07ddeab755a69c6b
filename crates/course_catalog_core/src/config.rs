//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location and logging options for entry points.
//!
//! # Invariants
//! - Resolution never fails; unset or blank values fall back to defaults.
//! - `COURSE_CATALOG_DB_PATH` wins over the legacy `DB_PATH` key.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "COURSE_CATALOG_DB_PATH";
pub const LEGACY_DB_PATH_ENV: &str = "DB_PATH";
pub const LOG_LEVEL_ENV: &str = "COURSE_CATALOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "COURSE_CATALOG_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "course_catalog.sqlite3";

/// Resolved settings for opening the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl CatalogConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a key to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .or_else(|| non_blank(LEGACY_DB_PATH_ENV))
            .map_or_else(
                || std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
                PathBuf::from,
            );
        let log_level = non_blank(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}
