//! Configuration types for the payroll engine.
//!
//! These structures are deserialized from a YAML configuration file. Every
//! field has a default, so an empty document is a valid configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Default database file name, created next to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "payroll.db";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Settings for the SQLite store.
    pub storage: StorageConfig,
}

/// Settings for the SQLite store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Create the database file when it does not exist.
    pub create_if_missing: bool,
    /// How long a statement waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
    /// Prefix exports with a UTF-8 byte-order mark.
    pub export_byte_order_mark: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            create_if_missing: true,
            busy_timeout_ms: 5000,
            export_byte_order_mark: true,
        }
    }
}

impl StorageConfig {
    /// Default settings for a database at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
