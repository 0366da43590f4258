//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Domain failures raised by the work type catalogue are [`PayrollError`];
//! failures from the SQLite store are [`StorageError`]; configuration
//! loading failures are [`ConfigError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by work type construction and the payroll department.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::DuplicateWorkType {
///     name: "Welding".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Duplicate work type: work type 'Welding' already exists"
/// );
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// A value violated a numeric or presence invariant.
    #[error("Invalid rate: {message}")]
    InvalidRate {
        /// Which invariant was violated.
        message: String,
    },

    /// A work type with the same name already exists in the department.
    #[error("Duplicate work type: work type '{name}' already exists")]
    DuplicateWorkType {
        /// The colliding name.
        name: String,
    },

    /// An aggregate was requested over an empty department.
    #[error("Work list is empty: {message}")]
    EmptyWorkList {
        /// The operation that needed at least one entry.
        message: String,
    },

    /// An index did not address an existing entry.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The department length at the time of the call.
        len: usize,
    },

    /// A file could not be opened for reading or writing.
    #[error("cannot open file: {path}: {message}")]
    FileOpen {
        /// The file path.
        path: String,
        /// The underlying I/O message.
        message: String,
    },

    /// A line did not split into exactly three fields.
    #[error("invalid format at line {line}")]
    InvalidFormat {
        /// One-based line number.
        line: usize,
    },

    /// A numeric field failed to parse.
    #[error("invalid number '{value}' for {field} at line {line}")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// The field name.
        field: &'static str,
        /// The raw field text.
        value: String,
    },
}

impl PayrollError {
    /// Builds a [`PayrollError::InvalidRate`] from any message.
    pub fn invalid_rate(message: impl Into<String>) -> Self {
        Self::InvalidRate {
            message: message.into(),
        }
    }

    /// Returns true for the general failures (index, file, format) that carry
    /// no dedicated invariant label.
    pub fn is_general(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::FileOpen { .. }
                | Self::InvalidFormat { .. }
                | Self::InvalidNumber { .. }
        )
    }
}

/// Errors raised by the SQLite-backed store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database engine reported an error; its message is passed through.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A file used for import or export could not be read or written.
    #[error("cannot access file '{}': {source}", .path.display())]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A numeric field in an import file failed to parse.
    #[error("invalid number '{value}' at line {line}")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// The raw field text.
        value: String,
    },

    /// A persisted row failed domain validation.
    #[error(transparent)]
    Domain(#[from] PayrollError),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    Parse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

/// A type alias for Results that return StorageError.
pub type StorageResult<T> = Result<T, StorageError>;
