//! Error types for the press ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the record store, configuration and API can report.
//! The payroll calculator itself never fails.

use thiserror::Error;

/// The main error type for the press ledger.
///
/// # Example
///
/// ```
/// use press_ledger::error::LedgerError;
///
/// let error = LedgerError::ConfigNotFound {
///     path: "/missing/press-ledger.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/press-ledger.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A record with the given id does not exist.
    #[error("{entity} not found: {id}")]
    RecordNotFound {
        /// The kind of record that was looked up (e.g. "employee").
        entity: &'static str,
        /// The id that did not resolve.
        id: String,
    },

    /// A record field failed validation.
    #[error("Invalid {entity} field '{field}': {message}")]
    InvalidRecord {
        /// The kind of record being validated.
        entity: &'static str,
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A month/year pair was out of range.
    #[error("Invalid pay period: {message}")]
    InvalidPeriod {
        /// A description of the problem.
        message: String,
    },

    /// The persistence backend failed to load or save the snapshot.
    #[error("Storage error at '{path}': {message}")]
    Storage {
        /// The storage location involved.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Imported data could not be understood.
    #[error("Invalid data format: {message}")]
    ImportError {
        /// A description of the problem.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for [`LedgerError::RecordNotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for [`LedgerError::InvalidRecord`].
    pub fn invalid(
        entity: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRecord {
            entity,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
