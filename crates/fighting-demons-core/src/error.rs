//! Core error types for fighting-demons-core.
//!
//! Every fallible operation in the library reports one of the enums below.
//! Precondition violations (bad tier tables, duplicate dates, negative
//! totals) fail fast here instead of being clamped or guessed at.

use std::path::PathBuf;
use thiserror::Error;

use chrono::NaiveDate;

/// Core error type for fighting-demons-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Tier table configuration errors
    #[error("Progression error: {0}")]
    Progression(#[from] ProgressionError),

    /// Invalid input values
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage collaborator errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export/import bundle errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// No profile has been registered yet
    #[error("No profile registered; create one first")]
    ProfileMissing,

    /// A profile already exists and registration was attempted again
    #[error("A profile named '{name}' is already registered")]
    ProfileExists { name: String },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed tier tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("tier table '{table}' is empty")]
    EmptyTable { table: String },

    #[error("tier table '{table}' must start at 0 points, first tier '{id}' starts at {min_points}")]
    FirstTierNotZero {
        table: String,
        id: String,
        min_points: u64,
    },

    #[error("tier table '{table}' is not strictly ascending: '{id}' ({min_points}) follows {previous}")]
    NotAscending {
        table: String,
        id: String,
        min_points: u64,
        previous: u64,
    },

    #[error("tier table '{table}' contains duplicate id '{id}'")]
    DuplicateId { table: String, id: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Point totals are never negative
    #[error("point total must be non-negative, got {0}")]
    NegativePoints(i64),

    /// Aggregation input must hold at most one record per date
    #[error("duplicate daily record for {0}")]
    DuplicateDate(NaiveDate),

    /// A completed slot is terminal for its date
    #[error("{slot} face-off on {date} is already completed")]
    SlotAlreadyCompleted { date: NaiveDate, slot: String },

    /// A deferral must point into the future
    #[error("deferral for {slot} must end after {at}")]
    DeferralInPast { slot: String, at: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage collaborator errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded
    #[error("Corrupt {entity} row '{key}': {message}")]
    Corrupt {
        entity: &'static str,
        key: String,
        message: String,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Export/import bundle errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("unsupported snapshot format '{found}', expected '{expected}'")]
    UnsupportedFormat { found: String, expected: String },

    #[error("snapshot could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_offending_value() {
        let err = ValidationError::NegativePoints(-3);
        assert_eq!(err.to_string(), "point total must be non-negative, got -3");

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = ValidationError::DuplicateDate(date);
        assert!(err.to_string().contains("2024-03-01"));
    }

    #[test]
    fn nested_errors_convert_into_core_error() {
        let err: CoreError = ProgressionError::EmptyTable {
            table: "titles".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Progression(_)));
        assert!(err.to_string().contains("titles"));
    }

    #[test]
    fn sqlite_failures_map_to_query_failed() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }
}
