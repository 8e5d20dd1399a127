//! Core error types for nrvenest-core.
//!
//! Storage failures abort the operation and leave persisted state unchanged.
//! Corrupt records and invariant violations never reach this hierarchy: they
//! are healed on load and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nrvenest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization errors on write
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The store rejected a read or write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Database is locked by another process
    #[error("Storage is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory error: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Unknown activity tag
    #[error("Unknown activity '{0}'")]
    UnknownActivity(String),

    /// Mood score outside 1..=5
    #[error("Mood score {0} is out of range (expected 1-5)")]
    MoodOutOfRange(i64),

    /// Empty entry
    #[error("Empty entry: {0}")]
    EmptyEntry(String),

    /// Step count for an activity that counts journal entries
    #[error("'{0}' progress is recorded by adding entries, not steps")]
    EntryCounted(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StorageError::Locked
            }
            _ => StorageError::Unavailable(err.to_string()),
        }
    }
}

impl CoreError {
    /// True when the error came from the persistence layer; the caller may
    /// retry the triggering action.
    pub fn is_storage(&self) -> bool {
        matches!(self, CoreError::Storage(_))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
