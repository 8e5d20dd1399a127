mod config;
pub mod database;
pub mod memory;

pub use config::{Config, LoggingConfig, QuestsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage keys shared with the mobile client.
pub mod keys {
    pub const QUESTS: &str = "quests";
    pub const STREAK: &str = "streak";
    pub const GRATITUDE_ITEMS: &str = "gratitudeItems";
}

/// One write in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl KvOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        KvOp::Remove { key: key.into() }
    }
}

/// String key-value persistence.
///
/// `apply` must be all-or-nothing: when it returns an error none of the
/// operations are visible.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn apply(&self, ops: &[KvOp]) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `NRVENEST_DATA_DIR` overrides the location. Otherwise
/// `~/.config/nrvenest`, or `~/.config/nrvenest-dev` with NRVENEST_ENV=dev.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("NRVENEST_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NRVENEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("nrvenest-dev")
            } else {
                base_dir.join("nrvenest")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
