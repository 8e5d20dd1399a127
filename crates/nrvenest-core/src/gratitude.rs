//! Gratitude journal entries.
//!
//! Entries are stored as a JSON string array under `gratitudeItems`; the
//! number of entries is the gratitude quest's step count.

use serde_json::Value;

use crate::error::ValidationError;

/// Normalize a new entry. Blank entries are rejected.
pub fn validate_entry(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyEntry("gratitude entry".into()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn decode_entries(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Ok(_) | Err(_) => {
            tracing::warn!("gratitude entries are corrupt; starting a new list");
            Vec::new()
        }
    }
}

pub(crate) fn encode_entries(entries: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}
