//! JSON codec for the `quests` document.
//!
//! Document shape (v2):
//! `{"version":2,"breathing":false,"breathingSteps":1,...}`
//!
//! Documents without `version` were written by older clients, which kept
//! part of the progress under per-activity keys. Those keys are read as a
//! fallback for any counter the document does not carry.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{ProgressStore, QuestRecord};
use crate::activity::{ActivityKind, StepCounting};

pub(crate) const QUESTS_VERSION: u64 = 2;

/// Result of decoding stored progress.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub store: ProgressStore,
    /// The data came from a pre-v2 layout and should be rewritten.
    pub legacy: bool,
}

/// Decode the `quests` document plus any legacy counters.
///
/// Never fails: corrupt input decodes to zeroed quests.
pub(crate) fn decode(
    raw: Option<&str>,
    legacy_values: &BTreeMap<ActivityKind, String>,
    target_steps: u32,
) -> Decoded {
    let doc = raw.and_then(|s| match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "quests record is not an object; using defaults");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "quests record is corrupt; using defaults");
            None
        }
    });

    let version = doc
        .as_ref()
        .and_then(|m| m.get("version"))
        .and_then(Value::as_u64);
    let is_legacy = version.is_none();

    let records = ActivityKind::ALL.iter().map(|&kind| {
        let from_doc = doc
            .as_ref()
            .and_then(|m| m.get(kind.steps_field()))
            .and_then(|v| steps_from_value(kind, v));

        let steps = match from_doc {
            Some(n) if n > 0 || !is_legacy => n,
            _ if is_legacy => legacy_values
                .get(&kind)
                .and_then(|raw| legacy_steps(kind, raw))
                .unwrap_or(0),
            _ => 0,
        };

        let record = QuestRecord::with_steps(kind, target_steps, steps);
        if let Some(flag) = doc
            .as_ref()
            .and_then(|m| m.get(kind.tag()))
            .and_then(Value::as_bool)
        {
            if flag != record.completed() {
                tracing::debug!(
                    activity = %kind,
                    stored = flag,
                    steps,
                    "completion flag disagrees with step count; recomputed"
                );
            }
        }
        record
    });

    let store = ProgressStore::from_records(target_steps, records.collect::<Vec<_>>());
    let legacy = is_legacy && (doc.is_some() || !legacy_values.is_empty());
    Decoded { store, legacy }
}

/// Encode the store as a v2 `quests` document.
pub(crate) fn encode(store: &ProgressStore) -> String {
    let mut map = Map::new();
    map.insert("version".into(), Value::from(QUESTS_VERSION));
    for kind in ActivityKind::ALL {
        let steps = store.get(kind).map(|r| r.completed_steps()).unwrap_or(0);
        let completed = store.get(kind).is_some_and(|r| r.completed());
        map.insert(kind.tag().into(), Value::Bool(completed));
        map.insert(kind.steps_field().into(), Value::from(steps));
    }
    Value::Object(map).to_string()
}

/// Read a step counter, healing out-of-range values.
fn steps_from_value(kind: ActivityKind, value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.min(u64::from(u32::MAX)) as u32)
            } else if let Some(f) = n.as_f64() {
                if f < 0.0 {
                    tracing::debug!(activity = %kind, value = f, "negative step count clamped to 0");
                    Some(0)
                } else {
                    Some(f.floor().min(f64::from(u32::MAX)) as u32)
                }
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn legacy_steps(kind: ActivityKind, raw: &str) -> Option<u32> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(activity = %kind, error = %e, "legacy progress key is corrupt; ignored");
            return None;
        }
    };
    match kind.counting() {
        StepCounting::Items => value.as_array().map(|items| items.len() as u32),
        StepCounting::Sessions => steps_from_value(kind, &value),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
