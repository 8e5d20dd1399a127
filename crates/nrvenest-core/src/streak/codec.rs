//! Tolerant decoding of the `streak` document.

use chrono::NaiveDate;
use serde_json::Value;

use super::StreakState;

/// Decode a stored streak. Missing or corrupt data yields the default.
pub(crate) fn decode(raw: Option<&str>) -> StreakState {
    let Some(raw) = raw else {
        return StreakState::default();
    };

    let map = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!("streak record is not an object; using defaults");
            return StreakState::default();
        }
        Err(e) => {
            tracing::warn!(error = %e, "streak record is corrupt; using defaults");
            return StreakState::default();
        }
    };

    let current_streak = match map.get("currentStreak") {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|u| u.min(u64::from(u32::MAX)) as u32)
            .or_else(|| n.as_f64().map(|f| f.max(0.0).floor() as u32))
            .unwrap_or(0),
        _ => 0,
    };

    let last_completed_date = match map.get("lastCompletedDate") {
        Some(Value::String(s)) => parse_date(s),
        _ => None,
    };

    StreakState {
        current_streak,
        last_completed_date,
    }
}

pub(crate) fn encode(state: &StreakState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Accepts `YYYY-MM-DD`, or a longer ISO timestamp whose first ten
/// characters are the date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.get(..10).unwrap_or(s);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(value = s, error = %e, "unreadable lastCompletedDate; ignored");
            None
        }
    }
}
