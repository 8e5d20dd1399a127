//! Consecutive-day completion streak.
//!
//! The streak advances when every quest is complete. Days are compared as
//! calendar dates; the caller decides which calendar (the CLI uses the local
//! one), so time of day and time zone never enter the arithmetic.

pub(crate) mod codec;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

/// What `advance` did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreakTransition {
    /// No previous completion on record.
    Started,
    /// Completed the day after the last completion.
    Continued,
    /// Already completed today; the streak is unchanged.
    SameDay,
    /// One or more days were skipped.
    Broken { gap_days: i64 },
    /// Today is earlier than the last completion (device clock moved back).
    ClockSkew { gap_days: i64 },
}

/// Streak engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Restart the streak when the date moves backwards. This is the
    /// standard streak rule and the default.
    ///
    /// Setting it to false departs from that rule: the count is kept and
    /// only the date is updated. Opt-in only; nothing else relies on it.
    #[serde(default = "default_true")]
    pub clock_skew_resets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            clock_skew_resets: true,
        }
    }
}

/// Result of advancing the streak for a completed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakAdvance {
    pub state: StreakState,
    pub transition: StreakTransition,
}

/// Streak decision table.
pub struct StreakEngine {
    config: StreakConfig,
}

impl StreakEngine {
    pub fn new() -> Self {
        Self {
            config: StreakConfig::default(),
        }
    }

    pub fn with_config(config: StreakConfig) -> Self {
        Self { config }
    }

    /// Compute the streak after all quests were completed on `today`.
    ///
    /// Pure: persisting the result is the caller's job.
    pub fn advance(&self, current: &StreakState, today: NaiveDate) -> StreakAdvance {
        let (current_streak, transition) = match current.last_completed_date {
            None => (1, StreakTransition::Started),
            Some(last) => {
                let diff = today.signed_duration_since(last).num_days();
                match diff {
                    0 => (current.current_streak.max(1), StreakTransition::SameDay),
                    1 => (
                        current.current_streak.saturating_add(1),
                        StreakTransition::Continued,
                    ),
                    d if d > 1 => (1, StreakTransition::Broken { gap_days: d }),
                    d => {
                        tracing::warn!(
                            %today,
                            last_completed = %last,
                            gap_days = d,
                            "completion date is before the last recorded completion; clock skew"
                        );
                        let streak = if self.config.clock_skew_resets {
                            1
                        } else {
                            current.current_streak.max(1)
                        };
                        (streak, StreakTransition::ClockSkew { gap_days: d })
                    }
                }
            }
        };

        StreakAdvance {
            state: StreakState {
                current_streak,
                last_completed_date: Some(today),
            },
            transition,
        }
    }
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state(streak: u32, last: &str) -> StreakState {
        StreakState {
            current_streak: streak,
            last_completed_date: Some(date(last)),
        }
    }

    #[test]
    fn first_completion_starts_streak() {
        let result = StreakEngine::new().advance(&StreakState::default(), date("2024-01-01"));
        assert_eq!(result.state.current_streak, 1);
        assert_eq!(result.state.last_completed_date, Some(date("2024-01-01")));
        assert_eq!(result.transition, StreakTransition::Started);
    }

    #[test]
    fn next_day_increments() {
        let result = StreakEngine::new().advance(&state(4, "2024-01-01"), date("2024-01-02"));
        assert_eq!(result.state.current_streak, 5);
        assert_eq!(result.transition, StreakTransition::Continued);
    }

    #[test]
    fn same_day_is_idempotent() {
        let engine = StreakEngine::new();
        let once = engine.advance(&state(2, "2024-01-01"), date("2024-01-02"));
        let twice = engine.advance(&once.state, date("2024-01-02"));
        assert_eq!(twice.state, once.state);
        assert_eq!(twice.transition, StreakTransition::SameDay);
    }

    #[test]
    fn gap_breaks_streak() {
        let result = StreakEngine::new().advance(&state(9, "2024-01-02"), date("2024-01-04"));
        assert_eq!(result.state.current_streak, 1);
        assert_eq!(result.transition, StreakTransition::Broken { gap_days: 2 });
    }

    #[test]
    fn month_and_leap_boundaries_are_consecutive() {
        let engine = StreakEngine::new();
        assert_eq!(
            engine.advance(&state(1, "2024-01-31"), date("2024-02-01")).transition,
            StreakTransition::Continued
        );
        assert_eq!(
            engine.advance(&state(1, "2024-02-28"), date("2024-02-29")).transition,
            StreakTransition::Continued
        );
        assert_eq!(
            engine.advance(&state(1, "2023-12-31"), date("2024-01-01")).transition,
            StreakTransition::Continued
        );
    }

    #[test]
    fn date_rollback_restarts_streak() {
        let result = StreakEngine::new().advance(&state(3, "2024-01-04"), date("2024-01-02"));
        assert_eq!(result.state.current_streak, 1);
        assert_eq!(result.state.last_completed_date, Some(date("2024-01-02")));
        assert_eq!(result.transition, StreakTransition::ClockSkew { gap_days: -2 });
    }

    #[test]
    fn date_rollback_can_keep_streak() {
        let engine = StreakEngine::with_config(StreakConfig {
            clock_skew_resets: false,
        });
        let result = engine.advance(&state(3, "2024-01-04"), date("2024-01-02"));
        assert_eq!(result.state.current_streak, 3);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(state(2, "2024-01-02")).unwrap();
        assert_eq!(json["currentStreak"], 2);
        assert_eq!(json["lastCompletedDate"], "2024-01-02");
        let empty = serde_json::to_value(StreakState::default()).unwrap();
        assert!(empty["lastCompletedDate"].is_null());
    }
}
