use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::streak::{StreakState, StreakTransition};

/// Every progress change produces an Event.
/// Front ends render them; nothing downstream depends on their order
/// beyond the sequence they are returned in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StepRecorded {
        activity: ActivityKind,
        completed_steps: u32,
        target_steps: u32,
    },
    /// A quest crossed its target during this operation.
    QuestCompleted { activity: ActivityKind },
    StreakAdvanced {
        date: NaiveDate,
        transition: StreakTransition,
        streak: StreakState,
    },
    QuestsReset { reason: ResetReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    /// Requested by the user.
    Manual,
    /// All quests done; next cycle starts from zero.
    Rollover,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::QuestsReset {
            reason: ResetReason::Rollover,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "QuestsReset");
        assert_eq!(json["reason"], "rollover");
    }

    #[test]
    fn streak_event_nests_transition() {
        let event = Event::StreakAdvanced {
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            transition: StreakTransition::Broken { gap_days: 2 },
            streak: StreakState {
                current_streak: 1,
                last_completed_date: NaiveDate::from_ymd_opt(2024, 1, 4),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["transition"]["kind"], "broken");
        assert_eq!(json["transition"]["gap_days"], 2);
        assert_eq!(json["streak"]["currentStreak"], 1);
    }
}
