//! Derived quest status.

use serde::Serialize;

use super::ProgressStore;
use crate::activity::ActivityKind;
use crate::streak::StreakState;

/// True iff every activity has a record and that record is complete.
///
/// A missing record counts as incomplete.
pub fn all_complete(store: &ProgressStore) -> bool {
    ActivityKind::ALL
        .iter()
        .all(|&kind| store.get(kind).is_some_and(|r| r.completed()))
}

/// Display row for one quest.
#[derive(Debug, Clone, Serialize)]
pub struct QuestProgress {
    pub kind: ActivityKind,
    pub title: String,
    pub completed_steps: u32,
    pub target_steps: u32,
    pub completed: bool,
    /// 0-100, capped.
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub quests: Vec<QuestProgress>,
    pub completed_quests: usize,
    pub total_quests: usize,
    pub all_complete: bool,
    pub current_streak: u32,
    pub last_completed_date: Option<chrono::NaiveDate>,
}

pub fn summary(store: &ProgressStore, streak: &StreakState) -> ProgressSummary {
    let quests: Vec<QuestProgress> = ActivityKind::ALL
        .iter()
        .map(|&kind| {
            let (steps, target) = store
                .get(kind)
                .map(|r| (r.completed_steps(), r.target_steps()))
                .unwrap_or((0, store.target_steps()));
            let percent = (u64::from(steps) * 100 / u64::from(target.max(1))).min(100) as u8;
            QuestProgress {
                kind,
                title: kind.title().to_string(),
                completed_steps: steps,
                target_steps: target,
                completed: steps >= target,
                percent,
            }
        })
        .collect();

    let completed_quests = quests.iter().filter(|q| q.completed).count();
    ProgressSummary {
        total_quests: quests.len(),
        all_complete: completed_quests == quests.len(),
        completed_quests,
        quests,
        current_streak: streak.current_streak,
        last_completed_date: streak.last_completed_date,
    }
}
