//! Daily quests: one step counter per activity.
//!
//! A quest is complete once its step count reaches the target. The flag is
//! always derived from the count; nothing can set it directly.

mod aggregate;
pub(crate) mod codec;

pub use aggregate::{all_complete, summary, ProgressSummary, QuestProgress};

use std::collections::BTreeMap;

use crate::activity::ActivityKind;

/// Default number of steps per quest.
pub const DEFAULT_TARGET_STEPS: u32 = 3;

/// Progress of a single activity within the current cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestRecord {
    kind: ActivityKind,
    target_steps: u32,
    completed_steps: u32,
}

impl QuestRecord {
    pub fn new(kind: ActivityKind, target_steps: u32) -> Self {
        Self::with_steps(kind, target_steps, 0)
    }

    pub fn with_steps(kind: ActivityKind, target_steps: u32, completed_steps: u32) -> Self {
        Self {
            kind,
            target_steps: target_steps.max(1),
            completed_steps,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn target_steps(&self) -> u32 {
        self.target_steps
    }

    pub fn completed_steps(&self) -> u32 {
        self.completed_steps
    }

    pub fn completed(&self) -> bool {
        self.completed_steps >= self.target_steps
    }

    /// Apply an update. The count never decreases.
    pub fn apply(&mut self, update: StepUpdate) {
        let next = match update {
            StepUpdate::Increment => self.completed_steps.saturating_add(1),
            StepUpdate::SetCount(n) => n,
        };
        self.completed_steps = self.completed_steps.max(next);
    }

    fn reset(&mut self) {
        self.completed_steps = 0;
    }
}

/// A completed unit of progress reported by an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUpdate {
    /// One more session finished.
    Increment,
    /// The activity now holds this many items.
    SetCount(u32),
}

/// Snapshot of every quest for the current cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStore {
    target_steps: u32,
    records: BTreeMap<ActivityKind, QuestRecord>,
}

impl ProgressStore {
    /// A fresh store with all five quests at zero.
    pub fn new(target_steps: u32) -> Self {
        let records = ActivityKind::ALL
            .iter()
            .map(|&kind| (kind, QuestRecord::new(kind, target_steps)))
            .collect();
        Self {
            target_steps: target_steps.max(1),
            records,
        }
    }

    /// Build a store from explicit records. Kinds not listed stay absent.
    pub fn from_records(target_steps: u32, records: impl IntoIterator<Item = QuestRecord>) -> Self {
        Self {
            target_steps: target_steps.max(1),
            records: records.into_iter().map(|r| (r.kind, r)).collect(),
        }
    }

    pub fn target_steps(&self) -> u32 {
        self.target_steps
    }

    pub fn get(&self, kind: ActivityKind) -> Option<&QuestRecord> {
        self.records.get(&kind)
    }

    pub fn records(&self) -> impl Iterator<Item = &QuestRecord> {
        self.records.values()
    }

    /// Apply a step to `kind`, creating its record if it was absent.
    pub fn record_step(&mut self, kind: ActivityKind, update: StepUpdate) -> &QuestRecord {
        let target = self.target_steps;
        let record = self
            .records
            .entry(kind)
            .or_insert_with(|| QuestRecord::new(kind, target));
        record.apply(update);
        record
    }

    /// Zero every quest and make sure all five are present.
    pub fn reset_all(&mut self) {
        for kind in ActivityKind::ALL {
            let target = self.target_steps;
            self.records
                .entry(kind)
                .or_insert_with(|| QuestRecord::new(kind, target))
                .reset();
        }
    }
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_STEPS)
    }
}
