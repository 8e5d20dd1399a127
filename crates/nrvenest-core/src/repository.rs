//! Progress repository.
//!
//! The single owner of persisted quest and streak state. Activity front ends
//! call into it with one completed unit at a time and never keep their own
//! copy of the store: every operation re-reads before it writes.
//!
//! Sequencing of a completed unit:
//! 1. re-read the quests and apply the step in memory
//! 2. evaluate [`all_complete`] on the result
//! 3. write the step alone or, if the day is finished, the advanced streak
//!    and the zeroed quests in one atomic batch

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::activity::{ActivityKind, StepCounting};
use crate::error::{Result, ValidationError};
use crate::events::{Event, ResetReason};
use crate::gratitude;
use crate::quest::{self, all_complete, codec, ProgressStore, ProgressSummary, QuestRecord, StepUpdate};
use crate::storage::{keys, Config, KvOp, KvStore};
use crate::streak::{self, StreakAdvance, StreakEngine, StreakState};

pub struct ProgressRepository<S: KvStore> {
    store: S,
    target_steps: u32,
    engine: StreakEngine,
}

impl<S: KvStore> ProgressRepository<S> {
    /// Repository with default quest target and streak policy.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            target_steps: config.quests.target_steps.max(1),
            engine: StreakEngine::with_config(config.streak.clone()),
        }
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.store
    }

    /// Load the current quests. Missing or corrupt data yields zeroed quests.
    ///
    /// Data written by older clients is consolidated into the current layout
    /// as a side effect; a failure there is logged and does not fail the load.
    ///
    /// # Errors
    /// Returns an error only if the store cannot be read.
    pub fn load_progress(&self) -> Result<ProgressStore> {
        let raw = self.store.get(keys::QUESTS)?;
        let mut legacy = BTreeMap::new();
        for kind in ActivityKind::ALL {
            if let Some(value) = self.store.get(kind.legacy_key())? {
                legacy.insert(kind, value);
            }
        }

        let decoded = codec::decode(raw.as_deref(), &legacy, self.target_steps);
        if decoded.legacy {
            let mut ops = vec![KvOp::set(keys::QUESTS, codec::encode(&decoded.store))];
            ops.extend(legacy_counter_removals());
            match self.store.apply(&ops) {
                Ok(()) => tracing::info!("migrated legacy quest progress"),
                Err(e) => tracing::warn!(error = %e, "legacy quest migration failed; will retry on next load"),
            }
        }
        Ok(decoded.store)
    }

    /// # Errors
    /// Returns an error only if the store cannot be read.
    pub fn load_streak(&self) -> Result<StreakState> {
        let raw = self.store.get(keys::STREAK)?;
        Ok(streak::codec::decode(raw.as_deref()))
    }

    /// Record a step for one activity. If that finishes the day, the step,
    /// the streak advance and the quest reset are written as one batch.
    ///
    /// Gratitude counts journal entries and goes through
    /// [`Self::add_gratitude_entry`] instead.
    ///
    /// # Errors
    /// Returns a validation error for entry-counted activities and a storage
    /// error if the store cannot be read or written. Persisted state is
    /// unchanged in both cases.
    pub fn record_progress(
        &self,
        kind: ActivityKind,
        update: StepUpdate,
        today: NaiveDate,
    ) -> Result<Vec<Event>> {
        if kind.counting() == StepCounting::Items {
            return Err(ValidationError::EntryCounted(kind.to_string()).into());
        }
        let progress = self.load_progress()?;
        self.commit_step(progress, kind, update, Vec::new(), today)
    }

    /// One finished session of `kind` (breathing cycle, meditation session,
    /// memory game, thought-bubbles round).
    pub fn complete_unit(&self, kind: ActivityKind, today: NaiveDate) -> Result<Vec<Event>> {
        self.record_progress(kind, StepUpdate::Increment, today)
    }

    /// Advance the streak for `today` and reset the quests, atomically.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written. Neither the
    /// streak nor the quests change in that case.
    pub fn advance(&self, today: NaiveDate) -> Result<StreakAdvance> {
        let (result, ops) = self.rollover_ops(today)?;
        self.store.apply(&ops)?;
        log_rollover(today, &result);
        Ok(result)
    }

    /// Zero every quest and clear per-activity data.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn reset_all(&self) -> Result<Vec<Event>> {
        self.store.apply(&self.reset_ops())?;
        tracing::info!("quests reset");
        Ok(vec![Event::QuestsReset {
            reason: ResetReason::Manual,
        }])
    }

    /// Finish a rollover that never ran. Stored quests that are already all
    /// complete only come from older clients, since a completing step is
    /// always written together with its rollover; the streak is advanced
    /// for `today`.
    pub fn recover(&self, today: NaiveDate) -> Result<Option<StreakAdvance>> {
        if !all_complete(&self.load_progress()?) {
            return Ok(None);
        }
        tracing::warn!("found completed quests without a rollover; recovering");
        self.advance(today).map(Some)
    }

    pub fn gratitude_entries(&self) -> Result<Vec<String>> {
        let raw = self.store.get(keys::GRATITUDE_ITEMS)?;
        Ok(gratitude::decode_entries(raw.as_deref()))
    }

    /// Append a gratitude entry; the entry count becomes the gratitude step
    /// count. Entry and quests are written together.
    pub fn add_gratitude_entry(&self, text: &str, today: NaiveDate) -> Result<Vec<Event>> {
        let entry = gratitude::validate_entry(text)?;
        let mut entries = self.gratitude_entries()?;
        entries.push(entry);
        let count = u32::try_from(entries.len()).unwrap_or(u32::MAX);

        let progress = self.load_progress()?;
        self.commit_step(
            progress,
            ActivityKind::Gratitude,
            StepUpdate::SetCount(count),
            vec![KvOp::set(keys::GRATITUDE_ITEMS, gratitude::encode_entries(&entries)?)],
            today,
        )
    }

    pub fn summary(&self) -> Result<ProgressSummary> {
        let progress = self.load_progress()?;
        let streak = self.load_streak()?;
        Ok(quest::summary(&progress, &streak))
    }

    /// Apply `update` to `progress` and write it along with `ops`. When the
    /// step finishes the day, the rollover replaces the quests write.
    fn commit_step(
        &self,
        mut progress: ProgressStore,
        kind: ActivityKind,
        update: StepUpdate,
        mut ops: Vec<KvOp>,
        today: NaiveDate,
    ) -> Result<Vec<Event>> {
        let was_completed = progress.get(kind).is_some_and(QuestRecord::completed);
        let record = progress.record_step(kind, update).clone();
        let mut events = vec![Event::StepRecorded {
            activity: kind,
            completed_steps: record.completed_steps(),
            target_steps: record.target_steps(),
        }];
        if record.completed() && !was_completed {
            events.push(Event::QuestCompleted { activity: kind });
        }

        if !all_complete(&progress) {
            ops.push(KvOp::set(keys::QUESTS, codec::encode(&progress)));
            self.store.apply(&ops)?;
            tracing::debug!(
                activity = %kind,
                steps = record.completed_steps(),
                target = record.target_steps(),
                "recorded step"
            );
            return Ok(events);
        }

        let (advance, rollover) = self.rollover_ops(today)?;
        ops.extend(rollover);
        self.store.apply(&ops)?;
        log_rollover(today, &advance);

        events.push(Event::StreakAdvanced {
            date: today,
            transition: advance.transition,
            streak: advance.state,
        });
        events.push(Event::QuestsReset {
            reason: ResetReason::Rollover,
        });
        Ok(events)
    }

    fn rollover_ops(&self, today: NaiveDate) -> Result<(StreakAdvance, Vec<KvOp>)> {
        let current = self.load_streak()?;
        let result = self.engine.advance(&current, today);
        let mut ops = vec![KvOp::set(
            keys::STREAK,
            streak::codec::encode(&result.state)?,
        )];
        ops.extend(self.reset_ops());
        Ok((result, ops))
    }

    fn reset_ops(&self) -> Vec<KvOp> {
        let mut ops = vec![
            KvOp::set(keys::QUESTS, codec::encode(&ProgressStore::new(self.target_steps))),
            KvOp::remove(keys::GRATITUDE_ITEMS),
        ];
        ops.extend(legacy_counter_removals());
        ops
    }
}

fn log_rollover(today: NaiveDate, advance: &StreakAdvance) {
    tracing::info!(
        %today,
        streak = advance.state.current_streak,
        transition = ?advance.transition,
        "all quests complete; streak advanced"
    );
}

/// Removals for the numeric per-activity keys. `gratitudeItems` holds the
/// journal and is handled separately.
fn legacy_counter_removals() -> impl Iterator<Item = KvOp> {
    ActivityKind::ALL
        .into_iter()
        .map(|kind| kind.legacy_key())
        .filter(|&key| key != keys::GRATITUDE_ITEMS)
        .map(|key| KvOp::remove(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;
    use crate::streak::StreakTransition;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn finish(repo: &ProgressRepository<MemoryStore>, kind: ActivityKind, today: NaiveDate) -> Vec<Event> {
        if kind == ActivityKind::Gratitude {
            let mut events = Vec::new();
            for entry in ["sun", "tea", "friends"] {
                events = repo.add_gratitude_entry(entry, today).unwrap();
            }
            events
        } else {
            repo.record_progress(kind, StepUpdate::SetCount(3), today).unwrap()
        }
    }

    fn finish_all_but(repo: &ProgressRepository<MemoryStore>, skip: ActivityKind, today: NaiveDate) {
        for kind in ActivityKind::ALL.into_iter().filter(|&k| k != skip) {
            finish(repo, kind, today);
        }
    }

    #[test]
    fn step_is_persisted() {
        let repo = ProgressRepository::new(MemoryStore::new());
        repo.record_progress(ActivityKind::Breathing, StepUpdate::Increment, date("2024-01-01"))
            .unwrap();
        let stored = repo.kv().get(keys::QUESTS).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(value["breathingSteps"], 1);
        assert_eq!(value["breathing"], false);
    }

    #[test]
    fn completing_quest_emits_event_once() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        repo.complete_unit(ActivityKind::Meditation, today).unwrap();
        repo.complete_unit(ActivityKind::Meditation, today).unwrap();
        let events = repo.complete_unit(ActivityKind::Meditation, today).unwrap();
        assert!(events.contains(&Event::QuestCompleted {
            activity: ActivityKind::Meditation
        }));
        let events = repo.complete_unit(ActivityKind::Meditation, today).unwrap();
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::QuestCompleted { .. })));
    }

    #[test]
    fn last_quest_triggers_rollover() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        finish_all_but(&repo, ActivityKind::ThoughtBubbles, today);
        assert_eq!(repo.load_streak().unwrap(), StreakState::default());

        let events = repo
            .record_progress(ActivityKind::ThoughtBubbles, StepUpdate::SetCount(3), today)
            .unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::StreakAdvanced {
                transition: StreakTransition::Started,
                ..
            }
        )));
        assert_eq!(
            events.last(),
            Some(&Event::QuestsReset {
                reason: ResetReason::Rollover
            })
        );
        assert!(repo.load_progress().unwrap().records().all(|r| r.completed_steps() == 0));
    }

    #[test]
    fn last_gratitude_entry_triggers_rollover() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        finish_all_but(&repo, ActivityKind::Gratitude, today);

        let events = finish(&repo, ActivityKind::Gratitude, today);
        assert!(events.contains(&Event::QuestCompleted {
            activity: ActivityKind::Gratitude
        }));
        assert_eq!(repo.load_streak().unwrap().current_streak, 1);
        assert!(repo.gratitude_entries().unwrap().is_empty());
    }

    #[test]
    fn failed_step_write_leaves_state() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        repo.complete_unit(ActivityKind::Breathing, today).unwrap();
        let before = repo.kv().snapshot();

        repo.kv().set_fail_writes(true);
        let err = repo.complete_unit(ActivityKind::Breathing, today).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(repo.kv().snapshot(), before);
    }

    #[test]
    fn failed_completing_step_keeps_day_open() {
        let repo = ProgressRepository::new(MemoryStore::new());
        repo.kv()
            .set(keys::STREAK, r#"{"currentStreak":2,"lastCompletedDate":"2024-01-01"}"#)
            .unwrap();
        let day = date("2024-01-02");
        finish_all_but(&repo, ActivityKind::ThoughtBubbles, day);
        let before = repo.kv().snapshot();

        // The completing step and its rollover fail together.
        repo.kv().set_fail_writes(true);
        let err = repo
            .record_progress(ActivityKind::ThoughtBubbles, StepUpdate::SetCount(3), day)
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(repo.kv().snapshot(), before);

        // Nothing half-written is left for a later day to pick up.
        repo.kv().set_fail_writes(false);
        assert!(repo.recover(date("2024-01-03")).unwrap().is_none());
        assert_eq!(repo.load_streak().unwrap().current_streak, 2);

        // Retrying on the same day continues the streak.
        let events = repo
            .record_progress(ActivityKind::ThoughtBubbles, StepUpdate::SetCount(3), day)
            .unwrap();
        assert!(events.contains(&Event::StreakAdvanced {
            date: day,
            transition: StreakTransition::Continued,
            streak: StreakState {
                current_streak: 3,
                last_completed_date: Some(day),
            },
        }));
    }

    #[test]
    fn recover_finishes_stale_completed_quests() {
        let mut done = ProgressStore::new(3);
        for kind in ActivityKind::ALL {
            done.record_step(kind, StepUpdate::SetCount(3));
        }
        let store = MemoryStore::new();
        store.set(keys::QUESTS, &codec::encode(&done)).unwrap();

        let repo = ProgressRepository::new(store);
        let today = date("2024-01-01");
        let recovered = repo.recover(today).unwrap().unwrap();
        assert_eq!(recovered.state.current_streak, 1);
        assert!(!all_complete(&repo.load_progress().unwrap()));
        assert!(repo.recover(today).unwrap().is_none());
    }

    #[test]
    fn gratitude_steps_only_come_from_entries() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        for update in [StepUpdate::Increment, StepUpdate::SetCount(2)] {
            let err = repo
                .record_progress(ActivityKind::Gratitude, update, today)
                .unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::EntryCounted(_))
            ));
        }
        assert!(repo.kv().snapshot().is_empty());

        repo.add_gratitude_entry("tea", today).unwrap();
        let progress = repo.load_progress().unwrap();
        let steps = progress.get(ActivityKind::Gratitude).unwrap().completed_steps();
        assert_eq!(steps as usize, repo.gratitude_entries().unwrap().len());
        assert_eq!(steps, 1);
    }

    #[test]
    fn reset_clears_journal_and_legacy_keys() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        repo.add_gratitude_entry("rain", today).unwrap();
        repo.kv().set("breathingProgress", "2").unwrap();

        let events = repo.reset_all().unwrap();
        assert_eq!(
            events,
            vec![Event::QuestsReset {
                reason: ResetReason::Manual
            }]
        );
        assert!(repo.gratitude_entries().unwrap().is_empty());
        assert_eq!(repo.kv().get("breathingProgress").unwrap(), None);
        assert!(repo.load_progress().unwrap().records().all(|r| r.completed_steps() == 0));
    }

    #[test]
    fn gratitude_entries_drive_step_count() {
        let repo = ProgressRepository::new(MemoryStore::new());
        let today = date("2024-01-01");
        repo.add_gratitude_entry("family", today).unwrap();
        let events = repo.add_gratitude_entry("  music  ", today).unwrap();
        assert_eq!(
            events[0],
            Event::StepRecorded {
                activity: ActivityKind::Gratitude,
                completed_steps: 2,
                target_steps: 3
            }
        );
        assert_eq!(repo.gratitude_entries().unwrap(), vec!["family", "music"]);
        assert!(repo.add_gratitude_entry(" ", today).is_err());
    }

    #[test]
    fn legacy_progress_is_migrated() {
        let store = MemoryStore::new();
        store
            .set(keys::QUESTS, r#"{"breathing":true,"gratitude":false,"affirmation":false}"#)
            .unwrap();
        store.set("breathingProgress", "3").unwrap();
        store.set("gameProgress", "1").unwrap();
        store.set(keys::GRATITUDE_ITEMS, r#"["a"]"#).unwrap();

        let repo = ProgressRepository::new(store);
        let progress = repo.load_progress().unwrap();
        assert!(progress.get(ActivityKind::Breathing).unwrap().completed());
        assert_eq!(progress.get(ActivityKind::MemoryGame).unwrap().completed_steps(), 1);
        assert_eq!(progress.get(ActivityKind::Gratitude).unwrap().completed_steps(), 1);

        let snapshot = repo.kv().snapshot();
        assert!(!snapshot.contains_key("breathingProgress"));
        assert!(!snapshot.contains_key("gameProgress"));
        assert!(snapshot.contains_key(keys::GRATITUDE_ITEMS));
        let doc: serde_json::Value = serde_json::from_str(&snapshot[keys::QUESTS]).unwrap();
        assert_eq!(doc["version"], 2);
        assert_eq!(doc["breathingSteps"], 3);
        assert!(doc.get("affirmation").is_none());
    }

    #[test]
    fn custom_target_applies() {
        let mut config = Config::default();
        config.quests.target_steps = 1;
        let repo = ProgressRepository::with_config(MemoryStore::new(), &config);
        let events = repo
            .complete_unit(ActivityKind::Breathing, date("2024-01-01"))
            .unwrap();
        assert!(events.contains(&Event::QuestCompleted {
            activity: ActivityKind::Breathing
        }));
    }
}
