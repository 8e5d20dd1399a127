//! # NrveNest Core Library
//!
//! Quest progress and streak tracking for the NrveNest wellness activities.
//! Front ends (the CLI, a mobile shell) report completed units of activity;
//! this crate decides what that means for the day's quests and the
//! consecutive-day streak, and persists both.
//!
//! ## Architecture
//!
//! - **Quests**: per-activity step counters with a derived completion flag
//! - **Streak**: calendar-day decision table, pure over injected dates
//! - **Repository**: re-read, mutate, persist; rollover written atomically
//! - **Storage**: SQLite key-value table and TOML configuration
//!
//! ## Key Components
//!
//! - [`ProgressRepository`]: the single entry point for mutations
//! - [`StreakEngine`]: streak advance rules
//! - [`Database`]: SQLite key-value persistence
//! - [`Config`]: application configuration management

pub mod activity;
pub mod error;
pub mod events;
pub mod gratitude;
pub mod mood;
pub mod quest;
pub mod repository;
pub mod storage;
pub mod streak;

pub use activity::{ActivityKind, StepCounting};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, ResetReason};
pub use mood::{MoodCheckIn, MoodLevel};
pub use quest::{all_complete, ProgressStore, ProgressSummary, QuestRecord, StepUpdate};
pub use repository::ProgressRepository;
pub use storage::{Config, Database, KvOp, KvStore, MemoryStore};
pub use streak::{StreakAdvance, StreakConfig, StreakEngine, StreakState, StreakTransition};
