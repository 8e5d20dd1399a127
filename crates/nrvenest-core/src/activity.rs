//! Trackable activities.
//!
//! The string tags and storage field names are shared with the deployed
//! mobile client and must not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the five daily quest activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityKind {
    #[serde(rename = "breathing")]
    Breathing,
    #[serde(rename = "gratitude")]
    Gratitude,
    #[serde(rename = "meditation")]
    Meditation,
    #[serde(rename = "game")]
    MemoryGame,
    #[serde(rename = "thoughtbubbles")]
    ThoughtBubbles,
}

/// How an activity reports a completed unit of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCounting {
    /// One call per finished session (cycle, game, round).
    Sessions,
    /// The step count is the number of items written so far.
    Items,
}

impl ActivityKind {
    /// All kinds in display order.
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Breathing,
        ActivityKind::Gratitude,
        ActivityKind::MemoryGame,
        ActivityKind::Meditation,
        ActivityKind::ThoughtBubbles,
    ];

    /// Stable tag used as the completion flag key in the `quests` document.
    pub fn tag(&self) -> &'static str {
        match self {
            ActivityKind::Breathing => "breathing",
            ActivityKind::Gratitude => "gratitude",
            ActivityKind::Meditation => "meditation",
            ActivityKind::MemoryGame => "game",
            ActivityKind::ThoughtBubbles => "thoughtbubbles",
        }
    }

    /// Step counter field in the `quests` document.
    pub fn steps_field(&self) -> &'static str {
        match self {
            ActivityKind::Breathing => "breathingSteps",
            ActivityKind::Gratitude => "gratitudeSteps",
            ActivityKind::Meditation => "meditationSteps",
            ActivityKind::MemoryGame => "gameSteps",
            ActivityKind::ThoughtBubbles => "thoughtBubblesSteps",
        }
    }

    /// Per-activity key written by older clients before the counters were
    /// folded into the `quests` document.
    pub fn legacy_key(&self) -> &'static str {
        match self {
            ActivityKind::Breathing => "breathingProgress",
            ActivityKind::Gratitude => "gratitudeItems",
            ActivityKind::Meditation => "meditationProgress",
            ActivityKind::MemoryGame => "gameProgress",
            ActivityKind::ThoughtBubbles => "thoughtBubblesProgress",
        }
    }

    pub fn counting(&self) -> StepCounting {
        match self {
            ActivityKind::Gratitude => StepCounting::Items,
            _ => StepCounting::Sessions,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActivityKind::Breathing => "Calm Breathing",
            ActivityKind::Gratitude => "Gratitude Practice",
            ActivityKind::Meditation => "Meditation Timer",
            ActivityKind::MemoryGame => "Memory Game",
            ActivityKind::ThoughtBubbles => "Thought Bubbles",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ActivityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breathing" => Ok(ActivityKind::Breathing),
            "gratitude" => Ok(ActivityKind::Gratitude),
            "meditation" => Ok(ActivityKind::Meditation),
            "game" | "memory" | "memory-game" | "memory_game" => Ok(ActivityKind::MemoryGame),
            "thoughtbubbles" | "thought-bubbles" | "thought_bubbles" => {
                Ok(ActivityKind::ThoughtBubbles)
            }
            _ => Err(ValidationError::UnknownActivity(s.to_string())),
        }
    }
}
