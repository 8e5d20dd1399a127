//! Mood check-in.
//!
//! A 1-5 self rating answered with a short supportive message. Check-ins are
//! not quests and are not persisted.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    Down,
    Struggling,
    Balanced,
    Good,
    Great,
}

impl MoodLevel {
    pub fn from_score(score: i64) -> Result<Self, ValidationError> {
        match score {
            1 => Ok(MoodLevel::Down),
            2 => Ok(MoodLevel::Struggling),
            3 => Ok(MoodLevel::Balanced),
            4 => Ok(MoodLevel::Good),
            5 => Ok(MoodLevel::Great),
            other => Err(ValidationError::MoodOutOfRange(other)),
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            MoodLevel::Down => 1,
            MoodLevel::Struggling => 2,
            MoodLevel::Balanced => 3,
            MoodLevel::Good => 4,
            MoodLevel::Great => 5,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            MoodLevel::Down => {
                "I'm sorry you're feeling down. These activities might help uplift you."
            }
            MoodLevel::Struggling => {
                "Things may be tough right now, but small steps can help you feel better."
            }
            MoodLevel::Balanced => {
                "Finding balance is important. These practices can help center you."
            }
            MoodLevel::Good => "You're doing well! Keep nurturing your positive mindset.",
            MoodLevel::Great => {
                "That's wonderful! Maintain this positive energy with mindful practices."
            }
        }
    }
}

/// Response shown after a check-in.
#[derive(Debug, Clone, Serialize)]
pub struct MoodCheckIn {
    pub mood: MoodLevel,
    pub score: u8,
    pub feedback: String,
}

impl MoodCheckIn {
    pub fn new(score: i64) -> Result<Self, ValidationError> {
        let mood = MoodLevel::from_score(score)?;
        Ok(Self {
            mood,
            score: mood.score(),
            feedback: mood.feedback().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_map_to_levels() {
        for score in 1..=5 {
            assert_eq!(i64::from(MoodLevel::from_score(score).unwrap().score()), score);
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(MoodLevel::from_score(0).is_err());
        assert!(MoodLevel::from_score(6).is_err());
        assert!(MoodCheckIn::new(-1).is_err());
    }

    #[test]
    fn low_mood_gets_supportive_feedback() {
        let check_in = MoodCheckIn::new(1).unwrap();
        assert!(check_in.feedback.starts_with("I'm sorry you're feeling down"));
    }
}
