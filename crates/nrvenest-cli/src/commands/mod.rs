pub mod config;
pub mod gratitude;
pub mod mood;
pub mod quest;
pub mod streak;

use chrono::{Local, NaiveDate};
use nrvenest_core::{Config, Database, Event, ProgressRepository};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Open the repository and finish any rollover a previous run left behind.
pub fn open_repository(
    config: &Config,
    today: NaiveDate,
) -> Result<ProgressRepository<Database>, Box<dyn std::error::Error>> {
    tracing::debug!(%today, target_steps = config.quests.target_steps, "opening repository");
    let repo = ProgressRepository::with_config(Database::open()?, config);
    if let Some(advance) = repo.recover(today)? {
        eprintln!(
            "recovered an unfinished rollover: streak is now {}",
            advance.state.current_streak
        );
    }
    Ok(repo)
}

pub fn print_events(events: &[Event]) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(events)?);
    Ok(())
}
