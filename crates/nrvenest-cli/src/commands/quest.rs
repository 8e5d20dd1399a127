use chrono::NaiveDate;
use clap::Subcommand;
use nrvenest_core::{ActivityKind, Config, StepUpdate};

use super::{open_repository, print_events, CmdResult};

#[derive(Subcommand)]
pub enum QuestAction {
    /// Print quest progress and streak as JSON
    Status,
    /// Record one completed unit of an activity
    Step {
        /// breathing, gratitude, meditation, game, thoughtbubbles
        activity: ActivityKind,
        /// Set the item count instead of adding one session
        #[arg(long)]
        count: Option<u32>,
    },
    /// Reset all quests to zero
    Reset,
}

pub fn run(action: QuestAction, config: &Config, today: NaiveDate) -> CmdResult {
    let repo = open_repository(config, today)?;

    match action {
        QuestAction::Status => {
            let summary = repo.summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        QuestAction::Step { activity, count } => {
            let update = match count {
                Some(n) => StepUpdate::SetCount(n),
                None => StepUpdate::Increment,
            };
            let events = repo.record_progress(activity, update, today)?;
            print_events(&events)?;
        }
        QuestAction::Reset => {
            let events = repo.reset_all()?;
            print_events(&events)?;
        }
    }
    Ok(())
}
