use chrono::NaiveDate;
use clap::Subcommand;
use nrvenest_core::Config;

use super::{open_repository, CmdResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the current streak as JSON
    Show,
}

pub fn run(action: StreakAction, config: &Config, today: NaiveDate) -> CmdResult {
    let repo = open_repository(config, today)?;

    match action {
        StreakAction::Show => {
            let streak = repo.load_streak()?;
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
    }
    Ok(())
}
