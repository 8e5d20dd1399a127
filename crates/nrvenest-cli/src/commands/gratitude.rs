use chrono::NaiveDate;
use clap::Subcommand;
use nrvenest_core::Config;

use super::{open_repository, print_events, CmdResult};

#[derive(Subcommand)]
pub enum GratitudeAction {
    /// Write a gratitude entry
    Add {
        /// What you're grateful for
        text: String,
    },
    /// List today's entries as JSON
    List,
}

pub fn run(action: GratitudeAction, config: &Config, today: NaiveDate) -> CmdResult {
    let repo = open_repository(config, today)?;

    match action {
        GratitudeAction::Add { text } => {
            let events = repo.add_gratitude_entry(&text, today)?;
            print_events(&events)?;
        }
        GratitudeAction::List => {
            let entries = repo.gratitude_entries()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
