use nrvenest_core::MoodCheckIn;

use super::CmdResult;

pub fn run(score: i64) -> CmdResult {
    let check_in = MoodCheckIn::new(score)?;
    println!("{}", serde_json::to_string_pretty(&check_in)?);
    Ok(())
}
