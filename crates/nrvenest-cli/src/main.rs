use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nrvenest-cli", version, about = "NrveNest CLI")]
struct Cli {
    /// Calendar date to act on (YYYY-MM-DD); defaults to today's local date
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily quest progress
    Quest {
        #[command(subcommand)]
        action: commands::quest::QuestAction,
    },
    /// Completion streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Gratitude journal
    Gratitude {
        #[command(subcommand)]
        action: commands::gratitude::GratitudeAction,
    },
    /// Mood check-in (1 = down, 5 = great)
    Mood {
        score: i64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Load the config, then install the stderr subscriber at its log level.
/// Load-time warnings go through a warn-level subscriber of their own.
fn init_tracing() -> nrvenest_core::Config {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, nrvenest_core::Config::load);

    let filter = EnvFilter::try_from_env("NRVENEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    config
}

fn main() {
    let cli = Cli::parse();
    let config = init_tracing();

    let today = commands::today(cli.date);
    let result = match cli.command {
        Commands::Quest { action } => commands::quest::run(action, &config, today),
        Commands::Streak { action } => commands::streak::run(action, &config, today),
        Commands::Gratitude { action } => commands::gratitude::run(action, &config, today),
        Commands::Mood { score } => commands::mood::run(score),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
