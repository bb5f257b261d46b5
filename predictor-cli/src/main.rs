//! Predictor CLI - Command-line interface
//!
//! Commands:
//! - start/fight/eliminate/skip/undo/reset: apply one event to the stored session
//! - predict/status/history: report on the stored session
//! - play: interactive loop with single-key shortcuts

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod event_cmd;
mod play_cmd;
mod report;

use event_cmd::Event;

#[derive(Parser)]
#[command(name = "predictor")]
#[command(about = "Round-robin opponent predictor for auto-battlers")]
struct Cli {
    /// Session file
    #[arg(long, global = true, default_value = "predictor-session.json")]
    session: PathBuf,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game with the seven opponent names (omit for defaults)
    Start { names: Vec<String> },
    /// Record a fight (name or alive index) and advance the round
    Fight { opponent: String },
    /// Mark an opponent eliminated
    Eliminate { opponent: String },
    /// Skip a monster round
    Skip,
    /// Undo the last event
    Undo,
    /// Discard the session
    Reset,
    /// Show the prediction for the current round
    Predict,
    /// Show round, counters, cycle and prediction
    Status,
    /// List recorded fights
    History,
    /// Interactive session
    Play,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = report::Output { json: cli.json };

    match cli.command {
        Commands::Start { names } => event_cmd::run(&cli.session, Event::Start(names), output),
        Commands::Fight { opponent } => event_cmd::run(&cli.session, Event::Fight(opponent), output),
        Commands::Eliminate { opponent } => {
            event_cmd::run(&cli.session, Event::Eliminate(opponent), output)
        }
        Commands::Skip => event_cmd::run(&cli.session, Event::Skip, output),
        Commands::Undo => event_cmd::run(&cli.session, Event::Undo, output),
        Commands::Reset => event_cmd::reset(&cli.session),
        Commands::Predict => report::run(&cli.session, report::View::Predict, output),
        Commands::Status => report::run(&cli.session, report::View::Status, output),
        Commands::History => report::run(&cli.session, report::View::History, output),
        Commands::Play => play_cmd::run(&cli.session, output),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
