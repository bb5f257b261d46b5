//! Reports - render session state as text or JSON
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: print_event(), print_status(), print_history()
//! - Level 3: describe_prediction(), learning bar
//! - Level 4: formatting utilities

use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use serde_json::json;

use predictor_core::{GameSession, Prediction, SessionConfig, SessionStore};

/// Output mode shared by all commands
#[derive(Clone, Copy, Debug, Default)]
pub struct Output {
    pub json: bool,
}

/// JSON body of the status view
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    started: bool,
    round: String,
    alive: usize,
    eliminated: usize,
    cycle_len: usize,
    undo_available: usize,
    cycle: Vec<CycleSlot<'a>>,
    prediction: Prediction,
}

#[derive(Serialize)]
struct CycleSlot<'a> {
    name: &'a str,
    alive: bool,
}

impl<'a> StatusReport<'a> {
    fn new(session: &'a GameSession) -> Self {
        let stats = session.stats();
        Self {
            started: session.is_started(),
            round: stats.round,
            alive: stats.alive,
            eliminated: stats.eliminated,
            cycle_len: stats.cycle_len,
            undo_available: stats.undo_available,
            cycle: session
                .cycle_view()
                .into_iter()
                .map(|(name, alive)| CycleSlot { name, alive })
                .collect(),
            prediction: session.predict(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Predict,
    Status,
    History,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Load the stored session and print a view of it
pub fn run(session_path: &Path, view: View, output: Output) -> Result<()> {
    let store = SessionStore::new(session_path, SessionConfig::default());
    let session = store.load();

    match view {
        View::Predict => print_prediction(&session, output),
        View::Status => print_status(&session, output),
        View::History => print_history(&session, output),
    }
}

// ============================================================================
// LEVEL 2 - VIEWS
// ============================================================================

/// Result of an event followed by the new prediction
pub fn print_event(session: &GameSession, message: &str, output: Output) -> Result<()> {
    if output.json {
        let value = json!({
            "message": message,
            "round": session.round().round_id(),
            "prediction": session.predict(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", message);
    print_prediction(session, output)
}

pub fn print_prediction(session: &GameSession, output: Output) -> Result<()> {
    let prediction = session.predict();
    if output.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    if !session.is_started() {
        println!("No game in progress. Run `predictor start` first.");
        return Ok(());
    }

    println!("Round {}: {}", session.round(), describe_prediction(&prediction));
    for line in enemy_lines(&prediction) {
        println!("  {}", line);
    }
    if let Prediction::Learning { fought_count, total, .. } = prediction {
        draw_learning_bar(fought_count, total)?;
    }
    Ok(())
}

pub fn print_status(session: &GameSession, output: Output) -> Result<()> {
    if output.json {
        let report = StatusReport::new(session);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = session.stats();
    println!(
        "Round {} | alive {} | eliminated {} | cycle {} | undo {}",
        stats.round, stats.alive, stats.eliminated, stats.cycle_len, stats.undo_available
    );
    println!("Cycle: {}", format_cycle(session));
    let dead: Vec<&str> = session.roster().dead().map(|o| o.name.as_str()).collect();
    if !dead.is_empty() {
        println!("Eliminated: {}", dead.join(", "));
    }
    print_prediction(session, output)
}

pub fn print_history(session: &GameSession, output: Output) -> Result<()> {
    let history = session.battle_history();
    if output.json {
        println!("{}", serde_json::to_string_pretty(history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No fights recorded.");
        return Ok(());
    }
    for (i, entry) in history.iter().enumerate() {
        println!(
            "{:>3}. {:<5} {:<20} {}",
            i + 1,
            entry.round,
            entry.opponent,
            entry.timestamp.format("%H:%M:%S")
        );
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One-line headline for a prediction
pub fn describe_prediction(prediction: &Prediction) -> String {
    match prediction {
        Prediction::Pve => "Monster round (PVE)".to_string(),
        Prediction::Duel { target, .. } => format!("Final duel! Opponent: {}", target),
        Prediction::Victory => "Victory! Every opponent eliminated.".to_string(),
        Prediction::Learning { fought_count, total, .. } => {
            format!("Learning the cycle ({}/{} fought)", fought_count, total)
        }
        Prediction::Predicted { target, .. } => format!("Target locked: {}", target),
    }
}

/// Numbered alive opponents with their badge
fn enemy_lines(prediction: &Prediction) -> Vec<String> {
    let learning = matches!(prediction, Prediction::Learning { .. });
    prediction
        .enemies()
        .iter()
        .enumerate()
        .map(|(i, enemy)| {
            let badge = match (learning, enemy.fought, enemy.is_target) {
                (true, true, _) => "fought",
                (true, false, _) => "not yet",
                (false, _, true) => "TARGET",
                (false, _, false) => "safe",
            };
            format!("{}. {:<20} [{}]", i + 1, enemy.name, badge)
        })
        .collect()
}

fn draw_learning_bar(fought: usize, total: usize) -> Result<()> {
    let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
    bar.set_style(ProgressStyle::with_template("  {msg} [{bar:28}] {pos}/{len}")?.progress_chars("=> "));
    bar.set_message("learning");
    bar.set_position(fought as u64);
    bar.abandon();
    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn format_cycle(session: &GameSession) -> String {
    let view = session.cycle_view();
    if view.is_empty() {
        return "(no data yet)".to_string();
    }
    view.iter()
        .map(|(name, alive)| {
            if *alive {
                name.to_string()
            } else {
                format!("~{}~", name)
            }
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
