//! Play command - interactive session with short commands
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), command loop
//! - Level 3: parse_command(), handle_command()
//! - Level 4: help text
//!
//! Shortcuts: `1`-`7` fight the n-th alive opponent, `x <n|name>` eliminate,
//! `s` skip a round, `u` undo, `q` quit. An empty line skips a monster round.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use predictor_core::{GameSession, SessionConfig, SessionStore};

use crate::event_cmd::{apply_event, Event};
use crate::report::{self, Output};

const HELP: &str = "\
commands:
  <n>           fight the n-th alive opponent
  f <n|name>    fight an opponent
  x <n|name>    eliminate an opponent
  s             skip the round (empty line on a monster round)
  u             undo
  st            status
  h             fight history
  reset         start a new game
  q             quit";

/// A parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Event(EventKind),
    Status,
    History,
    Help,
    Reset,
    Quit,
    /// Empty line
    Continue,
    Unknown(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum EventKind {
    Fight(String),
    Eliminate(String),
    Skip,
    Undo,
}

impl EventKind {
    fn into_event(self) -> Event {
        match self {
            EventKind::Fight(key) => Event::Fight(key),
            EventKind::Eliminate(key) => Event::Eliminate(key),
            EventKind::Skip => Event::Skip,
            EventKind::Undo => Event::Undo,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the interactive loop until `q` or end of input
pub fn run(session_path: &Path, output: Output) -> Result<()> {
    let store = SessionStore::new(session_path, SessionConfig::default());
    let mut session = store.load();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if session.is_started() {
        println!("Previous session restored.");
    } else if !setup_game(&mut session, &mut lines)? {
        return Ok(());
    }
    store.save(&session)?;
    report::print_status(&session, output)?;

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_command(&line) {
            Command::Quit => break,
            Command::Reset => {
                session.reset();
                store.clear()?;
                if !setup_game(&mut session, &mut lines)? {
                    break;
                }
                store.save(&session)?;
                report::print_status(&session, output)?;
            }
            command => {
                handle_command(&mut session, command, output)?;
                store.save(&session)?;
            }
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Prompt for the opponent names. Returns false if input ended.
fn setup_game<B: BufRead>(session: &mut GameSession, lines: &mut io::Lines<B>) -> Result<bool> {
    let roster_size = session.config().roster_size;
    println!("Enter {} opponent names (empty for a default name).", roster_size);

    loop {
        let mut names = Vec::with_capacity(roster_size);
        for i in 1..=roster_size {
            print!("Opponent #{}: ", i);
            io::stdout().flush()?;
            match lines.next() {
                Some(line) => names.push(line?),
                None => return Ok(false),
            }
        }

        match apply_event(session, Event::Start(names)) {
            Ok(message) => {
                println!("{}", message);
                return Ok(true);
            }
            Err(e) => println!("{:#}. Try again.", e),
        }
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match (head, rest) {
        ("", _) => Command::Continue,
        ("q" | "quit", _) => Command::Quit,
        ("s" | "skip", _) => Command::Event(EventKind::Skip),
        ("u" | "undo", _) => Command::Event(EventKind::Undo),
        ("st" | "status", _) => Command::Status,
        ("h" | "history", _) => Command::History,
        ("?" | "help", _) => Command::Help,
        ("reset", _) => Command::Reset,
        ("f" | "fight", key) if !key.is_empty() => Command::Event(EventKind::Fight(key.to_string())),
        ("x" | "eliminate", key) if !key.is_empty() => {
            Command::Event(EventKind::Eliminate(key.to_string()))
        }
        (digits, "") if digits.chars().all(|c| c.is_ascii_digit()) => {
            Command::Event(EventKind::Fight(digits.to_string()))
        }
        _ => Command::Unknown(line.to_string()),
    }
}

fn handle_command(session: &mut GameSession, command: Command, output: Output) -> Result<()> {
    match command {
        Command::Event(kind) => match apply_event(session, kind.into_event()) {
            Ok(message) => report::print_event(session, &message, output)?,
            Err(e) => println!("{:#}", e),
        },
        Command::Continue => {
            if session.round().is_monster_round() {
                let message = apply_event(session, Event::Skip)?;
                report::print_event(session, &message, output)?;
            } else {
                report::print_prediction(session, output)?;
            }
        }
        Command::Status => report::print_status(session, output)?,
        Command::History => report::print_history(session, output)?,
        Command::Help => println!("{}", HELP),
        Command::Unknown(line) => println!("Unknown command: {} (? for help)", line),
        Command::Reset | Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shortcuts() {
        assert_eq!(parse_command("3"), Command::Event(EventKind::Fight("3".into())));
        assert_eq!(parse_command("  s "), Command::Event(EventKind::Skip));
        assert_eq!(parse_command("u"), Command::Event(EventKind::Undo));
        assert_eq!(parse_command(""), Command::Continue);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_parse_named_targets() {
        assert_eq!(
            parse_command("f Big Bob"),
            Command::Event(EventKind::Fight("Big Bob".into()))
        );
        assert_eq!(
            parse_command("x 2"),
            Command::Event(EventKind::Eliminate("2".into()))
        );
        assert_eq!(parse_command("f"), Command::Unknown("f".into()));
        assert_eq!(parse_command("dance"), Command::Unknown("dance".into()));
    }

    #[test]
    fn test_empty_line_skips_monster_round() {
        let mut session = GameSession::default();
        apply_event(&mut session, Event::Start(vec![])).unwrap();
        handle_command(&mut session, Command::Continue, Output::default()).unwrap();
        assert_eq!(session.round().round_id(), "1-2");
        handle_command(&mut session, Command::Continue, Output::default()).unwrap();
        assert_eq!(session.round().round_id(), "1-2");
    }

    #[test]
    fn test_setup_reads_names() {
        let input = "A\nB\n\nD\nE\nF\nG\n";
        let mut lines = io::Cursor::new(input).lines();
        let mut session = GameSession::default();
        assert!(setup_game(&mut session, &mut lines).unwrap());
        assert!(session.roster().contains("Enemy 3"));
    }

    #[test]
    fn test_setup_stops_at_end_of_input() {
        let mut lines = io::Cursor::new("A\nB\n").lines();
        let mut session = GameSession::default();
        assert!(!setup_game(&mut session, &mut lines).unwrap());
        assert!(!session.is_started());
    }
}
