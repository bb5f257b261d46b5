//! Event commands - apply one event to the stored session
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load session, apply_event(), save session, report
//! - Level 3: (delegated to predictor-core GameSession)
//! - Level 4: message formatting

use std::path::Path;

use anyhow::{Context, Result};

use predictor_core::{GameSession, SessionConfig, SessionStore, UndoOutcome};

use crate::report::{self, Output};

/// One user action
#[derive(Clone, Debug)]
pub enum Event {
    Start(Vec<String>),
    Fight(String),
    Eliminate(String),
    Skip,
    Undo,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run an event command
///
/// 1. Load the stored session (fresh if missing or unreadable)
/// 2. Apply the event
/// 3. Save and print the new prediction
pub fn run(session_path: &Path, event: Event, output: Output) -> Result<()> {
    let store = SessionStore::new(session_path, SessionConfig::default());
    let mut session = store.load();

    let message = apply_event(&mut session, event)?;
    store.save(&session)?;

    report::print_event(&session, &message, output)
}

/// Delete the stored session
pub fn reset(session_path: &Path) -> Result<()> {
    let store = SessionStore::new(session_path, SessionConfig::default());
    store.clear()?;
    tracing::info!("Session reset: {}", session_path.display());
    println!("Game reset.");
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Apply an event and describe what happened
pub fn apply_event(session: &mut GameSession, event: Event) -> Result<String> {
    match event {
        Event::Start(names) => {
            let names = if names.is_empty() {
                vec![String::new(); session.config().roster_size]
            } else {
                names
            };
            session.start(names.as_slice()).context("Cannot start game")?;
            let roster: Vec<&str> = session.roster().iter().map(|o| o.name.as_str()).collect();
            Ok(format!("Game started against {}.", roster.join(", ")))
        }
        Event::Fight(key) => {
            let name = session.resolve(&key).context("Cannot record fight")?;
            let outcome = session.fight(&name).context("Cannot record fight")?;
            let mut message = if outcome.recorded {
                format!("Fought {} in round {}.", name, outcome.round)
            } else {
                format!("Round {} was a monster round; cycle unchanged.", outcome.round)
            };
            if outcome.cycle_completed {
                message.push_str(" Cycle complete, predictions active!");
            } else if outcome.entered_prediction {
                message.push_str(" Prediction active!");
            }
            Ok(message)
        }
        Event::Eliminate(key) => {
            let name = session.resolve(&key).context("Cannot eliminate")?;
            if session.eliminate(&name).context("Cannot eliminate")? {
                Ok(format!("{} eliminated.", name))
            } else {
                Ok(format!("{} was already eliminated.", name))
            }
        }
        Event::Skip => {
            let round = session.round().round_id();
            session.skip_monster_round().context("Cannot skip round")?;
            Ok(format!("Skipped round {}.", round))
        }
        Event::Undo => match session.undo()? {
            UndoOutcome::Restored => Ok("Last action undone.".to_string()),
            UndoOutcome::Empty => Ok("Nothing to undo.".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predictor_core::SessionError;

    fn started() -> GameSession {
        let mut session = GameSession::default();
        apply_event(&mut session, Event::Start(vec![])).unwrap();
        session
    }

    #[test]
    fn test_start_without_names_uses_defaults() {
        let session = started();
        assert_eq!(session.roster().len(), 7);
        assert!(session.roster().contains("Enemy 1"));
        assert!(session.roster().contains("Enemy 7"));
    }

    #[test]
    fn test_fight_by_index() {
        let mut session = started();
        apply_event(&mut session, Event::Skip).unwrap();
        let message = apply_event(&mut session, Event::Fight("3".into())).unwrap();
        assert_eq!(message, "Fought Enemy 3 in round 1-2.");
        assert_eq!(session.cycle(), ["Enemy 3"]);
    }

    #[test]
    fn test_events_before_start_report_no_game() {
        let mut session = GameSession::default();
        for event in [Event::Fight("E1".into()), Event::Eliminate("1".into()), Event::Skip] {
            let err = apply_event(&mut session, event).unwrap_err();
            assert_eq!(
                err.downcast_ref::<SessionError>(),
                Some(&SessionError::NotStarted)
            );
        }
        assert!(!session.is_started());
    }

    #[test]
    fn test_unknown_opponent_is_error() {
        let mut session = started();
        assert!(apply_event(&mut session, Event::Eliminate("Nobody".into())).is_err());
    }

    #[test]
    fn test_undo_messages() {
        let mut session = started();
        assert_eq!(apply_event(&mut session, Event::Undo).unwrap(), "Nothing to undo.");
        apply_event(&mut session, Event::Skip).unwrap();
        assert_eq!(apply_event(&mut session, Event::Undo).unwrap(), "Last action undone.");
    }
}
