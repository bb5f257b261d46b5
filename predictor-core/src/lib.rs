//! Predictor Core - Opponent rotation tracking and prediction
//!
//! This crate provides the state engine behind the predictor:
//! - Round sequencing (stage/sub-round numbering, monster rounds)
//! - Opponent roster with elimination
//! - Cycle inference (learning the round-robin order, then playing it back)
//! - Game session with bounded undo
//! - Snapshot format and session file store

pub mod error;
pub mod round;
pub mod opponent;
pub mod prediction;
pub mod cycle;
pub mod history;
pub mod session;
pub mod snapshot;
pub mod store;

// Re-exports for convenient access
pub use error::SessionError;
pub use round::{RoundCounter, MONSTER_ROUNDS, is_monster_round};
pub use opponent::{Opponent, OpponentStatus, Roster};
pub use prediction::{EnemyStatus, Prediction, PredictionKind};
pub use cycle::{CycleEngine, CycleUpdate};
pub use history::{BattleEntry, UndoStack};
pub use session::{FightOutcome, GameSession, SessionConfig, SessionStats, UndoOutcome};
pub use snapshot::Snapshot;
pub use store::SessionStore;
