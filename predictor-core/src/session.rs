//! Game session
//!
//! Owns all core state and is the only thing that mutates it. Every
//! mutating event first pushes a full snapshot onto a bounded undo stack.
//!
//! Event contract:
//! - `fight` records the fight in the cycle, then advances the round
//! - `eliminate` never advances the round
//! - `skip_monster_round` advances the round and records nothing

use crate::cycle::{CycleEngine, CycleUpdate};
use crate::error::SessionError;
use crate::history::{BattleEntry, UndoStack};
use crate::opponent::Roster;
use crate::prediction::{Prediction, PredictionKind};
use crate::round::RoundCounter;
use crate::snapshot::Snapshot;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Session configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Opponents per game
    pub roster_size: usize,
    /// Undo snapshots kept
    pub undo_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            roster_size: 7,
            undo_depth: 10,
        }
    }
}

impl SessionConfig {
    pub fn with_roster_size(mut self, roster_size: usize) -> Self {
        self.roster_size = roster_size;
        self
    }

    pub fn with_undo_depth(mut self, undo_depth: usize) -> Self {
        self.undo_depth = undo_depth;
        self
    }
}

// ============================================================================
// EVENT RESULTS
// ============================================================================

/// What a fight did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FightOutcome {
    /// Round the fight happened in
    pub round: String,
    /// False on monster rounds, where the cycle is untouched
    pub recorded: bool,
    /// This fight filled the cycle
    pub cycle_completed: bool,
    /// Prediction switched from learning to a locked target
    pub entered_prediction: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    /// Nothing to undo
    Empty,
}

/// Summary counters for display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStats {
    pub round: String,
    pub alive: usize,
    pub eliminated: usize,
    pub cycle_len: usize,
    pub undo_available: usize,
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Clone, Debug)]
pub struct GameSession {
    config: SessionConfig,
    started: bool,
    round: RoundCounter,
    roster: Roster,
    engine: CycleEngine,
    history: Vec<BattleEntry>,
    undo: UndoStack<Snapshot>,
}

impl GameSession {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Unstarted session
    pub fn new(config: SessionConfig) -> Self {
        let undo = UndoStack::new(config.undo_depth);
        Self {
            config,
            started: false,
            round: RoundCounter::new(),
            roster: Roster::default(),
            engine: CycleEngine::new(),
            history: Vec::new(),
            undo,
        }
    }

    /// Rebuild a session from a stored snapshot and its undo entries
    /// (oldest first). Undo entries are validated when popped.
    pub fn restore(
        snapshot: Snapshot,
        undo: Vec<Snapshot>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(config);
        session.apply(snapshot)?;
        session.undo = UndoStack::from_entries(session.config.undo_depth, undo);
        Ok(session)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn round(&self) -> &RoundCounter {
        &self.round
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn cycle(&self) -> &[String] {
        self.engine.cycle()
    }

    pub fn fought(&self) -> &[String] {
        self.engine.fought()
    }

    pub fn battle_history(&self) -> &[BattleEntry] {
        &self.history
    }

    /// Undo entries oldest first
    pub fn undo_entries(&self) -> impl Iterator<Item = &Snapshot> + '_ {
        self.undo.iter()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Cycle entries with their alive flag
    pub fn cycle_view(&self) -> Vec<(&str, bool)> {
        self.engine
            .cycle()
            .iter()
            .map(|name| (name.as_str(), self.roster.is_alive(name)))
            .collect()
    }

    pub fn stats(&self) -> SessionStats {
        let alive = self.roster.alive_count();
        SessionStats {
            round: self.round.round_id(),
            alive,
            eliminated: self.roster.len() - alive,
            cycle_len: self.engine.cycle().len(),
            undo_available: self.undo.len(),
        }
    }

    /// Resolve a name or a 1-based index into the alive list
    pub fn resolve(&self, key: &str) -> Result<String, SessionError> {
        self.ensure_started()?;
        if self.roster.contains(key) {
            return Ok(key.to_string());
        }
        key.parse::<usize>()
            .ok()
            .and_then(|index| self.roster.alive_by_index(index))
            .map(|o| o.name.clone())
            .ok_or_else(|| SessionError::UnknownOpponent(key.to_string()))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Prediction for the current round, recomputed on every call
    pub fn predict(&self) -> Prediction {
        self.engine.predict(&self.round, &self.roster)
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Start a new game against the given opponents, discarding all state
    pub fn start<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SessionError> {
        let roster = Roster::from_names(names, self.config.roster_size)?;
        self.reset();
        self.roster = roster;
        self.started = true;
        tracing::info!(opponents = self.roster.len(), "game started");
        Ok(())
    }

    /// Drop back to an unstarted session
    pub fn reset(&mut self) {
        self.started = false;
        self.round = RoundCounter::new();
        self.roster = Roster::default();
        self.engine.reset();
        self.history.clear();
        self.undo.clear();
    }

    /// Record a fight against `name` and advance the round
    pub fn fight(&mut self, name: &str) -> Result<FightOutcome, SessionError> {
        self.ensure_alive(name)?;

        let before = self.predict().kind();
        let round = self.round.round_id();
        self.checkpoint();

        let update = self
            .engine
            .record_fight(name, &self.round, &self.roster, &mut self.history);
        self.round.advance();

        let after = self.predict().kind();
        let (recorded, cycle_completed) = match update {
            CycleUpdate::Skipped => (false, false),
            CycleUpdate::Recorded { completed } => (true, completed),
        };

        Ok(FightOutcome {
            round,
            recorded,
            cycle_completed,
            entered_prediction: before == PredictionKind::Learning
                && after == PredictionKind::Prediction,
        })
    }

    /// Mark `name` eliminated. Returns `Ok(false)` if they already were.
    pub fn eliminate(&mut self, name: &str) -> Result<bool, SessionError> {
        self.ensure_started()?;
        match self.roster.get(name) {
            None => return Err(SessionError::UnknownOpponent(name.to_string())),
            Some(opponent) if !opponent.is_alive() => return Ok(false),
            Some(_) => {}
        }

        self.checkpoint();
        self.engine.record_elimination(&mut self.roster, name)
    }

    /// Advance past a round without recording a fight
    pub fn skip_monster_round(&mut self) -> Result<(), SessionError> {
        self.ensure_started()?;
        if !self.round.is_monster_round() {
            tracing::debug!(round = %self.round, "skipping a PVP round");
        }
        self.checkpoint();
        self.round.advance();
        Ok(())
    }

    /// Restore the state before the last event
    pub fn undo(&mut self) -> Result<UndoOutcome, SessionError> {
        let Some(snapshot) = self.undo.pop() else {
            return Ok(UndoOutcome::Empty);
        };
        self.apply(snapshot)?;
        tracing::debug!(round = %self.round, remaining = self.undo.len(), "undo");
        Ok(UndoOutcome::Restored)
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Independent copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cycle: self.engine.cycle().to_vec(),
            stage: self.round.stage(),
            sub_round: self.round.sub_round(),
            opponents: self.roster.iter().cloned().collect(),
            fought_this_cycle: self.engine.fought().to_vec(),
            battle_history: self.history.clone(),
            started: self.started,
            saved_at: None,
        }
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.undo.push(snapshot);
    }

    /// Replace live state wholesale; the undo stack is left alone
    fn apply(&mut self, snapshot: Snapshot) -> Result<(), SessionError> {
        let parts = snapshot.into_parts(self.config.roster_size)?;
        self.round = parts.round;
        self.roster = parts.roster;
        self.engine = parts.engine;
        self.history = parts.history;
        self.started = parts.started;
        Ok(())
    }

    fn ensure_started(&self) -> Result<(), SessionError> {
        if self.started {
            Ok(())
        } else {
            Err(SessionError::NotStarted)
        }
    }

    fn ensure_alive(&self, name: &str) -> Result<(), SessionError> {
        self.ensure_started()?;
        match self.roster.get(name) {
            None => Err(SessionError::UnknownOpponent(name.to_string())),
            Some(opponent) if !opponent.is_alive() => {
                Err(SessionError::OpponentEliminated(name.to_string()))
            }
            Some(_) => Ok(()),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
