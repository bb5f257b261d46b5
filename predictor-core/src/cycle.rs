//! Cycle inference
//!
//! The game pairs the player with every living opponent once before the
//! order repeats. While the order is unknown we record who has been fought
//! this pass; once every living opponent has appeared, the cycle is frozen
//! and played back. Each fight moves that opponent to the back of the cycle.
//!
//! Eliminated opponents stay in the cycle as placeholders and are skipped
//! when scanning for the next target.

use crate::error::SessionError;
use crate::history::BattleEntry;
use crate::opponent::Roster;
use crate::prediction::{EnemyStatus, Prediction};
use crate::round::RoundCounter;

/// Effect of a fight on the cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleUpdate {
    /// Monster round; the cycle was not touched
    Skipped,
    /// Fight recorded. `completed` is set when this fight filled the cycle
    Recorded { completed: bool },
}

/// Learned opponent order and the current learning pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleEngine {
    cycle: Vec<String>,
    fought: Vec<String>,
}

impl CycleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from stored parts. Invariants are checked by the caller.
    pub fn from_parts(cycle: Vec<String>, fought: Vec<String>) -> Self {
        Self { cycle, fought }
    }

    /// Opponent names in rotation order, dead placeholders included
    pub fn cycle(&self) -> &[String] {
        &self.cycle
    }

    /// Names fought during the current learning pass
    pub fn fought(&self) -> &[String] {
        &self.fought
    }

    pub fn has_fought(&self, name: &str) -> bool {
        self.fought.iter().any(|n| n == name)
    }

    // ========================================================================
    // PREDICTION
    // ========================================================================

    /// Classify the current round and predict the next opponent
    pub fn predict(&self, round: &RoundCounter, roster: &Roster) -> Prediction {
        if round.is_monster_round() {
            return Prediction::Pve;
        }

        let alive: Vec<&str> = roster.alive().map(|o| o.name.as_str()).collect();

        match alive.as_slice() {
            [only] => {
                return Prediction::Duel {
                    target: only.to_string(),
                    enemies: vec![EnemyStatus {
                        name: only.to_string(),
                        fought: false,
                        is_target: true,
                    }],
                }
            }
            [] => return Prediction::Victory,
            _ => {}
        }

        if self.cycle.len() < alive.len() {
            return self.learning(&alive, self.fought.len());
        }

        match self.next_alive(roster) {
            Some(target) => Prediction::Predicted {
                enemies: alive
                    .iter()
                    .map(|&name| EnemyStatus {
                        name: name.to_string(),
                        fought: false,
                        is_target: name == target,
                    })
                    .collect(),
                target: target.to_string(),
            },
            None => {
                // Every cycle entry is dead while the cycle still covers the
                // alive count. Wait for the next fight to extend the cycle.
                tracing::debug!(
                    cycle_len = self.cycle.len(),
                    alive = alive.len(),
                    "no alive opponent in cycle"
                );
                self.learning(&alive, 0)
            }
        }
    }

    fn learning(&self, alive: &[&str], fought_count: usize) -> Prediction {
        Prediction::Learning {
            fought_count,
            total: alive.len(),
            enemies: alive
                .iter()
                .map(|&name| EnemyStatus {
                    name: name.to_string(),
                    fought: fought_count > 0 && self.has_fought(name),
                    is_target: false,
                })
                .collect(),
        }
    }

    /// First cycle entry whose opponent is alive
    fn next_alive<'a>(&'a self, roster: &Roster) -> Option<&'a str> {
        self.cycle
            .iter()
            .map(String::as_str)
            .find(|name| roster.is_alive(name))
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Record a fight against `name` in the current round.
    ///
    /// `name` must be a known opponent. Call exactly once per fight: a second
    /// call rotates the cycle again.
    pub fn record_fight(
        &mut self,
        name: &str,
        round: &RoundCounter,
        roster: &Roster,
        history: &mut Vec<BattleEntry>,
    ) -> CycleUpdate {
        if round.is_monster_round() {
            tracing::debug!(round = %round, opponent = name, "monster round, cycle untouched");
            return CycleUpdate::Skipped;
        }

        if !self.has_fought(name) {
            self.fought.push(name.to_string());
        }
        history.push(BattleEntry::now(round.round_id(), name));

        // Move to back
        if let Some(pos) = self.cycle.iter().position(|n| n == name) {
            self.cycle.remove(pos);
        }
        self.cycle.push(name.to_string());

        let completed = self.cycle.len() == roster.alive_count();
        if completed {
            self.fought.clear();
            tracing::info!(cycle = ?self.cycle, "cycle complete, predictions active");
        }

        tracing::debug!(round = %round, opponent = name, cycle_len = self.cycle.len(), "fight recorded");
        CycleUpdate::Recorded { completed }
    }

    /// Mark `name` dead. The cycle keeps the name as a placeholder.
    ///
    /// Returns `Ok(false)` if the opponent was already dead.
    pub fn record_elimination(&mut self, roster: &mut Roster, name: &str) -> Result<bool, SessionError> {
        let changed = roster.eliminate(name)?;
        self.fought.retain(|n| n != name);
        if changed {
            tracing::info!(opponent = name, alive = roster.alive_count(), "opponent eliminated");
        }
        Ok(changed)
    }

    pub fn reset(&mut self) {
        self.cycle.clear();
        self.fought.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================
