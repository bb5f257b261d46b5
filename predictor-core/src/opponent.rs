//! Opponents and the roster

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Whether an opponent is still in the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentStatus {
    Alive,
    Dead,
}

/// A single opponent in the lobby
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub name: String,
    pub status: OpponentStatus,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl Opponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: OpponentStatus::Alive,
            wins: 0,
            losses: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == OpponentStatus::Alive
    }
}

/// Opponents in entry order
///
/// The order is the order names were entered at start and never changes;
/// alive views and shortcut indices follow it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    opponents: Vec<Opponent>,
}

impl Roster {
    /// Build a roster from entered names.
    ///
    /// Names are trimmed; a blank name in slot `i` becomes `"Enemy i"`.
    pub fn from_names<S: AsRef<str>>(names: &[S], expected: usize) -> Result<Self, SessionError> {
        if names.len() != expected {
            return Err(SessionError::RosterSize {
                expected,
                found: names.len(),
            });
        }

        let opponents: Vec<Opponent> = names
            .iter()
            .enumerate()
            .map(|(i, raw)| match raw.as_ref().trim() {
                "" => Opponent::new(format!("Enemy {}", i + 1)),
                name => Opponent::new(name),
            })
            .collect();

        Self::from_opponents(opponents)
    }

    /// Wrap an existing opponent list, rejecting duplicate names
    pub fn from_opponents(opponents: Vec<Opponent>) -> Result<Self, SessionError> {
        let mut seen = FxHashSet::default();
        for opponent in &opponents {
            if !seen.insert(opponent.name.as_str()) {
                return Err(SessionError::DuplicateName(opponent.name.clone()));
            }
        }
        Ok(Self { opponents })
    }

    pub fn len(&self) -> usize {
        self.opponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opponents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opponent> + '_ {
        self.opponents.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Opponent> {
        self.opponents.iter().find(|o| o.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_alive(&self, name: &str) -> bool {
        self.get(name).is_some_and(Opponent::is_alive)
    }

    /// Alive opponents in entry order
    pub fn alive(&self) -> impl Iterator<Item = &Opponent> + '_ {
        self.opponents.iter().filter(|o| o.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn dead(&self) -> impl Iterator<Item = &Opponent> + '_ {
        self.opponents.iter().filter(|o| !o.is_alive())
    }

    /// The n-th alive opponent, counting from 1
    pub fn alive_by_index(&self, index: usize) -> Option<&Opponent> {
        index.checked_sub(1).and_then(|i| self.alive().nth(i))
    }

    /// Mark an opponent dead.
    ///
    /// Returns `Ok(false)` if they were already dead.
    pub fn eliminate(&mut self, name: &str) -> Result<bool, SessionError> {
        let opponent = self
            .opponents
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| SessionError::UnknownOpponent(name.to_string()))?;

        if opponent.status == OpponentStatus::Dead {
            return Ok(false);
        }
        opponent.status = OpponentStatus::Dead;
        Ok(true)
    }
}
