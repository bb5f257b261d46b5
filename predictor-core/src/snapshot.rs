//! Persisted session snapshot
//!
//! The snapshot is the complete core state in a fixed JSON shape. The same
//! type doubles as the undo stack entry, since every entry must be an
//! independent copy of the whole state.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cycle::CycleEngine;
use crate::error::SessionError;
use crate::history::BattleEntry;
use crate::opponent::{Opponent, Roster};
use crate::round::RoundCounter;

/// Full copy of session state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cycle: Vec<String>,
    pub stage: u32,
    pub sub_round: u32,
    pub opponents: Vec<Opponent>,
    pub fought_this_cycle: Vec<String>,
    pub battle_history: Vec<BattleEntry>,
    pub started: bool,
    /// Written by the store, ignored on restore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Validated pieces of a snapshot, ready to become a session
pub(crate) struct SnapshotParts {
    pub round: RoundCounter,
    pub roster: Roster,
    pub engine: CycleEngine,
    pub history: Vec<BattleEntry>,
    pub started: bool,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check session invariants and split into core state
    pub(crate) fn into_parts(self, roster_size: usize) -> Result<SnapshotParts, SessionError> {
        let invalid = |reason: String| -> Result<SnapshotParts, SessionError> {
            Err(SessionError::InvalidSnapshot(reason))
        };

        let round = match RoundCounter::from_parts(self.stage, self.sub_round) {
            Some(round) => round,
            None => return invalid(format!("round {}-{} out of range", self.stage, self.sub_round)),
        };

        if self.started && self.opponents.len() != roster_size {
            return invalid(format!(
                "expected {} opponents, found {}",
                roster_size,
                self.opponents.len()
            ));
        }

        let roster = Roster::from_opponents(self.opponents)
            .map_err(|e| SessionError::InvalidSnapshot(e.to_string()))?;

        let mut seen = FxHashSet::default();
        for name in &self.cycle {
            if !roster.contains(name) {
                return invalid(format!("cycle names unknown opponent {name}"));
            }
            if !seen.insert(name.as_str()) {
                return invalid(format!("cycle repeats {name}"));
            }
        }

        let mut fought = FxHashSet::default();
        for name in &self.fought_this_cycle {
            if !roster.is_alive(name) {
                return invalid(format!("fought set names non-living opponent {name}"));
            }
            if !fought.insert(name.as_str()) {
                return invalid(format!("fought set repeats {name}"));
            }
        }

        Ok(SnapshotParts {
            round,
            roster,
            engine: CycleEngine::from_parts(self.cycle, self.fought_this_cycle),
            history: self.battle_history,
            started: self.started,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::OpponentStatus;

    fn snapshot() -> Snapshot {
        let mut opponents: Vec<Opponent> =
            ["A", "B", "C", "D", "E", "F", "G"].iter().map(|n| Opponent::new(*n)).collect();
        opponents[3].status = OpponentStatus::Dead;
        Snapshot {
            cycle: vec!["A".into(), "D".into()],
            stage: 2,
            sub_round: 5,
            opponents,
            fought_this_cycle: vec!["A".into()],
            battle_history: vec![],
            started: true,
            saved_at: None,
        }
    }

    #[test]
    fn test_field_names() {
        let json = serde_json::to_value(snapshot()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["battleHistory", "cycle", "foughtThisCycle", "opponents", "stage", "started", "subRound"]
        );
        assert_eq!(json["opponents"][3]["status"], "dead");
    }

    #[test]
    fn test_valid_snapshot_splits() {
        let parts = snapshot().into_parts(7).unwrap();
        assert_eq!(parts.round.round_id(), "2-5");
        assert_eq!(parts.engine.cycle(), ["A", "D"]);
        assert_eq!(parts.roster.alive_count(), 6);
        assert!(parts.started);
    }

    #[test]
    fn test_bad_round_rejected() {
        let mut snap = snapshot();
        snap.stage = 1;
        snap.sub_round = 6;
        assert!(matches!(snap.into_parts(7), Err(SessionError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_duplicate_cycle_entry_rejected() {
        let mut snap = snapshot();
        snap.cycle.push("A".into());
        assert!(matches!(snap.into_parts(7), Err(SessionError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_unknown_cycle_entry_rejected() {
        let mut snap = snapshot();
        snap.cycle.push("Z".into());
        assert!(matches!(snap.into_parts(7), Err(SessionError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_dead_fought_entry_rejected() {
        let mut snap = snapshot();
        snap.fought_this_cycle.push("D".into());
        assert!(matches!(snap.into_parts(7), Err(SessionError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let json = r#"{"cycle": [], "stage": 1, "subRound": 1, "opponents": [], "battleHistory": [], "started": false}"#;
        assert!(Snapshot::from_json(json).is_err());
    }
}
