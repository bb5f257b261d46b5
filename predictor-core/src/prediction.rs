//! Prediction results
//!
//! A prediction is derived from session state on every query and is never
//! stored.

use serde::Serialize;
use std::fmt;

/// Per-opponent line in a prediction, alive opponents only
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyStatus {
    pub name: String,
    /// Fought during the current learning pass
    pub fought: bool,
    /// This opponent is the predicted next fight
    pub is_target: bool,
}

/// What the next round holds
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Prediction {
    /// Monster round, no PVP opponent
    Pve,
    /// Only one opponent left
    Duel {
        target: String,
        enemies: Vec<EnemyStatus>,
    },
    /// Every opponent eliminated
    Victory,
    /// Cycle not yet known for the current roster size
    Learning {
        fought_count: usize,
        total: usize,
        enemies: Vec<EnemyStatus>,
    },
    /// Cycle known; next opponent is the first alive cycle entry
    #[serde(rename = "PREDICTION")]
    Predicted {
        target: String,
        enemies: Vec<EnemyStatus>,
    },
}

/// Tag of a [`Prediction`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredictionKind {
    Pve,
    Duel,
    Victory,
    Learning,
    Prediction,
}

impl Prediction {
    pub fn kind(&self) -> PredictionKind {
        match self {
            Prediction::Pve => PredictionKind::Pve,
            Prediction::Duel { .. } => PredictionKind::Duel,
            Prediction::Victory => PredictionKind::Victory,
            Prediction::Learning { .. } => PredictionKind::Learning,
            Prediction::Predicted { .. } => PredictionKind::Prediction,
        }
    }

    /// Predicted opponent, if the round has one
    pub fn target(&self) -> Option<&str> {
        match self {
            Prediction::Duel { target, .. } | Prediction::Predicted { target, .. } => {
                Some(target.as_str())
            }
            _ => None,
        }
    }

    /// Alive opponents with their flags (empty for PVE and victory)
    pub fn enemies(&self) -> &[EnemyStatus] {
        match self {
            Prediction::Duel { enemies, .. }
            | Prediction::Learning { enemies, .. }
            | Prediction::Predicted { enemies, .. } => enemies.as_slice(),
            _ => &[],
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PredictionKind::Pve => "PVE",
            PredictionKind::Duel => "DUEL",
            PredictionKind::Victory => "VICTORY",
            PredictionKind::Learning => "LEARNING",
            PredictionKind::Prediction => "PREDICTION",
        };
        f.write_str(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_target() {
        let duel = Prediction::Duel {
            target: "A".into(),
            enemies: vec![EnemyStatus { name: "A".into(), fought: false, is_target: true }],
        };
        assert_eq!(duel.kind(), PredictionKind::Duel);
        assert_eq!(duel.target(), Some("A"));
        assert_eq!(duel.enemies().len(), 1);
        assert_eq!(Prediction::Pve.target(), None);
        assert!(Prediction::Victory.enemies().is_empty());
    }

    #[test]
    fn test_serialized_tag() {
        let p = Prediction::Predicted { target: "B".into(), enemies: vec![] };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["kind"], "PREDICTION");
        assert_eq!(json["target"], "B");

        let json = serde_json::to_value(Prediction::Pve).unwrap();
        assert_eq!(json["kind"], "PVE");
    }
}
