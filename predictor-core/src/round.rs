//! Round sequencing
//!
//! Rounds are numbered `stage-subRound`. Stage 1 has 4 sub-rounds, every
//! later stage has 6.

use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Rounds with no PVP opponent (creep/monster waves)
pub const MONSTER_ROUNDS: [&str; 5] = ["1-1", "2-3", "3-3", "4-3", "5-3"];

/// Sub-rounds in the opening stage
const OPENING_STAGE_LEN: u32 = 4;

/// Sub-rounds in every stage after the first
const STAGE_LEN: u32 = 6;

/// Check a `stage-subRound` id against the monster round list
pub fn is_monster_round(round_id: &str) -> bool {
    MONSTER_ROUNDS.contains(&round_id)
}

// ============================================================================
// ROUND COUNTER
// ============================================================================

/// Current stage and sub-round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundCounter {
    stage: u32,
    sub_round: u32,
}

impl RoundCounter {
    /// Counter at round 1-1
    pub fn new() -> Self {
        Self { stage: 1, sub_round: 1 }
    }

    /// Build a counter from stored parts, rejecting out-of-range values
    pub fn from_parts(stage: u32, sub_round: u32) -> Option<Self> {
        let counter = Self { stage, sub_round };
        counter.is_valid().then_some(counter)
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn sub_round(&self) -> u32 {
        self.sub_round
    }

    /// Formatted `stage-subRound` id
    pub fn round_id(&self) -> String {
        self.to_string()
    }

    pub fn is_monster_round(&self) -> bool {
        is_monster_round(&self.round_id())
    }

    /// Move to the next sub-round, rolling over into the next stage
    pub fn advance(&mut self) {
        self.sub_round += 1;
        if self.sub_round > Self::stage_len(self.stage) {
            self.sub_round = 1;
            self.stage += 1;
        }
    }

    fn stage_len(stage: u32) -> u32 {
        if stage == 1 {
            OPENING_STAGE_LEN
        } else {
            STAGE_LEN
        }
    }

    fn is_valid(&self) -> bool {
        self.stage >= 1 && self.sub_round >= 1 && self.sub_round <= Self::stage_len(self.stage)
    }
}

impl Default for RoundCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoundCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stage, self.sub_round)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<String> {
        let mut counter = RoundCounter::new();
        let mut out = vec![counter.round_id()];
        for _ in 1..count {
            counter.advance();
            out.push(counter.round_id());
        }
        out
    }

    #[test]
    fn test_starts_at_one_one() {
        let counter = RoundCounter::new();
        assert_eq!(counter.round_id(), "1-1");
        assert!(counter.is_monster_round());
    }

    #[test]
    fn test_opening_stage_has_four_sub_rounds() {
        assert_eq!(ids(6), vec!["1-1", "1-2", "1-3", "1-4", "2-1", "2-2"]);
    }

    #[test]
    fn test_later_stages_have_six_sub_rounds() {
        let seq = ids(4 + 6 + 2);
        assert_eq!(seq[4], "2-1");
        assert_eq!(seq[9], "2-6");
        assert_eq!(seq[10], "3-1");
        assert_eq!(seq[11], "3-2");
    }

    #[test]
    fn test_monster_rounds() {
        for id in ["1-1", "2-3", "3-3", "4-3", "5-3"] {
            assert!(is_monster_round(id), "{id} should be a monster round");
        }
        for id in ["1-2", "2-1", "6-3", "3-4", "11"] {
            assert!(!is_monster_round(id), "{id} should be a PVP round");
        }
    }

    #[test]
    fn test_from_parts_enforces_modulus() {
        assert!(RoundCounter::from_parts(1, 4).is_some());
        assert!(RoundCounter::from_parts(1, 5).is_none());
        assert!(RoundCounter::from_parts(2, 6).is_some());
        assert!(RoundCounter::from_parts(2, 7).is_none());
        assert!(RoundCounter::from_parts(0, 1).is_none());
        assert!(RoundCounter::from_parts(3, 0).is_none());
    }

    #[test]
    fn test_advance_keeps_invariant() {
        let mut counter = RoundCounter::new();
        for _ in 0..200 {
            counter.advance();
            assert!(RoundCounter::from_parts(counter.stage(), counter.sub_round()).is_some());
        }
    }
}
