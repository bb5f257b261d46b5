//! Battle log and undo stack

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One recorded PVP fight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEntry {
    /// Round id, `stage-subRound`
    pub round: String,
    pub opponent: String,
    pub timestamp: DateTime<Utc>,
}

impl BattleEntry {
    pub fn now(round: impl Into<String>, opponent: impl Into<String>) -> Self {
        Self {
            round: round.into(),
            opponent: opponent.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded stack of full state copies; the oldest entry is evicted when full
#[derive(Clone, Debug)]
pub struct UndoStack<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> UndoStack<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuild from oldest-first entries, keeping the newest `capacity`
    pub fn from_entries(capacity: usize, entries: Vec<T>) -> Self {
        let mut stack = Self::new(capacity);
        for entry in entries {
            stack.push(entry);
        }
        stack
    }

    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_is_lifo() {
        let mut stack = UndoStack::new(10);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut stack = UndoStack::new(3);
        for i in 0..5 {
            stack.push(i);
        }
        assert_eq!(stack.len(), stack.capacity());
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_from_entries_keeps_newest() {
        let stack = UndoStack::from_entries(2, vec!["a", "b", "c"]);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_battle_entry_timestamp_is_rfc3339() {
        let entry = BattleEntry::now("1-2", "A");
        let json = serde_json::to_value(&entry).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.parse::<DateTime<Utc>>().is_ok());
        assert_eq!(json["round"], "1-2");
    }
}
