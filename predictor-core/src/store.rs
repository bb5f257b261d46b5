//! Session file store
//!
//! The session lives in a single JSON file: the snapshot fields at the top
//! level plus an `undo` list of earlier snapshots, oldest first. A missing or
//! unreadable file means "no previous session".

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::session::{GameSession, SessionConfig};
use crate::snapshot::Snapshot;

#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    snapshot: Snapshot,
    #[serde(default)]
    undo: Vec<Snapshot>,
}

/// Loads and saves a session at a fixed path
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, config: SessionConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, falling back to a fresh one
    pub fn load(&self) -> GameSession {
        match self.try_load() {
            Ok(Some(session)) => session,
            Ok(None) => GameSession::new(self.config.clone()),
            Err(e) => {
                tracing::warn!("Discarding stored session {}: {:#}", self.path.display(), e);
                GameSession::new(self.config.clone())
            }
        }
    }

    /// Load the stored session; `Ok(None)` if there is no file
    pub fn try_load(&self) -> Result<Option<GameSession>> {
        if !self.path.exists() {
            tracing::debug!("No stored session at {}", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_str(&content)
            .with_context(|| format!("Malformed session file {}", self.path.display()))?;
        let session = GameSession::restore(stored.snapshot, stored.undo, self.config.clone())?;

        tracing::debug!(
            "Loaded session from {} at round {}",
            self.path.display(),
            session.round()
        );
        Ok(Some(session))
    }

    /// Write the session, replacing any previous file
    pub fn save(&self, session: &GameSession) -> Result<()> {
        let mut snapshot = session.snapshot();
        snapshot.saved_at = Some(Utc::now());

        let stored = StoredSession {
            snapshot,
            undo: session.undo_entries().cloned().collect(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the stored session if present
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> SessionStore {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "predictor-store-{}-{}.json",
            std::process::id(),
            n
        ));
        let _ = std::fs::remove_file(&path);
        SessionStore::new(path, SessionConfig::default())
    }

    fn played() -> GameSession {
        let mut session = GameSession::default();
        session.start(&["A", "B", "C", "D", "E", "F", "G"]).unwrap();
        session.skip_monster_round().unwrap();
        session.fight("C").unwrap();
        session.fight("A").unwrap();
        session.eliminate("G").unwrap();
        session
    }

    #[test]
    fn test_missing_file_is_fresh_session() {
        let store = temp_store();
        assert!(store.try_load().unwrap().is_none());
        assert!(!store.load().is_started());
    }

    #[test]
    fn test_save_and_load_preserves_state() {
        let store = temp_store();
        let session = played();
        store.save(&session).unwrap();

        let mut loaded = store.load();
        assert_eq!(loaded.snapshot(), session.snapshot());
        assert_eq!(loaded.fought(), ["C", "A"]);
        assert_eq!(loaded.stats().undo_available, 4);

        loaded.undo().unwrap();
        assert!(loaded.roster().is_alive("G"));
        store.clear().unwrap();
    }

    #[test]
    fn test_file_carries_saved_at() {
        let store = temp_store();
        store.save(&played()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(raw["savedAt"].is_string());
        assert!(raw["undo"].is_array());
        assert_eq!(raw["subRound"], 4);
        store.clear().unwrap();
    }

    #[test]
    fn test_malformed_file_is_fresh_session() {
        let store = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.try_load().is_err());
        assert!(!store.load().is_started());
        store.clear().unwrap();
    }

    #[test]
    fn test_snapshot_without_undo_loads() {
        let store = temp_store();
        let snapshot = played().snapshot();
        std::fs::write(store.path(), snapshot.to_json().unwrap()).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.snapshot(), snapshot);
        assert!(!loaded.can_undo());
        store.clear().unwrap();
    }

    #[test]
    fn test_invariant_violation_is_fresh_session() {
        let store = temp_store();
        let mut snapshot = played().snapshot();
        snapshot.cycle.push("Nobody".into());
        std::fs::write(store.path(), snapshot.to_json().unwrap()).unwrap();
        assert!(!store.load().is_started());
        store.clear().unwrap();
    }
}
