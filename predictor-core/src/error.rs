//! Session error types

/// Errors raised when an event is rejected by the session.
///
/// A rejected event leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session has not been started yet
    #[error("no game in progress; start one first")]
    NotStarted,

    #[error("unknown opponent: {0}")]
    UnknownOpponent(String),

    #[error("opponent already eliminated: {0}")]
    OpponentEliminated(String),

    #[error("expected {expected} opponent names, got {found}")]
    RosterSize { expected: usize, found: usize },

    #[error("duplicate opponent name: {0}")]
    DuplicateName(String),

    /// Stored state violates a session invariant
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
