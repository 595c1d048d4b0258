//! Error types for round setup and player actions

use thiserror::Error;

/// Errors surfaced to whoever starts a round
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The requested grid cannot be dealt from the symbol alphabet
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Restart requested before any round was started
    #[error("no difficulty selected")]
    NoDifficulty,
}

/// Why a flip was refused. Callers are expected to ignore these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("round is not running")]
    NotRunning,
    #[error("card {0} does not exist")]
    UnknownCard(usize),
    #[error("card {0} is already matched")]
    AlreadyMatched(usize),
    #[error("card {0} is already face up")]
    AlreadyFaceUp(usize),
    #[error("a turn is still being resolved")]
    TurnPending,
}
