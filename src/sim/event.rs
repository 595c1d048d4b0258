//! Typed events emitted by the round engines
//!
//! Engines emit events as they mutate the round; the controller routes them to
//! the outcome evaluator, then to the renderer and audio collaborators.

use serde::{Deserialize, Serialize};

use super::state::{Difficulty, Phase, Round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh round was dealt and the clock started
    RoundStarted {
        generation: u64,
        difficulty: Option<Difficulty>,
    },
    /// A card was turned face up
    Flip { card: usize },
    /// Second card of a turn flipped; a move was spent
    TurnCompleted { first: usize, second: usize },
    /// The turn's cards share a symbol
    Match { first: usize, second: usize },
    /// The turn's cards differ; they flip back after the settle delay
    NoMatch { first: usize, second: usize },
    /// A non-matching pair flipped back; new flips are accepted again
    Settled { first: usize, second: usize },
    /// Cards forced face down when a turn was abandoned
    Reverted { first: usize, second: Option<usize> },
    /// One clock second elapsed
    Tick { seconds_remaining: u32 },
    /// The clock ran out
    Expired,
    /// Round lifecycle moved
    PhaseChanged { phase: Phase },
    /// Final score beat the stored best score
    NewHighScore { score: u32 },
    /// The round was dropped and the selector shown
    ReturnedToMenu,
}

/// Receives each event right after the change it describes
pub trait EventSink {
    fn emit(&mut self, round: &Round, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, _round: &Round, event: GameEvent) {
        self.push(event);
    }
}
