//! Memory Match - a card-pairs memory game
//!
//! Core modules:
//! - `sim`: Deterministic round state machine (board, turns, clock, outcome)
//! - `highscores`: Best-score tracking behind a pluggable store
//! - `audio`: Semantic sound cues and Web Audio playback
//! - `renderer`: Presentation contract and view snapshots
//! - `platform`: Browser bindings and the frame driver
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{BestScore, MemoryScoreStore, ScoreStore};
pub use settings::Settings;
pub use sim::{Difficulty, GameError, GameEvent, Phase, RoundController};

/// Game configuration constants
pub mod consts {
    /// How long a non-matching pair stays face-up before flipping back
    pub const SETTLE_DELAY_MS: u64 = 1000;
    /// Countdown clock resolution
    pub const TICK_MS: u64 = 1000;

    /// Points awarded per matched pair
    pub const MATCH_POINTS: u32 = 100;
    /// Win bonus per second left on the clock
    pub const TIME_BONUS_PER_SECOND: u32 = 2;
    /// Win bonus per card beyond the remaining move count
    pub const MOVE_BONUS: u32 = 10;

    /// Largest virtual-time step the frame driver feeds at once
    pub const MAX_FRAME_ADVANCE_MS: u64 = 250;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default card faces, in deal order
    pub const SYMBOLS: [&str; 24] = [
        "🍎", "🍌", "🍊", "🍇", "🍓", "🥝", "🍑", "🍒", //
        "🥭", "🍍", "🥥", "🍉", "🍋", "🫐", "🍈", "🥑", //
        "🌮", "🍕", "🍔", "🌭", "🥨", "🧀", "🥓", "🍖",
    ];
}

/// Format whole seconds as a zero-padded `MM:SS` clock
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(120), "02:00");
        assert_eq!(format_clock(361), "06:01");
    }
}
