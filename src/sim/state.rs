//! Round state and core game types
//!
//! Everything a round needs to be replayed or rendered lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Difficulty presets offered on the selector screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Grid, time limit and move budget for this preset
    pub fn config(&self) -> RoundConfig {
        match self {
            Difficulty::Easy => RoundConfig::new(3, 4, 120, 10),
            Difficulty::Medium => RoundConfig::new(4, 4, 240, 12),
            Difficulty::Hard => RoundConfig::new(4, 6, 360, 14),
        }
    }
}

/// Resolved round parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub rows: u32,
    pub cols: u32,
    pub time_limit_secs: u32,
    pub max_moves: u32,
}

impl RoundConfig {
    pub const fn new(rows: u32, cols: u32, time_limit_secs: u32, max_moves: u32) -> Self {
        Self {
            rows,
            cols,
            time_limit_secs,
            max_moves,
        }
    }

    /// Card count; saturates for grids too large to address
    pub fn total_cards(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }

    pub fn pair_count(&self) -> usize {
        self.total_cards() / 2
    }

    /// Check the grid can be dealt from an alphabet of `alphabet_len` symbols
    pub fn validate(&self, alphabet_len: usize) -> Result<(), GameError> {
        let Some(cards) = (self.rows as usize).checked_mul(self.cols as usize) else {
            return Err(GameError::Configuration(format!(
                "a {}x{} grid is too large",
                self.rows, self.cols
            )));
        };
        if cards == 0 || cards % 2 != 0 {
            return Err(GameError::Configuration(format!(
                "a {}x{} grid cannot be split into pairs",
                self.rows, self.cols
            )));
        }
        if self.pair_count() > alphabet_len {
            return Err(GameError::Configuration(format!(
                "{} pairs requested but only {} symbols available",
                self.pair_count(),
                alphabet_len
            )));
        }
        Ok(())
    }
}

/// Visibility of a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    FaceUp,
    Matched,
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Position in deal order (0..N)
    pub id: usize,
    pub symbol: String,
    pub state: CardState,
}

impl Card {
    pub fn new(id: usize, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            state: CardState::FaceDown,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.state == CardState::Matched
    }
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    TimeUp,
    MovesExhausted,
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phase {
    /// No round in progress (difficulty selector)
    #[default]
    Idle,
    /// Accepting flips, clock running
    Running,
    /// Every pair matched
    Won,
    /// Ran out of time or moves
    Lost(LossReason),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost(_))
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// A single round of play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Preset this round was started from (None for custom grids)
    pub difficulty: Option<Difficulty>,
    pub config: RoundConfig,
    /// Bumped on every start; timers from older generations are dropped
    pub generation: u64,
    pub cards: Vec<Card>,
    pub moves_remaining: u32,
    pub matched_pairs: u32,
    pub score: u32,
    pub seconds_remaining: u32,
    pub phase: Phase,
    /// Score including bonuses, set once the round is won
    pub final_score: Option<u32>,
    pub new_high_score: bool,
}

impl Round {
    pub fn new(
        difficulty: Option<Difficulty>,
        config: RoundConfig,
        generation: u64,
        cards: Vec<Card>,
    ) -> Self {
        Self {
            difficulty,
            config,
            generation,
            cards,
            moves_remaining: config.max_moves,
            matched_pairs: 0,
            score: 0,
            seconds_remaining: config.time_limit_secs,
            phase: Phase::Idle,
            final_score: None,
            new_high_score: false,
        }
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn total_pairs(&self) -> u32 {
        (self.cards.len() / 2) as u32
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn all_matched(&self) -> bool {
        self.matched_pairs == self.total_pairs()
    }

    pub fn card(&self, id: usize) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: usize) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Number of cards currently showing but not yet matched
    pub fn face_up_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.state == CardState::FaceUp)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_fit_default_alphabet() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            assert!(config.validate(crate::consts::SYMBOLS.len()).is_ok());
        }
        assert_eq!(Difficulty::Easy.config(), RoundConfig::new(3, 4, 120, 10));
        assert_eq!(Difficulty::Medium.config(), RoundConfig::new(4, 4, 240, 12));
        assert_eq!(Difficulty::Hard.config(), RoundConfig::new(4, 6, 360, 14));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::from_str("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("expert"), None);
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
    }

    #[test]
    fn test_validate_rejects_bad_grids() {
        assert!(RoundConfig::new(3, 3, 60, 5).validate(24).is_err());
        assert!(RoundConfig::new(0, 4, 60, 5).validate(24).is_err());
        assert!(RoundConfig::new(8, 8, 60, 5).validate(24).is_err());
        assert!(RoundConfig::new(6, 8, 60, 5).validate(24).is_ok());
    }

    #[test]
    fn test_huge_grid_is_configuration_error() {
        let config = RoundConfig::new(u32::MAX, u32::MAX, 60, 5);
        assert!(matches!(
            config.validate(24),
            Err(GameError::Configuration(_))
        ));
        assert!(config.total_cards() > 0);
    }

    #[test]
    fn test_new_round_starts_from_config() {
        let config = Difficulty::Easy.config();
        let round = Round::new(Some(Difficulty::Easy), config, 1, Vec::new());
        assert_eq!(round.moves_remaining, 10);
        assert_eq!(round.seconds_remaining, 120);
        assert_eq!(round.phase, Phase::Idle);
        assert!(!Phase::Running.is_terminal());
        assert!(Phase::Lost(LossReason::TimeUp).is_terminal());
    }
}
