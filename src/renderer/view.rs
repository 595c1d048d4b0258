//! Render snapshots
//!
//! A flattened, serializable copy of what the player should see. Hidden card
//! faces are never included.

use serde::{Deserialize, Serialize};

use crate::format_clock;
use crate::sim::{CardState, Difficulty, LossReason, Phase, Round};

/// One card as the player sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: usize,
    pub state: CardState,
    /// Face symbol, only when face up or matched
    pub symbol: Option<String>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub phase: Phase,
    pub difficulty: Option<Difficulty>,
    pub rows: u32,
    pub cols: u32,
    pub cards: Vec<CardView>,
    pub score: u32,
    pub moves_remaining: u32,
    pub seconds_remaining: u32,
    /// `MM:SS`
    pub clock: String,
    pub best_score: u32,
    pub status: String,
}

impl RoundView {
    /// Difficulty selector, no round in progress
    pub fn idle(best_score: u32) -> Self {
        Self {
            phase: Phase::Idle,
            difficulty: None,
            rows: 0,
            cols: 0,
            cards: Vec::new(),
            score: 0,
            moves_remaining: 0,
            seconds_remaining: 0,
            clock: format_clock(0),
            best_score,
            status: String::new(),
        }
    }

    pub fn from_round(round: &Round, best_score: u32) -> Self {
        let cards = round
            .cards
            .iter()
            .map(|card| CardView {
                id: card.id,
                state: card.state,
                symbol: (card.state != CardState::FaceDown).then(|| card.symbol.clone()),
            })
            .collect();

        Self {
            phase: round.phase,
            difficulty: round.difficulty,
            rows: round.config.rows,
            cols: round.config.cols,
            cards,
            score: round.final_score.unwrap_or(round.score),
            moves_remaining: round.moves_remaining,
            seconds_remaining: round.seconds_remaining,
            clock: format_clock(round.seconds_remaining),
            best_score,
            status: status_text(round),
        }
    }
}

/// Status line shown under the board
pub fn status_text(round: &Round) -> String {
    match round.phase {
        Phase::Idle | Phase::Running => String::new(),
        Phase::Won => {
            let score = round.final_score.unwrap_or(round.score);
            if round.new_high_score {
                format!("🏆 NEW HIGH SCORE: {}! 🏆", score)
            } else {
                format!("🎉 You Won! Final Score: {}", score)
            }
        }
        Phase::Lost(LossReason::TimeUp) => "⏰ Time's up! You lost. Try again!".to_string(),
        Phase::Lost(LossReason::MovesExhausted) => {
            "🚫 You have run out of moves! Retry again!".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Card, RoundConfig};

    fn round() -> Round {
        let mut cards: Vec<Card> = ["A", "A", "B", "B"]
            .iter()
            .enumerate()
            .map(|(id, s)| Card::new(id, *s))
            .collect();
        cards[0].state = CardState::FaceUp;
        cards[2].state = CardState::Matched;
        cards[3].state = CardState::Matched;
        let mut round = Round::new(None, RoundConfig::new(2, 2, 75, 4), 1, cards);
        round.phase = Phase::Running;
        round
    }

    #[test]
    fn test_hidden_faces_are_not_exposed() {
        let view = RoundView::from_round(&round(), 0);
        let symbols: Vec<Option<&str>> = view.cards.iter().map(|c| c.symbol.as_deref()).collect();
        assert_eq!(symbols, vec![Some("A"), None, Some("B"), Some("B")]);
        assert_eq!(view.clock, "01:15");
        assert_eq!(view.status, "");
    }

    #[test]
    fn test_status_lines() {
        let mut round = round();
        round.phase = Phase::Won;
        round.final_score = Some(1234);
        assert_eq!(status_text(&round), "🎉 You Won! Final Score: 1234");

        round.new_high_score = true;
        assert_eq!(status_text(&round), "🏆 NEW HIGH SCORE: 1234! 🏆");

        round.phase = Phase::Lost(LossReason::TimeUp);
        assert_eq!(status_text(&round), "⏰ Time's up! You lost. Try again!");

        round.phase = Phase::Lost(LossReason::MovesExhausted);
        assert_eq!(status_text(&round), "🚫 You have run out of moves! Retry again!");
    }

    #[test]
    fn test_view_serializes() {
        let view = RoundView::from_round(&round(), 500);
        let json = serde_json::to_string(&view).unwrap();
        let back: RoundView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
