//! Round termination rules and final scoring

use super::event::GameEvent;
use super::state::{LossReason, Round};
use crate::consts::{MOVE_BONUS, TIME_BONUS_PER_SECOND};

/// A decision to end the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Won { final_score: u32 },
    Lost(LossReason),
}

/// Watches engine events and decides when a running round ends
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeEvaluator;

impl OutcomeEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Inspect one event against the already-updated round.
    ///
    /// `settling` is true while a non-matching pair waits to flip back; a
    /// moves-exhausted loss is held until that pair has settled.
    pub fn observe(&self, event: &GameEvent, round: &Round, settling: bool) -> Option<Verdict> {
        if !round.is_running() {
            return None;
        }
        match event {
            GameEvent::Match { .. } if round.all_matched() => Some(Verdict::Won {
                final_score: final_score(round),
            }),
            GameEvent::TurnCompleted { .. } if !settling => self.moves_exhausted(round),
            GameEvent::Settled { .. } => self.moves_exhausted(round),
            GameEvent::Expired => Some(Verdict::Lost(LossReason::TimeUp)),
            _ => None,
        }
    }

    fn moves_exhausted(&self, round: &Round) -> Option<Verdict> {
        (round.moves_remaining == 0 && !round.all_matched())
            .then_some(Verdict::Lost(LossReason::MovesExhausted))
    }
}

/// Score plus the time bonus and the move bonus
pub fn final_score(round: &Round) -> u32 {
    let time_bonus = round.seconds_remaining.saturating_mul(TIME_BONUS_PER_SECOND);
    let unused = (round.total_cards() as u32).saturating_sub(round.moves_remaining);
    let move_bonus = unused.saturating_mul(MOVE_BONUS);
    round
        .score
        .saturating_add(time_bonus)
        .saturating_add(move_bonus)
}
