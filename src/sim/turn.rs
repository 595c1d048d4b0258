//! Turn resolution
//!
//! Tracks the (at most two) face-up cards of the current turn, spends a move
//! when the second card lands, and either matches the pair or schedules it to
//! flip back after the settle delay.

use super::error::InvalidAction;
use super::event::{EventSink, GameEvent};
use super::scheduler::{Scheduler, Timer, TimerId};
use super::state::{CardState, Round};
use crate::consts::{MATCH_POINTS, SETTLE_DELAY_MS};

/// Cards per turn
pub const TURN_SIZE: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct TurnEngine {
    /// Face-up, unresolved card ids in flip order
    pending: Vec<usize>,
    /// Outstanding flip-back for a non-matching pair
    settle_timer: Option<TimerId>,
}

impl TurnEngine {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(TURN_SIZE),
            settle_timer: None,
        }
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    /// A non-matching pair is waiting to flip back
    pub fn is_settling(&self) -> bool {
        self.settle_timer.is_some()
    }

    /// Turn a card face up. Refusals leave the round untouched and emit nothing.
    pub fn flip(
        &mut self,
        round: &mut Round,
        card_id: usize,
        scheduler: &mut Scheduler,
        events: &mut impl EventSink,
    ) -> Result<(), InvalidAction> {
        if !round.is_running() {
            return Err(InvalidAction::NotRunning);
        }
        if self.pending.len() >= TURN_SIZE {
            return Err(InvalidAction::TurnPending);
        }
        let card = round
            .card_mut(card_id)
            .ok_or(InvalidAction::UnknownCard(card_id))?;
        match card.state {
            CardState::Matched => return Err(InvalidAction::AlreadyMatched(card_id)),
            CardState::FaceUp => return Err(InvalidAction::AlreadyFaceUp(card_id)),
            CardState::FaceDown => card.state = CardState::FaceUp,
        }

        self.pending.push(card_id);
        events.emit(round, GameEvent::Flip { card: card_id });

        if self.pending.len() == TURN_SIZE {
            self.resolve(round, scheduler, events);
        }
        Ok(())
    }

    /// Spend a move and compare the two pending cards
    fn resolve(&mut self, round: &mut Round, scheduler: &mut Scheduler, events: &mut impl EventSink) {
        let (first, second) = (self.pending[0], self.pending[1]);

        round.moves_remaining = round.moves_remaining.saturating_sub(1);
        events.emit(round, GameEvent::TurnCompleted { first, second });

        let is_match = match (round.card(first), round.card(second)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => false,
        };

        if is_match {
            for id in [first, second] {
                if let Some(card) = round.card_mut(id) {
                    card.state = CardState::Matched;
                }
            }
            round.matched_pairs += 1;
            round.score += MATCH_POINTS;
            events.emit(round, GameEvent::Match { first, second });
            self.pending.clear();
        } else {
            let timer = Timer::Settle {
                generation: round.generation,
            };
            self.settle_timer = Some(scheduler.schedule(SETTLE_DELAY_MS, timer));
            events.emit(round, GameEvent::NoMatch { first, second });
        }
    }

    /// The settle delay elapsed: flip the non-matching pair back down.
    ///
    /// Returns false if there was nothing to settle.
    pub fn settle(&mut self, round: &mut Round, events: &mut impl EventSink) -> bool {
        if self.settle_timer.take().is_none() || self.pending.len() != TURN_SIZE {
            return false;
        }
        let (first, second) = (self.pending[0], self.pending[1]);
        for id in [first, second] {
            if let Some(card) = round.card_mut(id) {
                if card.state == CardState::FaceUp {
                    card.state = CardState::FaceDown;
                }
            }
        }
        self.pending.clear();
        events.emit(round, GameEvent::Settled { first, second });
        true
    }

    /// Drop the current turn, forcing any face-up cards back down immediately
    pub fn abandon(
        &mut self,
        round: &mut Round,
        scheduler: &mut Scheduler,
        events: &mut impl EventSink,
    ) {
        if let Some(id) = self.settle_timer.take() {
            scheduler.cancel(id);
        }
        for &id in &self.pending {
            if let Some(card) = round.card_mut(id) {
                if card.state == CardState::FaceUp {
                    card.state = CardState::FaceDown;
                }
            }
        }
        if let Some(&first) = self.pending.first() {
            events.emit(
                round,
                GameEvent::Reverted {
                    first,
                    second: self.pending.get(1).copied(),
                },
            );
        }
        self.pending.clear();
    }

    /// Forget all turn state (new round)
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.settle_timer.take() {
            scheduler.cancel(id);
        }
        self.pending.clear();
    }
}
