//! Round countdown clock
//!
//! One scheduler timer per second; the remaining time lives on the round.

use super::event::{EventSink, GameEvent};
use super::scheduler::{Scheduler, Timer, TimerId};
use super::state::Round;
use crate::consts::TICK_MS;

#[derive(Debug, Clone, Default)]
pub struct ClockEngine {
    /// Next pending tick, None when stopped
    next_tick: Option<TimerId>,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Set the round's time and begin counting down
    pub fn start(&mut self, round: &mut Round, seconds: u32, scheduler: &mut Scheduler) {
        self.stop(scheduler);
        round.seconds_remaining = seconds;
        self.schedule_tick(round.generation, scheduler);
    }

    /// Cancel the countdown. Safe to call when already stopped.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.next_tick.take() {
            scheduler.cancel(id);
        }
    }

    /// Handle a fired tick timer
    pub fn tick(&mut self, round: &mut Round, scheduler: &mut Scheduler, events: &mut impl EventSink) {
        if self.next_tick.take().is_none() {
            return;
        }

        round.seconds_remaining = round.seconds_remaining.saturating_sub(1);
        events.emit(
            round,
            GameEvent::Tick {
                seconds_remaining: round.seconds_remaining,
            },
        );

        if round.seconds_remaining == 0 {
            events.emit(round, GameEvent::Expired);
        } else {
            self.schedule_tick(round.generation, scheduler);
        }
    }

    fn schedule_tick(&mut self, generation: u64, scheduler: &mut Scheduler) {
        let id = scheduler.schedule(TICK_MS, Timer::ClockTick { generation });
        self.next_tick = Some(id);
    }
}
