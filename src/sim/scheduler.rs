//! Virtual-time timer queue
//!
//! Replaces wall-clock timeouts with deadlines in milliseconds. The host (or a
//! test) advances time explicitly, so every delay is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle for a scheduled timer; also its position in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId {
    due_ms: u64,
    seq: u64,
}

impl TimerId {
    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }
}

/// Deferred work owned by the round engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timer {
    /// One countdown second for the given round
    ClockTick { generation: u64 },
    /// Flip a non-matching pair back for the given round
    Settle { generation: u64 },
}

impl Timer {
    pub fn generation(&self) -> u64 {
        match *self {
            Timer::ClockTick { generation } | Timer::Settle { generation } => generation,
        }
    }
}

/// Timers ordered by deadline, then by the order they were scheduled
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.queue.contains_key(&id)
    }

    /// Run `timer` once `delay_ms` of virtual time has passed
    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerId {
        let id = TimerId {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(id, timer);
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(&id).is_some()
    }

    /// Drop every timer belonging to `generation`
    pub fn cancel_generation(&mut self, generation: u64) {
        self.queue.retain(|_, timer| timer.generation() != generation);
    }

    /// Deadline of the earliest timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(TimerId::due_ms)
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to its deadline
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Timer)> {
        let (&id, _) = self.queue.iter().next()?;
        if id.due_ms > until_ms {
            return None;
        }
        let timer = self.queue.remove(&id)?;
        self.now_ms = self.now_ms.max(id.due_ms);
        Some((id, timer))
    }

    /// Move the clock forward once nothing else is due
    pub fn settle_at(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
