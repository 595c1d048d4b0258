//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame timestamps into virtual milliseconds)
//! - Storage (LocalStorage on web)
//! - The JavaScript-facing game handle

use crate::consts::{MAX_FRAME_ADVANCE_MS, MAX_SUBSTEPS};
use crate::sim::RoundController;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

/// Turns wall-clock frame timestamps into bounded controller advances.
///
/// Elapsed time is fed in steps of at most `MAX_FRAME_ADVANCE_MS`, with at
/// most `MAX_SUBSTEPS` steps per frame; anything beyond that carries over to
/// the next frame so a long-suspended tab catches up gradually.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    last_time_ms: Option<f64>,
    /// Elapsed time not yet handed to the controller
    backlog_ms: f64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last timestamp (after a restart or a pause)
    pub fn reset(&mut self) {
        self.last_time_ms = None;
        self.backlog_ms = 0.0;
    }

    pub fn backlog_ms(&self) -> f64 {
        self.backlog_ms
    }

    /// Record a frame timestamp and return the whole-millisecond steps to run
    pub fn steps(&mut self, now_ms: f64) -> Vec<u64> {
        if let Some(last) = self.last_time_ms {
            // Timestamps can go backwards across tab restores
            self.backlog_ms += (now_ms - last).max(0.0);
        }
        self.last_time_ms = Some(now_ms);

        let mut steps = Vec::new();
        while steps.len() < MAX_SUBSTEPS as usize && self.backlog_ms >= 1.0 {
            let whole = self.backlog_ms.floor() as u64;
            let step = whole.min(MAX_FRAME_ADVANCE_MS);
            self.backlog_ms -= step as f64;
            steps.push(step);
        }
        steps
    }

    /// Advance `controller` to `now_ms`
    pub fn drive(&mut self, controller: &mut RoundController, now_ms: f64) {
        for step in self.steps(now_ms) {
            controller.advance(step);
        }
    }
}
