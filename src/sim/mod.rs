//! Deterministic round simulation
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Virtual time only (no wall clock, no real timers)
//! - No rendering, audio or storage dependencies beyond the collaborator traits

pub mod board;
pub mod clock;
pub mod controller;
pub mod error;
pub mod event;
pub mod outcome;
pub mod scheduler;
pub mod state;
pub mod turn;

pub use board::BoardGenerator;
pub use clock::ClockEngine;
pub use controller::RoundController;
pub use error::{GameError, InvalidAction};
pub use event::{EventSink, GameEvent};
pub use outcome::{OutcomeEvaluator, Verdict, final_score};
pub use scheduler::{Scheduler, Timer, TimerId};
pub use state::{Card, CardState, Difficulty, LossReason, Phase, RngState, Round, RoundConfig};
pub use turn::TurnEngine;
