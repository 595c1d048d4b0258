//! Presentation contract
//!
//! The round controller hands a fresh `RoundView` to its renderer after every
//! state change. Drawing (DOM, canvas, terminal) is up to the implementation.

pub mod view;

pub use view::{CardView, RoundView, status_text};

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::GameEvent;

/// Receives a snapshot after each mutation, along with the event that caused it
pub trait Renderer {
    fn render(&mut self, view: &RoundView, cause: &GameEvent);
}

/// Shared renderer, so the host can keep a handle after giving it to the controller
impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    fn render(&mut self, view: &RoundView, cause: &GameEvent) {
        self.borrow_mut().render(view, cause);
    }
}

/// Keeps every frame it is given (tests, replays)
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<(GameEvent, RoundView)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RoundView> {
        self.frames.last().map(|(_, view)| view)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &RoundView, cause: &GameEvent) {
        self.frames.push((*cause, view.clone()));
    }
}
