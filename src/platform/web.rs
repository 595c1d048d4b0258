//! Browser bindings
//!
//! The page script owns the DOM. It creates a `WebGame`, forwards clicks, and
//! calls `frame` from `requestAnimationFrame`. Every state change comes back
//! through the render callback as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::FrameDriver;
use crate::audio::{AudioCue, AudioManager, AudioSink};
use crate::highscores::LocalStorageScoreStore;
use crate::renderer::{Renderer, RoundView};
use crate::settings::Settings;
use crate::sim::{Difficulty, GameEvent, RoundController};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        log::debug!("Keeping existing logger: {}", err);
    }
    log::info!("Memory Match loaded");
}

/// Calls a JS function with `(viewJson, eventJson)`
struct JsRenderer {
    callback: js_sys::Function,
}

impl Renderer for JsRenderer {
    fn render(&mut self, view: &RoundView, cause: &GameEvent) {
        let (Ok(view), Ok(cause)) = (serde_json::to_string(view), serde_json::to_string(cause))
        else {
            log::warn!("Failed to serialize frame");
            return;
        };
        if let Err(err) = self.callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(&view),
            &JsValue::from_str(&cause),
        ) {
            log::warn!("Render callback failed: {:?}", err);
        }
    }
}

/// JavaScript handle to one game session
#[wasm_bindgen]
pub struct WebGame {
    controller: RoundController,
    driver: FrameDriver,
    audio: Rc<RefCell<AudioManager>>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// `on_render(viewJson, eventJson)` is invoked after every state change
    #[wasm_bindgen(constructor)]
    pub fn new(on_render: js_sys::Function) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();

        let audio = Rc::new(RefCell::new(AudioManager::new()));
        audio.borrow_mut().apply(&settings);

        let controller = RoundController::new(seed, Box::new(LocalStorageScoreStore))
            .with_renderer(JsRenderer {
                callback: on_render,
            })
            .with_audio(audio.clone());

        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            controller,
            driver: FrameDriver::new(),
            audio,
            settings,
        }
    }

    /// Start a round: "easy", "medium" or "hard"
    pub fn start(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty = Difficulty::from_str(difficulty)
            .ok_or_else(|| JsValue::from_str(&format!("unknown difficulty {:?}", difficulty)))?;
        self.controller
            .start_round(difficulty)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.settings.difficulty = Some(difficulty);
        self.settings.save();
        Ok(())
    }

    /// Re-deal the current difficulty
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.controller
            .restart()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Back to the difficulty selector
    pub fn menu(&mut self) {
        self.controller.return_to_menu();
    }

    /// Returns false when the flip was ignored
    pub fn flip(&mut self, card: usize) -> bool {
        self.controller.flip(card).is_ok()
    }

    /// Feed a `requestAnimationFrame` timestamp
    pub fn frame(&mut self, now_ms: f64) {
        self.driver.drive(&mut self.controller, now_ms);
        self.controller.take_events();
    }

    /// Flip the sound setting; returns true when sound is now on
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        let mut audio = self.audio.borrow_mut();
        audio.apply(&self.settings);
        if enabled {
            audio.play(AudioCue::Click);
        } else {
            audio.switch_off_blip(self.settings.volume);
        }
        self.settings.save();
        enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    /// Set cue volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
        self.audio.borrow_mut().apply(&self.settings);
        self.settings.save();
    }

    pub fn volume(&self) -> f32 {
        self.settings.volume
    }

    /// Difficulty picked last session, if any
    pub fn last_difficulty(&self) -> Option<String> {
        self.settings.difficulty.map(|d| d.as_str().to_string())
    }

    pub fn best_score(&self) -> u32 {
        self.controller.best_score()
    }

    /// Current view as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.controller.snapshot()).unwrap_or_default()
    }
}
