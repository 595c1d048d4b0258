//! Sound cues
//!
//! The round controller only names cues; the tone table below suggests how
//! each should sound. Playback (and the mute flag) belongs to an `AudioSink`.
//! In the browser that is `AudioManager`, which synthesizes the tones with the
//! Web Audio API - no external files needed!

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Semantic sound cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// A card turned face up
    Flip,
    /// A pair was matched
    Match,
    /// The two cards differ
    NoMatch,
    /// Round won
    Win,
    /// Round lost (time or moves)
    Lose,
    /// Menu/button feedback
    Click,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Suggested synthesis parameters for a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub waveform: Waveform,
    pub base_hz: f32,
    pub duration_ms: u32,
    /// Frequency changes as (seconds after start, hz); the first entry is the base
    pub steps: &'static [(f64, f32)],
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Flip => "flip",
            AudioCue::Match => "match",
            AudioCue::NoMatch => "noMatch",
            AudioCue::Win => "win",
            AudioCue::Lose => "lose",
            AudioCue::Click => "click",
        }
    }

    pub fn tone(&self) -> ToneParams {
        match self {
            AudioCue::Flip => ToneParams {
                waveform: Waveform::Sine,
                base_hz: 600.0,
                duration_ms: 200,
                steps: &[(0.0, 600.0)],
            },
            AudioCue::Match => ToneParams {
                waveform: Waveform::Sine,
                base_hz: 523.0,
                duration_ms: 400,
                steps: &[(0.0, 523.0), (0.1, 659.0)],
            },
            AudioCue::NoMatch => ToneParams {
                waveform: Waveform::Sawtooth,
                base_hz: 200.0,
                duration_ms: 300,
                steps: &[(0.0, 200.0)],
            },
            AudioCue::Win => ToneParams {
                waveform: Waveform::Sine,
                base_hz: 523.0,
                duration_ms: 600,
                steps: &[(0.0, 523.0), (0.2, 659.0), (0.4, 784.0)],
            },
            AudioCue::Lose => ToneParams {
                waveform: Waveform::Sawtooth,
                base_hz: 200.0,
                duration_ms: 800,
                steps: &[(0.0, 200.0)],
            },
            AudioCue::Click => ToneParams {
                waveform: Waveform::Sine,
                base_hz: 800.0,
                duration_ms: 200,
                steps: &[(0.0, 800.0)],
            },
        }
    }
}

/// Receives cues from the round controller
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

impl<A: AudioSink> AudioSink for Rc<RefCell<A>> {
    fn play(&mut self, cue: AudioCue) {
        self.borrow_mut().play(cue);
    }
}

/// Remembers cues instead of playing them
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    pub cues: Vec<AudioCue>,
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioCue, AudioSink, ToneParams, Waveform};
    use crate::settings::Settings;
    use web_sys::{AudioContext, OscillatorType};

    /// Peak gain before volume scaling
    const PEAK_GAIN: f32 = 0.1;

    /// Web Audio player for game cues
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Effective volume; 0 when sound is off
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 1.0 }
        }

        /// Follow the player's sound toggle and volume
        pub fn apply(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Short blip so the player hears sound being switched off
        pub fn switch_off_blip(&self, volume: f32) {
            self.synth(
                &ToneParams {
                    waveform: Waveform::Sine,
                    base_hz: 600.0,
                    duration_ms: 150,
                    steps: &[(0.0, 600.0)],
                },
                volume,
            );
        }

        fn synth(&self, tone: &ToneParams, vol: f32) {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
                log::warn!("Web Audio API not supported");
                return;
            };
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }

            osc.set_type(match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });

            let t = ctx.current_time();
            let end = t + f64::from(tone.duration_ms) / 1000.0;

            osc.frequency().set_value(tone.base_hz);
            for &(offset, hz) in tone.steps {
                osc.frequency().set_value_at_time(hz, t + offset).ok();
            }
            gain.gain().set_value_at_time(PEAK_GAIN * vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: AudioCue) {
            if self.volume <= 0.0 {
                return;
            }
            self.synth(&cue.tone(), self.volume);
        }
    }
}
