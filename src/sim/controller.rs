//! Round controller
//!
//! Owns the active round and its engines, drives virtual time, and routes
//! engine events to the outcome evaluator, the renderer and the audio sink.

use rand_pcg::Pcg32;

use super::board::BoardGenerator;
use super::clock::ClockEngine;
use super::error::{GameError, InvalidAction};
use super::event::{EventSink, GameEvent};
use super::outcome::{OutcomeEvaluator, Verdict};
use super::scheduler::{Scheduler, Timer};
use super::state::{Difficulty, LossReason, Phase, RngState, Round, RoundConfig};
use super::turn::TurnEngine;
use crate::audio::{AudioCue, AudioSink};
use crate::highscores::{BestScore, ScoreStore};
use crate::renderer::{Renderer, RoundView};

pub struct RoundController {
    seed: u64,
    rng: Pcg32,
    board: BoardGenerator,
    scheduler: Scheduler,
    turn: TurnEngine,
    clock: ClockEngine,
    evaluator: OutcomeEvaluator,
    best: BestScore,
    round: Option<Round>,
    /// What `restart` deals again
    last_setup: Option<(Option<Difficulty>, RoundConfig)>,
    generation: u64,
    /// Every event emitted since the last `take_events`. Hosts drain it
    /// regularly; a running clock adds one entry per second.
    journal: Vec<GameEvent>,
    renderer: Option<Box<dyn Renderer>>,
    audio: Option<Box<dyn AudioSink>>,
}

impl std::fmt::Debug for RoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundController")
            .field("seed", &self.seed)
            .field("generation", &self.generation)
            .field("now_ms", &self.scheduler.now_ms())
            .field("round", &self.round)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl RoundController {
    /// Create a controller with the given run seed; the best score is read from `store`
    pub fn new(seed: u64, store: Box<dyn ScoreStore>) -> Self {
        Self {
            seed,
            rng: RngState::new(seed).to_rng(),
            board: BoardGenerator::new(),
            scheduler: Scheduler::new(),
            turn: TurnEngine::new(),
            clock: ClockEngine::new(),
            evaluator: OutcomeEvaluator::new(),
            best: BestScore::load(store),
            round: None,
            last_setup: None,
            generation: 0,
            journal: Vec::new(),
            renderer: None,
            audio: None,
        }
    }

    pub fn with_board(mut self, board: BoardGenerator) -> Self {
        self.board = board;
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.round.as_ref().map_or(Phase::Idle, |r| r.phase)
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    /// Face-up cards of the turn in progress
    pub fn pending_cards(&self) -> &[usize] {
        self.turn.pending()
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Events since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.journal
    }

    /// Drain the event journal. The journal is unbounded, so long-running
    /// hosts call this once per frame.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.journal)
    }

    pub fn snapshot(&self) -> RoundView {
        match &self.round {
            Some(round) => RoundView::from_round(round, self.best.value()),
            None => RoundView::idle(self.best.value()),
        }
    }

    /// Deal a preset round and start its clock
    pub fn start_round(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.start(Some(difficulty), difficulty.config())
    }

    /// Deal a round with a custom grid
    pub fn start_custom(&mut self, config: RoundConfig) -> Result<(), GameError> {
        self.start(None, config)
    }

    /// Deal again with the last difficulty
    pub fn restart(&mut self) -> Result<(), GameError> {
        let (difficulty, config) = self.last_setup.ok_or(GameError::NoDifficulty)?;
        self.start(difficulty, config)
    }

    /// Abandon any round and go back to the difficulty selector
    pub fn return_to_menu(&mut self) {
        self.teardown();
        self.round = None;
        self.last_setup = None;
        log::info!("Returned to difficulty selector");
        self.publish(&GameEvent::ReturnedToMenu, None);
    }

    fn start(&mut self, difficulty: Option<Difficulty>, config: RoundConfig) -> Result<(), GameError> {
        // Deal first so a bad config leaves the current round alone
        let cards = self.board.generate(&config, &mut self.rng)?;

        self.teardown();
        self.generation += 1;

        let mut round = Round::new(difficulty, config, self.generation, cards);
        self.clock
            .start(&mut round, config.time_limit_secs, &mut self.scheduler);

        log::info!(
            "Round {} started: {}x{} grid, {}s, {} moves",
            self.generation,
            config.rows,
            config.cols,
            config.time_limit_secs,
            config.max_moves
        );

        self.round = Some(round);
        self.last_setup = Some((difficulty, config));
        self.publish(
            &GameEvent::RoundStarted {
                generation: self.generation,
                difficulty,
            },
            None,
        );

        if let Some(round) = self.round.as_mut() {
            round.phase = Phase::Running;
        }
        self.publish(
            &GameEvent::PhaseChanged {
                phase: Phase::Running,
            },
            None,
        );
        Ok(())
    }

    /// Stop the clock and drop every timer of the current round
    fn teardown(&mut self) {
        self.clock.stop(&mut self.scheduler);
        self.turn.reset(&mut self.scheduler);
        if let Some(round) = &self.round {
            self.scheduler.cancel_generation(round.generation);
        }
    }

    /// Flip a card. Refusals change nothing and may be ignored.
    pub fn flip(&mut self, card: usize) -> Result<(), InvalidAction> {
        let mut staged = self.staged();
        let Some(round) = self.round.as_mut() else {
            return Err(InvalidAction::NotRunning);
        };
        if let Err(reason) = self.turn.flip(round, card, &mut self.scheduler, &mut staged) {
            log::debug!("Ignoring flip of card {}: {}", card, reason);
            return Err(reason);
        }
        self.dispatch(staged);
        Ok(())
    }

    /// Move virtual time forward, firing every timer that falls due
    pub fn advance(&mut self, delta_ms: u64) {
        let until = self.scheduler.now_ms().saturating_add(delta_ms);
        while let Some((_, timer)) = self.scheduler.pop_due(until) {
            self.fire(timer);
        }
        self.scheduler.settle_at(until);
    }

    fn fire(&mut self, timer: Timer) {
        let mut staged = self.staged();
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if timer.generation() != round.generation {
            log::debug!("Dropping stale {:?}", timer);
            return;
        }

        match timer {
            Timer::ClockTick { .. } => self.clock.tick(round, &mut self.scheduler, &mut staged),
            Timer::Settle { .. } => {
                self.turn.settle(round, &mut staged);
            }
        }
        self.dispatch(staged);
    }

    /// Sink for one engine call; views are captured only when a renderer is attached
    fn staged(&self) -> Staged {
        Staged {
            best: self.renderer.as_ref().map(|_| self.best.value()),
            frames: Vec::new(),
        }
    }

    /// Publish a batch of events, then apply whatever verdict they produced
    fn dispatch(&mut self, staged: Staged) {
        let mut verdict = None;
        for (event, view) in staged.frames {
            if verdict.is_none() {
                if let Some(round) = &self.round {
                    verdict = self.evaluator.observe(&event, round, self.turn.is_settling());
                }
            }
            self.publish(&event, view);
        }
        if let Some(verdict) = verdict {
            self.conclude(verdict);
        }
    }

    /// End the round: stop the clock, settle scores, flip leftovers down
    fn conclude(&mut self, verdict: Verdict) {
        self.clock.stop(&mut self.scheduler);

        match verdict {
            Verdict::Won { final_score } => {
                let Some(round) = self.round.as_mut() else {
                    return;
                };
                round.phase = Phase::Won;
                round.final_score = Some(final_score);
                log::info!("Round {} won with {}", round.generation, final_score);
                self.publish(&GameEvent::PhaseChanged { phase: Phase::Won }, None);

                if self.best.submit(final_score) {
                    if let Some(round) = self.round.as_mut() {
                        round.new_high_score = true;
                    }
                    log::info!("New best score {}", final_score);
                    self.publish(&GameEvent::NewHighScore { score: final_score }, None);
                }
            }
            Verdict::Lost(reason) => {
                let mut staged = self.staged();
                let Some(round) = self.round.as_mut() else {
                    return;
                };
                self.turn.abandon(round, &mut self.scheduler, &mut staged);
                round.phase = Phase::Lost(reason);
                if reason == LossReason::TimeUp {
                    round.seconds_remaining = 0;
                }
                log::info!("Round {} lost: {:?}", round.generation, reason);

                for (event, view) in staged.frames {
                    self.publish(&event, view);
                }
                self.publish(
                    &GameEvent::PhaseChanged {
                        phase: Phase::Lost(reason),
                    },
                    None,
                );
            }
        }
    }

    /// Record an event and notify collaborators. `view` is the round as it
    /// stood right after the event; None means the current state.
    fn publish(&mut self, event: &GameEvent, view: Option<RoundView>) {
        self.journal.push(*event);

        if let (Some(cue), Some(audio)) = (cue_for(event), self.audio.as_mut()) {
            audio.play(cue);
        }

        if self.renderer.is_some() {
            let view = view.unwrap_or_else(|| self.snapshot());
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(&view, event);
            }
        }
    }
}

/// Engine events paired with the view right after each one
struct Staged {
    /// Best score to show; None when nothing renders
    best: Option<u32>,
    frames: Vec<(GameEvent, Option<RoundView>)>,
}

impl EventSink for Staged {
    fn emit(&mut self, round: &Round, event: GameEvent) {
        let view = self.best.map(|best| RoundView::from_round(round, best));
        self.frames.push((event, view));
    }
}

/// Sound to play for an event, if any
fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::Flip { .. } => Some(AudioCue::Flip),
        GameEvent::Match { .. } => Some(AudioCue::Match),
        GameEvent::NoMatch { .. } => Some(AudioCue::NoMatch),
        GameEvent::PhaseChanged { phase: Phase::Won } => Some(AudioCue::Win),
        GameEvent::PhaseChanged {
            phase: Phase::Lost(_),
        } => Some(AudioCue::Lose),
        GameEvent::RoundStarted { .. } | GameEvent::ReturnedToMenu => Some(AudioCue::Click),
        _ => None,
    }
}
