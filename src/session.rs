//! Frame-paced session loops
//!
//! Wires the pure simulation to its collaborators: input is drained once per
//! frame (a `Quit` wins before anything moves), events become sounds, and
//! every frame is rendered through the scene adapter.

use serde::Serialize;

use crate::audio::AudioSink;
use crate::platform::{FrameClock, InputEvent, InputSource};
use crate::renderer::{Renderer, evaluation_scene, scene};
use crate::settings::Settings;
use crate::sim::{
    Controller, Evaluation, EvaluationReport, FitnessSink, GamePhase, GameState, Sprites,
    TickInput, death_step, tick,
};

/// How a single-player session ended
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub score: u32,
    pub frames: u64,
    pub seed: u64,
    pub phase: GamePhase,
    /// Stopped by a `Quit` event
    pub quit: bool,
}

/// A single-player session and its collaborators
pub struct Session<I, A, R> {
    pub state: GameState,
    pub input: I,
    pub audio: A,
    pub renderer: R,
    pub clock: FrameClock,
    /// Let the built-in pilot fly
    pub autopilot: bool,
    /// Stop after this many simulation frames
    pub max_frames: Option<u64>,
    quit: bool,
}

impl<I: InputSource, A: AudioSink, R: Renderer> Session<I, A, R> {
    pub fn new(settings: Settings, sprites: Sprites, input: I, audio: A, renderer: R) -> Self {
        let state = GameState::new(settings, sprites);
        let clock = FrameClock::new(state.world.settings.frame_cap());
        Self {
            state,
            input,
            audio,
            renderer,
            clock,
            autopilot: false,
            max_frames: None,
            quit: false,
        }
    }

    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Whether another `step` would do anything
    pub fn is_active(&self) -> bool {
        !self.quit
            && self.state.running()
            && self
                .max_frames
                .is_none_or(|max| self.state.world.frame < max)
    }

    /// Run one frame, including the whole death fall if this frame killed
    /// the actor. Returns `is_active()`.
    pub fn step(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        let Some(jump) = self.poll_input() else {
            return false;
        };

        let input = TickInput {
            jump,
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input);
        self.flush_events();
        self.renderer.render(&scene(&self.state));

        if self.state.phase == GamePhase::Dying {
            self.play_death();
        }

        self.clock.tick();
        self.is_active()
    }

    /// Run until the session ends, is quit, or hits the frame cap
    pub fn run(&mut self) -> SessionOutcome {
        log::info!(
            "session started (seed {}, autopilot {})",
            self.state.world.settings.seed,
            self.autopilot
        );
        while self.step() {}

        let outcome = self.outcome();
        log::info!(
            "session finished: score {} in {} frames{}",
            outcome.score,
            outcome.frames,
            if outcome.quit { " (quit)" } else { "" }
        );
        outcome
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            score: self.state.score(),
            frames: self.state.world.frame,
            seed: self.state.world.settings.seed,
            phase: self.state.phase,
            quit: self.quit,
        }
    }

    /// Drain input. `None` means quit; otherwise whether a jump was requested.
    fn poll_input(&mut self) -> Option<bool> {
        let events = self.input.drain();
        if events.contains(&InputEvent::Quit) {
            log::info!("quit requested at frame {}", self.state.world.frame);
            self.quit = true;
            return None;
        }
        Some(events.contains(&InputEvent::JumpRequested))
    }

    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.play_event(event);
        }
    }

    /// Fixed-step fall to the ground; jumps are ignored, `Quit` still works
    fn play_death(&mut self) {
        let delay = self.state.world.settings.death_step_delay_ms;
        while self.state.phase == GamePhase::Dying {
            if self.poll_input().is_none() {
                return;
            }
            death_step(&mut self.state);
            self.flush_events();
            self.renderer.render(&scene(&self.state));
            self.clock.pause(delay);
        }
    }
}

/// Drive `eval` frame by frame until all actors are dead, the frame cap is
/// reached or `input` asks to quit. Every frame is rendered with the
/// `generation` counter; fitness goes to `sink` either way.
pub fn run_evaluation<C, I, R>(
    mut eval: Evaluation<C>,
    generation: u32,
    input: &mut I,
    renderer: &mut R,
    sink: &mut impl FitnessSink,
) -> EvaluationReport
where
    C: Controller,
    I: InputSource,
    R: Renderer,
{
    let mut clock = FrameClock::new(eval.world.settings.frame_cap());
    log::info!(
        "generation {}: evaluating {} controllers",
        generation,
        eval.alive()
    );

    while !eval.is_finished() {
        if input.drain().contains(&InputEvent::Quit) {
            log::info!("evaluation quit at frame {}", eval.world.frame);
            break;
        }
        eval.step();
        renderer.render(&evaluation_scene(&eval, generation));
        clock.tick();
    }

    eval.finish(sink)
}
