//! Lockstep evaluation of many controllers in one world
//!
//! Every contestant flies its own actor through the same gates. Fitness is
//! accumulated per frame and handed to an external evolution service at the
//! end; how that service breeds the next generation is none of our business.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{collides, out_of_bounds};
use super::sprites::Sprites;
use super::state::{Actor, World};
use crate::settings::Settings;
use crate::sigmoid;

/// `(y, |y - gate_top|, |y - gate_bottom|, gate_top, gate_bottom, vertical_velocity)`
pub type Observation = [f32; 6];

/// A decision maker supplied by the evolution service
pub trait Controller {
    /// Raw output; `sigmoid(output) > 0.5` means "flap"
    fn activate(&mut self, observation: &Observation) -> f32;
}

impl<F: FnMut(&Observation) -> f32> Controller for F {
    fn activate(&mut self, observation: &Observation) -> f32 {
        self(observation)
    }
}

/// Receives one final fitness per controller
pub trait FitnessSink {
    fn record_fitness(&mut self, index: usize, fitness: f32);
}

impl<F: FnMut(usize, f32)> FitnessSink for F {
    fn record_fitness(&mut self, index: usize, fitness: f32) {
        self(index, fitness)
    }
}

/// Single-layer controller: weighted sum of the observation plus a bias
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearController {
    pub weights: [f32; 6],
    pub bias: f32,
}

impl LinearController {
    /// Weights and bias uniform in `[-1, 1]`
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut weights = [0.0; 6];
        for w in &mut weights {
            *w = rng.random_range(-1.0..=1.0);
        }
        Self {
            weights,
            bias: rng.random_range(-1.0..=1.0),
        }
    }
}

impl Controller for LinearController {
    fn activate(&mut self, observation: &Observation) -> f32 {
        self.weights
            .iter()
            .zip(observation)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias
    }
}

/// An actor flown by one controller
#[derive(Debug)]
pub struct Contestant<C> {
    /// Position in the caller's controller list
    pub index: usize,
    pub actor: Actor,
    pub controller: C,
    pub fitness: f32,
}

/// Final result for one controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub index: usize,
    pub fitness: f32,
    /// Frames the actor was alive
    pub frames: u64,
    pub survived: bool,
}

/// Summary of a finished evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub frames: u64,
    pub score: u32,
    /// Ordered by controller index
    pub records: Vec<FitnessRecord>,
}

impl EvaluationReport {
    pub fn best(&self) -> Option<&FitnessRecord> {
        self.records
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }
}

/// Observation for `actor` against the gate it should aim for
pub fn observe(world: &World, actor: &Actor) -> Option<Observation> {
    let gate = world.nearest_obstacle(actor.pos.x)?;
    let y = actor.pos.y;
    let top = gate.top_extent();
    let bottom = gate.bottom_extent();
    Some([
        y,
        (y - top).abs(),
        (y - bottom).abs(),
        top,
        bottom,
        actor.vertical_velocity,
    ])
}

/// N actors and controllers sharing one world
pub struct Evaluation<C> {
    pub world: World,
    /// Still-alive contestants, in insertion order
    pub active: Vec<Contestant<C>>,
    /// Contestants that already died
    pub retired: Vec<FitnessRecord>,
    /// Stop after this many frames even if someone is still alive
    pub max_frames: Option<u64>,
}

impl<C: Controller> Evaluation<C> {
    pub fn new(settings: Settings, sprites: Sprites, controllers: Vec<C>) -> Self {
        let world = World::new(settings, sprites);
        let active = controllers
            .into_iter()
            .enumerate()
            .map(|(index, controller)| Contestant {
                index,
                actor: world.new_actor(),
                controller,
                fitness: 0.0,
            })
            .collect();
        Self {
            world,
            active,
            retired: Vec::new(),
            max_frames: None,
        }
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    #[inline]
    pub fn alive(&self) -> usize {
        self.active.len()
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_empty() || self.max_frames.is_some_and(|max| self.world.frame >= max)
    }

    /// Advance every alive contestant by one frame
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        let survival_bonus = self.world.settings.survival_bonus;
        let speed = self.world.settings.scroll_speed;
        let pipe_width = self.world.sprites.pipe_width();
        let actor_x = self.world.settings.actor_start_x;

        self.world.frame += 1;

        // Actors: survival bonus, physics, then the controller's decision
        for c in &mut self.active {
            c.fitness += survival_bonus;
            c.actor.tick();
            c.actor.refresh_silhouette(&self.world.sprites.actor);
            if let Some(obs) = observe(&self.world, &c.actor) {
                if sigmoid(c.controller.activate(&obs)) > 0.5 {
                    c.actor.jump();
                }
            }
        }

        self.world.ground.advance(speed);
        if self.world.spawner.on_frame() {
            let x = self.world.spawner.spawn_x;
            self.world.spawn_obstacle(x);
        }

        // Gates: move, kill whoever touches them, then count passes
        let mut cleared = 0;
        for i in 0..self.world.obstacles.len() {
            self.world.obstacles[i].advance(speed);

            let obstacle = &self.world.obstacles[i];
            let sprites = &self.world.sprites;
            retire_where(
                &mut self.active,
                &mut self.retired,
                &self.world.settings,
                self.world.frame,
                |actor| collides(actor, obstacle, sprites),
            );

            if !self.active.is_empty() && self.world.obstacles[i].has_passed(actor_x) {
                cleared += 1;
            }
        }
        self.world.obstacles.retain(|o| !o.is_off_screen(pipe_width));

        if cleared > 0 {
            self.world.score += cleared;
            let bonus = self.world.settings.gate_bonus * cleared as f32;
            for c in &mut self.active {
                c.fitness += bonus;
            }
            log::debug!(
                "gate cleared at frame {} (score {}, {} alive)",
                self.world.frame,
                self.world.score,
                self.active.len()
            );
            if self.world.spawner.spawns_on_pass() {
                let x = self.world.spawner.spawn_x;
                self.world.spawn_obstacle(x);
            }
        }

        let ground_line = self.world.settings.ground_line;
        retire_where(
            &mut self.active,
            &mut self.retired,
            &self.world.settings,
            self.world.frame,
            |actor| out_of_bounds(actor, ground_line),
        );
    }

    /// Run until everyone is dead or the frame cap is reached
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
    }

    /// Report every fitness to `sink` (by index) and summarise
    pub fn finish(mut self, sink: &mut impl FitnessSink) -> EvaluationReport {
        let frame = self.world.frame;
        for c in self.active.drain(..) {
            self.retired.push(FitnessRecord {
                index: c.index,
                fitness: c.fitness,
                frames: frame,
                survived: true,
            });
        }
        self.retired.sort_by_key(|r| r.index);
        for record in &self.retired {
            sink.record_fitness(record.index, record.fitness);
        }
        log::info!(
            "evaluation finished: {} frames, score {}, {} controllers",
            frame,
            self.world.score,
            self.retired.len()
        );
        EvaluationReport {
            frames: frame,
            score: self.world.score,
            records: self.retired,
        }
    }
}

/// Penalise and remove every contestant whose actor matches `dead`
fn retire_where<C>(
    active: &mut Vec<Contestant<C>>,
    retired: &mut Vec<FitnessRecord>,
    settings: &Settings,
    frame: u64,
    dead: impl Fn(&Actor) -> bool,
) {
    let mut i = 0;
    while i < active.len() {
        if !dead(&active[i].actor) {
            i += 1;
            continue;
        }
        let mut c = active.remove(i);
        c.actor.disable();
        c.fitness -= settings.death_penalty;
        log::debug!("contestant {} died at frame {}", c.index, frame);
        retired.push(FitnessRecord {
            index: c.index,
            fitness: c.fitness,
            frames: frame,
            survived: false,
        });
    }
}
