//! Game state and core simulation types
//!
//! Physics state only; drawing is derived from it by `renderer::scene`.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::spawn::Spawner;
use super::sprites::Sprites;
use crate::clamp_angle;
use crate::settings::{JumpPolicy, Settings, SpawnPolicy};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle title state; the first flap starts the run
    NotStarted,
    /// Active gameplay
    Running,
    /// Actor is disabled and falling to the ground
    Dying,
    /// Run finished
    Ended,
}

/// Something the loop should react to (sounds, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flapped,
    Scored { score: u32 },
    Collided,
    Landed,
}

/// Per-frame actor physics parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub gravity: f32,
    pub jump_force: f32,
    pub max_fall_speed: f32,
    pub rotation_multiplier: f32,
    pub max_up_rotation: f32,
    pub max_down_rotation: f32,
    pub death_fall_step: f32,
    pub jump_policy: JumpPolicy,
}

impl From<&Settings> for Kinematics {
    fn from(s: &Settings) -> Self {
        Self {
            gravity: s.gravity,
            jump_force: s.jump_force,
            max_fall_speed: s.max_fall_speed,
            rotation_multiplier: s.rotation_multiplier,
            max_up_rotation: s.max_up_rotation,
            max_down_rotation: s.max_down_rotation,
            death_fall_step: s.death_fall_step,
            jump_policy: s.jump_policy,
        }
    }
}

/// The falling-and-jumping entity
#[derive(Debug, Clone)]
pub struct Actor {
    /// `x` never changes; `y` is the sprite centre
    pub pos: Vec2,
    pub vertical_velocity: f32,
    /// Degrees, positive is nose-up
    pub rotation_angle: f32,
    /// Set on collision; a disabled actor only falls
    pub disabled: bool,
    pub kinematics: Kinematics,
    silhouette: Mask,
    silhouette_angle: f32,
}

impl Actor {
    pub fn new(x: f32, y: f32, kinematics: Kinematics, base: &Mask) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vertical_velocity: 0.0,
            rotation_angle: 0.0,
            disabled: false,
            kinematics,
            silhouette: base.clone(),
            silhouette_angle: 0.0,
        }
    }

    /// Whether a jump request would be honoured right now
    pub fn can_jump(&self) -> bool {
        if self.disabled {
            return false;
        }
        match self.kinematics.jump_policy {
            JumpPolicy::Always => true,
            JumpPolicy::WhenFalling => self.vertical_velocity >= 0.0,
        }
    }

    /// Upward impulse; ignored when disabled or blocked by the jump policy
    pub fn jump(&mut self) {
        if self.can_jump() {
            self.vertical_velocity = self.kinematics.jump_force;
        }
    }

    /// Integrate one frame
    pub fn tick(&mut self) {
        if self.disabled {
            self.fall_collided();
            return;
        }
        let k = &self.kinematics;
        self.vertical_velocity = (self.vertical_velocity + k.gravity).min(k.max_fall_speed);
        self.pos.y += self.vertical_velocity;
        self.rotation_angle = clamp_angle(
            self.vertical_velocity * k.rotation_multiplier,
            k.max_down_rotation,
            k.max_up_rotation,
        );
    }

    /// Forced nose-down fall used after a collision
    pub fn fall_collided(&mut self) {
        self.pos.y += self.kinematics.death_fall_step;
        self.rotation_angle = self.kinematics.max_down_rotation;
    }

    /// Disable the actor. Returns false if it already was.
    pub fn disable(&mut self) -> bool {
        let was_alive = !self.disabled;
        self.disabled = true;
        self.rotation_angle = self.kinematics.max_down_rotation;
        was_alive
    }

    /// Re-rotate the silhouette if the angle changed since the last call
    pub fn refresh_silhouette(&mut self, base: &Mask) {
        if self.rotation_angle != self.silhouette_angle {
            self.silhouette = base.rotated(self.rotation_angle);
            self.silhouette_angle = self.rotation_angle;
        }
    }

    /// Current (rotated) silhouette
    #[inline]
    pub fn silhouette(&self) -> &Mask {
        &self.silhouette
    }

    /// Top-left pixel of the silhouette, which is centred on `pos`
    pub fn top_left(&self) -> IVec2 {
        let half = self.silhouette.size().as_vec2() / 2.0;
        (self.pos - half).floor().as_ivec2()
    }

    /// Lowest row of the silhouette in screen space
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.silhouette.height() as f32 / 2.0
    }
}

/// A top/bottom gate pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub gate_center: f32,
    pub gate_half_gap: f32,
    /// Set once the actor passes `x`
    pub cleared: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, gate_center: f32, gate_half_gap: f32) -> Self {
        Self {
            id,
            x,
            gate_center,
            gate_half_gap,
            cleared: false,
        }
    }

    /// Lower edge of the top piece
    #[inline]
    pub fn top_extent(&self) -> f32 {
        self.gate_center - self.gate_half_gap
    }

    /// Upper edge of the bottom piece
    #[inline]
    pub fn bottom_extent(&self) -> f32 {
        self.gate_center + self.gate_half_gap
    }

    /// Scroll left
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// True exactly once: the first call with `actor_x > x`
    pub fn has_passed(&mut self, actor_x: f32) -> bool {
        if !self.cleared && actor_x > self.x {
            self.cleared = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_off_screen(&self, sprite_width: f32) -> bool {
        self.x + sprite_width < 0.0
    }

    /// Top-left corner of the hanging piece
    pub fn top_piece_origin(&self, pipe_height: f32) -> IVec2 {
        Vec2::new(self.x, self.top_extent() - pipe_height)
            .floor()
            .as_ivec2()
    }

    /// Top-left corner of the standing piece
    pub fn bottom_piece_origin(&self) -> IVec2 {
        Vec2::new(self.x, self.bottom_extent()).floor().as_ivec2()
    }
}

/// Two ground tiles scrolling in lockstep with the gates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub width: f32,
    pub tiles: [f32; 2],
}

impl Ground {
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            width,
            tiles: [0.0, width],
        }
    }

    /// Scroll left, recycling a tile behind the other once it leaves the screen
    pub fn advance(&mut self, speed: f32) {
        for x in &mut self.tiles {
            *x -= speed;
        }
        for i in 0..2 {
            if self.tiles[i] + self.width <= 0.0 {
                self.tiles[i] = self.tiles[1 - i] + self.width;
            }
        }
    }
}

/// Everything shared by a single-player session and the evaluation harness
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub sprites: Sprites,
    /// Spawn order, which is also ascending `x`
    pub obstacles: Vec<Obstacle>,
    pub ground: Ground,
    pub spawner: Spawner,
    pub score: u32,
    /// Simulation frame counter
    pub frame: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(settings: Settings, sprites: Sprites) -> Self {
        let settings = settings.normalized();
        let spawner = Spawner::new(&settings, &sprites);
        let mut world = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            ground: Ground::new(settings.ground_line, sprites.ground_tile_width),
            obstacles: Vec::new(),
            spawner,
            score: 0,
            frame: 0,
            next_id: 1,
            settings,
            sprites,
        };

        if world.settings.spawn_policy == SpawnPolicy::OnPass {
            let x = world.settings.screen_width;
            world.spawn_obstacle(x);
        }

        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a gate at `x` with a freshly drawn opening
    pub fn spawn_obstacle(&mut self, x: f32) {
        let id = self.next_entity_id();
        let center = self.spawner.band.draw(&mut self.rng);
        let obstacle = Obstacle::new(id, x, center, self.spawner.band.half_gap);
        log::debug!("spawned gate {} at x={:.0} centre={:.1}", id, x, center);
        self.obstacles.push(obstacle);
    }

    /// Index of the gate an actor at `actor_x` should aim for
    pub fn nearest_obstacle_index(&self, actor_x: f32) -> Option<usize> {
        let first = self.obstacles.first()?;
        if actor_x > first.x + self.sprites.pipe_width() && self.obstacles.len() > 1 {
            Some(1)
        } else {
            Some(0)
        }
    }

    pub fn nearest_obstacle(&self, actor_x: f32) -> Option<&Obstacle> {
        self.nearest_obstacle_index(actor_x)
            .map(|i| &self.obstacles[i])
    }

    /// Build a fresh actor at the configured start point
    pub fn new_actor(&self) -> Actor {
        Actor::new(
            self.settings.actor_start_x,
            self.settings.actor_start_y,
            Kinematics::from(&self.settings),
            &self.sprites.actor,
        )
    }
}

/// Complete single-player session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: World,
    pub actor: Actor,
    pub phase: GamePhase,
    /// Events produced since the loop last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(settings: Settings, sprites: Sprites) -> Self {
        let world = World::new(settings, sprites);
        let actor = world.new_actor();
        let phase = if world.settings.wait_for_first_flap {
            GamePhase::NotStarted
        } else {
            GamePhase::Running
        };
        Self {
            world,
            actor,
            phase,
            events: Vec::new(),
        }
    }

    /// Whether the loop should keep going
    #[inline]
    pub fn running(&self) -> bool {
        self.phase != GamePhase::Ended
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.world.score
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
