//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed per-frame constants
//! - Seeded RNG only
//! - Stable iteration order (gates in spawn order, actors in insertion order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod harness;
pub mod mask;
pub mod spawn;
pub mod sprites;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, GatePiece, collides, gate_collision, out_of_bounds};
pub use harness::{
    Contestant, Controller, Evaluation, EvaluationReport, FitnessRecord, FitnessSink,
    LinearController, Observation, observe,
};
pub use mask::Mask;
pub use spawn::{GateBand, Spawner};
pub use sprites::Sprites;
pub use state::{Actor, GameEvent, GamePhase, GameState, Ground, Kinematics, Obstacle, World};
pub use tick::{TickInput, autopilot_wants_jump, death_step, tick};
