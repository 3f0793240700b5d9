//! Flappy Core - a deterministic side-scrolling reflex game kernel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, gates, pixel collisions, evaluation harness)
//! - `session`: Frame-paced loop wiring the simulation to input, audio and rendering
//! - `renderer`: Stateless scene adapter plus headless renderers
//! - `platform`: Input sources and the frame-rate limiter
//! - `settings`: Data-driven game tuning, presets and JSON persistence
//! - `audio`: Event-to-sound mapping and headless sinks
//! - `highscores`: Top-10 leaderboard

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{JumpPolicy, Preset, Settings, SpawnPolicy};

/// Default world and physics constants (per-frame units, pixels and degrees)
pub mod consts {
    /// Target frame rate of the fixed-step loop
    pub const FPS: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;
    /// Y coordinate where the ground strip starts
    pub const GROUND_LINE: f32 = 730.0;

    /// Actor spawn point (x never changes afterwards)
    pub const ACTOR_START_X: f32 = 230.0;
    pub const ACTOR_START_Y: f32 = 350.0;

    /// Actor kinematics
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = -8.5;
    pub const MAX_FALL_SPEED: f32 = 10.0;
    pub const ROTATION_MULTIPLIER: f32 = -3.0;
    pub const MAX_UP_ROTATION: f32 = 20.0;
    pub const MAX_DOWN_ROTATION: f32 = -90.0;
    /// Forced fall per step once the actor is disabled
    pub const DEATH_FALL_STEP: f32 = 5.0;

    /// Shared scroll speed of gates and ground (must stay equal)
    pub const SCROLL_SPEED: f32 = 5.0;

    /// Vertical opening between the two gate pieces
    pub const GATE_GAP: f32 = 140.0;
    /// Minimum width of the band of legal gate centres
    pub const MIN_GATE_BAND: f32 = 80.0;
    /// Gates spawn this far past the right screen edge
    pub const SPAWN_OFFSET: f32 = 100.0;
    /// Frames between spawns under the interval policy
    pub const SPAWN_INTERVAL_FRAMES: u32 = 90;

    /// Sprite sizes (classic art at 2x)
    pub const ACTOR_WIDTH: u32 = 68;
    pub const ACTOR_HEIGHT: u32 = 48;
    pub const PIPE_WIDTH: u32 = 104;
    pub const PIPE_HEIGHT: u32 = 640;
    pub const PIPE_CAP_HEIGHT: u32 = 48;
    pub const PIPE_BODY_INSET: u32 = 4;
    pub const GROUND_TILE_WIDTH: f32 = 672.0;

    /// Evaluation harness fitness shaping
    pub const SURVIVAL_BONUS: f32 = 0.1;
    pub const GATE_BONUS: f32 = 6.0;
    pub const DEATH_PENALTY: f32 = 2.0;
}

/// Logistic squashing used to turn raw controller output into a decision
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Clamp an angle in degrees into `[min, max]`
#[inline]
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    angle.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(4.0) > 0.5);
        assert!(sigmoid(-4.0) < 0.5);
    }

    #[test]
    fn test_clamp_angle() {
        assert_eq!(clamp_angle(30.0, -90.0, 20.0), 20.0);
        assert_eq!(clamp_angle(-120.0, -90.0, 20.0), -90.0);
        assert_eq!(clamp_angle(-15.0, -90.0, 20.0), -15.0);
    }
}
