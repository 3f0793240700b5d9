//! Game tuning and presets
//!
//! Every per-variant knob of the game lives here instead of in forked types.
//! Persisted as JSON; missing fields fall back to the defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// When a jump request is honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JumpPolicy {
    /// Every request resets the velocity to the jump force
    Always,
    /// Only while not ascending (`vertical_velocity >= 0`)
    #[default]
    WhenFalling,
}

/// When the next gate is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Spawn every `frames` running frames
    Interval { frames: u32 },
    /// Spawn when a gate is cleared; the first gate exists from the start
    OnPass,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Interval {
            frames: SPAWN_INTERVAL_FRAMES,
        }
    }
}

/// Optional secondary perturbation of the gate centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateJitter {
    /// Chance (0-1) that a gate gets perturbed
    pub probability: f32,
    /// Perturbation is uniform in `[-max_offset, max_offset]`
    pub max_offset: f32,
}

/// Named starting points for [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Human play: title screen, interval spawning, no gate jitter
    #[default]
    Classic,
    /// Controller evaluation: no title screen, spawn on pass, jittered gates
    Evolution,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Evolution => "evolution",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "play" => Some(Preset::Classic),
            "evolution" | "ai" | "neat" => Some(Preset::Evolution),
            _ => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for gate placement
    pub seed: u64,

    // === World ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub ground_line: f32,
    /// Frame cap; 0 runs unthrottled
    pub fps: u32,

    // === Actor ===
    pub actor_start_x: f32,
    pub actor_start_y: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub max_fall_speed: f32,
    pub rotation_multiplier: f32,
    pub max_up_rotation: f32,
    pub max_down_rotation: f32,
    pub jump_policy: JumpPolicy,

    // === Gates ===
    pub scroll_speed: f32,
    pub gate_gap: f32,
    pub spawn_offset: f32,
    pub spawn_policy: SpawnPolicy,
    pub gate_jitter: Option<GateJitter>,

    // === Session ===
    /// Start in the idle title state until the first flap
    pub wait_for_first_flap: bool,
    pub death_fall_step: f32,
    /// Extra delay per death-animation step
    pub death_step_delay_ms: u64,

    // === Evaluation harness ===
    pub survival_bonus: f32,
    pub gate_bonus: f32,
    pub death_penalty: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_line: GROUND_LINE,
            fps: FPS,

            actor_start_x: ACTOR_START_X,
            actor_start_y: ACTOR_START_Y,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            max_fall_speed: MAX_FALL_SPEED,
            rotation_multiplier: ROTATION_MULTIPLIER,
            max_up_rotation: MAX_UP_ROTATION,
            max_down_rotation: MAX_DOWN_ROTATION,
            jump_policy: JumpPolicy::WhenFalling,

            scroll_speed: SCROLL_SPEED,
            gate_gap: GATE_GAP,
            spawn_offset: SPAWN_OFFSET,
            spawn_policy: SpawnPolicy::default(),
            gate_jitter: None,

            wait_for_first_flap: true,
            death_fall_step: DEATH_FALL_STEP,
            death_step_delay_ms: 16,

            survival_bonus: SURVIVAL_BONUS,
            gate_bonus: GATE_BONUS,
            death_penalty: DEATH_PENALTY,
        }
    }
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply the preset-dependent fields, leaving everything else alone
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Classic => {
                self.wait_for_first_flap = true;
                self.spawn_policy = SpawnPolicy::default();
                self.gate_jitter = None;
                self.jump_policy = JumpPolicy::WhenFalling;
            }
            Preset::Evolution => {
                self.wait_for_first_flap = false;
                self.spawn_policy = SpawnPolicy::OnPass;
                self.gate_jitter = Some(GateJitter {
                    probability: 0.7,
                    max_offset: 40.0,
                });
                self.jump_policy = JumpPolicy::Always;
                self.fps = 0;
                self.death_step_delay_ms = 0;
            }
        }
    }

    /// Frame cap as an option (None = unthrottled)
    pub fn frame_cap(&self) -> Option<u32> {
        (self.fps > 0).then_some(self.fps)
    }

    /// Clamp values that would make the game unplayable.
    ///
    /// Bad values are repaired, never rejected.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        if self.gate_gap <= 0.0 || !self.gate_gap.is_finite() {
            log::warn!("gate_gap {} is not positive, using {}", self.gate_gap, defaults.gate_gap);
            self.gate_gap = defaults.gate_gap;
        }
        if !self.screen_width.is_finite() || self.screen_width <= 0.0 {
            log::warn!("screen_width {} is not positive", self.screen_width);
            self.screen_width = defaults.screen_width;
        }
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            log::warn!("screen_height {} is not positive", self.screen_height);
            self.screen_height = defaults.screen_height;
        }
        if !self.ground_line.is_finite() {
            log::warn!("ground_line {} is not a number", self.ground_line);
            self.ground_line = defaults.ground_line.min(self.screen_height);
        } else if self.ground_line <= 0.0 || self.ground_line > self.screen_height {
            log::warn!("ground_line {} outside the screen", self.ground_line);
            self.ground_line = self.ground_line.clamp(1.0, self.screen_height);
        }
        if let SpawnPolicy::Interval { frames: 0 } = self.spawn_policy {
            log::warn!("spawn interval of 0 frames, using 1");
            self.spawn_policy = SpawnPolicy::Interval { frames: 1 };
        }
        self.gravity = self.gravity.max(0.0);
        self.jump_force = self.jump_force.min(0.0);
        self.max_fall_speed = self.max_fall_speed.max(0.0);
        self.scroll_speed = self.scroll_speed.max(0.0);
        if self.max_down_rotation > self.max_up_rotation {
            std::mem::swap(&mut self.max_down_rotation, &mut self.max_up_rotation);
        }
        if !self.death_fall_step.is_finite() || self.death_fall_step <= 0.0 {
            self.death_fall_step = defaults.death_fall_step;
        }
        if let Some(jitter) = self.gate_jitter.as_mut() {
            jitter.probability = jitter.probability.clamp(0.0, 1.0);
            jitter.max_offset = jitter.max_offset.abs();
        }
        self
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.normalized())
    }

    /// Load settings, falling back to `fallback` when the file is unusable
    pub fn load_or(path: Option<&Path>, fallback: Self) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                log::warn!("{e:#}; using defaults");
                fallback
            }),
            None => fallback,
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
