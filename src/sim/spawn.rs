//! Gate placement and spawn timing
//!
//! The band of legal gate centres is derived once from the screen, the
//! ground line and the gap so that a gate never touches the ground and
//! always leaves the configured opening.

use rand::Rng;

use super::sprites::Sprites;
use crate::consts::MIN_GATE_BAND;
use crate::settings::{GateJitter, Settings, SpawnPolicy};

/// Legal range for gate centres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateBand {
    pub min_center: f32,
    pub max_center: f32,
    pub half_gap: f32,
    pub jitter: Option<GateJitter>,
}

impl GateBand {
    /// The band keeps `gate_clearance()` from the screen top and the ground
    /// line, and is never narrower than `MIN_GATE_BAND`.
    pub fn new(settings: &Settings, sprites: &Sprites) -> Self {
        let half_gap = settings.gate_gap / 2.0;
        let clearance = sprites.gate_clearance();
        let min_center = clearance + half_gap;
        let natural_max = settings.ground_line - clearance - half_gap;
        let max_center = natural_max.max(min_center + MIN_GATE_BAND);

        if max_center > natural_max {
            log::warn!(
                "gate band too narrow ({:.1}..{:.1}), widening to {} px",
                min_center,
                natural_max,
                MIN_GATE_BAND
            );
        }

        Self {
            min_center,
            max_center,
            half_gap,
            jitter: settings.gate_jitter,
        }
    }

    /// Draw a gate centre: uniform over the band, optionally jittered,
    /// always clamped back into the band.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f32 {
        let mut center = rng.random_range(self.min_center..=self.max_center);

        if let Some(jitter) = self.jitter {
            if jitter.max_offset > 0.0 && rng.random_bool(jitter.probability as f64) {
                center += rng.random_range(-jitter.max_offset..=jitter.max_offset);
            }
        }

        center.clamp(self.min_center, self.max_center)
    }
}

/// Decides when gates appear
#[derive(Debug, Clone)]
pub struct Spawner {
    pub policy: SpawnPolicy,
    pub band: GateBand,
    /// Running frames since the last interval spawn
    pub frames_since_spawn: u32,
    /// Where new gates appear
    pub spawn_x: f32,
}

impl Spawner {
    pub fn new(settings: &Settings, sprites: &Sprites) -> Self {
        Self {
            policy: settings.spawn_policy,
            band: GateBand::new(settings, sprites),
            frames_since_spawn: 0,
            spawn_x: settings.screen_width + settings.spawn_offset,
        }
    }

    /// Advance the interval timer; true when a gate should spawn this frame
    pub fn on_frame(&mut self) -> bool {
        let SpawnPolicy::Interval { frames } = self.policy else {
            return false;
        };
        self.frames_since_spawn += 1;
        if self.frames_since_spawn >= frames {
            self.frames_since_spawn = 0;
            return true;
        }
        false
    }

    /// Whether clearing a gate should spawn the next one
    #[inline]
    pub fn spawns_on_pass(&self) -> bool {
        self.policy == SpawnPolicy::OnPass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_band() {
        let band = GateBand::new(&Settings::default(), &Sprites::procedural());
        let clearance = (PIPE_HEIGHT / 7) as f32;
        assert_eq!(band.min_center, clearance + GATE_GAP / 2.0);
        assert_eq!(band.max_center, GROUND_LINE - clearance - GATE_GAP / 2.0);
    }

    #[test]
    fn test_narrow_band_is_widened() {
        // 91 + 70 = 161 up to 332 - 161 = 171: only 10 px of room
        let settings = Settings {
            ground_line: 332.0,
            ..Default::default()
        };
        let band = GateBand::new(&settings, &Sprites::procedural());
        assert_eq!(band.min_center, 161.0);
        assert_eq!(band.max_center - band.min_center, MIN_GATE_BAND);
    }

    #[test]
    fn test_collapsed_band_is_widened() {
        let settings = Settings {
            ground_line: 200.0,
            ..Default::default()
        };
        let band = GateBand::new(&settings, &Sprites::procedural());
        assert_eq!(band.max_center - band.min_center, MIN_GATE_BAND);
    }

    #[test]
    fn test_wide_band_is_untouched() {
        let settings = Settings {
            ground_line: 500.0,
            ..Default::default()
        };
        let band = GateBand::new(&settings, &Sprites::procedural());
        assert_eq!(band.max_center, 500.0 - 161.0);
        assert!(band.max_center - band.min_center > MIN_GATE_BAND);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let settings = Settings {
            gate_jitter: Some(GateJitter {
                probability: 1.0,
                max_offset: 500.0,
            }),
            ..Default::default()
        };
        let band = GateBand::new(&settings, &Sprites::procedural());
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let c = band.draw(&mut rng);
            assert!(c >= band.min_center && c <= band.max_center);
        }
    }

    #[test]
    fn test_interval_timer() {
        let settings = Settings {
            spawn_policy: SpawnPolicy::Interval { frames: 3 },
            ..Default::default()
        };
        let mut spawner = Spawner::new(&settings, &Sprites::procedural());
        let fired: Vec<bool> = (0..7).map(|_| spawner.on_frame()).collect();
        assert_eq!(fired, [false, false, true, false, false, true, false]);
        assert_eq!(spawner.spawn_x, SCREEN_WIDTH + SPAWN_OFFSET);
    }

    #[test]
    fn test_on_pass_never_fires_timer() {
        let settings = Settings {
            spawn_policy: SpawnPolicy::OnPass,
            ..Default::default()
        };
        let mut spawner = Spawner::new(&settings, &Sprites::procedural());
        assert!((0..500).all(|_| !spawner.on_frame()));
        assert!(spawner.spawns_on_pass());
    }
}
