//! Sound effects
//!
//! The simulation only emits `GameEvent`s; this module maps them to sound
//! cues and hands those to whatever sink the host provides. The headless
//! build has no audio device, so the shipped sinks log or record.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Actor flapped
    Wing,
    /// Gate cleared
    Point,
    /// Actor hit a gate or the ceiling
    Hit,
    /// Follows the hit
    Die,
    /// Actor reached the ground
    Thud,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Wing => "wing",
            Sound::Point => "point",
            Sound::Hit => "hit",
            Sound::Die => "die",
            Sound::Thud => "thud",
        }
    }
}

/// Sounds triggered by one simulation event, in play order
pub fn sounds_for(event: GameEvent) -> &'static [Sound] {
    match event {
        GameEvent::Flapped => &[Sound::Wing],
        GameEvent::Scored { .. } => &[Sound::Point],
        GameEvent::Collided => &[Sound::Hit, Sound::Die],
        GameEvent::Landed => &[Sound::Thud],
    }
}

/// Something that can play sound cues
pub trait AudioSink {
    fn play(&mut self, sound: Sound);

    /// Play every cue for `event`
    fn play_event(&mut self, event: GameEvent) {
        for &sound in sounds_for(event) {
            self.play(sound);
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sound: Sound) {}
}

/// Writes cues to the log at debug level, honouring volume and mute
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, sound: Sound) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::debug!("sound {} at volume {:.2}", sound.as_str(), vol);
    }
}

/// Remembers every cue it was asked to play
#[derive(Debug, Default, Clone)]
pub struct SoundLog {
    pub played: Vec<Sound>,
}

impl AudioSink for SoundLog {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}
