//! Frame pacing

use std::thread;
use std::time::{Duration, Instant};

/// Blocking frame limiter
#[derive(Debug)]
pub struct FrameClock {
    frame_time: Option<Duration>,
    last: Instant,
}

impl FrameClock {
    /// `None` runs unthrottled
    pub fn new(fps: Option<u32>) -> Self {
        Self {
            frame_time: fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            last: Instant::now(),
        }
    }

    pub fn unthrottled() -> Self {
        Self::new(None)
    }

    #[inline]
    pub fn is_throttled(&self) -> bool {
        self.frame_time.is_some()
    }

    /// Sleep out the remainder of the current frame
    pub fn tick(&mut self) {
        if let Some(frame_time) = self.frame_time {
            let elapsed = self.last.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
        self.last = Instant::now();
    }

    /// Fixed pause used between death-fall steps
    pub fn pause(&self, ms: u64) {
        if ms > 0 && self.is_throttled() {
            thread::sleep(Duration::from_millis(ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_is_unthrottled() {
        assert!(!FrameClock::new(Some(0)).is_throttled());
        assert!(!FrameClock::unthrottled().is_throttled());
        assert!(FrameClock::new(Some(60)).is_throttled());
    }

    #[test]
    fn test_throttled_tick_waits_a_frame() {
        let mut clock = FrameClock::new(Some(100));
        let start = Instant::now();
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
