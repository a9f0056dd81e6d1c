//! Frame timing.

use std::time::Instant;

/// Real-time delta clock for the frame loop.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous restart (or construction).
    pub fn restart(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Cadence counter for enemy fire, driven by simulated time.
///
/// Missed intervals are not queued up: a slow frame fires at most once and
/// the counter restarts from zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl ShotTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Adds `dt` and reports whether the interval has been reached.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
