//! Frame timing.
//!
//! The driver owns a `FrameClock` and feeds it timestamps; the game only ever
//! sees the resulting `FrameTime`. Tests pass hand-picked timestamps instead
//! of reading a real clock.

use std::time::Instant;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the time source started.
    pub now: f64,
    /// Seconds since the previous frame.
    pub dt: f32,
}

impl FrameTime {
    pub fn new(now: f64, dt: f32) -> Self {
        Self { now, dt }
    }
}

/// Source of monotonic timestamps in seconds.
pub trait TimeSource {
    fn now_secs(&self) -> f64;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    start: Instant,
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicTime {
    fn now_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Turns successive timestamps into frame deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<f64>,
}

impl FrameClock {
    /// Advances to `now`. The first tick has `dt == 0`; time running
    /// backwards also yields `dt == 0`.
    pub fn tick(&mut self, now: f64) -> FrameTime {
        let dt = match self.previous {
            Some(prev) if now > prev => (now - prev) as f32,
            _ => 0.0,
        };
        self.previous = Some(now);
        FrameTime { now, dt }
    }

    pub fn tick_from(&mut self, source: &impl TimeSource) -> FrameTime {
        self.tick(source.now_secs())
    }
}
