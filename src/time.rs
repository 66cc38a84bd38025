//! Monotonic frame timing

use std::time::Instant;

/// Measures the time between consecutive frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Creates a clock that has not ticked yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick; the first tick returns 0
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self
            .last
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }

    /// Forgets the previous tick, e.g. after the loop was suspended
    pub fn reset(&mut self) {
        self.last = None;
    }
}
