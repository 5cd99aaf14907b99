//! Frame timing
//!
//! Converts monotonic millisecond timestamps (`requestAnimationFrame`,
//! `Instant`) into frame deltas, clamped so a stalled tab does not dump a
//! huge backlog into the simulation.

use std::time::Duration;

use crate::consts::MAX_FRAME_MS;

#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call. The first call returns zero.
    pub fn delta(&mut self, now_ms: f64) -> Duration {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => (now_ms - last).min(MAX_FRAME_MS as f64),
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        Duration::from_micros((dt * 1000.0).round() as u64)
    }

    /// Forget the last timestamp (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
