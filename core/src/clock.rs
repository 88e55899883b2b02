//! Frame clock. Owns the frame counter, the delta-time clamp and pause.

use crate::types::{Frame, Seconds};
use serde::{Deserialize, Serialize};

/// Largest step the simulation will take in one frame. A stall longer than
/// this (window drag, device sleep) is simply lost.
pub const MAX_FRAME_STEP: Seconds = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameClock {
    pub current_frame: Frame,
    pub elapsed:       Seconds,
    pub paused:        bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            current_frame: 0,
            elapsed:       0.0,
            paused:        false,
        }
    }

    /// Advance one frame with the shell's raw delta. Returns the frame number
    /// and the clamped step actually simulated.
    pub fn advance(&mut self, raw_dt: Seconds) -> (Frame, Seconds) {
        self.current_frame += 1;
        let dt = if self.paused { 0.0 } else { clamp_step(raw_dt) };
        self.elapsed += dt;
        (self.current_frame, dt)
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }
}

impl Default for FrameClock {
    fn default() -> Self { Self::new() }
}

/// Clamp a raw delta into `[0, MAX_FRAME_STEP]`. NaN and negative deltas
/// (clock skew) become zero.
pub fn clamp_step(raw_dt: Seconds) -> Seconds {
    if raw_dt.is_nan() || raw_dt <= 0.0 {
        0.0
    } else {
        raw_dt.min(MAX_FRAME_STEP)
    }
}
