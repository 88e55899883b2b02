//! Shared primitive types used across the entire game core.

use serde::{Deserialize, Serialize};

/// A frame counter. One frame = one call to `GameSession::frame`.
pub type Frame = u64;

/// Seconds of simulated time.
pub type Seconds = f64;

/// In-game currency.
pub type Money = f64;

/// Stable identifier for a special collectible on screen.
pub type SpecialId = u64;

/// The folder name used under the platform's user data directory.
pub const APP_NAME: &str = "TouchTheGrass";

/// A screen-space point supplied by the presentation shell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An sRGB colour for particles and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);
