//! Size multipliers and free-form positions

use crate::Vec2;
use serde::{Deserialize, Serialize};

pub const MIN_MULTIPLIER: f64 = 0.2;
pub const MAX_MULTIPLIER: f64 = 5.0;

/// Clamp one multiplier into the allowed range
#[inline]
pub fn clamp_multiplier(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    }
}

/// Per-axis size multiplier relative to the home cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeOverride {
    pub x: f64,
    pub y: f64,
}

impl SizeOverride {
    pub const IDENTITY: SizeOverride = SizeOverride { x: 1.0, y: 1.0 };

    /// Create a multiplier pair, clamping both axes
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_multiplier(x),
            y: clamp_multiplier(y),
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn clamped(self) -> Self {
        Self::new(self.x, self.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for SizeOverride {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Free-form position of a label's draw rectangle, relative to the inner area
pub type PositionOverride = Vec2;
