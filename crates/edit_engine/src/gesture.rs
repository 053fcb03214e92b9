//! Pointer gestures
//!
//! A gesture captures the values it edits when it starts; every update
//! applies the total pointer delta to those origins. Repeated clamping
//! therefore never accumulates drift.

use serde::{Deserialize, Serialize};
use sheet_model::{ItemId, SizeOverride, Vec2};

/// Axis a resize drag acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeAxis {
    X,
    Y,
    Both,
}

/// Kind of the gesture in progress, for UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize,
    Marquee,
}

/// Multipliers a resize gesture started from
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResizeOrigin {
    /// Sheet-wide multipliers under edit-all
    Global(SizeOverride),
    Items(Vec<(ItemId, SizeOverride)>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Gesture {
    Move {
        origins: Vec<(ItemId, Vec2)>,
    },
    Resize {
        axis: ResizeAxis,
        origin: ResizeOrigin,
    },
    Marquee {
        page: usize,
        anchor: Vec2,
        /// Selection to union with, empty when the marquee replaces
        base: Vec<ItemId>,
    },
}

impl Gesture {
    pub(crate) fn kind(&self) -> GestureKind {
        match self {
            Gesture::Move { .. } => GestureKind::Move,
            Gesture::Resize { .. } => GestureKind::Resize,
            Gesture::Marquee { .. } => GestureKind::Marquee,
        }
    }
}

/// Apply a cell-normalized drag delta to a multiplier pair.
///
/// One cell width of horizontal drag adds 1.0 to X and one cell height of
/// vertical drag adds 1.0 to Y. `Both` moves both axes by the mean of the
/// two normalized deltas. With `lock_aspect` the untouched axis follows the
/// dragged one. The result is always clamped.
pub fn resize_multipliers(origin: SizeOverride, normalized: Vec2, axis: ResizeAxis, lock_aspect: bool) -> SizeOverride {
    let (mut x, mut y) = (origin.x, origin.y);
    match axis {
        ResizeAxis::X => x += normalized.x,
        ResizeAxis::Y => y += normalized.y,
        ResizeAxis::Both => {
            let mean = (normalized.x + normalized.y) / 2.0;
            x += mean;
            y += mean;
        }
    }
    let mut result = SizeOverride::new(x, y);
    if lock_aspect {
        result = match axis {
            ResizeAxis::Y => SizeOverride::new(result.y, result.y),
            _ => SizeOverride::new(result.x, result.x),
        };
    }
    result
}
