//! Snapping and alignment geometry

use serde::{Deserialize, Serialize};
use sheet_model::{Rect, Size, Vec2};

/// Round to the nearest multiple of `increment`; a non-positive increment
/// disables snapping
#[inline]
pub fn snap_value(value: f64, increment: f64) -> f64 {
    if increment > 0.0 && increment.is_finite() {
        (value / increment).round() * increment
    } else {
        value
    }
}

#[inline]
pub fn snap_point(point: Vec2, increment: f64) -> Vec2 {
    Vec2::new(snap_value(point.x, increment), snap_value(point.y, increment))
}

/// Canonical alignment positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    CenterH,
    Top,
    CenterV,
    CenterBoth,
}

/// What an alignment is measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignReference {
    /// The label's home cell
    #[default]
    Cell,
    /// The whole inner page area
    Page,
}

impl Alignment {
    /// Aligned origin for a rectangle of `size`.
    ///
    /// Only the axes the alignment names are recomputed; the other axis
    /// keeps `current`.
    pub fn apply(self, current: Vec2, size: Size, cell: Rect, inner: Size, reference: AlignReference) -> Vec2 {
        let area = match reference {
            AlignReference::Cell => cell,
            AlignReference::Page => Rect::new(0.0, 0.0, inner.width, inner.height),
        };
        let left = area.x;
        let center_x = area.x + (area.width - size.width) / 2.0;
        let top = area.y;
        let center_y = area.y + (area.height - size.height) / 2.0;
        match self {
            Alignment::Left => Vec2::new(left, current.y),
            Alignment::CenterH => Vec2::new(center_x, current.y),
            Alignment::Top => Vec2::new(current.x, top),
            Alignment::CenterV => Vec2::new(current.x, center_y),
            Alignment::CenterBoth => Vec2::new(center_x, center_y),
        }
    }
}
