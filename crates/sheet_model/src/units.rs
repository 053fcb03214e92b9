//! Millimeter geometry and unit conversions
//!
//! All page geometry is expressed in millimeters. Screen rendering converts
//! to pixels with a pixels-per-millimeter density, and document export
//! converts to PDF points.

use serde::{Deserialize, Serialize};

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// PDF points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert millimeters to pixels at the given density
#[inline]
pub fn mm_to_px(value_mm: f64, px_per_mm: f64) -> f64 {
    value_mm * px_per_mm
}

/// Convert pixels to millimeters at the given density
#[inline]
pub fn px_to_mm(value_px: f64, px_per_mm: f64) -> f64 {
    if px_per_mm == 0.0 {
        0.0
    } else {
        value_px / px_per_mm
    }
}

/// Convert millimeters to PDF points
#[inline]
pub fn mm_to_pt(value_mm: f64) -> f64 {
    value_mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Convert PDF points (also font sizes) to millimeters
#[inline]
pub fn pt_to_mm(value_pt: f64) -> f64 {
    value_pt * MM_PER_INCH / POINTS_PER_INCH
}

/// Pixel density for a dots-per-inch value
#[inline]
pub fn px_per_mm_from_dpi(dpi: f64) -> f64 {
    dpi / MM_PER_INCH
}

/// A 2D offset or point in millimeters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair in millimeters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for a degenerate size
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// A rectangle in millimeters, origin at the top-left
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if another rectangle lies fully inside this one, with a small
    /// tolerance for floating point drift
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Check if two rectangles overlap (touching edges count as overlap)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Rectangle spanning two corner points in any order
    pub fn from_corners(a: Vec2, b: Vec2) -> Rect {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Rect::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Scale every component by a factor (unit conversion)
    pub fn scale(&self, factor: f64) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// Largest rectangle with the intrinsic aspect ratio that fits centered
/// inside `container`.
///
/// A zero intrinsic dimension means the aspect is unknown and the container
/// itself is returned.
pub fn fit_rect(container: Rect, intrinsic_width: f64, intrinsic_height: f64) -> Rect {
    if intrinsic_width <= 0.0 || intrinsic_height <= 0.0 {
        return container;
    }
    let scale = (container.width / intrinsic_width).min(container.height / intrinsic_height);
    let width = intrinsic_width * scale;
    let height = intrinsic_height * scale;
    Rect::new(
        container.x + (container.width - width) / 2.0,
        container.y + (container.height - height) / 2.0,
        width,
        height,
    )
}

/// Clamp `value` into `[0, max]`, collapsing to 0 when the range is empty
#[inline]
pub fn clamp_span(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}
