//! Export quality tiers
//!
//! Each tier fixes the raster density used for the intermediate symbol
//! bitmaps and the bounds that keep tiny labels legible and huge labels
//! affordable.

use serde::{Deserialize, Serialize};
use sheet_model::Size;

/// Raster density preset for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Lowest,
    Compact,
    #[default]
    Medium,
    High,
}

/// Pixel dimensions of a symbol bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Lowest,
        QualityTier::Compact,
        QualityTier::Medium,
        QualityTier::High,
    ];

    pub fn px_per_mm(&self) -> f64 {
        match self {
            QualityTier::Lowest => 4.0,
            QualityTier::Compact => 8.0,
            QualityTier::Medium => 12.0,
            QualityTier::High => 24.0,
        }
    }

    /// Smallest allowed bitmap side in pixels
    pub fn min_px(&self) -> u32 {
        match self {
            QualityTier::Lowest => 64,
            QualityTier::Compact => 96,
            QualityTier::Medium => 128,
            QualityTier::High => 256,
        }
    }

    /// Largest allowed bitmap side in pixels
    pub fn max_px(&self) -> u32 {
        match self {
            QualityTier::Lowest => 800,
            QualityTier::Compact => 1600,
            QualityTier::Medium => 2400,
            QualityTier::High => 4096,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Lowest => "lowest",
            QualityTier::Compact => "compact",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(name))
    }

    /// Bitmap size for a symbol drawn at `size_mm`.
    ///
    /// Both sides scale by the same factor, so the aspect ratio survives
    /// the clamping. The upper bound wins when a very thin symbol cannot
    /// satisfy both.
    pub fn raster_size(&self, size_mm: Size) -> RasterSize {
        let width = (size_mm.width * self.px_per_mm()).max(0.0);
        let height = (size_mm.height * self.px_per_mm()).max(0.0);
        let longer = width.max(height);
        let shorter = width.min(height);
        let max = self.max_px() as f64;
        let min = self.min_px() as f64;

        let mut factor = 1.0;
        if longer > max {
            factor = max / longer;
        } else if shorter > 0.0 && shorter < min {
            factor = (min / shorter).min(max / longer);
        }

        RasterSize {
            width: ((width * factor).round() as u32).max(1),
            height: ((height * factor).round() as u32).max(1),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(QualityTier::Lowest.px_per_mm(), 4.0);
        assert_eq!(QualityTier::High.max_px(), 4096);
        assert_eq!(QualityTier::default(), QualityTier::Medium);
        assert_eq!(QualityTier::from_name("Compact"), Some(QualityTier::Compact));
        assert_eq!(QualityTier::from_name("ultra"), None);
        assert_eq!(QualityTier::High.to_string(), "high");
    }

    #[test]
    fn test_raster_size_plain() {
        let size = QualityTier::Medium.raster_size(Size::new(40.0, 20.0));
        assert_eq!(size, RasterSize { width: 480, height: 240 });
    }

    #[test]
    fn test_raster_size_upscales_small_symbols() {
        // 5 x 10 mm at 4 px/mm is 20 x 40 px; the short side is lifted to 64
        let size = QualityTier::Lowest.raster_size(Size::new(5.0, 10.0));
        assert_eq!(size, RasterSize { width: 64, height: 128 });
    }

    #[test]
    fn test_raster_size_caps_large_symbols() {
        let size = QualityTier::High.raster_size(Size::new(400.0, 100.0));
        assert_eq!(size, RasterSize { width: 4096, height: 1024 });
    }

    proptest! {
        #[test]
        fn prop_raster_size_within_bounds(
            w in 0.5..500.0f64,
            h in 0.5..500.0f64,
            tier in prop::sample::select(QualityTier::ALL.to_vec()),
        ) {
            let size = tier.raster_size(Size::new(w, h));
            prop_assert!(size.width <= tier.max_px() && size.height <= tier.max_px());
            let ratio = w / h;
            let raster_ratio = size.width as f64 / size.height as f64;
            // rounding to whole pixels is the only distortion
            let tolerance = 1.0 / size.width.min(size.height) as f64 + 1e-9;
            prop_assert!((raster_ratio / ratio - 1.0).abs() <= tolerance * 2.0);
        }
    }
}
