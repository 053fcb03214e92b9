//! Caption band reservation and measured text fit

use serde::{Deserialize, Serialize};
use sheet_model::{pt_to_mm, Caption, LabelItem, Rect, Vec2, CAPTION_LINE_HEIGHT};

/// Smallest font size a caption is shrunk to in steps
pub const MIN_CAPTION_SIZE: f64 = 4.0;

/// Shrink step used while fitting
pub const CAPTION_SIZE_STEP: f64 = 0.5;

/// Largest share of a draw rectangle's height a caption may take
pub const MAX_CAPTION_SHARE: f64 = 0.5;

/// Measures rendered text width
pub trait TextMeasurer {
    fn text_width_mm(&self, text: &str, font: &str, size_pt: f64) -> f64;
}

/// Width estimate from an average glyph advance.
///
/// Used by previews that have no font metrics; document writers supply
/// their own measurer.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMeasurer {
    /// Average advance as a fraction of the em size
    pub average_em: f64,
}

impl Default for ApproximateMeasurer {
    fn default() -> Self {
        Self { average_em: 0.55 }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn text_width_mm(&self, text: &str, _font: &str, size_pt: f64) -> f64 {
        pt_to_mm(text.chars().count() as f64 * self.average_em * size_pt)
    }
}

/// Result of fitting caption text into a width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionFit {
    pub size_pt: f64,
    pub width_mm: f64,
}

/// Shrink the font until `text` fits `available_mm`.
///
/// The size steps down by half a point until it reaches
/// [`MIN_CAPTION_SIZE`]; if the text still overflows the size is scaled
/// so the measured width equals the available width. The container is
/// never widened.
pub fn fit_caption(
    text: &str,
    font: &str,
    size_pt: f64,
    available_mm: f64,
    measurer: &dyn TextMeasurer,
) -> CaptionFit {
    let mut size = size_pt;
    let mut width = measurer.text_width_mm(text, font, size);
    if available_mm <= 0.0 {
        return CaptionFit {
            size_pt: 0.0,
            width_mm: 0.0,
        };
    }

    while width > available_mm && size - CAPTION_SIZE_STEP >= MIN_CAPTION_SIZE {
        size -= CAPTION_SIZE_STEP;
        width = measurer.text_width_mm(text, font, size);
    }

    if width > available_mm && width > 0.0 {
        size *= available_mm / width;
        width = measurer.text_width_mm(text, font, size).min(available_mm);
    }

    CaptionFit {
        size_pt: size,
        width_mm: width,
    }
}

/// Band under a symbol reserved for an engine-drawn caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionBand {
    /// Band rectangle, inner-area relative
    pub rect: Rect,
    pub text: String,
    pub font: String,
    /// Configured size before fitting
    pub size_pt: f64,
    pub gap_pt: f64,
}

impl CaptionBand {
    /// Band for an item whose draw rectangle is `frame`, or `None` when the
    /// item has no engine-drawn caption
    pub fn for_item(item: &LabelItem, frame: Rect) -> Option<Self> {
        let Caption::CustomCaption {
            font, size, gap, ..
        } = &item.caption
        else {
            return None;
        };
        let text = item.caption_text()?.to_string();
        let height = reservation_mm(&item.caption, frame.height);
        Some(Self {
            rect: Rect::new(frame.x, frame.bottom() - height, frame.width, height),
            text,
            font: font.clone(),
            size_pt: *size,
            gap_pt: *gap,
        })
    }

    /// Fitted size and the baseline origin of the centered text line
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> CaptionLine {
        let gap_mm = pt_to_mm(self.gap_pt).min(self.rect.height);
        let line_room = (self.rect.height - gap_mm).max(0.0);
        // a band capped by the frame height also caps the font
        let size_cap = line_room / pt_to_mm(CAPTION_LINE_HEIGHT);
        let size = self.size_pt.min(size_cap);
        let fit = fit_caption(&self.text, &self.font, size, self.rect.width, measurer);
        let line_height = pt_to_mm(fit.size_pt * CAPTION_LINE_HEIGHT);
        let top = self.rect.y + gap_mm;
        // baseline sits at the font size below the line top, leaving the
        // line-height remainder as descender room
        let baseline = top + (line_height + pt_to_mm(fit.size_pt)) / 2.0;
        CaptionLine {
            origin: Vec2::new(
                self.rect.x + (self.rect.width - fit.width_mm) / 2.0,
                baseline.min(self.rect.bottom()),
            ),
            fit,
        }
    }
}

/// A positioned caption line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLine {
    /// Left end of the baseline, inner-area relative
    pub origin: Vec2,
    pub fit: CaptionFit,
}

/// Height taken from a draw rectangle of `draw_height` mm for the caption
pub fn reservation_mm(caption: &Caption, draw_height: f64) -> f64 {
    caption
        .reserved_height_mm()
        .min(draw_height.max(0.0) * MAX_CAPTION_SHARE)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAdvance(f64);

    impl TextMeasurer for FixedAdvance {
        fn text_width_mm(&self, text: &str, _font: &str, size_pt: f64) -> f64 {
            text.len() as f64 * self.0 * size_pt
        }
    }

    #[test]
    fn test_fit_keeps_size_when_it_fits() {
        let fit = fit_caption("abc", "Arial", 12.0, 100.0, &FixedAdvance(0.1));
        assert_eq!(fit.size_pt, 12.0);
        assert!((fit.width_mm - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_fit_shrinks_in_steps() {
        // 10 chars * 0.1 mm/pt: width = size mm, needs size <= 9
        let fit = fit_caption("0123456789", "Arial", 12.0, 9.0, &FixedAdvance(0.1));
        assert_eq!(fit.size_pt, 9.0);
        assert!(fit.width_mm <= 9.0);
    }

    #[test]
    fn test_fit_never_overflows() {
        let long = "x".repeat(500);
        let fit = fit_caption(&long, "Arial", 12.0, 20.0, &FixedAdvance(0.1));
        assert!(fit.size_pt < MIN_CAPTION_SIZE);
        assert!(fit.width_mm <= 20.0 + 1e-9);
    }

    #[test]
    fn test_zero_width() {
        let fit = fit_caption("abc", "Arial", 12.0, 0.0, &FixedAdvance(0.1));
        assert_eq!(fit.width_mm, 0.0);
    }

    #[test]
    fn test_band_for_item() {
        let frame = Rect::new(0.0, 0.0, 60.0, 30.0);
        let item = LabelItem::new("code128", "ABC").with_caption(Caption::custom("", "Arial", 10.0, 0.0));
        let band = CaptionBand::for_item(&item, frame).unwrap();
        assert_eq!(band.text, "ABC");
        assert!((band.rect.height - pt_to_mm(12.0)).abs() < 1e-9);
        assert!((band.rect.bottom() - 30.0).abs() < 1e-9);

        let native = LabelItem::new("code128", "ABC").with_caption(Caption::default_native());
        assert!(CaptionBand::for_item(&native, frame).is_none());
    }

    #[test]
    fn test_reservation_capped() {
        let caption = Caption::custom("x", "Arial", 72.0, 80.0);
        assert_eq!(reservation_mm(&caption, 10.0), 5.0);
    }

    #[test]
    fn test_layout_centers_line() {
        let item = LabelItem::new("code128", "ABC").with_caption(Caption::custom("AB", "Arial", 10.0, 2.0));
        let band = CaptionBand::for_item(&item, Rect::new(10.0, 0.0, 40.0, 40.0)).unwrap();
        let line = band.layout(&ApproximateMeasurer::default());
        let left = line.origin.x - band.rect.x;
        let right = band.rect.right() - (line.origin.x + line.fit.width_mm);
        assert!((left - right).abs() < 1e-9);
        assert!(line.origin.y > band.rect.y && line.origin.y <= band.rect.bottom());
    }
}
