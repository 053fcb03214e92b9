//! Symbol requests and the intrinsic-size seam
//!
//! The layout engine never draws symbols. It only needs the aspect ratio of
//! the image an encoder would produce, which it asks for through
//! [`SymbolMetrics`].

use serde::{Deserialize, Serialize};
use sheet_model::{Caption, LabelItem, Rotation, SheetSettings, Size, Symbology};

/// Encoder-drawn text settings carried into a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTextStyle {
    pub font: String,
    pub size: f64,
    pub gap: f64,
}

/// Everything an encoder needs to produce one symbol image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRequest {
    pub symbology: Symbology,
    /// Text after symbology-specific normalization
    pub text: String,
    pub rotation: Rotation,
    /// Module scale, already multiplied by the page scale
    pub scale: f64,
    /// Bar height for linear symbologies
    pub bar_height: f64,
    #[serde(default)]
    pub native_text: Option<NativeTextStyle>,
}

impl SymbolRequest {
    pub fn from_item(item: &LabelItem, settings: &SheetSettings) -> Self {
        let native_text = match &item.caption {
            Caption::NativeText { font, size, gap } => Some(NativeTextStyle {
                font: font.clone(),
                size: *size,
                gap: *gap,
            }),
            _ => None,
        };
        Self {
            symbology: item.symbology.clone(),
            text: item.encoded_text(),
            rotation: settings.rotation,
            scale: item.scale * settings.page_scale,
            bar_height: item.height,
            native_text,
        }
    }

    pub fn is_area_fill(&self) -> bool {
        self.symbology.is_area_fill()
    }
}

/// A symbol that could not be encoded.
///
/// Faults are local to one slot; they never abort a layout or an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFault {
    pub message: String,
}

impl SymbolFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SymbolFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Source of intrinsic symbol sizes
pub trait SymbolMetrics {
    /// Unscaled size of the encoded image; only the ratio is used
    fn intrinsic_size(&self, request: &SymbolRequest) -> Result<Size, SymbolFault>;
}

/// Metrics for callers that have no encoder attached.
///
/// Area-fill symbols are reported square and linear symbols use a fixed
/// width per encoded character.
#[derive(Debug, Clone, Copy, Default)]
pub struct NominalMetrics;

impl NominalMetrics {
    /// Modules per character for linear symbols
    const MODULES_PER_CHAR: f64 = 11.0;
    /// Fixed quiet zone plus start/stop patterns, in modules
    const LINEAR_OVERHEAD: f64 = 35.0;
}

impl SymbolMetrics for NominalMetrics {
    fn intrinsic_size(&self, request: &SymbolRequest) -> Result<Size, SymbolFault> {
        if request.text.is_empty() {
            return Err(SymbolFault::new("nothing to encode"));
        }
        let size = if request.is_area_fill() {
            Size::new(1.0, 1.0)
        } else {
            let chars = request.text.chars().count() as f64;
            let width = chars * Self::MODULES_PER_CHAR + Self::LINEAR_OVERHEAD;
            Size::new(width, request.bar_height.max(1.0))
        };
        Ok(match request.rotation.is_quarter_turn() {
            true => Size::new(size.height, size.width),
            false => size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_item() {
        let item = LabelItem::new("ean13", "590-1234-12345-7")
            .with_scale(2.0)
            .with_caption(Caption::default_native());
        let settings = SheetSettings {
            page_scale: 1.5,
            rotation: Rotation::Right,
            ..SheetSettings::default()
        };
        let request = SymbolRequest::from_item(&item, &settings);
        assert_eq!(request.text, "5901234123457");
        assert_eq!(request.scale, 3.0);
        assert_eq!(request.rotation, Rotation::Right);
        assert_eq!(request.native_text.as_ref().map(|s| s.size), Some(10.0));
    }

    #[test]
    fn test_custom_caption_is_not_native() {
        let item = LabelItem::new("code128", "A").with_caption(Caption::default_custom("x"));
        let request = SymbolRequest::from_item(&item, &SheetSettings::default());
        assert!(request.native_text.is_none());
    }

    #[test]
    fn test_nominal_metrics() {
        let settings = SheetSettings::default();
        let qr = SymbolRequest::from_item(&LabelItem::new("qrcode", "hello"), &settings);
        assert_eq!(NominalMetrics.intrinsic_size(&qr).unwrap(), Size::new(1.0, 1.0));

        let linear = SymbolRequest::from_item(&LabelItem::new("code128", "AB"), &settings);
        let size = NominalMetrics.intrinsic_size(&linear).unwrap();
        assert!(size.width > size.height);

        let empty = SymbolRequest::from_item(&LabelItem::new("code128", ""), &settings);
        assert!(NominalMetrics.intrinsic_size(&empty).is_err());
    }

    #[test]
    fn test_nominal_metrics_rotation_swaps_axes() {
        let settings = SheetSettings {
            rotation: Rotation::Left,
            ..SheetSettings::default()
        };
        let linear = SymbolRequest::from_item(&LabelItem::new("code128", "AB"), &settings);
        let size = NominalMetrics.intrinsic_size(&linear).unwrap();
        assert!(size.height > size.width);
    }
}
