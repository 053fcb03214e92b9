//! Label items and caption configuration

use crate::{pt_to_mm, Symbology};
use serde::{Deserialize, Serialize};

/// Default module scale handed to the encoder
pub const DEFAULT_SCALE: f64 = 3.0;

/// Default bar height for linear symbologies, in encoder units
pub const DEFAULT_BAR_HEIGHT: f64 = 50.0;

/// Default font for the encoder-drawn human readable text
pub const DEFAULT_NATIVE_FONT: &str = "OCR-B";
pub const DEFAULT_NATIVE_SIZE: f64 = 10.0;

/// Default font for engine-drawn custom captions
pub const DEFAULT_CUSTOM_FONT: &str = "Arial";
pub const DEFAULT_CUSTOM_SIZE: f64 = 12.0;

pub const NATIVE_SIZE_RANGE: (f64, f64) = (6.0, 36.0);
pub const CUSTOM_SIZE_RANGE: (f64, f64) = (8.0, 72.0);
pub const CAPTION_GAP_RANGE: (f64, f64) = (0.0, 80.0);

/// Line height factor applied to caption font sizes
pub const CAPTION_LINE_HEIGHT: f64 = 1.2;

fn clamp_to(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

/// Human readable text shown with a symbol.
///
/// Sizes and gaps are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Caption {
    /// Symbol only
    #[default]
    NoCaption,
    /// Text drawn by the encoder as part of the symbol image
    NativeText { font: String, size: f64, gap: f64 },
    /// Text drawn by the engine in a band reserved beneath the symbol
    CustomCaption {
        text: String,
        font: String,
        size: f64,
        gap: f64,
    },
}

impl Caption {
    /// Native text with clamped size and gap
    pub fn native(font: impl Into<String>, size: f64, gap: f64) -> Self {
        Caption::NativeText {
            font: font.into(),
            size: clamp_to(size, NATIVE_SIZE_RANGE),
            gap: clamp_to(gap, CAPTION_GAP_RANGE),
        }
    }

    /// Custom caption with clamped size and gap
    pub fn custom(text: impl Into<String>, font: impl Into<String>, size: f64, gap: f64) -> Self {
        Caption::CustomCaption {
            text: text.into(),
            font: font.into(),
            size: clamp_to(size, CUSTOM_SIZE_RANGE),
            gap: clamp_to(gap, CAPTION_GAP_RANGE),
        }
    }

    pub fn default_native() -> Self {
        Self::native(DEFAULT_NATIVE_FONT, DEFAULT_NATIVE_SIZE, 0.0)
    }

    pub fn default_custom(text: impl Into<String>) -> Self {
        Self::custom(text, DEFAULT_CUSTOM_FONT, DEFAULT_CUSTOM_SIZE, 2.0)
    }

    /// Re-apply the ranges, for values that arrived through deserialization
    pub fn clamped(self) -> Self {
        match self {
            Caption::NoCaption => Caption::NoCaption,
            Caption::NativeText { font, size, gap } => Caption::native(font, size, gap),
            Caption::CustomCaption {
                text,
                font,
                size,
                gap,
            } => Caption::custom(text, font, size, gap),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Caption::NativeText { .. })
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Caption::CustomCaption { .. })
    }

    /// Height reserved under the symbol for an engine-drawn caption, in mm.
    ///
    /// Native text lives inside the encoded image, so it reserves nothing.
    pub fn reserved_height_mm(&self) -> f64 {
        match self {
            Caption::CustomCaption { size, gap, .. } => {
                pt_to_mm(size * CAPTION_LINE_HEIGHT + gap)
            }
            _ => 0.0,
        }
    }
}

/// One printable label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelItem {
    pub symbology: Symbology,
    pub text: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_bar_height")]
    pub height: f64,
    #[serde(default)]
    pub caption: Caption,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_bar_height() -> f64 {
    DEFAULT_BAR_HEIGHT
}

impl LabelItem {
    pub fn new(symbology: impl Into<Symbology>, text: impl Into<String>) -> Self {
        Self {
            symbology: symbology.into(),
            text: text.into(),
            scale: DEFAULT_SCALE,
            height: DEFAULT_BAR_HEIGHT,
            caption: Caption::NoCaption,
        }
    }

    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.caption = caption;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Text after symbology-specific normalization
    pub fn encoded_text(&self) -> String {
        self.symbology.normalize_input(&self.text)
    }

    /// Text of an engine-drawn caption, falling back to the label text
    /// when the custom text is empty
    pub fn caption_text(&self) -> Option<&str> {
        match &self.caption {
            Caption::CustomCaption { text, .. } if text.trim().is_empty() => Some(&self.text),
            Caption::CustomCaption { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether the encoder should draw its own text under the bars
    pub fn includes_native_text(&self) -> bool {
        self.caption.is_native()
    }
}
