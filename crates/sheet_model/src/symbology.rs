//! Symbology identifiers and sheet rotation

use serde::{Deserialize, Serialize};

/// Symbologies whose image fills a rectangular area and scales uniformly
const AREA_FILL_SET: &[&str] = &["qrcode", "datamatrix", "pdf417", "azteccode"];

/// Symbology ids that only accept digits; separators are stripped on input
const NUMERIC_PREFIXES: &[&str] = &[
    "ean13", "ean8", "upca", "upce", "itf14", "isbn", "isbn10", "isbn13", "postnet", "kix", "itf",
];

/// Encoder id aliases for symbologies that are known by more than one name
const ALIASES: &[(&str, &str)] = &[("rm4scc", "royalmail")];

/// A barcode/QR symbology id (e.g. `ean13`, `code128`, `qrcode`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbology(String);

impl Symbology {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a 2D symbology that fills its area
    pub fn is_area_fill(&self) -> bool {
        AREA_FILL_SET.contains(&self.0.as_str())
    }

    /// Whether this is a 1D symbology whose width follows its bar pattern
    pub fn is_linear(&self) -> bool {
        !self.is_area_fill()
    }

    /// Id to hand to the symbol encoder, with aliases resolved
    pub fn encoder_id(&self) -> &str {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == self.0)
            .map(|(_, target)| *target)
            .unwrap_or(&self.0)
    }

    /// Normalize user text for this symbology.
    ///
    /// Numeric symbologies drop every non-digit so that `590-1234-12345-7`
    /// encodes as `5901234123457`. Everything else is only trimmed.
    pub fn normalize_input(&self, text: &str) -> String {
        let trimmed = text.trim();
        if NUMERIC_PREFIXES.iter().any(|prefix| self.0.starts_with(prefix)) {
            trimmed.chars().filter(|c| c.is_ascii_digit()).collect()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for Symbology {
    fn default() -> Self {
        Self::new("code128")
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbology {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Rotation applied to every symbol on the sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "90")]
    Right,
    #[serde(rename = "180")]
    Inverted,
    #[serde(rename = "270")]
    Left,
}

impl Rotation {
    /// Map a degree value; anything that is not a quarter turn means no rotation
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Right,
            180 => Rotation::Inverted,
            270 => Rotation::Left,
            _ => Rotation::None,
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Right => 90,
            Rotation::Inverted => 180,
            Rotation::Left => 270,
        }
    }

    /// Single-letter orientation code understood by the encoder
    pub fn encoder_code(&self) -> char {
        match self {
            Rotation::None => 'N',
            Rotation::Right => 'R',
            Rotation::Inverted => 'I',
            Rotation::Left => 'L',
        }
    }

    /// Whether width and height trade places
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Rotation::Right | Rotation::Left)
    }
}
