//! Standard PDF fonts for caption text
//!
//! Captions are drawn with the base-14 fonts every viewer ships, so nothing
//! is embedded. Requested families map onto the closest standard face.

use super::objects::{PdfDictionary, PdfObject};
use std::collections::BTreeMap;

/// The text faces of the standard 14 fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }

    /// Match a caption font family to a standard face.
    ///
    /// OCR and monospace families go to Courier, serif families to Times,
    /// everything else to Helvetica.
    pub fn from_family(family: &str) -> Self {
        let lower = family.to_lowercase();
        let bold = lower.contains("bold");
        let base = if lower.contains("ocr") || lower.contains("mono") || lower.contains("courier") {
            StandardFont::Courier
        } else if lower.contains("times") || (lower.contains("serif") && !lower.contains("sans")) {
            StandardFont::TimesRoman
        } else {
            StandardFont::Helvetica
        };
        if bold {
            base.bold()
        } else {
            base
        }
    }

    fn bold(self) -> Self {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => StandardFont::HelveticaBold,
            StandardFont::TimesRoman | StandardFont::TimesBold => StandardFont::TimesBold,
            StandardFont::Courier | StandardFont::CourierBold => StandardFont::CourierBold,
        }
    }

    /// Average advance as a fraction of the em
    fn average_width(&self) -> f64 {
        match self {
            StandardFont::Courier | StandardFont::CourierBold => 0.6,
            StandardFont::Helvetica => 0.5,
            StandardFont::HelveticaBold => 0.52,
            StandardFont::TimesRoman => 0.45,
            StandardFont::TimesBold => 0.48,
        }
    }
}

/// Estimated width in points of `text` set in `font` at `size_pt`
pub fn estimate_text_width(text: &str, font: StandardFont, size_pt: f64) -> f64 {
    text.chars().count() as f64 * font.average_width() * size_pt
}

/// Font dictionary for a standard face
pub fn standard_font_dict(font: StandardFont) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Font");
    dict.insert("Subtype", PdfObject::name("Type1"));
    dict.insert("BaseFont", PdfObject::name(font.pdf_name()));
    dict.insert("Encoding", PdfObject::name("WinAnsiEncoding"));
    dict
}

/// Assigns page resource names (`F1`, `F2`, ...) to the faces in use
#[derive(Debug, Default)]
pub struct FontManager {
    names: BTreeMap<StandardFont, String>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for `family`, registering its face on first use
    pub fn resource_for(&mut self, family: &str) -> (StandardFont, String) {
        let font = StandardFont::from_family(family);
        let next = self.names.len() + 1;
        let name = self.names.entry(font).or_insert_with(|| format!("F{}", next)).clone();
        (font, name)
    }

    /// Registered faces with their resource names, in resource order
    pub fn fonts(&self) -> Vec<(StandardFont, &str)> {
        let mut fonts: Vec<_> = self.names.iter().map(|(font, name)| (*font, name.as_str())).collect();
        fonts.sort_by_key(|(_, name)| name[1..].parse::<usize>().unwrap_or(usize::MAX));
        fonts
    }

    pub fn font_count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_mapping() {
        assert_eq!(StandardFont::from_family("OCR-B"), StandardFont::Courier);
        assert_eq!(StandardFont::from_family("Arial"), StandardFont::Helvetica);
        assert_eq!(StandardFont::from_family("Open Sans"), StandardFont::Helvetica);
        assert_eq!(StandardFont::from_family("Times New Roman"), StandardFont::TimesRoman);
        assert_eq!(StandardFont::from_family("Arial Bold"), StandardFont::HelveticaBold);
    }

    #[test]
    fn test_estimate_width() {
        assert!((estimate_text_width("ABCD", StandardFont::Courier, 10.0) - 24.0).abs() < 1e-9);
        assert_eq!(estimate_text_width("", StandardFont::Helvetica, 10.0), 0.0);
    }

    #[test]
    fn test_resource_names_shared_per_face() {
        let mut fonts = FontManager::new();
        let (_, arial) = fonts.resource_for("Arial");
        let (_, ocr) = fonts.resource_for("OCR-B");
        let (_, helvetica) = fonts.resource_for("Helvetica");
        assert_eq!(arial, "F1");
        assert_eq!(ocr, "F2");
        assert_eq!(helvetica, "F1");
        assert_eq!(fonts.font_count(), 2);

        let listed: Vec<_> = fonts.fonts().into_iter().map(|(_, name)| name.to_string()).collect();
        assert_eq!(listed, vec!["F1", "F2"]);
    }

    #[test]
    fn test_font_dict() {
        let dict = standard_font_dict(StandardFont::Courier);
        assert!(matches!(dict.get("BaseFont"), Some(PdfObject::Name(name)) if name == "Courier"));
        assert!(dict.contains_key("Encoding"));
    }
}
