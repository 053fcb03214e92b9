//! Render item types
//!
//! Everything here is in screen pixels at the current zoom, relative to the
//! top-left corner of the page being drawn.

use serde::{Deserialize, Serialize};
use sheet_model::Rect;

/// Opaque RGB color for preview drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    /// `#rrggbb` form for canvas and CSS consumers
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A fitted caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRun {
    pub text: String,
    pub font: String,
    /// Fitted size in pixels at the current zoom
    pub size_px: f64,
    pub color: Color,
    /// Left end of the baseline
    pub baseline_x: f64,
    pub baseline_y: f64,
}

/// A symbol image to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRenderInfo {
    /// Stable label id, for selection and drag handling
    pub item_id: String,
    /// Position in the label collection
    pub index: usize,
    pub symbology: String,
    pub text: String,
    pub bounds: Rect,
    /// Whole draw rectangle including the caption band
    pub frame: Rect,
    pub selected: bool,
}

/// Something drawn on a preview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderItem {
    /// A filled or stroked rectangle
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    /// An empty cell
    Placeholder { bounds: Rect, slot: usize },
    Symbol(SymbolRenderInfo),
    /// A label whose symbol could not be encoded
    ErrorGlyph {
        bounds: Rect,
        index: usize,
        message: String,
        color: Color,
    },
    Caption(CaptionRun),
    /// Outline around selected labels
    Selection { rects: Vec<Rect>, color: Color },
}

/// One preview page in pixels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRender {
    pub page_index: u32,
    pub width: f64,
    pub height: f64,
    pub items: Vec<RenderItem>,
}

impl PageRender {
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolRenderInfo> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Symbol(info) => Some(info),
            _ => None,
        })
    }
}

/// The complete preview model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub pages: Vec<PageRender>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: PageRender) {
        self.pages.push(page);
    }

    /// Number of pages that carry drawn content
    pub fn rendered_pages(&self) -> usize {
        self.pages.iter().filter(|page| !page.items.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color(37, 99, 235).to_hex(), "#2563eb");
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_render_item_tagged_json() {
        let item = RenderItem::Placeholder {
            bounds: Rect::new(0.0, 0.0, 10.0, 5.0),
            slot: 3,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "placeholder");
        assert_eq!(json["slot"], 3);
    }
}
