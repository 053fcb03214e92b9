//! Built-in page presets for common label sheets

use crate::{PageSpec, Result, SheetError};

/// A named page layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePreset {
    pub key: &'static str,
    pub name: &'static str,
    pub spec: PageSpec,
}

/// All built-in presets, in display order
pub const PAGE_PRESETS: &[PagePreset] = &[
    PagePreset {
        key: "a4-3x8",
        name: "A4 3x8",
        spec: PageSpec {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            gutter_mm: 3.0,
            columns: 3,
            rows: 8,
        },
    },
    PagePreset {
        key: "a4-2x7",
        name: "A4 2x7",
        spec: PageSpec {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 12.0,
            gutter_mm: 5.0,
            columns: 2,
            rows: 7,
        },
    },
    PagePreset {
        key: "a4-4x10",
        name: "A4 4x10",
        spec: PageSpec {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 8.0,
            gutter_mm: 2.0,
            columns: 4,
            rows: 10,
        },
    },
    PagePreset {
        key: "a4-1x1p",
        name: "A4 1x1 (portrait)",
        spec: PageSpec {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            gutter_mm: 0.0,
            columns: 1,
            rows: 1,
        },
    },
    PagePreset {
        key: "a4-1x1l",
        name: "A4 1x1 (landscape)",
        spec: PageSpec {
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            margin_mm: 10.0,
            gutter_mm: 0.0,
            columns: 1,
            rows: 1,
        },
    },
];

/// Look up a preset by key
pub fn find_preset(key: &str) -> Result<&'static PagePreset> {
    PAGE_PRESETS
        .iter()
        .find(|preset| preset.key == key)
        .ok_or_else(|| SheetError::UnknownPreset(key.to_string()))
}
