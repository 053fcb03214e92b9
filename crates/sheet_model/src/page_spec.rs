//! Page specification and the derived cell grid
//!
//! A `PageSpec` is plain data (what gets persisted). `PageGrid` is the
//! validated form with precomputed cell dimensions; building one is the only
//! way to get cell rectangles, so an invalid specification is rejected before
//! any geometry is produced.

use crate::{Rect, Result, SheetError, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Physical page and grid configuration, all lengths in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    pub gutter_mm: f64,
    pub columns: u32,
    pub rows: u32,
}

impl PageSpec {
    pub fn new(
        page_width_mm: f64,
        page_height_mm: f64,
        margin_mm: f64,
        gutter_mm: f64,
        columns: u32,
        rows: u32,
    ) -> Self {
        Self {
            page_width_mm,
            page_height_mm,
            margin_mm,
            gutter_mm,
            columns,
            rows,
        }
    }

    /// Inner printable width (page minus both margins)
    pub fn inner_width(&self) -> f64 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Inner printable height (page minus both margins)
    pub fn inner_height(&self) -> f64 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// Check every constraint a grid needs
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.page_width_mm,
            self.page_height_mm,
            self.margin_mm,
            self.gutter_mm,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(SheetError::InvalidPageSpec(
                "page dimensions must be finite numbers".to_string(),
            ));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(SheetError::InvalidPageSpec(format!(
                "grid needs at least one column and one row, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.margin_mm < 0.0 || self.gutter_mm < 0.0 {
            return Err(SheetError::InvalidPageSpec(format!(
                "margin ({}) and gutter ({}) must not be negative",
                self.margin_mm, self.gutter_mm
            )));
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(SheetError::InvalidPageSpec(format!(
                "inner area {}x{} mm is not positive",
                self.inner_width(),
                self.inner_height()
            )));
        }
        let cell_w = cell_span(self.inner_width(), self.columns, self.gutter_mm);
        let cell_h = cell_span(self.inner_height(), self.rows, self.gutter_mm);
        if cell_w <= 0.0 || cell_h <= 0.0 {
            return Err(SheetError::InvalidPageSpec(format!(
                "gutters leave no room for cells ({:.3}x{:.3} mm)",
                cell_w, cell_h
            )));
        }
        Ok(())
    }
}

impl Default for PageSpec {
    /// A4 portrait, 3 columns by 8 rows
    fn default() -> Self {
        Self::new(210.0, 297.0, 10.0, 3.0, 3, 8)
    }
}

fn cell_span(inner: f64, count: u32, gutter: f64) -> f64 {
    (inner - (count as f64 - 1.0) * gutter) / count as f64
}

/// Validated page grid with derived cell geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGrid {
    spec: PageSpec,
    cell_width: f64,
    cell_height: f64,
}

impl PageGrid {
    /// Build a grid, rejecting degenerate specifications
    pub fn new(spec: PageSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            cell_width: cell_span(spec.inner_width(), spec.columns, spec.gutter_mm),
            cell_height: cell_span(spec.inner_height(), spec.rows, spec.gutter_mm),
        })
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    /// Number of cells on one page
    pub fn per_page(&self) -> usize {
        self.spec.columns as usize * self.spec.rows as usize
    }

    pub fn columns(&self) -> usize {
        self.spec.columns as usize
    }

    pub fn rows(&self) -> usize {
        self.spec.rows as usize
    }

    pub fn cell_size(&self) -> Size {
        Size::new(self.cell_width, self.cell_height)
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.spec.page_width_mm, self.spec.page_height_mm)
    }

    pub fn inner_size(&self) -> Size {
        Size::new(self.spec.inner_width(), self.spec.inner_height())
    }

    /// Top-left corner of the inner area in page coordinates
    pub fn inner_origin(&self) -> Vec2 {
        Vec2::new(self.spec.margin_mm, self.spec.margin_mm)
    }

    /// Inner area as a rectangle in inner-relative coordinates
    pub fn inner_rect(&self) -> Rect {
        Rect::from_origin_size(Vec2::ZERO, self.inner_size())
    }

    /// Column and row of a slot
    pub fn slot_position(&self, slot: usize) -> Result<(usize, usize)> {
        let per_page = self.per_page();
        if slot >= per_page {
            return Err(SheetError::SlotOutOfRange { slot, per_page });
        }
        Ok((slot % self.columns(), slot / self.columns()))
    }

    /// Cell rectangle for a slot, relative to the inner area
    pub fn cell_rect(&self, slot: usize) -> Result<Rect> {
        let (col, row) = self.slot_position(slot)?;
        Ok(Rect::new(
            col as f64 * (self.cell_width + self.spec.gutter_mm),
            row as f64 * (self.cell_height + self.spec.gutter_mm),
            self.cell_width,
            self.cell_height,
        ))
    }

    /// Slot whose cell contains an inner-relative point, if any
    pub fn slot_at(&self, point: Vec2) -> Option<usize> {
        (0..self.per_page()).find(|&slot| {
            self.cell_rect(slot)
                .map(|cell| cell.contains(point.x, point.y))
                .unwrap_or(false)
        })
    }

    /// Convert an inner-relative rectangle to page coordinates
    pub fn to_page(&self, rect: Rect) -> Rect {
        rect.translate(self.inner_origin())
    }

    /// Convert a page-coordinate point to inner-relative coordinates
    pub fn to_inner(&self, point: Vec2) -> Vec2 {
        point - self.inner_origin()
    }
}
