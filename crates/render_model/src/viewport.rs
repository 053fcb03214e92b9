//! Preview viewport: zoom, scroll, and page visibility
//!
//! Pages are stacked vertically with a fixed pixel gap. Zoom scales the
//! base screen density of 96 dpi; scroll offsets are in pixels at the
//! current zoom.

use serde::{Deserialize, Serialize};
use sheet_model::{mm_to_px, px_per_mm_from_dpi, px_to_mm, Size, Vec2};
use std::ops::Range;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// Screen density at zoom 1.0
pub const BASE_DPI: f64 = 96.0;

/// Vertical gap between stacked pages, in pixels
pub const PAGE_GAP_PX: f64 = 24.0;

/// Clamp a zoom factor into the supported range
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

/// The visible window onto the stacked preview pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    zoom: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub visible_width: f64,
    pub visible_height: f64,
    /// Pages to render above and below the visible ones
    pub buffer_pages: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Viewport {
    pub fn new(visible_width: f64, visible_height: f64) -> Self {
        Self {
            zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            visible_width,
            visible_height,
            buffer_pages: 1,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom without moving the scroll offsets
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Change zoom keeping the content under the viewport center in place
    pub fn zoom_centered(&mut self, zoom: f64) {
        let next = clamp_zoom(zoom);
        let ratio = next / self.zoom;
        let center_x = self.scroll_x + self.visible_width / 2.0;
        let center_y = self.scroll_y + self.visible_height / 2.0;
        self.scroll_x = (center_x * ratio - self.visible_width / 2.0).max(0.0);
        self.scroll_y = (center_y * ratio - self.visible_height / 2.0).max(0.0);
        self.zoom = next;
    }

    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.scroll_x = scroll_x.max(0.0);
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_dimensions(&mut self, visible_width: f64, visible_height: f64) {
        self.visible_width = visible_width.max(0.0);
        self.visible_height = visible_height.max(0.0);
    }

    /// Pixels per millimeter at the current zoom
    pub fn px_per_mm(&self) -> f64 {
        px_per_mm_from_dpi(BASE_DPI) * self.zoom
    }

    pub fn mm_to_px(&self, value_mm: f64) -> f64 {
        mm_to_px(value_mm, self.px_per_mm())
    }

    pub fn px_to_mm(&self, value_px: f64) -> f64 {
        px_to_mm(value_px, self.px_per_mm())
    }

    /// Convert a pointer position in viewport pixels to content pixels
    pub fn to_content(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(pointer.x + self.scroll_x, pointer.y + self.scroll_y)
    }

    /// Page indices that are visible, widened by the buffer
    pub fn visible_page_range(&self, stack: &PageStack) -> Range<usize> {
        let count = stack.page_count();
        let top = self.scroll_y;
        let bottom = self.scroll_y + self.visible_height;

        let mut visible = (0..count).filter(|&page| {
            let page_top = stack.page_top(page);
            page_top + stack.page_height() > top && page_top < bottom
        });
        let Some(first) = visible.next() else {
            return 0..0;
        };
        let last = visible.last().unwrap_or(first);

        first.saturating_sub(self.buffer_pages)..(last + 1 + self.buffer_pages).min(count)
    }
}

/// Vertical stack of equally sized preview pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStack {
    page_count: usize,
    page_size_px: Size,
    gap: f64,
}

impl PageStack {
    pub fn new(page_count: usize, page_size_mm: Size, viewport: &Viewport) -> Self {
        Self {
            page_count,
            page_size_px: Size::new(
                viewport.mm_to_px(page_size_mm.width),
                viewport.mm_to_px(page_size_mm.height),
            ),
            gap: PAGE_GAP_PX,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_height(&self) -> f64 {
        self.page_size_px.height
    }

    pub fn page_width(&self) -> f64 {
        self.page_size_px.width
    }

    /// Content-pixel y of a page's top edge
    pub fn page_top(&self, page: usize) -> f64 {
        page as f64 * (self.page_size_px.height + self.gap)
    }

    /// Height of the scroll container
    pub fn total_height(&self) -> f64 {
        match self.page_count {
            0 => 0.0,
            n => self.page_top(n - 1) + self.page_size_px.height,
        }
    }

    /// Page under a content-pixel point and the point relative to that
    /// page's corner; points in the gaps hit nothing
    pub fn page_at(&self, content: Vec2) -> Option<(usize, Vec2)> {
        if content.y < 0.0 || content.x < 0.0 || content.x > self.page_size_px.width {
            return None;
        }
        let stride = self.page_size_px.height + self.gap;
        let page = (content.y / stride).floor() as usize;
        let local_y = content.y - self.page_top(page);
        (page < self.page_count && local_y <= self.page_size_px.height)
            .then(|| (page, Vec2::new(content.x, local_y)))
    }
}
