//! Per-page layout results

use crate::{LayoutError, Placement, PlacementResolver, Result, SymbolMetrics};
use perf::PerfTimer;
use sheet_model::{LabelSheet, Rect, Size, Vec2};

/// Every slot of one page, resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_index: usize,
    /// Physical page size in mm
    pub page_size: Size,
    /// Offset of the inner area from the page's top-left corner
    pub inner_origin: Vec2,
    /// One entry per slot, in slot order
    pub slots: Vec<Placement>,
}

impl PageLayout {
    /// Convert an inner-relative rectangle to page coordinates
    pub fn to_page(&self, rect: Rect) -> Rect {
        rect.translate(self.inner_origin)
    }

    /// Occupied slots only
    pub fn labels(&self) -> impl Iterator<Item = &crate::LabelPlacement> {
        self.slots.iter().filter_map(Placement::label)
    }

    /// Number of slots holding a label
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }
}

/// Lay out one page of a sheet in its current mode
pub fn layout_page(sheet: &LabelSheet, metrics: &dyn SymbolMetrics, page: usize) -> Result<PageLayout> {
    let _timer = PerfTimer::layout("layout_page");
    let resolver = PlacementResolver::new(sheet, metrics);
    page_with(&resolver, page)
}

/// Lay out every page of a sheet
pub fn layout_sheet(sheet: &LabelSheet, metrics: &dyn SymbolMetrics) -> Result<Vec<PageLayout>> {
    let _timer = PerfTimer::layout("layout_sheet");
    let resolver = PlacementResolver::new(sheet, metrics);
    let total = resolver.pagination().total_pages();
    let pages = (0..total)
        .map(|page| page_with(&resolver, page))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(pages = total, labels = sheet.labels().len(), "laid out sheet");
    Ok(pages)
}

pub(crate) fn page_with(resolver: &PlacementResolver<'_>, page: usize) -> Result<PageLayout> {
    let pagination = resolver.pagination();
    let total = pagination.total_pages();
    if page >= total {
        return Err(LayoutError::PageOutOfRange { page, total });
    }

    let mode = resolver.sheet().layout_mode();
    let slots = pagination
        .page_slots(page)
        .map(|at| resolver.resolve_slot(at, mode))
        .collect::<Result<Vec<_>>>()?;

    let grid = resolver.sheet().grid();
    Ok(PageLayout {
        page_index: page,
        page_size: grid.page_size(),
        inner_origin: grid.inner_origin(),
        slots,
    })
}
