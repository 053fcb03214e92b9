//! Placement resolver
//!
//! Turns an item index into the rectangle it is drawn in. Preview and
//! export both go through [`PlacementResolver`], so they cannot disagree
//! about geometry.
//!
//! All rectangles produced here are relative to the inner (margin-free)
//! page area. Use [`sheet_model::PageGrid::to_page`] to get page
//! coordinates.

use crate::caption::{reservation_mm, CaptionBand};
use crate::paginator::{Pagination, SlotRef};
use crate::symbol::{SymbolFault, SymbolMetrics, SymbolRequest};
use crate::Result;
use sheet_model::{clamp_span, fit_rect, ItemId, LabelSheet, LayoutMode, Rect, Size, Vec2};

/// Geometry of one labelled slot
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub index: usize,
    pub id: ItemId,
    pub page: usize,
    pub slot: usize,
    /// Home cell
    pub cell: Rect,
    /// Draw rectangle: symbol plus caption band
    pub frame: Rect,
    /// Where the symbol image goes
    pub symbol: Rect,
    pub caption: Option<CaptionBand>,
    pub request: SymbolRequest,
    /// Set when the encoder rejected the item; the frame is still valid
    pub fault: Option<SymbolFault>,
}

/// Outcome of resolving one slot
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// No label in this slot; rendered as a blank placeholder
    Empty { page: usize, slot: usize, cell: Rect },
    Label(Box<LabelPlacement>),
}

impl Placement {
    pub fn cell(&self) -> Rect {
        match self {
            Placement::Empty { cell, .. } => *cell,
            Placement::Label(label) => label.cell,
        }
    }

    pub fn label(&self) -> Option<&LabelPlacement> {
        match self {
            Placement::Label(label) => Some(label.as_ref()),
            Placement::Empty { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Placement::Empty { .. })
    }
}

/// Size and intrinsic measurement of one item before positioning
#[derive(Debug, Clone)]
struct Measured {
    request: SymbolRequest,
    intrinsic: std::result::Result<Size, SymbolFault>,
    size: Size,
}

/// Computes draw rectangles from a sheet and a source of symbol metrics
pub struct PlacementResolver<'a> {
    sheet: &'a LabelSheet,
    metrics: &'a dyn SymbolMetrics,
    pagination: Pagination,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(sheet: &'a LabelSheet, metrics: &'a dyn SymbolMetrics) -> Self {
        Self {
            sheet,
            metrics,
            pagination: Pagination::for_sheet(sheet),
        }
    }

    pub fn sheet(&self) -> &LabelSheet {
        self.sheet
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Resolve one item in the given mode.
    ///
    /// An index with no backing item resolves to [`Placement::Empty`] at the
    /// slot it would occupy.
    pub fn resolve(&self, index: usize, mode: LayoutMode) -> Result<Placement> {
        let at = self.pagination.locate(index);
        self.resolve_at(at, mode)
    }

    /// Resolve one item in the sheet's current mode
    pub fn resolve_current(&self, index: usize) -> Result<Placement> {
        self.resolve(index, self.sheet.layout_mode())
    }

    /// Resolve whatever occupies a page slot
    pub fn resolve_slot(&self, at: SlotRef, mode: LayoutMode) -> Result<Placement> {
        self.resolve_at(at, mode)
    }

    fn resolve_at(&self, at: SlotRef, mode: LayoutMode) -> Result<Placement> {
        let cell = self.sheet.grid().cell_rect(at.slot)?;
        let labels = self.sheet.labels();
        let (Some(index), Some(entry)) = (at.item, at.item.and_then(|i| labels.entries().get(i)))
        else {
            return Ok(Placement::Empty {
                page: at.page,
                slot: at.slot,
                cell,
            });
        };

        let measured = self.measure(index, cell, mode)?;
        let origin = match mode {
            LayoutMode::GridBound => centered_in(cell, measured.size),
            LayoutMode::FreeForm => {
                let wanted = labels
                    .position_override(index)
                    .unwrap_or_else(|| centered_in(cell, measured.size));
                self.clamp_origin(wanted, measured.size)
            }
        };
        let frame = Rect::from_origin_size(origin, measured.size);

        let caption = CaptionBand::for_item(&entry.item, frame);
        let band_height = caption.as_ref().map_or(0.0, |band| band.rect.height);
        let symbol_area = Rect::new(frame.x, frame.y, frame.width, frame.height - band_height);
        let (symbol, fault) = match &measured.intrinsic {
            Ok(intrinsic) if measured.request.is_area_fill() => (
                fit_rect(symbol_area, intrinsic.width, intrinsic.height),
                None,
            ),
            Ok(_) => (symbol_area, None),
            Err(fault) => (symbol_area, Some(fault.clone())),
        };

        Ok(Placement::Label(Box::new(LabelPlacement {
            index,
            id: entry.id,
            page: at.page,
            slot: at.slot,
            cell,
            frame,
            symbol,
            caption,
            request: measured.request,
            fault,
        })))
    }

    /// Draw size of an item, before positioning
    pub fn draw_size(&self, index: usize) -> Result<Size> {
        let at = self.pagination.locate(index);
        let cell = self.sheet.grid().cell_rect(at.slot)?;
        Ok(self.measure(index, cell, self.sheet.layout_mode())?.size)
    }

    /// Centered origin of an item inside its home cell
    pub fn default_position(&self, index: usize) -> Result<Vec2> {
        let at = self.pagination.locate(index);
        let cell = self.sheet.grid().cell_rect(at.slot)?;
        let size = self.measure(index, cell, self.sheet.layout_mode())?.size;
        Ok(centered_in(cell, size))
    }

    /// Clamp a free-form origin so the item stays inside the inner area
    pub fn clamp_position(&self, index: usize, position: Vec2) -> Result<Vec2> {
        Ok(self.clamp_origin(position, self.draw_size(index)?))
    }

    fn clamp_origin(&self, position: Vec2, size: Size) -> Vec2 {
        let inner = self.sheet.grid().inner_size();
        Vec2::new(
            clamp_span(position.x, inner.width - size.width),
            clamp_span(position.y, inner.height - size.height),
        )
    }

    fn measure(&self, index: usize, cell: Rect, mode: LayoutMode) -> Result<Measured> {
        let item = self.sheet.labels().item(index)?;
        let request = SymbolRequest::from_item(item, &self.sheet.settings);
        let intrinsic = self.metrics.intrinsic_size(&request);
        let multipliers = self.sheet.effective_multipliers(index);

        let height = cell.height * multipliers.y;
        let width = if request.is_area_fill() {
            cell.width * multipliers.x
        } else {
            // linear width follows the encoded aspect, never the cell width
            let symbol_height = cell.height - reservation_mm(&item.caption, cell.height);
            match intrinsic.as_ref().ok().and_then(Size::aspect_ratio) {
                Some(aspect) => symbol_height * aspect * multipliers.x,
                None => cell.width * multipliers.x,
            }
        };

        let mut size = Size::new(width, height);
        if mode == LayoutMode::FreeForm {
            size = fit_within(size, self.sheet.grid().inner_size());
        }

        Ok(Measured {
            request,
            intrinsic,
            size,
        })
    }
}

fn centered_in(cell: Rect, size: Size) -> Vec2 {
    Vec2::new(
        cell.x + (cell.width - size.width) / 2.0,
        cell.y + (cell.height - size.height) / 2.0,
    )
}

/// Scale `size` down uniformly until it fits `bounds`
fn fit_within(size: Size, bounds: Size) -> Size {
    let factor = (bounds.width / size.width)
        .min(bounds.height / size.height)
        .min(1.0);
    if factor.is_finite() && factor > 0.0 {
        Size::new(size.width * factor, size.height * factor)
    } else {
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::NominalMetrics;
    use proptest::prelude::*;
    use sheet_model::{Caption, LabelItem, MultiplierScope, PageSpec, SizeOverride};

    const EPS: f64 = 1e-9;

    /// Reports every symbol with a fixed 2:1 or 1:1 aspect
    struct FixedMetrics;

    impl SymbolMetrics for FixedMetrics {
        fn intrinsic_size(&self, request: &SymbolRequest) -> std::result::Result<Size, SymbolFault> {
            if request.text == "bad" {
                return Err(SymbolFault::new("invalid input"));
            }
            Ok(match request.is_area_fill() {
                true => Size::new(1.0, 1.0),
                false => Size::new(2.0, 1.0),
            })
        }
    }

    fn sheet_2x2() -> LabelSheet {
        // inner 100 x 100, cells 48 x 48 with a 4 mm gutter
        LabelSheet::new(PageSpec::new(120.0, 120.0, 10.0, 4.0, 2, 2)).unwrap()
    }

    #[test]
    fn test_grid_bound_area_fill_centered() {
        let mut sheet = sheet_2x2();
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        sheet.labels_mut().add(LabelItem::new("qrcode", "b"));
        sheet
            .labels_mut()
            .set_size_override(1, SizeOverride::new(0.5, 0.25))
            .unwrap();
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);

        let first = resolver.resolve(0, LayoutMode::GridBound).unwrap();
        let label = first.label().unwrap();
        assert_eq!(label.frame, Rect::new(0.0, 0.0, 48.0, 48.0));
        assert_eq!(label.symbol, label.frame);

        let second = resolver.resolve(1, LayoutMode::GridBound).unwrap();
        let label = second.label().unwrap();
        assert_eq!(label.cell, Rect::new(52.0, 0.0, 48.0, 48.0));
        assert_eq!(label.frame, Rect::new(64.0, 18.0, 24.0, 12.0));
        // square symbol fitted into a 24 x 12 area
        assert_eq!(label.symbol, Rect::new(70.0, 18.0, 12.0, 12.0));
    }

    #[test]
    fn test_linear_width_follows_aspect() {
        let mut sheet = sheet_2x2();
        sheet.labels_mut().add(LabelItem::new("code128", "abc"));
        sheet
            .labels_mut()
            .set_size_override(0, SizeOverride::new(0.5, 0.5))
            .unwrap();
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        let size = resolver.draw_size(0).unwrap();
        // 48 mm cell height * aspect 2 * 0.5
        assert!((size.width - 48.0).abs() < EPS);
        assert!((size.height - 24.0).abs() < EPS);
    }

    #[test]
    fn test_global_multipliers_win() {
        let mut sheet = sheet_2x2();
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        sheet
            .labels_mut()
            .set_size_override(0, SizeOverride::new(0.5, 0.5))
            .unwrap();
        sheet.settings.scope = MultiplierScope::All {
            multipliers: SizeOverride::uniform(0.25),
        };
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        assert_eq!(resolver.draw_size(0).unwrap(), Size::new(12.0, 12.0));
    }

    #[test]
    fn test_empty_slots() {
        let mut sheet = sheet_2x2();
        sheet.settings.skip_count = 1;
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);

        let beyond = resolver.resolve(3, LayoutMode::GridBound).unwrap();
        assert!(beyond.is_empty());

        let skipped = resolver
            .resolve_slot(resolver.pagination().page_slots(0).next().unwrap(), LayoutMode::GridBound)
            .unwrap();
        assert_eq!(
            skipped,
            Placement::Empty {
                page: 0,
                slot: 0,
                cell: Rect::new(0.0, 0.0, 48.0, 48.0)
            }
        );

        let label = resolver.resolve(0, LayoutMode::GridBound).unwrap();
        assert_eq!(label.label().map(|l| l.slot), Some(1));
    }

    #[test]
    fn test_index_past_addressable_slots_is_empty() {
        let mut sheet = sheet_2x2();
        sheet.settings.skip_count = 2;
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);

        for mode in [LayoutMode::GridBound, LayoutMode::FreeForm] {
            assert!(resolver.resolve(usize::MAX, mode).unwrap().is_empty());
        }
    }

    #[test]
    fn test_free_form_override_is_clamped() {
        let mut sheet = sheet_2x2();
        sheet.settings.layout_mode = LayoutMode::FreeForm;
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        sheet
            .labels_mut()
            .set_position_override(0, Vec2::new(90.0, -5.0))
            .unwrap();
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        let placement = resolver.resolve(0, LayoutMode::FreeForm).unwrap();
        let frame = placement.label().unwrap().frame;
        assert_eq!(frame.origin(), Vec2::new(52.0, 0.0));

        // without an override the item sits centered in its cell
        sheet.labels_mut().clear_position_override(0).unwrap();
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        assert_eq!(resolver.default_position(0).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_free_form_oversize_scales_down() {
        let mut sheet = sheet_2x2();
        sheet.settings.layout_mode = LayoutMode::FreeForm;
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        sheet
            .labels_mut()
            .set_size_override(0, SizeOverride::new(5.0, 2.5))
            .unwrap();
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        let size = resolver.draw_size(0).unwrap();
        assert!((size.width - 100.0).abs() < EPS);
        assert!((size.height - 50.0).abs() < EPS);
    }

    #[test]
    fn test_caption_carved_from_bottom() {
        let mut sheet = sheet_2x2();
        sheet
            .labels_mut()
            .add(LabelItem::new("qrcode", "a").with_caption(Caption::custom("Box", "Arial", 10.0, 0.0)));
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        let placement = resolver.resolve(0, LayoutMode::GridBound).unwrap();
        let label = placement.label().unwrap();
        let band = label.caption.as_ref().unwrap();
        assert!((band.rect.bottom() - label.frame.bottom()).abs() < EPS);
        assert!(label.symbol.bottom() <= band.rect.y + EPS);
    }

    #[test]
    fn test_fault_keeps_frame() {
        let mut sheet = sheet_2x2();
        sheet.labels_mut().add(LabelItem::new("code128", "bad"));
        let resolver = PlacementResolver::new(&sheet, &FixedMetrics);
        let placement = resolver.resolve(0, LayoutMode::GridBound).unwrap();
        let label = placement.label().unwrap();
        assert_eq!(label.fault, Some(SymbolFault::new("invalid input")));
        assert_eq!(label.frame, label.cell);
    }

    proptest! {
        #[test]
        fn prop_free_form_contained(
            mx in 0.0..10.0f64,
            my in 0.0..10.0f64,
            px in -500.0..500.0f64,
            py in -500.0..500.0f64,
            area in proptest::bool::ANY,
        ) {
            let mut sheet = sheet_2x2();
            sheet.settings.layout_mode = LayoutMode::FreeForm;
            let symbology = if area { "qrcode" } else { "code128" };
            sheet.labels_mut().add(LabelItem::new(symbology, "abc"));
            sheet.labels_mut().set_size_override(0, SizeOverride::new(mx, my)).unwrap();
            sheet.labels_mut().set_position_override(0, Vec2::new(px, py)).unwrap();

            let resolver = PlacementResolver::new(&sheet, &NominalMetrics);
            let placement = resolver.resolve(0, LayoutMode::FreeForm).unwrap();
            let frame = placement.label().unwrap().frame;
            let inner = Rect::from_origin_size(Vec2::ZERO, sheet.grid().inner_size());
            prop_assert!(inner.contains_rect(&frame), "{:?} not in {:?}", frame, inner);
        }
    }
}
