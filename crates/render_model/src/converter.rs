//! Convert page layouts to preview render items

use crate::{Color, CaptionRun, PageRender, PageStack, RenderItem, RenderModel, Result, SymbolRenderInfo, Viewport};
use layout_engine::{layout_page, PageLayout, Placement, SymbolMetrics, TextMeasurer};
use sheet_model::{pt_to_mm, ItemId, LabelSheet, Rect};
use std::collections::HashSet;

/// Configuration for preview conversion
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub page_background: Color,
    pub page_border: Color,
    /// Outline of empty cells; `None` hides placeholders
    pub placeholder_stroke: Option<Color>,
    pub caption_color: Color,
    pub error_color: Color,
    pub selection_color: Color,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            page_background: Color::WHITE,
            page_border: Color(200, 200, 200),
            placeholder_stroke: Some(Color(226, 232, 240)),
            caption_color: Color::BLACK,
            error_color: Color(220, 38, 38),
            selection_color: Color(37, 99, 235),
        }
    }
}

/// Converts resolved page layouts into pixel-space render items
pub struct PreviewConverter<'a> {
    config: PreviewConfig,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> PreviewConverter<'a> {
    pub fn new(config: PreviewConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self { config, measurer }
    }

    /// Render the pages of `sheet` that the viewport can see.
    ///
    /// Pages outside the visible range come back with their size set and
    /// no items, so the scroll container keeps its height.
    pub fn convert_sheet(
        &self,
        sheet: &LabelSheet,
        metrics: &dyn SymbolMetrics,
        selected: &HashSet<ItemId>,
        viewport: &Viewport,
    ) -> Result<RenderModel> {
        let total = layout_engine::Pagination::for_sheet(sheet).total_pages();
        let stack = PageStack::new(total, sheet.grid().page_size(), viewport);
        let visible = viewport.visible_page_range(&stack);

        let mut model = RenderModel::new();
        for page in 0..total {
            if visible.contains(&page) {
                let layout = layout_page(sheet, metrics, page)?;
                model.add_page(self.convert_page(&layout, selected, viewport.px_per_mm()));
            } else {
                model.add_page(PageRender {
                    page_index: page as u32,
                    width: stack.page_width(),
                    height: stack.page_height(),
                    items: Vec::new(),
                });
            }
        }
        Ok(model)
    }

    /// Convert one page at the given density
    pub fn convert_page(&self, layout: &PageLayout, selected: &HashSet<ItemId>, px_per_mm: f64) -> PageRender {
        let to_px = |rect: Rect| layout.to_page(rect).scale(px_per_mm);
        let mut page = PageRender {
            page_index: layout.page_index as u32,
            width: layout.page_size.width * px_per_mm,
            height: layout.page_size.height * px_per_mm,
            items: Vec::new(),
        };

        page.items.push(RenderItem::Rectangle {
            bounds: Rect::new(0.0, 0.0, page.width, page.height),
            fill: Some(self.config.page_background),
            stroke: Some(self.config.page_border),
            stroke_width: 1.0,
        });

        let mut outlines = Vec::new();
        for placement in &layout.slots {
            match placement {
                Placement::Empty { cell, slot, .. } => {
                    if let Some(stroke) = self.config.placeholder_stroke {
                        page.items.push(RenderItem::Rectangle {
                            bounds: to_px(*cell),
                            fill: None,
                            stroke: Some(stroke),
                            stroke_width: 1.0,
                        });
                        page.items.push(RenderItem::Placeholder {
                            bounds: to_px(*cell),
                            slot: *slot,
                        });
                    }
                }
                Placement::Label(label) => {
                    match &label.fault {
                        Some(fault) => page.items.push(RenderItem::ErrorGlyph {
                            bounds: to_px(label.symbol),
                            index: label.index,
                            message: fault.message.clone(),
                            color: self.config.error_color,
                        }),
                        None => page.items.push(RenderItem::Symbol(SymbolRenderInfo {
                            item_id: label.id.to_string(),
                            index: label.index,
                            symbology: label.request.symbology.to_string(),
                            text: label.request.text.clone(),
                            bounds: to_px(label.symbol),
                            frame: to_px(label.frame),
                            selected: selected.contains(&label.id),
                        })),
                    }

                    if let Some(band) = &label.caption {
                        let line = band.layout(self.measurer);
                        let origin = line.origin + layout.inner_origin;
                        page.items.push(RenderItem::Caption(CaptionRun {
                            text: band.text.clone(),
                            font: band.font.clone(),
                            size_px: pt_to_mm(line.fit.size_pt) * px_per_mm,
                            color: self.config.caption_color,
                            baseline_x: origin.x * px_per_mm,
                            baseline_y: origin.y * px_per_mm,
                        }));
                    }

                    if selected.contains(&label.id) {
                        outlines.push(to_px(label.frame));
                    }
                }
            }
        }

        if !outlines.is_empty() {
            page.items.push(RenderItem::Selection {
                rects: outlines,
                color: self.config.selection_color,
            });
        }
        page
    }
}
