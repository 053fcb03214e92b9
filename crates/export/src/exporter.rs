//! Page-by-page export of a label sheet

use crate::{
    describe, BitmapCache, CacheStats, DocumentWriter, EncoderMetrics, ExportError, QualityTier, RenderKey,
    Result, SymbolEncoder, TextRun, WriterMeasurer,
};
use layout_engine::{layout_page, LabelPlacement, PageLayout, Pagination, Placement};
use perf::PerfTimer;
use serde::{Deserialize, Serialize};
use sheet_model::LabelSheet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Slots processed between cooperative yields in [`SheetExporter::export_async`]
pub const DEFAULT_YIELD_INTERVAL: usize = 16;

/// Export settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub quality: QualityTier,
    pub yield_interval: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: QualityTier::default(),
            yield_interval: DEFAULT_YIELD_INTERVAL,
        }
    }
}

impl ExportOptions {
    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_yield_interval(mut self, slots: usize) -> Self {
        self.yield_interval = slots.max(1);
        self
    }
}

/// A slot that got an error marker instead of a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFault {
    pub page: usize,
    pub slot: usize,
    /// Position of the label in the collection
    pub index: usize,
    pub message: String,
}

/// What an export did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub pages: usize,
    pub slots: usize,
    pub labels: usize,
    /// Empty slots, including the skipped leading ones
    pub blanks: usize,
    pub faults: Vec<SlotFault>,
    /// Cache activity during this export
    pub cache: CacheStats,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Finished document and its report
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub report: ExportReport,
}

/// Drives a [`DocumentWriter`] through every page of a sheet
pub struct SheetExporter<'a> {
    encoder: &'a dyn SymbolEncoder,
    cache: &'a BitmapCache,
    options: ExportOptions,
}

impl<'a> SheetExporter<'a> {
    pub fn new(encoder: &'a dyn SymbolEncoder, cache: &'a BitmapCache, options: ExportOptions) -> Self {
        Self {
            encoder,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export every page, blocking until done
    pub fn export<W>(&self, sheet: &LabelSheet, writer: &mut W) -> Result<ExportOutput>
    where
        W: DocumentWriter + ?Sized,
    {
        let _timer = PerfTimer::export("export_sheet");
        let metrics = self.begin(sheet)?;
        let total = Pagination::for_sheet(sheet).total_pages();
        let before = self.cache.stats();
        let mut report = ExportReport::default();

        for page in 0..total {
            let layout = layout_page(sheet, &metrics, page)?;
            writer.add_page(layout.page_size)?;
            for placement in &layout.slots {
                self.emit_slot(&layout, placement, writer, &mut report)?;
            }
            report.pages += 1;
            debug!(page, total, "exported page");
        }

        self.finish(writer, report, before)
    }

    /// Export every page, yielding to the runtime every
    /// `yield_interval` slots.
    ///
    /// Output order is the same as [`export`](Self::export). When `cancel`
    /// is set the export stops before the next slot and the writer is left
    /// unfinished.
    pub async fn export_async<W>(
        &self,
        sheet: &LabelSheet,
        writer: &mut W,
        cancel: Option<&AtomicBool>,
    ) -> Result<ExportOutput>
    where
        W: DocumentWriter + ?Sized,
    {
        let _timer = PerfTimer::export("export_sheet_async");
        let metrics = self.begin(sheet)?;
        let total = Pagination::for_sheet(sheet).total_pages();
        let interval = self.options.yield_interval.max(1);
        let before = self.cache.stats();
        let mut report = ExportReport::default();

        for page in 0..total {
            let layout = layout_page(sheet, &metrics, page)?;
            writer.add_page(layout.page_size)?;
            for (slot, placement) in layout.slots.iter().enumerate() {
                if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    debug!(page, slot, "export cancelled");
                    return Err(ExportError::Cancelled { page, slot });
                }
                self.emit_slot(&layout, placement, writer, &mut report)?;
                if report.slots % interval == 0 {
                    tokio::task::yield_now().await;
                }
            }
            report.pages += 1;
            debug!(page, total, "exported page");
        }

        self.finish(writer, report, before)
    }

    fn begin(&self, sheet: &LabelSheet) -> Result<EncoderMetrics<'a>> {
        if sheet.labels().is_empty() {
            return Err(ExportError::EmptyDocument);
        }
        debug!(
            labels = sheet.labels().len(),
            quality = %self.options.quality,
            "starting export"
        );
        Ok(EncoderMetrics::new(self.encoder))
    }

    fn finish<W>(&self, writer: &mut W, mut report: ExportReport, before: CacheStats) -> Result<ExportOutput>
    where
        W: DocumentWriter + ?Sized,
    {
        let after = self.cache.stats();
        report.cache = CacheStats {
            hits: after.hits.saturating_sub(before.hits),
            misses: after.misses.saturating_sub(before.misses),
            evictions: after.evictions.saturating_sub(before.evictions),
        };
        let bytes = writer.finish()?;
        debug!(
            pages = report.pages,
            labels = report.labels,
            faults = report.faults.len(),
            bytes = bytes.len(),
            "export finished"
        );
        Ok(ExportOutput { bytes, report })
    }

    fn emit_slot<W>(
        &self,
        layout: &PageLayout,
        placement: &Placement,
        writer: &mut W,
        report: &mut ExportReport,
    ) -> Result<()>
    where
        W: DocumentWriter + ?Sized,
    {
        report.slots += 1;
        let Some(label) = placement.label() else {
            report.blanks += 1;
            return Ok(());
        };
        report.labels += 1;

        let symbol_rect = layout.to_page(label.symbol);
        let image = match &label.fault {
            Some(fault) => Err(fault.message.clone()),
            None => self.render(label).map_err(|error| describe(&error)),
        };
        match image {
            Ok(bitmap) => writer.draw_image(&bitmap, symbol_rect)?,
            Err(message) => {
                warn!(
                    page = label.page,
                    slot = label.slot,
                    index = label.index,
                    %message,
                    "symbol could not be encoded"
                );
                writer.draw_marker(symbol_rect, &message)?;
                report.faults.push(SlotFault {
                    page: label.page,
                    slot: label.slot,
                    index: label.index,
                    message,
                });
            }
        }

        if let Some(band) = &label.caption {
            let line = band.layout(&WriterMeasurer(&*writer));
            if line.fit.size_pt > 0.0 {
                writer.draw_text(&TextRun {
                    text: band.text.clone(),
                    font: band.font.clone(),
                    size_pt: line.fit.size_pt,
                    baseline: line.origin + layout.inner_origin,
                })?;
            }
        }
        Ok(())
    }

    fn render(&self, label: &LabelPlacement) -> std::result::Result<Arc<crate::Bitmap>, crate::EncodeError> {
        let size = self.options.quality.raster_size(label.symbol.size());
        let key = RenderKey::new(&label.request, size);
        self.cache.get_or_render(key, || {
            let _timer = PerfTimer::encode("rasterize");
            self.encoder.rasterize(&label.request, size)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bitmap, DrawCommand, EncodeError, RasterSize, RecordingWriter};
    use layout_engine::{ApproximateMeasurer, SymbolRequest, TextMeasurer};
    use sheet_model::{Caption, LabelItem, PageSpec, Size};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct FakeEncoder {
        rasterized: AtomicUsize,
    }

    impl SymbolEncoder for FakeEncoder {
        fn intrinsic_size(&self, request: &SymbolRequest) -> std::result::Result<Size, EncodeError> {
            if request.text.contains("BAD") {
                return Err(EncodeError::with_code("code128badCharacter", "bad character"));
            }
            if request.is_area_fill() {
                Ok(Size::new(21.0, 21.0))
            } else {
                Ok(Size::new(request.text.len() as f64 * 11.0 + 35.0, 50.0))
            }
        }

        fn rasterize(&self, _request: &SymbolRequest, size: RasterSize) -> std::result::Result<Bitmap, EncodeError> {
            self.rasterized.fetch_add(1, Ordering::SeqCst);
            Ok(Bitmap::filled(size.width, size.height, 0))
        }
    }

    fn sheet(items: Vec<LabelItem>, skip: usize) -> LabelSheet {
        let mut sheet = LabelSheet::new(PageSpec::new(100.0, 100.0, 5.0, 2.0, 2, 2)).unwrap();
        sheet.settings.skip_count = skip;
        sheet.labels_mut().add_many(items);
        sheet
    }

    fn writer() -> RecordingWriter<ApproximateMeasurer> {
        RecordingWriter::new(ApproximateMeasurer::default())
    }

    fn images(writer: &RecordingWriter<ApproximateMeasurer>) -> usize {
        writer
            .commands()
            .iter()
            .filter(|command| matches!(command, DrawCommand::Image { .. }))
            .count()
    }

    #[test]
    fn test_pages_follow_skip_offset() {
        let items = (0..5).map(|i| LabelItem::new("qrcode", format!("item {i}"))).collect();
        let sheet = sheet(items, 2);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
        let mut out = writer();

        let output = exporter.export(&sheet, &mut out).unwrap();
        assert_eq!(output.report.pages, 2);
        assert_eq!(output.report.slots, 8);
        assert_eq!(output.report.labels, 5);
        assert_eq!(output.report.blanks, 3);
        assert_eq!(out.page_count(), 2);
        assert_eq!(images(&out), 5);
        assert!(out.is_finished());

        // first command after the first page is the label in slot 2
        let DrawCommand::Image { rect, .. } = &out.commands()[1] else {
            panic!("expected an image");
        };
        let slot2 = sheet.grid().cell_rect(2).unwrap().translate(sheet.grid().inner_origin());
        assert!(slot2.contains_rect(rect));
    }

    #[test]
    fn test_bad_item_is_marked_and_export_continues() {
        let items = vec![
            LabelItem::new("code128", "OK-1"),
            LabelItem::new("code128", "BAD"),
            LabelItem::new("code128", "OK-2"),
        ];
        let sheet = sheet(items, 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
        let mut out = writer();

        let output = exporter.export(&sheet, &mut out).unwrap();
        assert_eq!(images(&out), 2);
        assert_eq!(
            output.report.faults,
            vec![SlotFault {
                page: 0,
                slot: 1,
                index: 1,
                message: "Code 128 contains a character it cannot encode".into(),
            }]
        );
        assert!(out
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Marker { message, .. } if message.starts_with("Code 128"))));
    }

    #[test]
    fn test_repeated_labels_render_once() {
        let items = (0..6).map(|_| LabelItem::new("qrcode", "same")).collect();
        let sheet = sheet(items, 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());

        let output = exporter.export(&sheet, &mut writer()).unwrap();
        assert_eq!(encoder.rasterized.load(Ordering::SeqCst), 1);
        assert_eq!(output.report.cache.misses, 1);
        assert_eq!(output.report.cache.hits, 5);
    }

    #[test]
    fn test_quality_changes_bitmap_size() {
        let sheet = sheet(vec![LabelItem::new("qrcode", "q")], 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let mut sizes = Vec::new();
        for quality in [QualityTier::Lowest, QualityTier::High] {
            let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default().with_quality(quality));
            let mut out = writer();
            exporter.export(&sheet, &mut out).unwrap();
            let width = out.commands().iter().find_map(|command| match command {
                DrawCommand::Image { width_px, .. } => Some(*width_px),
                _ => None,
            });
            sizes.push(width.unwrap());
        }
        assert!(sizes[1] > sizes[0]);
        assert_eq!(encoder.rasterized.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_caption_is_fitted_to_frame() {
        let long = "A caption far too long to fit under a small label at twelve points";
        let item = LabelItem::new("code128", "X1").with_caption(Caption::custom(long, "Arial", 12.0, 1.0));
        let sheet = sheet(vec![item], 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
        let mut out = writer();
        exporter.export(&sheet, &mut out).unwrap();

        let run = out
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Text(run) => Some(run.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(run.text, long);
        assert!(run.size_pt < 12.0);
        let image = out
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Image { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        let width = ApproximateMeasurer::default().text_width_mm(&run.text, &run.font, run.size_pt);
        assert!(width <= image.width + 1e-9);
        // baseline sits below the image
        assert!(run.baseline.y > image.bottom());
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        let sheet = sheet(Vec::new(), 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
        let result = exporter.export(&sheet, &mut writer());
        assert!(matches!(result, Err(ExportError::EmptyDocument)));
    }

    #[tokio::test]
    async fn test_async_export_matches_sync() {
        let items = (0..11).map(|i| LabelItem::new("code128", format!("C{i}"))).collect();
        let sheet = sheet(items, 1);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let options = ExportOptions::default().with_yield_interval(3);
        let exporter = SheetExporter::new(&encoder, &cache, options);

        let mut sync_out = writer();
        exporter.export(&sheet, &mut sync_out).unwrap();
        let mut async_out = writer();
        let output = exporter.export_async(&sheet, &mut async_out, None).await.unwrap();

        assert_eq!(output.report.pages, 3);
        assert_eq!(sync_out.commands(), async_out.commands());
    }

    #[tokio::test]
    async fn test_async_export_cancels() {
        let sheet = sheet(vec![LabelItem::new("qrcode", "x")], 0);
        let encoder = FakeEncoder::default();
        let cache = BitmapCache::default();
        let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
        let cancel = AtomicBool::new(true);
        let mut out = writer();

        let result = exporter.export_async(&sheet, &mut out, Some(&cancel)).await;
        assert!(matches!(result, Err(ExportError::Cancelled { page: 0, slot: 0 })));
        assert!(!out.is_finished());
    }
}
