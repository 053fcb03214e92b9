//! End-to-end export tests
//!
//! Sheets are edited through the editor, then exported with a recording
//! writer so the drawing commands can be compared with resolved geometry.

use edit_engine::SheetEditor;
use export::{
    Bitmap, BitmapCache, DrawCommand, EncodeError, ExportOptions, RasterSize, RecordingWriter, SheetExporter,
    SymbolEncoder,
};
use layout_engine::{ApproximateMeasurer, SymbolRequest};
use sheet_model::{LabelItem, LabelSheet, LayoutMode, PageSpec, Size, Vec2};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Square symbols only, like the nominal metrics the editor uses
#[derive(Default)]
struct SquareEncoder {
    calls: AtomicUsize,
}

impl SymbolEncoder for SquareEncoder {
    fn intrinsic_size(&self, _request: &SymbolRequest) -> Result<Size, EncodeError> {
        Ok(Size::new(25.0, 25.0))
    }

    fn rasterize(&self, _request: &SymbolRequest, size: RasterSize) -> Result<Bitmap, EncodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Bitmap::filled(size.width, size.height, 0))
    }
}

fn image_rects(writer: &RecordingWriter<ApproximateMeasurer>) -> Vec<sheet_model::Rect> {
    writer
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Image { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect()
}

#[test]
fn test_edit_then_export_matches_preview_geometry() {
    let mut sheet = LabelSheet::new(PageSpec::new(210.0, 297.0, 10.0, 3.0, 3, 4)).unwrap();
    sheet
        .labels_mut()
        .add_many((0..5).map(|i| LabelItem::new("qrcode", format!("LOC-{i:03}"))));
    let mut editor = SheetEditor::with_sheet(sheet);
    editor.set_layout_mode(LayoutMode::FreeForm).unwrap();
    editor.select_indices(&[1, 3]).unwrap();
    editor.move_selection(Vec2::new(12.5, 40.0)).unwrap();

    let expected: Vec<_> = (0..5)
        .map(|index| {
            let placement = editor.resolver().resolve_current(index).unwrap();
            let label = placement.label().unwrap();
            editor.sheet().grid().to_page(label.symbol)
        })
        .collect();

    let encoder = SquareEncoder::default();
    let cache = BitmapCache::default();
    let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
    let mut writer = RecordingWriter::new(ApproximateMeasurer::default());
    let output = exporter.export(editor.sheet(), &mut writer).unwrap();

    assert!(output.report.is_clean());
    let drawn = image_rects(&writer);
    assert_eq!(drawn.len(), expected.len());
    for (drawn, expected) in drawn.iter().zip(&expected) {
        assert!((drawn.x - expected.x).abs() < 1e-9);
        assert!((drawn.y - expected.y).abs() < 1e-9);
        assert!((drawn.width - expected.width).abs() < 1e-9);
    }
}

#[test]
fn test_cache_hits_across_pages() {
    let mut sheet = LabelSheet::new(PageSpec::new(100.0, 100.0, 5.0, 2.0, 2, 2)).unwrap();
    // three distinct symbols, each repeated four times over three pages
    sheet
        .labels_mut()
        .add_many((0..12).map(|i| LabelItem::new("qrcode", format!("BIN-{}", i % 3))));

    let encoder = SquareEncoder::default();
    let cache = BitmapCache::new(16);
    let exporter = SheetExporter::new(&encoder, &cache, ExportOptions::default());
    let output = exporter
        .export(&sheet, &mut RecordingWriter::new(ApproximateMeasurer::default()))
        .unwrap();

    assert_eq!(output.report.pages, 3);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 3);
    assert_eq!(output.report.cache.misses, 3);
    assert_eq!(output.report.cache.hits, 9);

    // a second export of the same sheet renders nothing new
    let again = exporter
        .export(&sheet, &mut RecordingWriter::new(ApproximateMeasurer::default()))
        .unwrap();
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 3);
    assert_eq!(again.report.cache.hits, 12);
}

#[tokio::test]
async fn test_yielding_export_keeps_page_then_slot_order() {
    let mut sheet = LabelSheet::new(PageSpec::new(100.0, 100.0, 5.0, 2.0, 2, 3)).unwrap();
    sheet.settings.skip_count = 1;
    sheet
        .labels_mut()
        .add_many((0..20).map(|i| LabelItem::new("qrcode", format!("SKU-{i:02}"))));

    let encoder = SquareEncoder::default();
    let options = ExportOptions::default().with_yield_interval(1);

    let sync_cache = BitmapCache::default();
    let mut sync_writer = RecordingWriter::new(ApproximateMeasurer::default());
    let sync_output = SheetExporter::new(&encoder, &sync_cache, options)
        .export(&sheet, &mut sync_writer)
        .unwrap();

    let async_cache = BitmapCache::default();
    let mut async_writer = RecordingWriter::new(ApproximateMeasurer::default());
    let async_output = SheetExporter::new(&encoder, &async_cache, options)
        .export_async(&sheet, &mut async_writer, None)
        .await
        .unwrap();

    assert_eq!(async_output.report.pages, 4);
    assert_eq!(async_output.report, sync_output.report);
    assert_eq!(async_writer.commands(), sync_writer.commands());
    assert!(async_writer.is_finished());

    // images on each page run left to right, top to bottom
    let mut page_rects: Vec<Vec<sheet_model::Rect>> = Vec::new();
    for command in async_writer.commands() {
        match command {
            DrawCommand::Page(_) => page_rects.push(Vec::new()),
            DrawCommand::Image { rect, .. } => page_rects.last_mut().unwrap().push(*rect),
            _ => {}
        }
    }
    assert_eq!(page_rects.iter().map(Vec::len).sum::<usize>(), 20);
    assert_eq!(page_rects[0].len(), 5);
    for rects in &page_rects {
        for pair in rects.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(b.y > a.y + 1e-9 || ((b.y - a.y).abs() < 1e-9 && b.x > a.x));
        }
    }
}
