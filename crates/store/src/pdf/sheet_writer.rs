//! PDF output for sheet export
//!
//! Collects the exporter's drawing commands page by page, then assembles
//! the file on `finish`. Symbol bitmaps shared through the render cache
//! are embedded once and referenced from every page that draws them.

use super::content::ContentStream;
use super::document::{catalog, page_tree, PdfPage};
use super::fonts::{estimate_text_width, standard_font_dict, FontManager, StandardFont};
use super::images::{gray_xobject, ImageRegistry};
use super::objects::PdfObject;
use super::options::PdfExportOptions;
use super::writer::{PdfError, PdfWriter, Result as PdfResult};
use export::{Bitmap, DocumentWriter, ExportError, TextRun};
use sheet_model::{mm_to_pt, pt_to_mm, Rect, Size};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Face used for fault marker messages
const MARKER_FONT: &str = "Helvetica";
const MARKER_MAX_PT: f64 = 6.0;
const MARKER_MIN_PT: f64 = 2.0;

struct PendingPage {
    width_pt: f64,
    height_pt: f64,
    content: ContentStream,
    fonts: BTreeSet<String>,
    images: BTreeSet<String>,
}

impl PendingPage {
    /// Page rectangle in millimeters, top-left origin, to PDF points
    fn rect_pt(&self, rect: Rect) -> (f64, f64, f64, f64) {
        let width = mm_to_pt(rect.width);
        let height = mm_to_pt(rect.height);
        (mm_to_pt(rect.x), self.height_pt - mm_to_pt(rect.bottom()), width, height)
    }
}

/// A [`DocumentWriter`] producing a PDF file
pub struct PdfSheetWriter {
    options: PdfExportOptions,
    pages: Vec<PendingPage>,
    fonts: FontManager,
    images: ImageRegistry,
    finished: bool,
}

impl PdfSheetWriter {
    pub fn new(options: PdfExportOptions) -> Self {
        Self {
            options,
            pages: Vec::new(),
            fonts: FontManager::new(),
            images: ImageRegistry::new(),
            finished: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.image_count()
    }

    fn current_page(&mut self) -> export::Result<&mut PendingPage> {
        if self.finished {
            return Err(ExportError::Writer("document already finished".to_string()));
        }
        self.pages
            .last_mut()
            .ok_or_else(|| ExportError::Writer("no page started".to_string()))
    }

    fn show_text(&mut self, text: &str, font: &str, size_pt: f64, x_mm: f64, y_mm: f64) -> export::Result<()> {
        self.current_page()?;
        let (_, resource) = self.fonts.resource_for(font);
        let page = self.current_page()?;
        let y_pt = page.height_pt - mm_to_pt(y_mm);
        page.content
            .begin_text()
            .set_font(&resource, size_pt)
            .move_text(mm_to_pt(x_mm), y_pt)
            .show_text(text)
            .end_text();
        page.fonts.insert(resource);
        Ok(())
    }

    fn assemble(&mut self) -> PdfResult<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(PdfError::InvalidDocument("no pages to write".to_string()));
        }

        let mut out = PdfWriter::new(Vec::new(), self.options.pdf_version);
        out.set_compression(self.options.compress);
        out.write_header()?;

        let catalog_ref = out.allocate_object();
        let pages_ref = out.allocate_object();
        let info_ref = out.allocate_object();

        let mut font_refs = BTreeMap::new();
        for (font, name) in self.fonts.fonts() {
            let num = out.allocate_object();
            out.write_object(num, &PdfObject::Dictionary(standard_font_dict(font)))?;
            font_refs.insert(name.to_string(), num);
        }

        let mut image_refs = BTreeMap::new();
        for (bitmap, name) in self.images.images() {
            let num = out.allocate_object();
            out.write_stream_object(num, gray_xobject(bitmap))?;
            image_refs.insert(name.to_string(), num);
        }

        let mut page_refs = Vec::with_capacity(self.pages.len());
        for pending in std::mem::take(&mut self.pages) {
            let content_ref = out.allocate_object();
            let page_ref = out.allocate_object();
            out.write_stream_object(content_ref, super::objects::PdfStream::new(pending.content.into_bytes()))?;

            let mut page = PdfPage::new(pending.width_pt, pending.height_pt, content_ref);
            for name in pending.fonts {
                if let Some(num) = font_refs.get(&name) {
                    page.fonts.insert(name, *num);
                }
            }
            for name in pending.images {
                if let Some(num) = image_refs.get(&name) {
                    page.images.insert(name, *num);
                }
            }
            out.write_object(page_ref, &PdfObject::Dictionary(page.to_dictionary(pages_ref)))?;
            page_refs.push(page_ref);
        }

        out.write_object(pages_ref, &PdfObject::Dictionary(page_tree(&page_refs)))?;
        out.write_object(catalog_ref, &PdfObject::Dictionary(catalog(pages_ref)))?;
        out.write_object(
            info_ref,
            &PdfObject::Dictionary(self.options.document_info().to_dictionary()),
        )?;
        out.write_xref_and_trailer(catalog_ref, Some(info_ref))?;

        debug!(
            pages = page_refs.len(),
            images = image_refs.len(),
            fonts = font_refs.len(),
            "assembled PDF"
        );
        out.finish()
    }
}

impl Default for PdfSheetWriter {
    fn default() -> Self {
        Self::new(PdfExportOptions::default())
    }
}

impl DocumentWriter for PdfSheetWriter {
    fn add_page(&mut self, size_mm: Size) -> export::Result<()> {
        if self.finished {
            return Err(ExportError::Writer("document already finished".to_string()));
        }
        self.pages.push(PendingPage {
            width_pt: mm_to_pt(size_mm.width),
            height_pt: mm_to_pt(size_mm.height),
            content: ContentStream::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        });
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Arc<Bitmap>, rect: Rect) -> export::Result<()> {
        self.current_page()?;
        let name = self.images.register(bitmap).to_string();
        let page = self.current_page()?;
        let (x, y, width, height) = page.rect_pt(rect);
        page.content
            .save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .draw_xobject(&name)
            .restore_state();
        page.images.insert(name);
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> export::Result<()> {
        {
            let page = self.current_page()?;
            page.content.set_fill_gray(0.0);
        }
        self.show_text(&run.text, &run.font, run.size_pt, run.baseline.x, run.baseline.y)
    }

    fn draw_marker(&mut self, rect: Rect, message: &str) -> export::Result<()> {
        let page = self.current_page()?;
        let (x, y, width, height) = page.rect_pt(rect);
        page.content
            .save_state()
            .rect(x, y, width, height)
            .clip()
            .set_stroke_rgb(0.86, 0.15, 0.15)
            .set_line_width(0.75)
            .rect(x, y, width, height)
            .stroke()
            .move_to(x, y)
            .line_to(x + width, y + height)
            .stroke()
            .set_fill_rgb(0.86, 0.15, 0.15);

        // largest size up to the cap that fits the marker width
        let unit = estimate_text_width(message, StandardFont::from_family(MARKER_FONT), 1.0);
        let size_pt = if unit > 0.0 { (width * 0.9 / unit).min(MARKER_MAX_PT) } else { 0.0 };
        if size_pt >= MARKER_MIN_PT {
            let inset = (rect.width - pt_to_mm(unit * size_pt)) / 2.0;
            self.show_text(message, MARKER_FONT, size_pt, rect.x + inset, rect.y + pt_to_mm(size_pt) * 1.2)?;
        }
        self.current_page()?.content.restore_state();
        Ok(())
    }

    fn text_width_mm(&self, text: &str, font: &str, size_pt: f64) -> f64 {
        pt_to_mm(estimate_text_width(text, StandardFont::from_family(font), size_pt))
    }

    fn finish(&mut self) -> export::Result<Vec<u8>> {
        if self.finished {
            return Err(ExportError::Writer("document already finished".to_string()));
        }
        self.finished = true;
        self.assemble().map_err(|e| ExportError::Writer(e.to_string()))
    }
}
