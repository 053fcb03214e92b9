//! Document writer seam
//!
//! Writers receive page-by-page drawing commands in millimeters with the
//! origin at the page's top-left corner. Converting to the output format's
//! own units and axis direction is the writer's business.

use crate::{Bitmap, Result};
use layout_engine::TextMeasurer;
use sheet_model::{Rect, Size, Vec2};
use std::sync::Arc;

/// One line of caption text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: String,
    pub size_pt: f64,
    /// Left end of the baseline, page millimeters
    pub baseline: Vec2,
}

/// Target of an export
pub trait DocumentWriter {
    /// Start a new page; every later command draws on it
    fn add_page(&mut self, size_mm: Size) -> Result<()>;

    /// Draw a bitmap stretched over `rect`.
    ///
    /// The same `Arc` arrives for every repeat of a cached symbol, so
    /// writers can embed each distinct image once.
    fn draw_image(&mut self, bitmap: &Arc<Bitmap>, rect: Rect) -> Result<()>;

    fn draw_text(&mut self, run: &TextRun) -> Result<()>;

    /// Mark a slot whose symbol could not be encoded
    fn draw_marker(&mut self, rect: Rect, message: &str) -> Result<()>;

    /// Width of `text` as this writer will render it
    fn text_width_mm(&self, text: &str, font: &str, size_pt: f64) -> f64;

    /// Finish the document and return its bytes
    fn finish(&mut self) -> Result<Vec<u8>>;
}

/// Caption fitting against a writer's own font metrics
pub struct WriterMeasurer<'a, W: ?Sized>(pub &'a W);

impl<W: DocumentWriter + ?Sized> TextMeasurer for WriterMeasurer<'_, W> {
    fn text_width_mm(&self, text: &str, font: &str, size_pt: f64) -> f64 {
        self.0.text_width_mm(text, font, size_pt)
    }
}

/// A recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Page(Size),
    Image { rect: Rect, width_px: u32, height_px: u32 },
    Text(TextRun),
    Marker { rect: Rect, message: String },
}

/// Writer that keeps the command stream instead of producing bytes.
///
/// Useful for dry runs that only need the report, and for checking what
/// an export would draw.
pub struct RecordingWriter<M> {
    measurer: M,
    commands: Vec<DrawCommand>,
    finished: bool,
}

impl<M: TextMeasurer> RecordingWriter<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            commands: Vec::new(),
            finished: false,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Page(_)))
            .count()
    }
}

impl<M: TextMeasurer> DocumentWriter for RecordingWriter<M> {
    fn add_page(&mut self, size_mm: Size) -> Result<()> {
        self.commands.push(DrawCommand::Page(size_mm));
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Arc<Bitmap>, rect: Rect) -> Result<()> {
        self.commands.push(DrawCommand::Image {
            rect,
            width_px: bitmap.width(),
            height_px: bitmap.height(),
        });
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<()> {
        self.commands.push(DrawCommand::Text(run.clone()));
        Ok(())
    }

    fn draw_marker(&mut self, rect: Rect, message: &str) -> Result<()> {
        self.commands.push(DrawCommand::Marker {
            rect,
            message: message.to_string(),
        });
        Ok(())
    }

    fn text_width_mm(&self, text: &str, font: &str, size_pt: f64) -> f64 {
        self.measurer.text_width_mm(text, font, size_pt)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        self.finished = true;
        Ok(Vec::new())
    }
}
