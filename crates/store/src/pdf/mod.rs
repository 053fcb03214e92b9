//! PDF writing for exported label sheets

mod content;
mod document;
mod fonts;
mod images;
mod objects;
mod options;
mod sheet_writer;
mod writer;

pub use content::ContentStream;
pub use document::{DocumentInfo, PdfVersion};
pub use fonts::{estimate_text_width, StandardFont};
pub use options::PdfExportOptions;
pub use sheet_writer::PdfSheetWriter;
pub use writer::{PdfError, Result as PdfResult};
