//! Store - Sheet persistence, settings, and PDF output
//!
//! This crate saves and loads sheet snapshots, manages engine settings,
//! and provides the PDF document writer used by export.

mod format;
mod serializer;
mod file_io;
mod error;
mod settings;
pub mod pdf;

pub use format::*;
pub use serializer::*;
pub use file_io::*;
pub use error::*;
pub use settings::*;

pub use pdf::{PdfExportOptions, PdfSheetWriter};
