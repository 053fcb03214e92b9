//! Error types for export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Document writer error: {0}")]
    Writer(String),

    #[error("Export cancelled at page {page}, slot {slot}")]
    Cancelled { page: usize, slot: usize },

    #[error("Nothing to export: the sheet has no labels")]
    EmptyDocument,

    #[error("Sheet model error: {0}")]
    Sheet(#[from] sheet_model::SheetError),

    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Failure to encode one symbol.
///
/// `code` carries the encoder's machine-readable reason when it has one,
/// for example `ean13badLength`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EncodeError {
    pub code: Option<String>,
    pub message: String,
}

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}
