//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Page {page} out of range ({total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    #[error("Sheet model error: {0}")]
    Sheet(#[from] sheet_model::SheetError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
