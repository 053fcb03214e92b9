//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Positions can only be edited in free-form layout")]
    RequiresFreeForm,

    #[error("Another gesture is already in progress")]
    GestureInProgress,

    #[error("No gesture is in progress")]
    NoActiveGesture,

    #[error("Sheet model error: {0}")]
    Sheet(#[from] sheet_model::SheetError),

    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),
}

pub type Result<T> = std::result::Result<T, EditError>;
