//! Error types for sheet model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Invalid page specification: {0}")]
    InvalidPageSpec(String),

    #[error("Slot {slot} is outside the page grid ({per_page} slots per page)")]
    SlotOutOfRange { slot: usize, per_page: usize },

    #[error("Label index {index} out of range (collection has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Override map out of sync with label collection: {0}")]
    OverrideDesync(String),

    #[error("Unknown page preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
