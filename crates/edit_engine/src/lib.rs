//! Edit Engine - Selection, gestures, and bulk edits for label sheets
//!
//! This crate implements the interactive side of the sheet editor: the
//! selection state machine, pointer gestures for moving and resizing,
//! snapping and alignment, and the bulk operations that apply to the
//! selection or to every label at once.

mod selection;
mod gesture;
mod snap;
mod editor;
mod error;

pub use selection::*;
pub use gesture::{resize_multipliers, GestureKind, ResizeAxis};
pub use snap::*;
pub use editor::*;
pub use error::*;
