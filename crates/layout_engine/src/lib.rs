//! Layout Engine - Pagination and placement for label sheets
//!
//! This crate turns a label sheet into per-slot geometry: which label lands
//! in which cell of which page, and the rectangles for its symbol and
//! caption. Both the interactive preview and the document export consume the
//! same `PageLayout`, so the two can never disagree about where a label is.

mod paginator;
mod symbol;
mod placement;
mod caption;
mod page_layout;
mod error;

pub use paginator::*;
pub use symbol::*;
pub use placement::*;
pub use caption::*;
pub use page_layout::*;
pub use error::*;
