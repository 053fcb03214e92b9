//! Render Model - Page layouts to preview render items
//!
//! This crate is the screen adapter over the layout engine: it converts
//! resolved page layouts into pixel-space render items at the current zoom,
//! and maps pointer positions back to page millimeters for hit testing and
//! marquee selection.

mod render_item;
mod converter;
mod error;
mod viewport;

pub use render_item::*;
pub use converter::*;
pub use hit_test::*;
pub use error::*;
pub use viewport::*;
