//! Sheet Model - Page grid, label items, and override maps
//!
//! This crate holds the data side of a label sheet: millimeter geometry,
//! the page grid derived from a page specification, the ordered label
//! collection with its sparse size and position overrides, and the
//! sheet-wide settings that the layout engine reads.

mod units;
mod page_spec;
mod presets;
mod item_id;
mod symbology;
mod label;
mod overrides;
mod collection;
mod sheet;
mod error;

pub use units::*;
pub use page_spec::*;
pub use presets::*;
pub use item_id::*;
pub use symbology::*;
pub use label::*;
pub use overrides::*;
pub use collection::*;
pub use sheet::*;
pub use error::*;
