//! Export - Page-by-page serialization of label sheets
//!
//! The exporter walks every page of a sheet in slot order, asks the layout
//! engine where each label goes, rasterizes symbols through an external
//! [`SymbolEncoder`] at the density of the chosen [`QualityTier`], and sends
//! drawing commands to a [`DocumentWriter`]. Identical symbols are rendered
//! once per cache lifetime.
//!
//! A label that cannot be encoded produces an error marker in its slot and
//! the export carries on.

mod error;
mod quality;
mod encoder;
mod messages;
mod cache;
mod metrics;
mod writer;
mod exporter;

pub use error::*;
pub use quality::*;
pub use encoder::*;
pub use messages::*;
pub use cache::*;
pub use metrics::*;
pub use writer::*;
pub use exporter::*;
