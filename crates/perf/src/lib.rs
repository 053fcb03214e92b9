//! Performance timing
//!
//! RAII scope timers that report elapsed time through `tracing` under the
//! `perf` target.
//!
//! # Example
//!
//! ```rust
//! use perf::PerfTimer;
//!
//! fn layout_page() {
//!     let _timer = PerfTimer::layout("layout_page");
//!     // ... layout code ...
//! }
//! ```

mod timing;

pub use timing::*;
