//! Layout metrics backed by a real encoder

use crate::{describe, SymbolEncoder};
use layout_engine::{SymbolFault, SymbolMetrics, SymbolRequest};
use sheet_model::Size;

/// Lets the layout engine size symbols with the encoder used for export,
/// so preview and export agree on every aspect ratio.
pub struct EncoderMetrics<'a> {
    encoder: &'a dyn SymbolEncoder,
}

impl<'a> EncoderMetrics<'a> {
    pub fn new(encoder: &'a dyn SymbolEncoder) -> Self {
        Self { encoder }
    }
}

impl SymbolMetrics for EncoderMetrics<'_> {
    fn intrinsic_size(&self, request: &SymbolRequest) -> Result<Size, SymbolFault> {
        let _timer = perf::PerfTimer::encode("intrinsic_size");
        self.encoder
            .intrinsic_size(request)
            .map_err(|error| SymbolFault::new(describe(&error)))
    }
}
