//! Symbol encoder seam
//!
//! The engine does not implement any symbology. An encoder reports the
//! intrinsic size of a symbol and produces a grayscale bitmap of it at a
//! requested pixel size.

use crate::{EncodeError, RasterSize};
use layout_engine::SymbolRequest;
use sheet_model::Size;

/// 8-bit grayscale image, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EncodeError> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(EncodeError::new(format!(
                "bitmap of {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// A bitmap of one gray level
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn size(&self) -> RasterSize {
        RasterSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// External barcode encoder
pub trait SymbolEncoder: Send + Sync {
    /// Unscaled size of the symbol image; only the ratio matters
    fn intrinsic_size(&self, request: &SymbolRequest) -> Result<Size, EncodeError>;

    /// Render the symbol, including any encoder-drawn text, at exactly
    /// `size` pixels
    fn rasterize(&self, request: &SymbolRequest, size: RasterSize) -> Result<Bitmap, EncodeError>;
}
