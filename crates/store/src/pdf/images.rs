//! Symbol bitmaps as image XObjects

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use export::Bitmap;
use std::collections::HashMap;
use std::sync::Arc;

/// Build an 8-bit DeviceGray image XObject from a rendered bitmap.
///
/// The data goes in raw; the writer applies compression.
pub fn gray_xobject(bitmap: &Bitmap) -> PdfStream {
    let mut dict = PdfDictionary::new().with_type("XObject");
    dict.insert("Subtype", PdfObject::name("Image"));
    dict.insert("Width", PdfObject::Integer(i64::from(bitmap.width())));
    dict.insert("Height", PdfObject::Integer(i64::from(bitmap.height())));
    dict.insert("BitsPerComponent", PdfObject::Integer(8));
    dict.insert("ColorSpace", PdfObject::name("DeviceGray"));
    PdfStream::new(bitmap.pixels().to_vec()).with_dict(dict)
}

/// Distinct bitmaps drawn in a document, with their resource names.
///
/// A bitmap shared through the render cache is drawn many times but
/// written once; identity is the `Arc` allocation.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Vec<(Arc<Bitmap>, String)>,
    by_ptr: HashMap<usize, usize>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for `bitmap`, registering it on first use
    pub fn register(&mut self, bitmap: &Arc<Bitmap>) -> &str {
        let key = Arc::as_ptr(bitmap) as usize;
        let next = self.images.len();
        let slot = *self.by_ptr.entry(key).or_insert(next);
        if slot == next {
            // The held clone keeps the allocation, so the pointer key
            // cannot be reused by another bitmap while registered
            self.images.push((Arc::clone(bitmap), format!("Im{}", next + 1)));
        }
        &self.images[slot].1
    }

    pub fn images(&self) -> impl Iterator<Item = (&Bitmap, &str)> {
        self.images.iter().map(|(bitmap, name)| (bitmap.as_ref(), name.as_str()))
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_xobject() {
        let bitmap = Bitmap::new(2, 3, vec![0, 255, 0, 255, 0, 255]).unwrap();
        let stream = gray_xobject(&bitmap);
        assert!(matches!(stream.dict.get("Width"), Some(PdfObject::Integer(2))));
        assert!(matches!(stream.dict.get("Height"), Some(PdfObject::Integer(3))));
        assert!(matches!(stream.dict.get("ColorSpace"), Some(PdfObject::Name(n)) if n == "DeviceGray"));
        assert_eq!(stream.data.len(), 6);
        assert!(!stream.compressed);
    }

    #[test]
    fn test_registry_dedupes_shared_bitmaps() {
        let shared = Arc::new(Bitmap::filled(4, 4, 0));
        let equal_but_distinct = Arc::new(Bitmap::filled(4, 4, 0));
        let mut registry = ImageRegistry::new();

        assert_eq!(registry.register(&shared), "Im1");
        assert_eq!(registry.register(&Arc::clone(&shared)), "Im1");
        assert_eq!(registry.register(&equal_but_distinct), "Im2");
        assert_eq!(registry.image_count(), 2);
    }
}
