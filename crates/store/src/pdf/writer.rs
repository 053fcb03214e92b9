//! Low-level PDF file writer
//!
//! Tracks byte offsets of indirect objects and writes the header,
//! body, cross-reference table, and trailer.

use super::document::PdfVersion;
use super::objects::{PdfDictionary, PdfObject, PdfStream};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Compression error: {0}")]
    Compression(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// Object number to byte offset
    offsets: BTreeMap<u32, u64>,
    next_obj_num: u32,
    version: PdfVersion,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, version: PdfVersion) -> Self {
        Self {
            writer,
            position: 0,
            offsets: BTreeMap::new(),
            next_obj_num: 1,
            version,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_bytes(format!("%PDF-{}\n", self.version.as_str()).as_bytes())?;
        // binary marker
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        if self.offsets.contains_key(&obj_num) {
            return Err(PdfError::InvalidDocument(format!("object {} written twice", obj_num)));
        }
        self.offsets.insert(obj_num, self.position);

        let mut bytes = format!("{} 0 obj\n", obj_num).into_bytes();
        object.write_to(&mut bytes);
        bytes.extend_from_slice(b"\nendobj\n");
        self.write_bytes(&bytes)
    }

    /// Write a stream, compressing it first when enabled
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&stream.data)
                .map_err(|e| PdfError::Compression(e.to_string()))?;
            stream.data = encoder.finish().map_err(|e| PdfError::Compression(e.to_string()))?;
            stream.compressed = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream.dict.insert("Length", PdfObject::Integer(stream.data.len() as i64));
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: Option<u32>) -> Result<()> {
        let xref_offset = self.position;
        let size = self.next_obj_num;

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for num in 1..size {
            match self.offsets.get(&num) {
                Some(offset) => table.push_str(&format!("{:010} 00000 n \n", offset)),
                None => table.push_str("0000000000 65535 f \n"),
            }
        }
        self.write_bytes(table.as_bytes())?;

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", PdfObject::Integer(i64::from(size)));
        trailer.insert("Root", PdfObject::reference(catalog_ref));
        if let Some(info) = info_ref {
            trailer.insert("Info", PdfObject::reference(info));
        }
        let mut bytes = b"trailer\n".to_vec();
        PdfObject::Dictionary(trailer).write_to(&mut bytes);
        bytes.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes());
        self.write_bytes(&bytes)
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new(Vec::new(), PdfVersion::V1_4);
        writer.set_compression(false);
        writer.write_header().unwrap();
        let catalog = writer.allocate_object();
        let pages = writer.allocate_object();
        let mut dict = PdfDictionary::new().with_type("Catalog");
        dict.insert("Pages", PdfObject::reference(pages));
        writer.write_object(catalog, &PdfObject::Dictionary(dict)).unwrap();
        writer
            .write_object(pages, &PdfObject::Dictionary(PdfDictionary::new().with_type("Pages")))
            .unwrap();
        writer.write_xref_and_trailer(catalog, None).unwrap();
        let bytes = writer.finish().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let second = find(&bytes, b"2 0 obj").unwrap();
        let entry = format!("{:010} 00000 n ", second);
        assert!(find(&bytes, entry.as_bytes()).is_some());
    }

    #[test]
    fn test_stream_compressed_when_enabled() {
        let mut writer = PdfWriter::new(Vec::new(), PdfVersion::V1_4);
        let num = writer.allocate_object();
        writer
            .write_stream_object(num, PdfStream::new(vec![b'a'; 4096]))
            .unwrap();
        let bytes = writer.finish().unwrap();
        assert!(find(&bytes, b"/Filter /FlateDecode").is_some());
        assert!(bytes.len() < 1024);
    }

    #[test]
    fn test_duplicate_object_rejected() {
        let mut writer = PdfWriter::new(Vec::new(), PdfVersion::V1_4);
        let num = writer.allocate_object();
        writer.write_object(num, &PdfObject::Null).unwrap();
        assert!(matches!(
            writer.write_object(num, &PdfObject::Null),
            Err(PdfError::InvalidDocument(_))
        ));
    }
}
