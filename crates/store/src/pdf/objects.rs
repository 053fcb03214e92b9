//! PDF object model
//!
//! The object types a label sheet document needs and their file syntax.
//! Writing goes to an in-memory buffer, so it cannot fail.

use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub enum PdfObject {
    Null,
    Integer(i64),
    Real(f64),
    /// Literal string bytes, escaped on output
    String(Vec<u8>),
    /// Name without the leading slash
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// Indirect reference to an object number, generation 0
    Reference(u32),
}

impl PdfObject {
    pub fn real(n: f64) -> Self {
        PdfObject::Real(n)
    }

    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn text(s: &str) -> Self {
        PdfObject::String(s.as_bytes().to_vec())
    }

    pub fn reference(obj_num: u32) -> Self {
        PdfObject::Reference(obj_num)
    }

    /// Append this object's file syntax to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Null => out.extend_from_slice(b"null"),
            PdfObject::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
            PdfObject::Real(n) => out.extend_from_slice(format_real(*n).as_bytes()),
            PdfObject::String(bytes) => write_literal(out, bytes),
            PdfObject::Name(name) => write_name(out, name),
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(dict) => dict.write_to(out),
            PdfObject::Stream(stream) => {
                stream.dict.write_to(out);
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(&stream.data);
                out.extend_from_slice(b"\nendstream");
            }
            PdfObject::Reference(num) => out.extend_from_slice(format!("{} 0 R", num).as_bytes()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

/// Dictionary with sorted keys, so output is deterministic
#[derive(Debug, Clone, Default)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `/Type`
    pub fn with_type(mut self, type_name: &str) -> Self {
        self.insert("Type", PdfObject::name(type_name));
        self
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (key, value) in &self.entries {
            out.push(b' ');
            write_name(out, key);
            out.push(b' ');
            value.write_to(out);
        }
        out.extend_from_slice(b" >>");
    }
}

#[derive(Debug, Clone)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// A filter has already been applied to `data`
    pub compressed: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            compressed: false,
        }
    }

    pub fn with_dict(mut self, dict: PdfDictionary) -> Self {
        self.dict.entries.extend(dict.entries);
        self
    }
}

fn write_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => out.extend_from_slice(&[b'\\', byte]),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x20..=0x7E => out.push(byte),
            _ => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
        }
    }
    out.push(b')');
}

fn write_name(out: &mut Vec<u8>, name: &str) {
    let mut escaped = String::with_capacity(name.len() + 1);
    escaped.push('/');
    for byte in name.bytes() {
        match byte {
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
                let _ = write!(escaped, "#{:02X}", byte);
            }
            0x21..=0x7E => escaped.push(byte as char),
            _ => {
                let _ = write!(escaped, "#{:02X}", byte);
            }
        }
    }
    out.extend_from_slice(escaped.as_bytes());
}

/// Shortest decimal form with at most four fractional digits
pub(crate) fn format_real(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(obj: &PdfObject) -> String {
        String::from_utf8(obj.to_bytes()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text(&PdfObject::Null), "null");
        assert_eq!(text(&PdfObject::Integer(-7)), "-7");
        assert_eq!(text(&PdfObject::real(595.0)), "595");
        assert_eq!(text(&PdfObject::real(28.34645)), "28.3465");
        assert_eq!(text(&PdfObject::reference(4)), "4 0 R");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(text(&PdfObject::text("a(b)\\")), "(a\\(b\\)\\\\)");
        assert_eq!(text(&PdfObject::String(vec![0xE9])), "(\\351)");
    }

    #[test]
    fn test_name_escapes() {
        assert_eq!(text(&PdfObject::name("Im1")), "/Im1");
        assert_eq!(text(&PdfObject::name("A B")), "/A#20B");
    }

    #[test]
    fn test_dictionary_sorted() {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Contents", PdfObject::reference(3));
        dict.insert("MediaBox", PdfObject::Array(vec![PdfObject::Integer(0), PdfObject::real(1.5)]));
        assert_eq!(
            text(&PdfObject::Dictionary(dict)),
            "<< /Contents 3 0 R /MediaBox [0 1.5] /Type /Page >>"
        );
    }

    #[test]
    fn test_format_real_degenerate() {
        assert_eq!(format_real(-0.00001), "0");
        assert_eq!(format_real(f64::NAN), "0");
    }
}
