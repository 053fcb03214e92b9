//! Content stream builder
//!
//! Emits the graphics operators for one page. Coordinates are PDF user
//! space: points, origin bottom-left.

use super::objects::format_real;
use std::io::Write;

#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// q
    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    /// Q
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    /// cm
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    pub fn set_fill_gray(&mut self, gray: f64) -> &mut Self {
        self.op(&[gray.clamp(0.0, 1.0)], "g")
    }

    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)], "rg")
    }

    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)], "RG")
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    /// Clip to the current path and discard it
    pub fn clip(&mut self) -> &mut Self {
        self.op(&[], "W n")
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    /// Tf, with the font resource name such as `F1`
    pub fn set_font(&mut self, resource: &str, size: f64) -> &mut Self {
        let _ = writeln!(self.data, "/{} {} Tf", resource, format_real(size));
        self
    }

    /// Td
    pub fn move_text(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.op(&[tx, ty], "Td")
    }

    /// Tj. Characters outside Latin-1 become `?`, matching the
    /// WinAnsi encoding of the standard fonts.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.data.push(b'(');
        for ch in text.chars() {
            let byte = u8::try_from(u32::from(ch)).unwrap_or(b'?');
            match byte {
                b'(' | b')' | b'\\' => {
                    self.data.push(b'\\');
                    self.data.push(byte);
                }
                0x20..=0x7E => self.data.push(byte),
                _ => {
                    let _ = write!(self.data, "\\{:03o}", byte);
                }
            }
        }
        self.data.extend_from_slice(b") Tj\n");
        self
    }

    /// Do, with the XObject resource name such as `Im1`
    pub fn draw_xobject(&mut self, resource: &str) -> &mut Self {
        let _ = writeln!(self.data, "/{} Do", resource);
        self
    }

    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        for value in operands {
            self.data.extend_from_slice(format_real(*value).as_bytes());
            self.data.push(b' ');
        }
        self.data.extend_from_slice(operator.as_bytes());
        self.data.push(b'\n');
        self
    }
}
