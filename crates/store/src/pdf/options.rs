//! PDF export options

use super::document::{DocumentInfo, PdfVersion};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfExportOptions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Flate-compress content and image streams
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default)]
    pub pdf_version: PdfVersion,
}

fn default_compress() -> bool {
    true
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            compress: default_compress(),
            pdf_version: PdfVersion::default(),
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn document_info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self.title.clone(),
            author: self.author.clone(),
            subject: self.subject.clone(),
            keywords: self.keywords.clone(),
            ..DocumentInfo::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options: PdfExportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PdfExportOptions::default());
        assert!(options.compress);
    }

    #[test]
    fn test_builders_feed_info() {
        let options = PdfExportOptions::new().with_title("Bins").with_author("Stores").with_compression(false);
        let info = options.document_info();
        assert_eq!(info.title.as_deref(), Some("Bins"));
        assert_eq!(info.author.as_deref(), Some("Stores"));
        assert!(!options.compress);
    }

    #[test]
    fn test_version_serializes_as_number_string() {
        let json = serde_json::to_string(&PdfExportOptions::default()).unwrap();
        assert!(json.contains("\"pdfVersion\":\"1.4\""));
    }
}
