//! Document-level PDF structures: version, info dictionary, page objects

use super::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PdfVersion {
    #[default]
    #[serde(rename = "1.4")]
    V1_4,
    #[serde(rename = "1.7")]
    V1_7,
}

impl PdfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_7 => "1.7",
        }
    }
}

/// The `/Info` dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self {
            creator: Some("Label Sheet".to_string()),
            producer: Some(format!("label-sheet store {}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let mut text = |key: &str, value: &Option<String>| {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        };
        text("Title", &self.title);
        text("Author", &self.author);
        text("Subject", &self.subject);
        text("Creator", &self.creator);
        text("Producer", &self.producer);
        if !self.keywords.is_empty() {
            dict.insert("Keywords", PdfObject::text(&self.keywords.join(", ")));
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(date)));
        }
        dict
    }
}

/// Date string in the `D:YYYYMMDDHHmmSSZ` form
pub fn pdf_date(date: DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// One page's object data before serialization
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Width and height in points
    pub width: f64,
    pub height: f64,
    pub content_ref: u32,
    /// Resource name to object number
    pub fonts: BTreeMap<String, u32>,
    pub images: BTreeMap<String, u32>,
}

impl PdfPage {
    pub fn new(width: f64, height: f64, content_ref: u32) -> Self {
        Self {
            width,
            height,
            content_ref,
            fonts: BTreeMap::new(),
            images: BTreeMap::new(),
        }
    }

    fn resources(&self) -> PdfDictionary {
        let mut resources = PdfDictionary::new();
        let refs = |entries: &BTreeMap<String, u32>| {
            let mut dict = PdfDictionary::new();
            for (name, obj) in entries {
                dict.insert(name.clone(), PdfObject::reference(*obj));
            }
            PdfObject::Dictionary(dict)
        };
        if !self.fonts.is_empty() {
            resources.insert("Font", refs(&self.fonts));
        }
        if !self.images.is_empty() {
            resources.insert("XObject", refs(&self.images));
        }
        resources.insert(
            "ProcSet",
            PdfObject::Array(vec![PdfObject::name("PDF"), PdfObject::name("Text"), PdfObject::name("ImageB")]),
        );
        resources
    }

    pub fn to_dictionary(&self, parent_ref: u32) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Parent", PdfObject::reference(parent_ref));
        dict.insert(
            "MediaBox",
            PdfObject::Array(vec![
                PdfObject::Integer(0),
                PdfObject::Integer(0),
                PdfObject::real(self.width),
                PdfObject::real(self.height),
            ]),
        );
        dict.insert("Contents", PdfObject::reference(self.content_ref));
        dict.insert("Resources", PdfObject::Dictionary(self.resources()));
        dict
    }
}

pub fn catalog(pages_ref: u32) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Catalog");
    dict.insert("Pages", PdfObject::reference(pages_ref));
    dict
}

pub fn page_tree(page_refs: &[u32]) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Pages");
    dict.insert(
        "Kids",
        PdfObject::Array(page_refs.iter().map(|r| PdfObject::reference(*r)).collect()),
    );
    dict.insert("Count", PdfObject::Integer(page_refs.len() as i64));
    dict
}
