//! Sheet snapshot file format
//!
//! A snapshot holds everything needed to rebuild a sheet: the page
//! specification, sheet settings, the ordered label items, and both
//! override maps keyed by label position. Item ids are runtime identity
//! and are not stored; a loaded sheet gets fresh ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sheet_model::{
    LabelItem, LabelSheet, PageSpec, PositionOverride, SheetError, SheetSettings, SizeOverride, MAX_SKIP_COUNT,
};
use std::collections::BTreeMap;

/// File format version
pub const FORMAT_VERSION: u32 = 1;

/// File extension for saved sheets
pub const FILE_EXTENSION: &str = "labels.json";

/// File header for format identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHeader {
    pub magic: String,
    pub version: u32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FileHeader {
    pub const MAGIC: &'static str = "LABEL-SHEET";

    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            magic: Self::MAGIC.to_string(),
            version: FORMAT_VERSION,
            created: now,
            modified: now,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= FORMAT_VERSION
    }

    /// Bump the modification time
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable state of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSnapshot {
    pub page_spec: PageSpec,
    #[serde(default)]
    pub settings: SheetSettings,
    #[serde(default)]
    pub items: Vec<LabelItem>,
    #[serde(default)]
    pub size_overrides: BTreeMap<usize, SizeOverride>,
    #[serde(default)]
    pub position_overrides: BTreeMap<usize, PositionOverride>,
}

impl SheetSnapshot {
    pub fn capture(sheet: &LabelSheet) -> Self {
        let labels = sheet.labels();
        Self {
            page_spec: *sheet.grid().spec(),
            settings: sheet.settings,
            items: labels.items().cloned().collect(),
            size_overrides: labels.size_overrides_by_index(),
            position_overrides: labels.position_overrides_by_index(),
        }
    }

    /// Rebuild the sheet.
    ///
    /// Fails on an invalid page specification, or when an override names
    /// a position past the end of the item list.
    pub fn restore(&self) -> sheet_model::Result<LabelSheet> {
        let len = self.items.len();
        let stray = self
            .size_overrides
            .keys()
            .chain(self.position_overrides.keys())
            .find(|index| **index >= len);
        if let Some(index) = stray {
            return Err(SheetError::OverrideDesync(format!(
                "override for index {} but the snapshot has {} items",
                index, len
            )));
        }

        let mut sheet = LabelSheet::new(self.page_spec)?;
        sheet.settings = self.settings;
        sheet.settings.skip_count = sheet.settings.skip_count.min(MAX_SKIP_COUNT);
        let labels = sheet.labels_mut();
        labels.add_many(self.items.iter().cloned());
        for (index, value) in &self.size_overrides {
            labels.set_size_override(*index, *value)?;
        }
        for (index, value) in &self.position_overrides {
            labels.set_position_override(*index, *value)?;
        }
        labels.check_invariants()?;
        Ok(sheet)
    }
}

/// Complete file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFile {
    pub header: FileHeader,
    pub sheet: SheetSnapshot,
}

impl SheetFile {
    pub fn new(sheet: &LabelSheet) -> Self {
        Self {
            header: FileHeader::new(),
            sheet: SheetSnapshot::capture(sheet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_model::Vec2;

    fn sheet() -> LabelSheet {
        let mut sheet = LabelSheet::new(PageSpec::default()).unwrap();
        sheet.labels_mut().add_many(vec![
            LabelItem::new("qrcode", "a"),
            LabelItem::new("code128", "b"),
            LabelItem::new("ean13", "5901234123457"),
        ]);
        sheet.labels_mut().set_size_override(2, SizeOverride::new(1.5, 0.8)).unwrap();
        sheet.labels_mut().set_position_override(1, Vec2::new(12.0, 30.0)).unwrap();
        sheet
    }

    #[test]
    fn test_capture_keys_by_position() {
        let mut sheet = sheet();
        sheet.labels_mut().remove_at(0).unwrap();
        let snapshot = SheetSnapshot::capture(&sheet);

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.size_overrides.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(snapshot.position_overrides[&0], Vec2::new(12.0, 30.0));
    }

    #[test]
    fn test_restore_rebuilds_overrides() {
        let snapshot = SheetSnapshot::capture(&sheet());
        let restored = snapshot.restore().unwrap();
        assert_eq!(restored.labels().len(), 3);
        assert_eq!(restored.labels().size_override(2), Some(SizeOverride::new(1.5, 0.8)));
        assert_eq!(restored.labels().position_override(1), Some(Vec2::new(12.0, 30.0)));
        assert_eq!(SheetSnapshot::capture(&restored), snapshot);
    }

    #[test]
    fn test_restore_rejects_stray_override() {
        let mut snapshot = SheetSnapshot::capture(&sheet());
        snapshot.position_overrides.insert(3, Vec2::new(1.0, 1.0));
        assert!(matches!(snapshot.restore(), Err(SheetError::OverrideDesync(_))));
    }

    #[test]
    fn test_restore_rejects_bad_page_spec() {
        let mut snapshot = SheetSnapshot::capture(&sheet());
        snapshot.page_spec.columns = 0;
        assert!(matches!(snapshot.restore(), Err(SheetError::InvalidPageSpec(_))));
    }

    #[test]
    fn test_restore_caps_skip_count() {
        let mut snapshot = SheetSnapshot::capture(&sheet());
        snapshot.settings.skip_count = usize::MAX;
        let restored = snapshot.restore().unwrap();
        assert_eq!(restored.settings.skip_count, MAX_SKIP_COUNT);
    }

    #[test]
    fn test_header_validity() {
        let mut header = FileHeader::new();
        assert!(header.is_valid());
        let created = header.created;
        header.touch();
        assert!(header.modified >= created);

        header.version = FORMAT_VERSION + 1;
        assert!(!header.is_valid());
        header.version = FORMAT_VERSION;
        header.magic = "MSWORD-DOC".into();
        assert!(!header.is_valid());
    }
}
