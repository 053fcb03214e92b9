//! Sheet serialization

use crate::{Result, SheetFile, StoreError};
use sheet_model::LabelSheet;

/// Serialize a sheet to JSON
pub fn serialize(sheet: &LabelSheet) -> Result<String> {
    let file = SheetFile::new(sheet);
    let json = serde_json::to_string_pretty(&file)?;
    Ok(json)
}

/// Parse a sheet file without rebuilding the sheet
pub fn parse_file(json: &str) -> Result<SheetFile> {
    let file: SheetFile = serde_json::from_str(json)?;

    if !file.header.is_valid() {
        return Err(StoreError::InvalidFormat(format!(
            "Unrecognized header {} version {}",
            file.header.magic, file.header.version
        )));
    }

    Ok(file)
}

/// Deserialize a sheet from JSON
pub fn deserialize(json: &str) -> Result<LabelSheet> {
    let sheet = parse_file(json)?.sheet.restore()?;
    Ok(sheet)
}
