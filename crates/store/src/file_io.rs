//! File I/O operations

use crate::{Result, StoreError};
use sheet_model::LabelSheet;
use std::path::Path;
use tracing::debug;

/// Save a sheet to a file
pub async fn save_sheet(sheet: &LabelSheet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = crate::serialize(sheet)?;
    tokio::fs::write(path, json).await?;
    debug!(path = %path.display(), labels = sheet.labels().len(), "saved sheet");
    Ok(())
}

/// Load a sheet from a file
pub async fn load_sheet(path: impl AsRef<Path>) -> Result<LabelSheet> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    crate::deserialize(&json)
}

pub fn save_sheet_sync(sheet: &LabelSheet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = crate::serialize(sheet)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), labels = sheet.labels().len(), "saved sheet");
    Ok(())
}

pub fn load_sheet_sync(path: impl AsRef<Path>) -> Result<LabelSheet> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    crate::deserialize(&json)
}

/// Write exported document bytes
pub async fn write_export(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
