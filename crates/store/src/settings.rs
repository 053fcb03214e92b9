//! Engine settings management
//!
//! Defaults the shell applies to new sheets and exports, persisted as
//! `settings.json` in the application data directory. Every field has its
//! own serde default so older or partial files still load.

use crate::Result;
use export::{ExportOptions, QualityTier, DEFAULT_CACHE_CAPACITY, DEFAULT_YIELD_INTERVAL};
use serde::{Deserialize, Serialize};
use sheet_model::{DEFAULT_CUSTOM_FONT, DEFAULT_NATIVE_FONT};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    #[serde(default)]
    pub default_quality: QualityTier,
    /// Snap increment in millimeters, 0 disables snapping
    #[serde(default)]
    pub snap_mm: f64,
    /// Page preset key for new sheets
    #[serde(default = "default_preset")]
    pub default_preset: String,
    /// Slots exported between cooperative yields
    #[serde(default = "default_yield_interval")]
    pub export_yield_interval: usize,
    #[serde(default = "default_cache_capacity")]
    pub bitmap_cache_capacity: usize,
    #[serde(default = "default_native_font")]
    pub native_caption_font: String,
    #[serde(default = "default_custom_font")]
    pub custom_caption_font: String,
}

fn default_preset() -> String {
    "a4-3x8".to_string()
}

fn default_yield_interval() -> usize {
    DEFAULT_YIELD_INTERVAL
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_native_font() -> String {
    DEFAULT_NATIVE_FONT.to_string()
}

fn default_custom_font() -> String {
    DEFAULT_CUSTOM_FONT.to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_quality: QualityTier::default(),
            snap_mm: 0.0,
            default_preset: default_preset(),
            export_yield_interval: default_yield_interval(),
            bitmap_cache_capacity: default_cache_capacity(),
            native_caption_font: default_native_font(),
            custom_caption_font: default_custom_font(),
        }
    }
}

impl EngineSettings {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_quality(self.default_quality)
            .with_yield_interval(self.export_yield_interval)
    }
}

pub struct SettingsManager {
    settings_path: PathBuf,
    current: EngineSettings,
}

impl SettingsManager {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
            current: EngineSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    fn apply(&mut self, content: &str) {
        self.current = match serde_json::from_str::<EngineSettings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                EngineSettings::default()
            }
        };
    }

    pub async fn load(&mut self) -> Result<&EngineSettings> {
        if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.apply(&content);
        } else {
            self.current = EngineSettings::default();
        }
        Ok(&self.current)
    }

    pub fn load_sync(&mut self) -> Result<&EngineSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.apply(&content);
        } else {
            self.current = EngineSettings::default();
        }
        Ok(&self.current)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &EngineSettings {
        &self.current
    }

    pub async fn update(&mut self, settings: EngineSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    pub fn update_sync(&mut self, settings: EngineSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    pub async fn reset(&mut self) -> Result<&EngineSettings> {
        self.current = EngineSettings::default();
        self.save().await?;
        Ok(&self.current)
    }

    pub fn reset_sync(&mut self) -> Result<&EngineSettings> {
        self.current = EngineSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}
