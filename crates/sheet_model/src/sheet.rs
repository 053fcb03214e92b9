//! Sheet aggregate: grid, labels, and sheet-wide settings

use crate::{LabelCollection, PageGrid, PageSpec, Result, Rotation, SizeOverride};
use serde::{Deserialize, Serialize};

/// Snap increments offered by the editor, in millimeters (0 = off)
pub const SNAP_PRESETS_MM: &[f64] = &[0.0, 1.0, 2.0, 5.0];

/// Largest skip count accepted from editing or a loaded snapshot
pub const MAX_SKIP_COUNT: usize = 10_000;

/// How labels are positioned on the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Each label is centered in its home cell
    #[default]
    GridBound,
    /// Labels may be placed anywhere inside the inner page area
    FreeForm,
}

/// Which multipliers apply when sizing labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum MultiplierScope {
    /// Each label uses its own size override
    #[default]
    PerItem,
    /// One multiplier pair applies to every label
    All { multipliers: SizeOverride },
}

/// Settings shared by every label on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSettings {
    #[serde(default)]
    pub layout_mode: LayoutMode,
    #[serde(default)]
    pub scope: MultiplierScope,
    /// Leading cells left empty on the first page
    #[serde(default)]
    pub skip_count: usize,
    /// Snap increment in millimeters, 0 disables snapping
    #[serde(default)]
    pub snap_mm: f64,
    /// Keep multiplier Y equal to X while resizing
    #[serde(default)]
    pub lock_aspect: bool,
    #[serde(default)]
    pub rotation: Rotation,
    /// Multiplies every label's base scale
    #[serde(default = "default_page_scale")]
    pub page_scale: f64,
}

fn default_page_scale() -> f64 {
    1.0
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            scope: MultiplierScope::default(),
            skip_count: 0,
            snap_mm: 0.0,
            lock_aspect: false,
            rotation: Rotation::default(),
            page_scale: default_page_scale(),
        }
    }
}

/// A label sheet: validated page grid, labels with overrides, and settings
#[derive(Debug, Clone)]
pub struct LabelSheet {
    grid: PageGrid,
    labels: LabelCollection,
    pub settings: SheetSettings,
}

impl LabelSheet {
    pub fn new(spec: PageSpec) -> Result<Self> {
        Ok(Self {
            grid: PageGrid::new(spec)?,
            labels: LabelCollection::new(),
            settings: SheetSettings::default(),
        })
    }

    pub fn from_parts(grid: PageGrid, labels: LabelCollection, settings: SheetSettings) -> Self {
        Self {
            grid,
            labels,
            settings,
        }
    }

    pub fn grid(&self) -> &PageGrid {
        &self.grid
    }

    /// Replace the page specification; an invalid one leaves the sheet untouched
    pub fn set_page_spec(&mut self, spec: PageSpec) -> Result<()> {
        self.grid = PageGrid::new(spec)?;
        Ok(())
    }

    pub fn labels(&self) -> &LabelCollection {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut LabelCollection {
        &mut self.labels
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.settings.layout_mode
    }

    /// Multipliers in effect for one label.
    ///
    /// A sheet-wide scope wins over per-label overrides; missing overrides
    /// mean the identity multiplier.
    pub fn effective_multipliers(&self, index: usize) -> SizeOverride {
        match self.settings.scope {
            MultiplierScope::All { multipliers } => multipliers,
            MultiplierScope::PerItem => self.labels.size_or_default(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabelItem;

    #[test]
    fn test_effective_multipliers_precedence() {
        let mut sheet = LabelSheet::new(PageSpec::default()).unwrap();
        sheet.labels_mut().add(LabelItem::new("qrcode", "a"));
        sheet.labels_mut().add(LabelItem::new("qrcode", "b"));
        sheet
            .labels_mut()
            .set_size_override(0, SizeOverride::new(2.0, 3.0))
            .unwrap();

        assert_eq!(sheet.effective_multipliers(0), SizeOverride::new(2.0, 3.0));
        assert_eq!(sheet.effective_multipliers(1), SizeOverride::IDENTITY);

        sheet.settings.scope = MultiplierScope::All {
            multipliers: SizeOverride::uniform(0.5),
        };
        assert_eq!(sheet.effective_multipliers(0), SizeOverride::uniform(0.5));
        assert_eq!(sheet.effective_multipliers(1), SizeOverride::uniform(0.5));
    }

    #[test]
    fn test_invalid_spec_keeps_grid() {
        let mut sheet = LabelSheet::new(PageSpec::default()).unwrap();
        let bad = PageSpec::new(10.0, 10.0, 6.0, 0.0, 1, 1);
        assert!(sheet.set_page_spec(bad).is_err());
        assert_eq!(*sheet.grid().spec(), PageSpec::default());
    }

    #[test]
    fn test_settings_defaults_from_json() {
        let settings: SheetSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, SheetSettings::default());
        assert_eq!(settings.page_scale, 1.0);
    }
}
