//! Ordered label collection with sparse overrides
//!
//! Labels get an `ItemId` when added. Overrides are keyed by that id, so a
//! removal or reorder never has to renumber them; positional indices are only
//! used at the API boundary and are recomputed after every structural change.

use crate::{
    Caption, ItemId, LabelItem, PositionOverride, Result, SheetError, SizeOverride, Symbology,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A label together with its stable id
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub id: ItemId,
    pub item: LabelItem,
}

/// The ordered list of labels on a sheet
#[derive(Debug, Clone, Default)]
pub struct LabelCollection {
    entries: Vec<LabelEntry>,
    /// Lookup from id to current position
    positions: HashMap<ItemId, usize>,
    size_overrides: HashMap<ItemId, SizeOverride>,
    position_overrides: HashMap<ItemId, PositionOverride>,
}

impl LabelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn items(&self) -> impl Iterator<Item = &LabelItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn get(&self, index: usize) -> Option<&LabelItem> {
        self.entries.get(index).map(|entry| &entry.item)
    }

    /// Label at an index, or an error naming the collection length
    pub fn item(&self, index: usize) -> Result<&LabelItem> {
        self.get(index).ok_or(SheetError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.entries.get(index).map(|entry| entry.id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    fn require_id(&self, index: usize) -> Result<ItemId> {
        self.id_at(index).ok_or(SheetError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    // === Structural changes ===

    /// Append a label and return its index
    pub fn add(&mut self, item: LabelItem) -> usize {
        let id = ItemId::new();
        let index = self.entries.len();
        self.entries.push(LabelEntry { id, item });
        self.positions.insert(id, index);
        index
    }

    /// Append labels in order and return their indices
    pub fn add_many(&mut self, items: impl IntoIterator<Item = LabelItem>) -> Vec<usize> {
        let start = self.entries.len();
        for item in items {
            let id = ItemId::new();
            self.positions.insert(id, self.entries.len());
            self.entries.push(LabelEntry { id, item });
        }
        let added: Vec<usize> = (start..self.entries.len()).collect();
        tracing::debug!(count = added.len(), total = self.entries.len(), "labels added");
        added
    }

    /// Remove one label together with its overrides
    pub fn remove_at(&mut self, index: usize) -> Result<LabelItem> {
        let id = self.require_id(index)?;
        let entry = self.entries.remove(index);
        self.size_overrides.remove(&id);
        self.position_overrides.remove(&id);
        self.rebuild_positions();
        Ok(entry.item)
    }

    /// Remove several labels at once.
    ///
    /// Every index is checked before anything changes; duplicates are
    /// ignored. Survivors keep their relative order and their overrides.
    pub fn remove_many(&mut self, indices: &[usize]) -> Result<Vec<LabelItem>> {
        if let Some(&bad) = indices.iter().find(|&&index| index >= self.len()) {
            return Err(SheetError::IndexOutOfRange {
                index: bad,
                len: self.len(),
            });
        }
        let doomed: HashSet<ItemId> = indices
            .iter()
            .map(|&index| self.entries[index].id)
            .collect();

        let mut removed = Vec::with_capacity(doomed.len());
        let mut kept = Vec::with_capacity(self.entries.len() - doomed.len());
        for entry in self.entries.drain(..) {
            if doomed.contains(&entry.id) {
                removed.push(entry.item);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        self.size_overrides.retain(|id, _| !doomed.contains(id));
        self.position_overrides.retain(|id, _| !doomed.contains(id));
        self.rebuild_positions();
        tracing::debug!(removed = removed.len(), remaining = self.len(), "labels removed");
        Ok(removed)
    }

    /// Drop every label and both override maps
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.size_overrides.clear();
        self.position_overrides.clear();
    }

    /// Move a label to a new position, shifting the labels in between.
    /// The target is clamped to the collection bounds.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<usize> {
        self.require_id(from)?;
        let entry = self.entries.remove(from);
        let target = to.min(self.entries.len());
        self.entries.insert(target, entry);
        self.rebuild_positions();
        Ok(target)
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            self.positions.insert(entry.id, index);
        }
    }

    // === Field setters ===

    pub fn set_symbology(&mut self, index: usize, symbology: Symbology) -> Result<()> {
        self.item_mut(index)?.symbology = symbology;
        Ok(())
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.item_mut(index)?.text = text.into();
        Ok(())
    }

    pub fn set_caption(&mut self, index: usize, caption: Caption) -> Result<()> {
        self.item_mut(index)?.caption = caption.clamped();
        Ok(())
    }

    /// Change the symbology of every label
    pub fn set_symbology_all(&mut self, symbology: &Symbology) {
        for entry in &mut self.entries {
            entry.item.symbology = symbology.clone();
        }
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut LabelItem> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .map(|entry| &mut entry.item)
            .ok_or(SheetError::IndexOutOfRange { index, len })
    }

    // === Overrides ===

    pub fn size_override(&self, index: usize) -> Option<SizeOverride> {
        self.id_at(index)
            .and_then(|id| self.size_overrides.get(&id).copied())
    }

    /// Size override or the identity multiplier
    pub fn size_or_default(&self, index: usize) -> SizeOverride {
        self.size_override(index).unwrap_or_default()
    }

    pub fn set_size_override(&mut self, index: usize, value: SizeOverride) -> Result<()> {
        let id = self.require_id(index)?;
        self.size_overrides.insert(id, value.clamped());
        Ok(())
    }

    pub fn clear_size_override(&mut self, index: usize) -> Result<()> {
        let id = self.require_id(index)?;
        self.size_overrides.remove(&id);
        Ok(())
    }

    pub fn position_override(&self, index: usize) -> Option<PositionOverride> {
        self.id_at(index)
            .and_then(|id| self.position_overrides.get(&id).copied())
    }

    pub fn set_position_override(&mut self, index: usize, value: PositionOverride) -> Result<()> {
        let id = self.require_id(index)?;
        self.position_overrides.insert(id, value);
        Ok(())
    }

    pub fn clear_position_override(&mut self, index: usize) -> Result<()> {
        let id = self.require_id(index)?;
        self.position_overrides.remove(&id);
        Ok(())
    }

    /// Size overrides keyed by current index
    pub fn size_overrides_by_index(&self) -> BTreeMap<usize, SizeOverride> {
        self.size_overrides
            .iter()
            .filter_map(|(id, value)| self.index_of(*id).map(|index| (index, *value)))
            .collect()
    }

    /// Position overrides keyed by current index
    pub fn position_overrides_by_index(&self) -> BTreeMap<usize, PositionOverride> {
        self.position_overrides
            .iter()
            .filter_map(|(id, value)| self.index_of(*id).map(|index| (index, *value)))
            .collect()
    }

    /// Verify that every override and lookup entry refers to a live label
    pub fn check_invariants(&self) -> Result<()> {
        if self.positions.len() != self.entries.len() {
            return Err(SheetError::OverrideDesync(format!(
                "lookup has {} ids for {} labels",
                self.positions.len(),
                self.entries.len()
            )));
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if self.positions.get(&entry.id) != Some(&index) {
                return Err(SheetError::OverrideDesync(format!(
                    "label {} is not indexed at position {}",
                    entry.id, index
                )));
            }
        }
        let orphan = self
            .size_overrides
            .keys()
            .chain(self.position_overrides.keys())
            .find(|id| !self.positions.contains_key(id));
        if let Some(id) = orphan {
            return Err(SheetError::OverrideDesync(format!(
                "override refers to removed label {}",
                id
            )));
        }
        Ok(())
    }
}
