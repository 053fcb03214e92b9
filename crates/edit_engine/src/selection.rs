//! Selection state machine
//!
//! Selection is held by stable item id so that it survives removals and
//! reorders without renumbering. Positional indices are recomputed from the
//! collection whenever a caller asks for them.

use serde::{Deserialize, Serialize};
use sheet_model::{ItemId, LabelCollection};

/// Which labels an edit applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SelectionState {
    #[default]
    Idle,
    Single { id: ItemId },
    Multi { ids: Vec<ItemId> },
    /// Every label is targeted. The index-based selection underneath is
    /// kept so that leaving edit-all restores it.
    EditAll { retained: Vec<ItemId> },
}

impl SelectionState {
    /// Build the state for a set of ids, collapsing to `Idle` or `Single`
    pub fn from_ids(mut ids: Vec<ItemId>) -> Self {
        dedup_in_order(&mut ids);
        match ids.len() {
            0 => SelectionState::Idle,
            1 => SelectionState::Single { id: ids[0] },
            _ => SelectionState::Multi { ids },
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn is_edit_all(&self) -> bool {
        matches!(self, SelectionState::EditAll { .. })
    }

    /// Ids in the index-based selection, including the one retained
    /// under edit-all
    pub fn ids(&self) -> &[ItemId] {
        match self {
            SelectionState::Idle => &[],
            SelectionState::Single { id } => std::slice::from_ref(id),
            SelectionState::Multi { ids } => ids,
            SelectionState::EditAll { retained } => retained,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids().contains(&id)
    }

    /// Replace the index-based selection, staying in edit-all if active
    pub fn replace(&mut self, ids: Vec<ItemId>) {
        *self = if self.is_edit_all() {
            let mut retained = ids;
            dedup_in_order(&mut retained);
            SelectionState::EditAll { retained }
        } else {
            SelectionState::from_ids(ids)
        };
    }

    /// Add or remove one id
    pub fn toggle(&mut self, id: ItemId) {
        let mut ids = self.ids().to_vec();
        match ids.iter().position(|&other| other == id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(id),
        }
        self.replace(ids);
    }

    /// Union a set of ids into the selection
    pub fn extend(&mut self, more: impl IntoIterator<Item = ItemId>) {
        let mut ids = self.ids().to_vec();
        ids.extend(more);
        self.replace(ids);
    }

    /// Enter edit-all, keeping the current selection underneath
    pub fn enter_edit_all(&mut self) {
        if !self.is_edit_all() {
            let retained = self.ids().to_vec();
            *self = SelectionState::EditAll { retained };
        }
    }

    /// Leave edit-all, restoring the retained selection
    pub fn leave_edit_all(&mut self) {
        if let SelectionState::EditAll { retained } = self {
            *self = SelectionState::from_ids(std::mem::take(retained));
        }
    }

    /// Drop ids whose labels no longer exist
    pub fn retain_existing(&mut self, labels: &LabelCollection) {
        let ids: Vec<ItemId> = self
            .ids()
            .iter()
            .copied()
            .filter(|&id| labels.index_of(id).is_some())
            .collect();
        if ids.len() != self.ids().len() {
            self.replace(ids);
        }
    }

    /// Current positions of the selected labels, ascending
    pub fn indices(&self, labels: &LabelCollection) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .ids()
            .iter()
            .filter_map(|&id| labels.index_of(id))
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Positions an edit applies to: every label under edit-all, otherwise
    /// the selection
    pub fn target_indices(&self, labels: &LabelCollection) -> Vec<usize> {
        match self {
            SelectionState::EditAll { .. } => (0..labels.len()).collect(),
            _ => self.indices(labels),
        }
    }
}

fn dedup_in_order(ids: &mut Vec<ItemId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}
