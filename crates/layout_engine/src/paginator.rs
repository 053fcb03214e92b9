//! Global slot sequence
//!
//! Labels fill cells in page-then-slot order after a configurable number of
//! leading empty cells (the skip count, used to resume printing on a
//! partially used sheet). For label index `i` the global slot is
//! `skip + i`; page and slot-on-page follow from the per-page capacity.

use sheet_model::LabelSheet;

/// Address of one cell in the whole multi-page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub page: usize,
    /// Slot index within the page
    pub slot: usize,
    /// Slot index across all pages
    pub global: usize,
    /// Label occupying this cell, if any
    pub item: Option<usize>,
}

/// Pagination of a label sequence over fixed-capacity pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    per_page: usize,
    skip_count: usize,
    item_count: usize,
}

impl Pagination {
    /// A capacity of zero is treated as one cell per page
    pub fn new(per_page: usize, skip_count: usize, item_count: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            skip_count,
            item_count,
        }
    }

    pub fn for_sheet(sheet: &LabelSheet) -> Self {
        Self::new(
            sheet.grid().per_page(),
            sheet.settings.skip_count,
            sheet.labels().len(),
        )
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn skip_count(&self) -> usize {
        self.skip_count
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of pages needed, never less than one
    pub fn total_pages(&self) -> usize {
        let used = self.skip_count.saturating_add(self.item_count);
        used.div_ceil(self.per_page).max(1)
    }

    /// Where a label index lands.
    ///
    /// An index whose global slot is not addressable comes back as an empty
    /// cell at the last slot of the sequence.
    pub fn locate(&self, item_index: usize) -> SlotRef {
        let (global, item) = match self.skip_count.checked_add(item_index) {
            Some(global) => (global, (item_index < self.item_count).then_some(item_index)),
            None => (usize::MAX, None),
        };
        SlotRef {
            page: global / self.per_page,
            slot: global % self.per_page,
            global,
            item,
        }
    }

    /// Label index shown in a cell, or `None` for an empty cell
    pub fn item_at(&self, page: usize, slot: usize) -> Option<usize> {
        if slot >= self.per_page {
            return None;
        }
        self.global_slot(page, slot)?
            .checked_sub(self.skip_count)
            .filter(|&index| index < self.item_count)
    }

    /// Cells of one page in slot order
    pub fn page_slots(&self, page: usize) -> impl Iterator<Item = SlotRef> + '_ {
        (0..self.per_page).map(move |slot| SlotRef {
            page,
            slot,
            global: self.global_slot(page, slot).unwrap_or(usize::MAX),
            item: self.item_at(page, slot),
        })
    }

    fn global_slot(&self, page: usize, slot: usize) -> Option<usize> {
        page.checked_mul(self.per_page)?.checked_add(slot)
    }

    /// Every cell of every page, in page-then-slot order
    pub fn slots(&self) -> impl Iterator<Item = SlotRef> + '_ {
        (0..self.total_pages()).flat_map(move |page| self.page_slots(page))
    }

    /// Collection position a label dropped on a global slot should move to
    pub fn insertion_index(&self, global: usize) -> usize {
        global
            .saturating_sub(self.skip_count)
            .min(self.item_count.saturating_sub(1))
    }
}
