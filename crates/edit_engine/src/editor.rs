//! Sheet editor: selection, gestures, and bulk edits

use crate::gesture::{Gesture, ResizeOrigin};
use crate::{
    resize_multipliers, snap_point, AlignReference, Alignment, EditError, GestureKind, ResizeAxis,
    Result, SelectionState,
};
use layout_engine::{NominalMetrics, Pagination, PlacementResolver, SymbolMetrics};
use perf::PerfTimer;
use sheet_model::{
    Caption, ItemId, LabelItem, LabelSheet, LayoutMode, MultiplierScope, PageSpec, Rect, Rotation,
    SheetError, Symbology, Vec2, MAX_SKIP_COUNT,
};

/// Owns a label sheet and applies interactive edits to it.
///
/// All mutation goes through the editor so that the selection and any
/// gesture in progress stay consistent with the collection. Edit-all is
/// owned by the sheet's multiplier scope; the selection mirrors it.
pub struct SheetEditor {
    sheet: LabelSheet,
    metrics: Box<dyn SymbolMetrics + Send + Sync>,
    selection: SelectionState,
    gesture: Option<Gesture>,
}

impl SheetEditor {
    pub fn new(sheet: LabelSheet, metrics: Box<dyn SymbolMetrics + Send + Sync>) -> Self {
        let mut selection = SelectionState::Idle;
        if matches!(sheet.settings.scope, MultiplierScope::All { .. }) {
            selection.enter_edit_all();
        }
        Self {
            sheet,
            metrics,
            selection,
            gesture: None,
        }
    }

    /// Editor that sizes symbols with [`NominalMetrics`]
    pub fn with_sheet(sheet: LabelSheet) -> Self {
        Self::new(sheet, Box::new(NominalMetrics))
    }

    pub fn sheet(&self) -> &LabelSheet {
        &self.sheet
    }

    pub fn into_sheet(self) -> LabelSheet {
        self.sheet
    }

    pub fn metrics(&self) -> &dyn SymbolMetrics {
        self.metrics.as_ref()
    }

    pub fn resolver(&self) -> PlacementResolver<'_> {
        PlacementResolver::new(&self.sheet, self.metrics.as_ref())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::for_sheet(&self.sheet)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.indices(self.sheet.labels())
    }

    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.gesture.as_ref().map(Gesture::kind)
    }

    pub fn is_edit_all(&self) -> bool {
        matches!(self.sheet.settings.scope, MultiplierScope::All { .. })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn add(&mut self, item: LabelItem) -> usize {
        self.sheet.labels_mut().add(item)
    }

    pub fn add_many(&mut self, items: impl IntoIterator<Item = LabelItem>) -> Vec<usize> {
        self.sheet.labels_mut().add_many(items)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<LabelItem> {
        self.ensure_idle_gesture()?;
        let item = self.sheet.labels_mut().remove_at(index)?;
        self.selection.retain_existing(self.sheet.labels());
        Ok(item)
    }

    /// Remove every selected label and return to `Idle`
    pub fn delete_selection(&mut self) -> Result<Vec<LabelItem>> {
        self.ensure_idle_gesture()?;
        if self.is_edit_all() {
            self.set_edit_all(false)?;
        }
        let indices = self.selected_indices();
        let removed = self.sheet.labels_mut().remove_many(&indices)?;
        self.selection = SelectionState::Idle;
        tracing::debug!(removed = removed.len(), "deleted selection");
        Ok(removed)
    }

    /// Remove every label, override, and selection
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle_gesture()?;
        self.sheet.labels_mut().clear();
        self.selection = SelectionState::Idle;
        Ok(())
    }

    /// Move a label to the collection position shown at a global slot.
    ///
    /// Labels in between shift by one; overrides travel with their label.
    /// Returns the label's new index.
    pub fn reorder(&mut self, from: usize, to_global_slot: usize) -> Result<usize> {
        self.ensure_idle_gesture()?;
        let to = self.pagination().insertion_index(to_global_slot);
        let index = self.sheet.labels_mut().move_item(from, to)?;
        tracing::debug!(from, to = index, "reordered label");
        Ok(index)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select exactly one label
    pub fn click(&mut self, index: usize) -> Result<()> {
        let id = self.id_at(index)?;
        self.selection.replace(vec![id]);
        Ok(())
    }

    /// Click a page slot; an empty slot clears the selection.
    ///
    /// Returns the label index that was hit.
    pub fn click_slot(&mut self, page: usize, slot: usize) -> Result<Option<usize>> {
        match self.pagination().item_at(page, slot) {
            Some(index) => {
                self.click(index)?;
                Ok(Some(index))
            }
            None => {
                self.selection.replace(Vec::new());
                Ok(None)
            }
        }
    }

    /// Modifier-click: add or remove one label
    pub fn toggle(&mut self, index: usize) -> Result<()> {
        let id = self.id_at(index)?;
        self.selection.toggle(id);
        Ok(())
    }

    pub fn select_indices(&mut self, indices: &[usize]) -> Result<()> {
        let ids = indices
            .iter()
            .map(|&index| self.id_at(index))
            .collect::<Result<Vec<_>>>()?;
        self.selection.replace(ids);
        Ok(())
    }

    pub fn select_all(&mut self) {
        let ids = self.sheet.labels().entries().iter().map(|entry| entry.id).collect();
        self.selection.replace(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.replace(Vec::new());
    }

    /// Select labels on `page` whose draw rectangle intersects `marquee`
    /// (inner-area millimeters). With `additive` the hits are unioned with
    /// the current selection, otherwise they replace it.
    pub fn marquee_select(&mut self, page: usize, marquee: Rect, additive: bool) -> Result<()> {
        let hits = self.hits_in(page, marquee)?;
        if additive {
            self.selection.extend(hits);
        } else {
            self.selection.replace(hits);
        }
        Ok(())
    }

    fn hits_in(&self, page: usize, marquee: Rect) -> Result<Vec<ItemId>> {
        let resolver = self.resolver();
        let mode = self.sheet.layout_mode();
        let mut hits = Vec::new();
        for at in resolver.pagination().page_slots(page) {
            let placement = resolver.resolve_slot(at, mode)?;
            if let Some(label) = placement.label() {
                if label.frame.intersects(&marquee) {
                    hits.push(label.id);
                }
            }
        }
        Ok(hits)
    }

    /// Enter or leave edit-all.
    ///
    /// Entering seeds the sheet-wide multipliers from the first label's
    /// override. Leaving writes them back into every label's override.
    pub fn set_edit_all(&mut self, enabled: bool) -> Result<()> {
        self.ensure_idle_gesture()?;
        match (enabled, self.sheet.settings.scope) {
            (true, MultiplierScope::PerItem) => {
                let multipliers = self.sheet.labels().size_or_default(0);
                self.sheet.settings.scope = MultiplierScope::All { multipliers };
                self.selection.enter_edit_all();
                tracing::debug!(x = multipliers.x, y = multipliers.y, "entered edit-all");
            }
            (false, MultiplierScope::All { multipliers }) => {
                let labels = self.sheet.labels_mut();
                for index in 0..labels.len() {
                    labels.set_size_override(index, multipliers)?;
                }
                self.sheet.settings.scope = MultiplierScope::PerItem;
                self.selection.leave_edit_all();
                tracing::debug!("left edit-all");
            }
            _ => return Ok(()),
        }
        let all: Vec<usize> = (0..self.sheet.labels().len()).collect();
        self.reclamp_positions(&all)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> Result<()> {
        self.ensure_idle_gesture()?;
        self.sheet.settings.layout_mode = mode;
        Ok(())
    }

    /// Snap increment in mm; zero or negative disables snapping
    pub fn set_snap(&mut self, increment_mm: f64) {
        self.sheet.settings.snap_mm = increment_mm.max(0.0);
    }

    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.sheet.settings.lock_aspect = lock;
    }

    /// Leading empty cells, capped at [`MAX_SKIP_COUNT`]. Returns the count
    /// that was applied.
    pub fn set_skip_count(&mut self, skip: usize) -> Result<usize> {
        self.ensure_idle_gesture()?;
        let skip = skip.min(MAX_SKIP_COUNT);
        self.sheet.settings.skip_count = skip;
        Ok(skip)
    }

    pub fn set_page_spec(&mut self, spec: PageSpec) -> Result<()> {
        self.ensure_idle_gesture()?;
        self.sheet.set_page_spec(spec)?;
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.sheet.settings.rotation = rotation;
    }

    /// Sheet-wide scale factor; non-finite or non-positive values reset to 1
    pub fn set_page_scale(&mut self, scale: f64) {
        self.sheet.settings.page_scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    }

    // ------------------------------------------------------------------
    // Field edits
    // ------------------------------------------------------------------

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.sheet.labels_mut().set_text(index, text)?;
        Ok(())
    }

    pub fn set_symbology_all(&mut self, symbology: &Symbology) {
        self.sheet.labels_mut().set_symbology_all(symbology);
    }

    /// Change the symbology of the selected labels only
    pub fn set_symbology_selected(&mut self, symbology: &Symbology) -> Result<()> {
        for index in self.selected_indices() {
            self.sheet.labels_mut().set_symbology(index, symbology.clone())?;
        }
        Ok(())
    }

    /// Set the caption of every targeted label
    pub fn set_caption(&mut self, caption: &Caption) -> Result<()> {
        for index in self.selection.target_indices(self.sheet.labels()) {
            self.sheet.labels_mut().set_caption(index, caption.clone())?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    /// Numeric position edit for one label; snapped, then clamped
    pub fn set_position(&mut self, index: usize, position: Vec2) -> Result<Vec2> {
        self.ensure_free_form()?;
        let placed = {
            let resolver = self.resolver();
            resolver.clamp_position(index, self.snap(position))?
        };
        self.sheet.labels_mut().set_position_override(index, placed)?;
        Ok(placed)
    }

    /// Nudge every label by the same delta
    pub fn move_all_by(&mut self, delta: Vec2) -> Result<()> {
        self.ensure_free_form()?;
        self.ensure_idle_gesture()?;
        let all: Vec<usize> = (0..self.sheet.labels().len()).collect();
        let origins = self.current_origins(&all)?;
        self.apply_move(&origins, delta)
    }

    /// Align the targeted labels to a canonical position
    pub fn align(&mut self, alignment: Alignment, reference: AlignReference) -> Result<()> {
        self.ensure_free_form()?;
        self.ensure_idle_gesture()?;
        let _timer = PerfTimer::edit("align");
        let targets = self.selection.target_indices(self.sheet.labels());
        let updates = {
            let resolver = self.resolver();
            let pagination = resolver.pagination();
            let inner = self.sheet.grid().inner_size();
            let mut updates = Vec::with_capacity(targets.len());
            for index in targets {
                let cell = self.sheet.grid().cell_rect(pagination.locate(index).slot)?;
                let size = resolver.draw_size(index)?;
                let current = self.current_origin(&resolver, index)?;
                let aligned = alignment.apply(current, size, cell, inner, reference);
                updates.push((index, resolver.clamp_position(index, self.snap(aligned))?));
            }
            updates
        };
        for (index, position) in updates {
            self.sheet.labels_mut().set_position_override(index, position)?;
        }
        Ok(())
    }

    /// Move the targeted labels by a delta in one step
    pub fn move_selection(&mut self, delta: Vec2) -> Result<()> {
        self.begin_move()?;
        let result = self.update_move(delta);
        self.gesture = None;
        result
    }

    /// Resize the targeted labels by a drag delta in one step
    pub fn resize_selection(&mut self, axis: ResizeAxis, delta: Vec2) -> Result<()> {
        self.begin_resize(axis)?;
        let result = self.update_resize(delta);
        self.gesture = None;
        result
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Start dragging the targeted labels
    pub fn begin_move(&mut self) -> Result<()> {
        self.ensure_free_form()?;
        self.ensure_idle_gesture()?;
        let targets = self.selection.target_indices(self.sheet.labels());
        let origins = self.current_origins(&targets)?;
        self.gesture = Some(Gesture::Move { origins });
        Ok(())
    }

    /// Apply the total drag delta (page mm) since the move began
    pub fn update_move(&mut self, delta: Vec2) -> Result<()> {
        let origins = match &self.gesture {
            Some(Gesture::Move { origins }) => origins.clone(),
            _ => return Err(EditError::NoActiveGesture),
        };
        self.apply_move(&origins, delta)
    }

    /// Start resizing the targeted labels, or the sheet-wide multipliers
    /// under edit-all
    pub fn begin_resize(&mut self, axis: ResizeAxis) -> Result<()> {
        self.ensure_idle_gesture()?;
        let origin = match self.sheet.settings.scope {
            MultiplierScope::All { multipliers } => ResizeOrigin::Global(multipliers),
            MultiplierScope::PerItem => {
                let labels = self.sheet.labels();
                let items = self
                    .selection
                    .target_indices(labels)
                    .into_iter()
                    .filter_map(|index| Some((labels.id_at(index)?, labels.size_or_default(index))))
                    .collect();
                ResizeOrigin::Items(items)
            }
        };
        self.gesture = Some(Gesture::Resize { axis, origin });
        Ok(())
    }

    /// Apply the total drag delta (page mm) since the resize began
    pub fn update_resize(&mut self, delta: Vec2) -> Result<()> {
        let _timer = PerfTimer::edit("update_resize");
        let (axis, origin) = match &self.gesture {
            Some(Gesture::Resize { axis, origin }) => (*axis, origin.clone()),
            _ => return Err(EditError::NoActiveGesture),
        };
        let cell = self.sheet.grid().cell_size();
        let normalized = Vec2::new(delta.x / cell.width, delta.y / cell.height);
        let lock = self.sheet.settings.lock_aspect;

        let touched: Vec<usize> = match origin {
            ResizeOrigin::Global(start) => {
                let multipliers = resize_multipliers(start, normalized, axis, lock);
                self.sheet.settings.scope = MultiplierScope::All { multipliers };
                (0..self.sheet.labels().len()).collect()
            }
            ResizeOrigin::Items(items) => {
                let labels = self.sheet.labels_mut();
                let mut touched = Vec::with_capacity(items.len());
                for (id, start) in items {
                    let Some(index) = labels.index_of(id) else {
                        continue;
                    };
                    labels.set_size_override(index, resize_multipliers(start, normalized, axis, lock))?;
                    touched.push(index);
                }
                touched
            }
        };
        self.reclamp_positions(&touched)
    }

    /// Start a marquee at an inner-area point on `page`
    pub fn begin_marquee(&mut self, page: usize, anchor: Vec2, additive: bool) -> Result<()> {
        self.ensure_idle_gesture()?;
        let base = match additive {
            true => self.selection.ids().to_vec(),
            false => Vec::new(),
        };
        self.gesture = Some(Gesture::Marquee { page, anchor, base });
        Ok(())
    }

    /// Re-select for the marquee spanning the anchor and `point`
    pub fn update_marquee(&mut self, point: Vec2) -> Result<()> {
        let (page, anchor, base) = match &self.gesture {
            Some(Gesture::Marquee { page, anchor, base }) => (*page, *anchor, base.clone()),
            _ => return Err(EditError::NoActiveGesture),
        };
        let hits = self.hits_in(page, Rect::from_corners(anchor, point))?;
        let mut ids = base;
        ids.extend(hits);
        self.selection.replace(ids);
        Ok(())
    }

    /// Release pointer capture
    pub fn end_gesture(&mut self) -> Result<GestureKind> {
        self.gesture
            .take()
            .map(|gesture| gesture.kind())
            .ok_or(EditError::NoActiveGesture)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn id_at(&self, index: usize) -> Result<ItemId> {
        let labels = self.sheet.labels();
        labels.id_at(index).ok_or_else(|| {
            SheetError::IndexOutOfRange {
                index,
                len: labels.len(),
            }
            .into()
        })
    }

    fn snap(&self, position: Vec2) -> Vec2 {
        snap_point(position, self.sheet.settings.snap_mm)
    }

    fn ensure_free_form(&self) -> Result<()> {
        match self.sheet.layout_mode() {
            LayoutMode::FreeForm => Ok(()),
            LayoutMode::GridBound => Err(EditError::RequiresFreeForm),
        }
    }

    fn ensure_idle_gesture(&self) -> Result<()> {
        match self.gesture {
            Some(_) => Err(EditError::GestureInProgress),
            None => Ok(()),
        }
    }

    /// Position a label is drawn at right now
    fn current_origin(&self, resolver: &PlacementResolver<'_>, index: usize) -> Result<Vec2> {
        let wanted = match self.sheet.labels().position_override(index) {
            Some(position) => position,
            None => resolver.default_position(index)?,
        };
        Ok(resolver.clamp_position(index, wanted)?)
    }

    fn current_origins(&self, indices: &[usize]) -> Result<Vec<(ItemId, Vec2)>> {
        let resolver = self.resolver();
        indices
            .iter()
            .map(|&index| Ok((self.id_at(index)?, self.current_origin(&resolver, index)?)))
            .collect()
    }

    fn apply_move(&mut self, origins: &[(ItemId, Vec2)], delta: Vec2) -> Result<()> {
        let _timer = PerfTimer::edit("apply_move");
        let updates = {
            let resolver = self.resolver();
            let labels = self.sheet.labels();
            let mut updates = Vec::with_capacity(origins.len());
            for &(id, origin) in origins {
                let Some(index) = labels.index_of(id) else {
                    continue;
                };
                let position = self.snap(origin + delta);
                updates.push((index, resolver.clamp_position(index, position)?));
            }
            updates
        };
        for (index, position) in updates {
            self.sheet.labels_mut().set_position_override(index, position)?;
        }
        Ok(())
    }

    /// Keep stored free-form positions inside the page after a size change
    fn reclamp_positions(&mut self, indices: &[usize]) -> Result<()> {
        let updates = {
            let resolver = self.resolver();
            let labels = self.sheet.labels();
            let mut updates = Vec::new();
            for &index in indices {
                if let Some(position) = labels.position_override(index) {
                    let clamped = resolver.clamp_position(index, position)?;
                    if clamped != position {
                        updates.push((index, clamped));
                    }
                }
            }
            updates
        };
        for (index, position) in updates {
            self.sheet.labels_mut().set_position_override(index, position)?;
        }
        Ok(())
    }
}
