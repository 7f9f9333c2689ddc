// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat list view port.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use kurbo::Point;
use understory_layout::{Layout, LayoutResult, LinearLayout, NavigationKey, ScrollAlign};
use understory_recycle::{Recycler, RendererId};

use crate::port::{PassSource, ViewPortStore};
use crate::{
    CollectionChange, DataCollection, IndexSelection, InvalidationFlags, ItemRenderer, ItemState,
    MAX_VALIDATION_PASSES, RendererCaps, RendererSignals, SelectionMode, ViewPortCore,
    ViewPortError, ViewPortEvent,
};

struct ListSource<'a, C> {
    data: &'a C,
    selection: &'a IndexSelection,
}

impl<C> PassSource<C::Item> for ListSource<'_, C>
where
    C: DataCollection,
    C::Item: Clone,
{
    fn len(&self) -> usize {
        self.data.len()
    }

    fn key(&self, index: usize) -> Option<C::Item> {
        self.data.get(index).cloned()
    }

    fn typical_key(&self) -> Option<C::Item> {
        self.data.get(0).cloned()
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }
}

/// Binds a [`DataCollection`] to recycled renderers laid out in a list.
///
/// Items are keyed by value, so each item must be unique within the
/// collection. Validation reports a duplicate as
/// [`ViewPortError::DuplicateItem`].
///
/// ```rust
/// use kurbo::{Point, Size};
/// use understory_data_view::{ArrayCollection, ItemRenderer, ListViewPort};
/// use understory_layout::{LayoutItem, ViewportBounds};
/// use understory_recycle::{Recyclable, Recycler};
///
/// #[derive(Default)]
/// struct Row { origin: Point, text: Option<u32> }
///
/// impl LayoutItem for Row {
///     fn size(&self) -> Size { Size::new(100.0, 20.0) }
///     fn set_size(&mut self, _: Size) {}
///     fn origin(&self) -> Point { self.origin }
///     fn set_origin(&mut self, origin: Point) { self.origin = origin; }
/// }
/// impl Recyclable for Row {
///     fn set_visible(&mut self, _: bool) {}
/// }
/// impl ItemRenderer<u32> for Row {
///     fn set_data(&mut self, data: Option<&u32>) { self.text = data.copied(); }
/// }
///
/// let data: ArrayCollection<u32> = (0..1000).collect();
/// let mut list = ListViewPort::new(data, Recycler::<Row, _>::from_default());
/// list.core_mut().set_bounds(ViewportBounds::fixed(Size::new(100.0, 100.0)));
/// list.validate_until_settled().unwrap();
///
/// // Five rows fit, plus one overscan row below them.
/// assert_eq!(list.core().active_renderers().count(), 6);
/// assert_eq!(list.core().content_size().height, 20_000.0);
/// ```
pub struct ListViewPort<C: DataCollection, R, L = LinearLayout> {
    core: ViewPortCore<C::Item, R, L>,
    data: C,
    selection: IndexSelection,
    selectable: bool,
    changes: Vec<CollectionChange>,
    signals: Vec<(RendererId, RendererSignals)>,
}

impl<C, R, L> fmt::Debug for ListViewPort<C, R, L>
where
    C: DataCollection + fmt::Debug,
    L: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListViewPort")
            .field("core", &self.core)
            .field("data", &self.data)
            .field("selection", &self.selection)
            .field("selectable", &self.selectable)
            .finish_non_exhaustive()
    }
}

impl<C, R> ListViewPort<C, R, LinearLayout>
where
    C: DataCollection,
    C::Item: Clone + Eq + Hash,
    R: ItemRenderer<C::Item>,
{
    /// A virtualized vertical list.
    pub fn new(data: C, recycler: Recycler<R, ItemState<C::Item>>) -> Self {
        let mut layout = LinearLayout::vertical();
        layout.set_virtual(true);
        Self::with_layout(data, layout, recycler)
    }
}

impl<C, R, L> ListViewPort<C, R, L>
where
    C: DataCollection,
    C::Item: Clone + Eq + Hash,
    R: ItemRenderer<C::Item>,
    L: Layout,
{
    /// A list over `data` arranged by `layout`.
    pub fn with_layout(data: C, layout: L, recycler: Recycler<R, ItemState<C::Item>>) -> Self {
        Self {
            core: ViewPortCore::new(layout, recycler),
            data,
            selection: IndexSelection::new(SelectionMode::Single),
            selectable: true,
            changes: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Shared view-port state: bounds, layout, renderers, and events.
    #[must_use]
    pub const fn core(&self) -> &ViewPortCore<C::Item, R, L> {
        &self.core
    }

    /// Mutably borrows the shared view-port state.
    pub fn core_mut(&mut self) -> &mut ViewPortCore<C::Item, R, L> {
        &mut self.core
    }

    /// The data.
    #[must_use]
    pub const fn data(&self) -> &C {
        &self.data
    }

    /// Mutably borrows the data. Recorded changes are applied on the next validation.
    pub fn data_mut(&mut self) -> &mut C {
        &mut self.data
    }

    /// Replaces the data, clearing the selection and every cached extent.
    pub fn set_data(&mut self, data: C) -> C {
        let old = core::mem::replace(&mut self.data, data);
        // Changes recorded by the new collection predate this view.
        self.changes.clear();
        self.data.drain_changes(&mut self.changes);
        self.changes.clear();
        self.changes.push(CollectionChange::Reset);
        old
    }

    /// The selection.
    #[must_use]
    pub const fn selection(&self) -> &IndexSelection {
        &self.selection
    }

    /// Lowest selected index.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.first()
    }

    /// Item at the lowest selected index.
    #[must_use]
    pub fn selected_item(&self) -> Option<&C::Item> {
        self.data.get(self.selection.first()?)
    }

    /// Selects only `index`, or nothing for `None`.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        let changed = match index.filter(|&i| i < self.data.len()) {
            Some(index) => self.selection.set_indices(&[index]),
            None => self.selection.clear(),
        };
        self.selection_changed(changed);
    }

    /// Replaces the selected indices. Out-of-range indices are ignored.
    pub fn set_selected_indices(&mut self, indices: &[usize]) {
        let len = self.data.len();
        let valid: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        let changed = self.selection.set_indices(&valid);
        self.selection_changed(changed);
    }

    /// Switches between single and multiple selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        let changed = self.selection.set_mode(mode);
        self.selection_changed(changed);
    }

    /// Allows or forbids selecting items. Forbidding clears the selection.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            let changed = self.selection.clear();
            self.selection_changed(changed);
        }
    }

    /// Whether items can be selected.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable
    }

    fn selection_changed(&mut self, changed: bool) {
        if changed {
            self.core.invalidate(InvalidationFlags::SELECTION);
            self.core.push_event(ViewPortEvent::SelectionChanged);
        }
    }

    /// Scroll position that brings the item at `index` into view.
    pub fn scroll_position_for_index(&mut self, index: usize, align: ScrollAlign) -> Point {
        let count = self.data.len();
        self.core.scroll_position_for_index(index, count, align)
    }

    /// Destination of a keyboard action starting at `current`.
    pub fn next_index(&mut self, current: Option<usize>, key: NavigationKey) -> Option<usize> {
        let count = self.data.len();
        self.core.next_index(current, key, count)
    }

    /// Runs one validation pass.
    pub fn validate(&mut self) -> Result<(), ViewPortError> {
        self.validate_with(|_, _, _| {})
    }

    pub(crate) fn validate_with<F>(&mut self, after_layout: F) -> Result<(), ViewPortError>
    where
        F: FnOnce(&mut ViewPortStore<C::Item, R>, &[Option<RendererId>], &LayoutResult),
    {
        self.apply_data_changes();
        let source = ListSource {
            data: &self.data,
            selection: &self.selection,
        };
        self.core.validate_pass(&source, after_layout)?;
        self.route_signals();
        Ok(())
    }

    /// Validates until nothing is left invalid.
    ///
    /// Returns the number of passes run. Fails with
    /// [`ViewPortError::ValidationLoop`] if the view port is still invalid
    /// after [`MAX_VALIDATION_PASSES`] passes.
    pub fn validate_until_settled(&mut self) -> Result<usize, ViewPortError> {
        for passes in 1..=MAX_VALIDATION_PASSES {
            self.validate()?;
            if self.is_settled() {
                return Ok(passes);
            }
        }
        dwarn!(passes = MAX_VALIDATION_PASSES, "list view port did not settle");
        Err(ViewPortError::ValidationLoop {
            passes: MAX_VALIDATION_PASSES,
        })
    }

    /// Returns `true` if neither the view port nor the data has pending work.
    pub(crate) fn is_settled(&mut self) -> bool {
        self.data.drain_changes(&mut self.changes);
        !self.core.is_invalid() && self.changes.is_empty()
    }

    /// Collects interactions reported by renderers and applies them.
    pub fn poll_renderers(&mut self) {
        self.core.poll_signals();
        self.route_signals();
    }

    /// Destroys every renderer. The next validation starts over.
    pub fn dispose(&mut self) {
        self.core.dispose();
    }

    fn apply_data_changes(&mut self) {
        self.data.drain_changes(&mut self.changes);
        if self.changes.is_empty() {
            return;
        }
        let mut selection_changed = false;
        for &change in &self.changes {
            match change {
                CollectionChange::Add { index } => {
                    self.core.with_virtual(|v| v.insert_cache_entry(index));
                }
                CollectionChange::Remove { index } => {
                    self.core.with_virtual(|v| v.remove_cache_entry(index));
                }
                CollectionChange::Replace { index } | CollectionChange::UpdateAt { index } => {
                    self.core.with_virtual(|v| v.invalidate_cache_entry(index));
                }
                CollectionChange::Reset
                | CollectionChange::UpdateAll
                | CollectionChange::FilterChange
                | CollectionChange::SortChange => {
                    self.core.with_virtual(|v| v.reset_cache());
                }
            }
            selection_changed |= self.selection.apply_change(change);
        }
        dtrace!(changes = self.changes.len(), "applied data changes");
        self.changes.clear();
        selection_changed |= self.selection.truncate(self.data.len());
        self.selection_changed(selection_changed);
        self.core.invalidate(InvalidationFlags::DATA);
    }

    fn route_signals(&mut self) {
        self.core.drain_signals(&mut self.signals);
        let signals = core::mem::take(&mut self.signals);
        for &(id, signal) in &signals {
            let Some(index) = self.core.index_for_renderer(id) else {
                continue;
            };
            if signal.contains(RendererSignals::TRIGGERED) {
                self.item_triggered(id, index);
            }
            if signal.contains(RendererSignals::TOGGLED) {
                self.item_toggled(id, index);
            }
            if signal.contains(RendererSignals::RESIZED) {
                self.core.invalidate(InvalidationFlags::LAYOUT);
            }
        }
        self.signals = signals;
        self.signals.clear();
    }

    fn item_triggered(&mut self, id: RendererId, index: usize) {
        let Some(key) = self.core.item_for_renderer(id).cloned() else {
            return;
        };
        self.core
            .push_event(ViewPortEvent::ItemTriggered { id, index, key });
        let toggles = self
            .core
            .renderer(id)
            .is_some_and(|r| r.capabilities().contains(RendererCaps::TOGGLE));
        if self.selectable && !toggles {
            let changed = self.selection.select(index);
            self.selection_changed(changed);
        }
    }

    fn item_toggled(&mut self, id: RendererId, index: usize) {
        if !self.selectable {
            // Push the real state back to the renderer.
            self.core.invalidate(InvalidationFlags::SELECTION);
            return;
        }
        let Some(selected) = self.core.renderer(id).map(|r| r.is_selected()) else {
            return;
        };
        let changed = self.selection.set_selected(index, selected);
        self.selection_changed(changed);
    }
}
