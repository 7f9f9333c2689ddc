// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped list view port.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use kurbo::Point;
use understory_layout::{Layout, LinearLayout, ScrollAlign};
use understory_recycle::{Recycler, RecyclerId, RendererId};

use crate::port::PassSource;
use crate::{
    GroupLocation, GroupedChange, GroupedCollection, GroupedEntry, InvalidationFlags,
    ItemRenderer, ItemState, MAX_VALIDATION_PASSES, RendererCaps, RendererSignals, ViewPortCore,
    ViewPortError, ViewPortEvent,
};

/// Recycler the default routing uses for group headers.
pub const HEADER_RECYCLER: RecyclerId = RecyclerId(1);

/// Recycler the default routing uses for group footers.
pub const FOOTER_RECYCLER: RecyclerId = RecyclerId(2);

/// Key a grouped list binds renderers by.
pub type GroupedKey<C> =
    GroupedEntry<<C as GroupedCollection>::Group, <C as GroupedCollection>::Item>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlatEntry {
    Header(usize),
    Item(GroupLocation),
    Footer(usize),
}

/// Flattened header, item, and footer order.
#[derive(Debug, Default)]
struct Flattened {
    entries: Vec<FlatEntry>,
    /// Flat index of each group's first entry.
    group_starts: Vec<usize>,
    headers: Vec<usize>,
}

impl Flattened {
    fn rebuild<C: GroupedCollection>(&mut self, data: &C, show_headers: bool, show_footers: bool) {
        self.entries.clear();
        self.group_starts.clear();
        self.headers.clear();
        for group in 0..data.group_count() {
            self.group_starts.push(self.entries.len());
            if show_headers {
                self.headers.push(self.entries.len());
                self.entries.push(FlatEntry::Header(group));
            }
            for item in 0..data.item_count(group) {
                self.entries
                    .push(FlatEntry::Item(GroupLocation::new(group, item)));
            }
            if show_footers {
                self.entries.push(FlatEntry::Footer(group));
            }
        }
    }

    fn index_of(&self, location: GroupLocation, show_headers: bool) -> Option<usize> {
        let start = *self.group_starts.get(location.group)?;
        let index = start + usize::from(show_headers) + location.item;
        (self.entries.get(index) == Some(&FlatEntry::Item(location))).then_some(index)
    }
}

struct GroupedSource<'a, C> {
    data: &'a C,
    flat: &'a Flattened,
    selected: Option<GroupLocation>,
}

impl<C> PassSource<GroupedKey<C>> for GroupedSource<'_, C>
where
    C: GroupedCollection,
    C::Group: Clone,
    C::Item: Clone,
{
    fn len(&self) -> usize {
        self.flat.entries.len()
    }

    fn key(&self, index: usize) -> Option<GroupedKey<C>> {
        Some(match *self.flat.entries.get(index)? {
            FlatEntry::Header(group) => GroupedEntry::Header(self.data.group(group)?.clone()),
            FlatEntry::Item(location) => GroupedEntry::Item(self.data.item(location)?.clone()),
            FlatEntry::Footer(group) => GroupedEntry::Footer(self.data.group(group)?.clone()),
        })
    }

    fn typical_key(&self) -> Option<GroupedKey<C>> {
        let index = self
            .flat
            .entries
            .iter()
            .position(|e| matches!(e, FlatEntry::Item(_)))?;
        self.key(index)
    }

    fn location(&self, index: usize) -> Option<GroupLocation> {
        match *self.flat.entries.get(index)? {
            FlatEntry::Item(location) => Some(location),
            FlatEntry::Header(_) | FlatEntry::Footer(_) => None,
        }
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected.is_some() && self.location(index) == self.selected
    }

    fn header_indices(&self) -> &[usize] {
        &self.flat.headers
    }
}

/// Binds a [`GroupedCollection`] to recycled renderers, with a header
/// before and optionally a footer after each group.
///
/// Renderers are keyed by [`GroupedKey`]. By default headers are built by
/// the recycler registered as [`HEADER_RECYCLER`] and footers by
/// [`FOOTER_RECYCLER`]; either falls back to the default recycler when not
/// registered. At most one item is selected at a time.
///
/// Any change other than an in-place item update clears the whole extent
/// cache, since flat positions of every later group move with it.
pub struct GroupedListViewPort<C: GroupedCollection, R, L = LinearLayout> {
    core: ViewPortCore<GroupedKey<C>, R, L>,
    data: C,
    flat: Flattened,
    show_headers: bool,
    show_footers: bool,
    restructure: bool,
    selected: Option<GroupLocation>,
    selectable: bool,
    changes: Vec<GroupedChange>,
    signals: Vec<(RendererId, RendererSignals)>,
}

impl<C, R, L> fmt::Debug for GroupedListViewPort<C, R, L>
where
    C: GroupedCollection + fmt::Debug,
    C::Group: fmt::Debug,
    C::Item: fmt::Debug,
    L: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedListViewPort")
            .field("core", &self.core)
            .field("data", &self.data)
            .field("entries", &self.flat.entries.len())
            .field("show_headers", &self.show_headers)
            .field("show_footers", &self.show_footers)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<C, R> GroupedListViewPort<C, R, LinearLayout>
where
    C: GroupedCollection,
    C::Group: Clone + Eq + Hash,
    C::Item: Clone + Eq + Hash,
    R: ItemRenderer<GroupedKey<C>>,
{
    /// A virtualized vertical grouped list.
    pub fn new(data: C, recycler: Recycler<R, ItemState<GroupedKey<C>>>) -> Self {
        let mut layout = LinearLayout::vertical();
        layout.set_virtual(true);
        Self::with_layout(data, layout, recycler)
    }

    /// Pins the current group's header to the top while scrolling.
    pub fn set_sticky_headers(&mut self, sticky: bool) {
        if self.core.layout().sticky_headers != sticky {
            self.core.layout_mut().sticky_headers = sticky;
        }
    }
}

impl<C, R, L> GroupedListViewPort<C, R, L>
where
    C: GroupedCollection,
    C::Group: Clone + Eq + Hash,
    C::Item: Clone + Eq + Hash,
    R: ItemRenderer<GroupedKey<C>>,
    L: Layout,
{
    /// A grouped list over `data` arranged by `layout`.
    pub fn with_layout(
        data: C,
        layout: L,
        recycler: Recycler<R, ItemState<GroupedKey<C>>>,
    ) -> Self {
        let mut core = ViewPortCore::new(layout, recycler);
        core.set_default_recycler_id_fn(Box::new(|key: &GroupedKey<C>, _| match key {
            GroupedEntry::Header(_) => HEADER_RECYCLER,
            GroupedEntry::Item(_) => RecyclerId::DEFAULT,
            GroupedEntry::Footer(_) => FOOTER_RECYCLER,
        }));
        Self {
            core,
            data,
            flat: Flattened::default(),
            show_headers: true,
            show_footers: false,
            restructure: true,
            selected: None,
            selectable: true,
            changes: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Shared view-port state: bounds, layout, renderers, and events.
    #[must_use]
    pub const fn core(&self) -> &ViewPortCore<GroupedKey<C>, R, L> {
        &self.core
    }

    /// Mutably borrows the shared view-port state.
    pub fn core_mut(&mut self) -> &mut ViewPortCore<GroupedKey<C>, R, L> {
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
        self.changes.clear();
        self.data.drain_changes(&mut self.changes);
        self.changes.clear();
        self.changes.push(GroupedChange::Reset);
        old
    }

    /// Whether each group starts with a header.
    #[must_use]
    pub const fn show_headers(&self) -> bool {
        self.show_headers
    }

    /// Shows or hides group headers.
    pub fn set_show_headers(&mut self, show: bool) {
        if self.show_headers != show {
            self.show_headers = show;
            self.restructure = true;
        }
    }

    /// Whether each group ends with a footer.
    #[must_use]
    pub const fn show_footers(&self) -> bool {
        self.show_footers
    }

    /// Shows or hides group footers.
    pub fn set_show_footers(&mut self, show: bool) {
        if self.show_footers != show {
            self.show_footers = show;
            self.restructure = true;
        }
    }

    /// Number of flat entries as of the last validation.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.flat.entries.len()
    }

    /// Flat index of the item at `location`, as of the last validation.
    #[must_use]
    pub fn index_for_location(&self, location: GroupLocation) -> Option<usize> {
        self.flat.index_of(location, self.show_headers)
    }

    /// Item location at flat `index`; `None` for headers and footers.
    #[must_use]
    pub fn location_for_index(&self, index: usize) -> Option<GroupLocation> {
        match *self.flat.entries.get(index)? {
            FlatEntry::Item(location) => Some(location),
            FlatEntry::Header(_) | FlatEntry::Footer(_) => None,
        }
    }

    /// Flat index of the header of `group`, if headers are shown.
    #[must_use]
    pub fn header_index(&self, group: usize) -> Option<usize> {
        let index = *self.flat.group_starts.get(group)?;
        (self.flat.entries.get(index) == Some(&FlatEntry::Header(group))).then_some(index)
    }

    /// Renderer bound to the item at `location`.
    #[must_use]
    pub fn renderer_for_location(&self, location: GroupLocation) -> Option<RendererId> {
        self.core
            .renderer_for_index(self.index_for_location(location)?)
    }

    /// The selected item location.
    #[must_use]
    pub const fn selected_location(&self) -> Option<GroupLocation> {
        self.selected
    }

    /// The selected item.
    #[must_use]
    pub fn selected_item(&self) -> Option<&C::Item> {
        self.data.item(self.selected?)
    }

    /// Selects the item at `location`, or nothing for `None`.
    ///
    /// Locations that do not name an item are ignored.
    pub fn set_selected_location(&mut self, location: Option<GroupLocation>) {
        let location = location.filter(|&l| self.data.item(l).is_some());
        self.select(location);
    }

    /// Allows or forbids selecting items. Forbidding clears the selection.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            self.select(None);
        }
    }

    /// Whether items can be selected.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable
    }

    fn select(&mut self, location: Option<GroupLocation>) {
        if self.selected != location {
            self.selected = location;
            self.core.invalidate(InvalidationFlags::SELECTION);
            self.core.push_event(ViewPortEvent::SelectionChanged);
        }
    }

    /// Scroll position that brings the item at `location` into view.
    ///
    /// Returns the current scroll position if `location` is not an item.
    pub fn scroll_position_for_location(
        &mut self,
        location: GroupLocation,
        align: ScrollAlign,
    ) -> Point {
        self.restructure_if_needed();
        match self.index_for_location(location) {
            Some(index) => {
                let count = self.flat.entries.len();
                self.core.scroll_position_for_index(index, count, align)
            }
            None => self.core.scroll().to_point(),
        }
    }

    /// Runs one validation pass.
    pub fn validate(&mut self) -> Result<(), ViewPortError> {
        self.apply_data_changes();
        self.restructure_if_needed();
        let source = GroupedSource {
            data: &self.data,
            flat: &self.flat,
            selected: self.selected,
        };
        self.core.validate_pass(&source, |_, _, _| {})?;
        self.route_signals();
        Ok(())
    }

    /// Validates until nothing is left invalid. Returns the number of passes.
    pub fn validate_until_settled(&mut self) -> Result<usize, ViewPortError> {
        for passes in 1..=MAX_VALIDATION_PASSES {
            self.validate()?;
            self.data.drain_changes(&mut self.changes);
            if !self.core.is_invalid() && self.changes.is_empty() && !self.restructure {
                return Ok(passes);
            }
        }
        dwarn!(
            passes = MAX_VALIDATION_PASSES,
            "grouped list view port did not settle"
        );
        Err(ViewPortError::ValidationLoop {
            passes: MAX_VALIDATION_PASSES,
        })
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

    fn restructure_if_needed(&mut self) {
        if !self.restructure {
            return;
        }
        self.restructure = false;
        self.flat
            .rebuild(&self.data, self.show_headers, self.show_footers);
        self.core.with_virtual(|v| v.reset_cache());
        self.core.invalidate(InvalidationFlags::DATA);
        dtrace!(entries = self.flat.entries.len(), "flattened groups");
    }

    fn apply_data_changes(&mut self) {
        self.data.drain_changes(&mut self.changes);
        if self.changes.is_empty() {
            return;
        }
        let mut selected = self.selected;
        let mut updates_only = true;
        for &change in &self.changes {
            updates_only &= matches!(change, GroupedChange::UpdateAt(_));
            selected = selected.and_then(|s| shift_selection(s, change));
        }
        let selected = selected.filter(|&l| self.data.item(l).is_some());
        dtrace!(changes = self.changes.len(), updates_only, "applied group changes");

        if updates_only {
            for &change in &self.changes {
                if let GroupedChange::UpdateAt(location) = change
                    && let Some(index) = self.flat.index_of(location, self.show_headers)
                {
                    self.core.with_virtual(|v| v.invalidate_cache_entry(index));
                }
            }
            self.core.invalidate(InvalidationFlags::DATA);
        } else {
            self.restructure = true;
        }
        self.changes.clear();
        self.select(selected);
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
        if self.selectable
            && !toggles
            && let Some(location) = self.location_for_index(index)
        {
            self.select(Some(location));
        }
    }

    fn item_toggled(&mut self, id: RendererId, index: usize) {
        let Some(location) = self.location_for_index(index) else {
            return;
        };
        if !self.selectable {
            self.core.invalidate(InvalidationFlags::SELECTION);
            return;
        }
        let Some(selected) = self.core.renderer(id).map(|r| r.is_selected()) else {
            return;
        };
        if selected {
            self.select(Some(location));
        } else if self.selected == Some(location) {
            self.select(None);
        }
    }
}

/// Where a selected location ends up after `change`, or `None` if the
/// selected item went away.
fn shift_selection(selected: GroupLocation, change: GroupedChange) -> Option<GroupLocation> {
    let GroupLocation { group, item } = selected;
    match change {
        GroupedChange::Reset => None,
        GroupedChange::AddGroup { group: at } if at <= group => {
            Some(GroupLocation::new(group + 1, item))
        }
        GroupedChange::RemoveGroup { group: at } if at == group => None,
        GroupedChange::RemoveGroup { group: at } if at < group => {
            Some(GroupLocation::new(group - 1, item))
        }
        GroupedChange::Add(at) if at.group == group && at.item <= item => {
            Some(GroupLocation::new(group, item + 1))
        }
        GroupedChange::Remove(at) | GroupedChange::Replace(at) if at == selected => None,
        GroupedChange::Remove(at) if at.group == group && at.item < item => {
            Some(GroupLocation::new(group, item - 1))
        }
        _ => Some(selected),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{FlatEntry, Flattened, shift_selection};
    use crate::{GroupLocation, GroupedArrayCollection, GroupedChange};

    #[test]
    fn flattening_places_headers_and_footers() {
        let data = GroupedArrayCollection::new(vec![("a", vec![1, 2]), ("b", vec![]), ("c", vec![3])]);
        let mut flat = Flattened::default();
        flat.rebuild(&data, true, true);
        assert_eq!(flat.entries.len(), 9);
        assert_eq!(flat.headers, vec![0, 4, 6]);
        assert_eq!(flat.entries[3], FlatEntry::Footer(0));
        assert_eq!(flat.index_of(GroupLocation::new(2, 0), true), Some(7));
        assert_eq!(flat.index_of(GroupLocation::new(1, 0), true), None);

        flat.rebuild(&data, false, false);
        assert!(flat.headers.is_empty());
        assert_eq!(flat.index_of(GroupLocation::new(2, 0), false), Some(2));
    }

    #[test]
    fn selection_follows_structural_changes() {
        let sel = GroupLocation::new(1, 2);
        assert_eq!(
            shift_selection(sel, GroupedChange::AddGroup { group: 0 }),
            Some(GroupLocation::new(2, 2))
        );
        assert_eq!(
            shift_selection(sel, GroupedChange::Add(GroupLocation::new(1, 0))),
            Some(GroupLocation::new(1, 3))
        );
        assert_eq!(
            shift_selection(sel, GroupedChange::Remove(GroupLocation::new(1, 1))),
            Some(GroupLocation::new(1, 1))
        );
        assert_eq!(
            shift_selection(sel, GroupedChange::Add(GroupLocation::new(0, 0))),
            Some(sel)
        );
        assert_eq!(shift_selection(sel, GroupedChange::Replace(sel)), None);
        assert_eq!(
            shift_selection(sel, GroupedChange::RemoveGroup { group: 1 }),
            None
        );
        assert_eq!(shift_selection(sel, GroupedChange::Reset), None);
        assert_eq!(shift_selection(sel, GroupedChange::UpdateAll), Some(sel));
    }
}
