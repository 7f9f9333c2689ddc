// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The validation pass shared by every view port.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use kurbo::{Point, Size, Vec2};
use understory_layout::{
    Layout, LayoutEvent, LayoutItems, LayoutResult, NavigationKey, ScrollAlign, ViewportBounds,
    VirtualLayout,
};
use understory_recycle::{Recovered, Recycler, RecyclerId, RendererId, RendererStore};

use crate::{
    GroupLocation, InvalidationFlags, ItemRenderer, ItemState, RendererCaps, RendererSignals,
    ViewPortError, ViewPortEvent,
};

/// Consecutive validation passes `validate_until_settled` runs before it
/// reports [`ViewPortError::ValidationLoop`].
pub const MAX_VALIDATION_PASSES: usize = 10;

/// Idle renderers kept beyond the visible count when virtualized.
const RETAINED_SPARES: usize = 2;

/// The store type a view port uses for renderers bound to keys of type `K`.
pub type ViewPortStore<K, R> = RendererStore<K, R, ItemState<K>>;

type RecyclerIdFn<K> = Box<dyn Fn(&K, usize) -> RecyclerId>;

/// Per-pass view of the data a view port displays.
pub(crate) trait PassSource<K> {
    /// Number of flat entries.
    fn len(&self) -> usize;

    /// Key of the entry at `index`.
    fn key(&self, index: usize) -> Option<K>;

    /// Key used to measure the typical item when no override is set.
    fn typical_key(&self) -> Option<K>;

    /// Group location of the entry at `index`.
    fn location(&self, index: usize) -> Option<GroupLocation> {
        let _ = index;
        None
    }

    /// Whether the entry at `index` is selected.
    fn is_selected(&self, index: usize) -> bool;

    /// Flat indices of group headers.
    fn header_indices(&self) -> &[usize] {
        &[]
    }
}

/// Adapts the slot list to [`LayoutItems`] without moving renderers.
struct SlotItems<'a, K, R> {
    store: &'a mut ViewPortStore<K, R>,
    slots: &'a [Option<RendererId>],
}

impl<K, R> LayoutItems for SlotItems<'_, K, R>
where
    K: Clone + Eq + Hash,
    R: ItemRenderer<K>,
{
    type Item = R;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, index: usize) -> Option<&R> {
        self.store.get((*self.slots.get(index)?)?)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.store.get_mut((*self.slots.get(index)?)?)
    }
}

/// State shared by [`ListViewPort`](crate::ListViewPort),
/// [`GridViewPort`](crate::GridViewPort), and
/// [`GroupedListViewPort`](crate::GroupedListViewPort).
///
/// The core owns the renderers, the layout, the viewport bounds, and the
/// invalidation flags. Each validation pass runs these steps, gated by the
/// flags:
///
/// 1. Begin a recycling pass; on [`InvalidationFlags::RENDERER_FACTORY`],
///    destroy every renderer, including the typical-item renderer.
/// 2. Refresh the typical item and hand its size to the layout.
/// 3. Recycle: keep renderers whose item is still visible, recover the rest,
///    bind new renderers, and free surplus idle ones.
/// 4. Push selection, then enabled state, to the renderers.
/// 5. Lay out the slots and apply layout side effects.
/// 6. Validate every renderer.
pub struct ViewPortCore<K, R, L> {
    store: ViewPortStore<K, R>,
    layout: L,
    bounds: ViewportBounds,
    slots: Vec<Option<RendererId>>,
    flags: InvalidationFlags,
    result: LayoutResult,
    events: Vec<ViewPortEvent<K>>,
    pending_signals: Vec<(RendererId, RendererSignals)>,
    typical_item: Option<K>,
    typical_renderer: Option<RendererId>,
    recycler_id_fn: Option<RecyclerIdFn<K>>,
    custom_item_size: Option<Size>,
    enabled: bool,
    scrolling: bool,
    ignore_selection_changes: bool,
    ignore_renderer_resizing: bool,
    // Scratch buffers reused across passes.
    visible: Vec<usize>,
    unrendered: Vec<usize>,
    recovered: Vec<Recovered<K, ItemState<K>>>,
    destroyed: Vec<RendererId>,
    layout_events: Vec<LayoutEvent>,
}

impl<K, R, L: fmt::Debug> fmt::Debug for ViewPortCore<K, R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewPortCore")
            .field("store", &self.store)
            .field("layout", &self.layout)
            .field("bounds", &self.bounds)
            .field("slots", &self.slots.len())
            .field("flags", &self.flags)
            .field("result", &self.result)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

fn unbind<K, R: ItemRenderer<K>>(renderer: &mut R) {
    let caps = renderer.capabilities();
    renderer.set_data(None);
    if caps.contains(RendererCaps::INDEXED) {
        renderer.set_index(None);
    }
    if caps.contains(RendererCaps::LOCATED) {
        renderer.set_location(None);
    }
    if caps.contains(RendererCaps::SELECTABLE) {
        renderer.set_selected(false);
    }
}

fn push_binding<K, R: ItemRenderer<K>>(
    renderer: &mut R,
    state: &ItemState<K>,
    custom_size: Option<Size>,
) {
    let caps = renderer.capabilities();
    renderer.set_data(Some(&state.data));
    if caps.contains(RendererCaps::INDEXED) {
        renderer.set_index(Some(state.index));
    }
    if caps.contains(RendererCaps::LOCATED) {
        renderer.set_location(state.location);
    }
    if let Some(size) = custom_size {
        renderer.set_size(size);
    }
}

impl<K, R, L> ViewPortCore<K, R, L>
where
    K: Clone + Eq + Hash,
    R: ItemRenderer<K>,
    L: Layout,
{
    /// Creates a core that lays out with `layout` and builds renderers with
    /// `recycler` unless a recycler-id function picks another.
    pub fn new(layout: L, recycler: Recycler<R, ItemState<K>>) -> Self {
        Self {
            store: RendererStore::new(recycler),
            layout,
            bounds: ViewportBounds::default(),
            slots: Vec::new(),
            flags: InvalidationFlags::all(),
            result: LayoutResult::default(),
            events: Vec::new(),
            pending_signals: Vec::new(),
            typical_item: None,
            typical_renderer: None,
            recycler_id_fn: None,
            custom_item_size: None,
            enabled: true,
            scrolling: false,
            ignore_selection_changes: false,
            ignore_renderer_resizing: false,
            visible: Vec::new(),
            unrendered: Vec::new(),
            recovered: Vec::new(),
            destroyed: Vec::new(),
            layout_events: Vec::new(),
        }
    }

    /// Marks `flags` dirty for the next validation.
    pub fn invalidate(&mut self, flags: InvalidationFlags) {
        self.flags |= flags;
    }

    /// Flags waiting for the next validation.
    #[must_use]
    pub const fn flags(&self) -> InvalidationFlags {
        self.flags
    }

    /// Returns `true` if the next validation has work to do.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        !self.flags.is_empty()
    }

    /// The layout.
    #[must_use]
    pub const fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutably borrows the layout and marks the layout dirty.
    pub fn layout_mut(&mut self) -> &mut L {
        self.flags |= InvalidationFlags::LAYOUT;
        &mut self.layout
    }

    /// Current viewport bounds.
    #[must_use]
    pub const fn bounds(&self) -> &ViewportBounds {
        &self.bounds
    }

    /// Replaces the viewport bounds.
    pub fn set_bounds(&mut self, bounds: ViewportBounds) {
        if bounds == self.bounds {
            return;
        }
        let scroll = bounds.scroll;
        self.bounds = ViewportBounds {
            scroll: self.bounds.scroll,
            ..bounds
        };
        self.flags |= InvalidationFlags::SIZE;
        self.set_scroll(scroll);
    }

    /// Current scroll position.
    #[must_use]
    pub const fn scroll(&self) -> Vec2 {
        self.bounds.scroll
    }

    /// Moves the viewport within the content.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        if scroll == self.bounds.scroll {
            return;
        }
        self.bounds.scroll = scroll;
        self.flags |= InvalidationFlags::SCROLL;
        if self.layout.requires_layout_on_scroll() {
            self.flags |= InvalidationFlags::LAYOUT;
        }
    }

    /// Tells the view port whether the owner is in a drag-scroll gesture.
    ///
    /// Toggles reported by renderers are ignored while scrolling.
    pub fn set_scrolling(&mut self, scrolling: bool) {
        self.scrolling = scrolling;
    }

    /// Whether the owner is in a drag-scroll gesture.
    #[must_use]
    pub const fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Enables or disables every renderer.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.flags |= InvalidationFlags::STATE;
        }
    }

    /// Whether renderers are enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Measures virtual estimates with `item` instead of the first item.
    pub fn set_typical_item(&mut self, item: Option<K>) {
        self.typical_item = item;
        self.flags |= InvalidationFlags::LAYOUT;
    }

    /// The typical item override.
    #[must_use]
    pub const fn typical_item(&self) -> Option<&K> {
        self.typical_item.as_ref()
    }

    /// Forces every bound renderer to `size`, or lets them size themselves for `None`.
    ///
    /// Clearing a forced size rebuilds the renderers, since a renderer cannot
    /// recover the size it had before it was forced.
    pub fn set_custom_item_size(&mut self, size: Option<Size>) {
        if self.custom_item_size == size {
            return;
        }
        let cleared = self.custom_item_size.is_some() && size.is_none();
        self.custom_item_size = size;
        if let Some(v) = self.layout.as_virtual() {
            v.reset_cache();
        }
        self.flags |= InvalidationFlags::LAYOUT;
        if cleared {
            self.flags |= InvalidationFlags::RENDERER_FACTORY;
        }
    }

    /// The forced renderer size.
    #[must_use]
    pub const fn custom_item_size(&self) -> Option<Size> {
        self.custom_item_size
    }

    /// Registers a recycler. Existing renderers are rebuilt on the next validation.
    pub fn set_recycler(&mut self, id: RecyclerId, recycler: Recycler<R, ItemState<K>>) {
        self.store.set_recycler(id, recycler);
        self.flags |= InvalidationFlags::RENDERER_FACTORY;
    }

    /// Unregisters a recycler; its items fall back to the default recycler.
    pub fn remove_recycler(&mut self, id: RecyclerId) {
        if self.store.remove_recycler(id).is_some() {
            self.flags |= InvalidationFlags::RENDERER_FACTORY;
        }
    }

    /// Picks a recycler per item and flat index.
    pub fn set_recycler_id_fn(&mut self, f: Option<impl Fn(&K, usize) -> RecyclerId + 'static>) {
        self.recycler_id_fn = f.map(|f| Box::new(f) as RecyclerIdFn<K>);
        self.flags |= InvalidationFlags::RENDERER_FACTORY;
    }

    pub(crate) fn set_default_recycler_id_fn(&mut self, f: RecyclerIdFn<K>) {
        self.recycler_id_fn = Some(f);
    }

    /// Result of the last layout.
    #[must_use]
    pub const fn layout_result(&self) -> &LayoutResult {
        &self.result
    }

    /// Content size from the last layout.
    #[must_use]
    pub const fn content_size(&self) -> Size {
        self.result.content_size
    }

    /// Viewport size from the last layout.
    #[must_use]
    pub const fn viewport_size(&self) -> Size {
        self.result.viewport_size
    }

    /// The renderer store.
    #[must_use]
    pub const fn store(&self) -> &ViewPortStore<K, R> {
        &self.store
    }

    /// Borrows a renderer.
    #[must_use]
    pub fn renderer(&self, id: RendererId) -> Option<&R> {
        self.store.get(id)
    }

    /// Mutably borrows a renderer.
    pub fn renderer_mut(&mut self, id: RendererId) -> Option<&mut R> {
        self.store.get_mut(id)
    }

    /// Renderer bound to the entry at `index`.
    #[must_use]
    pub fn renderer_for_index(&self, index: usize) -> Option<RendererId> {
        self.slots.get(index).copied().flatten()
    }

    /// Renderer bound to `key`.
    #[must_use]
    pub fn renderer_for_item(&self, key: &K) -> Option<RendererId> {
        self.store.find_bound(key)
    }

    /// Item bound to `id`.
    #[must_use]
    pub fn item_for_renderer(&self, id: RendererId) -> Option<&K> {
        self.store.key_of(id)
    }

    /// Flat index of the item bound to `id`.
    #[must_use]
    pub fn index_for_renderer(&self, id: RendererId) -> Option<usize> {
        self.store.key_of(id)?;
        self.store.state(id).map(|s| s.index)
    }

    /// Renderers bound in the last pass with their flat indices, in index order.
    pub fn active_renderers(&self) -> impl Iterator<Item = (usize, RendererId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|id| (i, id)))
    }

    /// Moves queued events into `out`.
    pub fn drain_events(&mut self, out: &mut Vec<ViewPortEvent<K>>) {
        out.append(&mut self.events);
    }

    /// Tears down every renderer, including the typical-item renderer.
    ///
    /// The next validation rebuilds from scratch.
    pub fn dispose(&mut self) {
        self.destroyed.clear();
        self.store.destroy_all(&mut self.destroyed);
        for &id in &self.destroyed {
            self.events.push(ViewPortEvent::RendererDestroyed { id });
        }
        ddebug!(destroyed = self.destroyed.len(), "disposed view port");
        self.destroyed.clear();
        self.typical_renderer = None;
        self.slots.clear();
        self.pending_signals.clear();
        self.flags = InvalidationFlags::all();
    }

    pub(crate) fn push_event(&mut self, event: ViewPortEvent<K>) {
        self.events.push(event);
    }

    pub(crate) fn scroll_position_for_index(
        &mut self,
        index: usize,
        item_count: usize,
        align: ScrollAlign,
    ) -> Point {
        self.layout
            .scroll_position_for_index(index, item_count, &self.bounds, align)
    }

    pub(crate) fn next_index(
        &mut self,
        current: Option<usize>,
        key: NavigationKey,
        item_count: usize,
    ) -> Option<usize> {
        self.layout.next_index(current, key, item_count, &self.bounds)
    }

    /// Forwards a data change to the layout's extent cache.
    pub(crate) fn with_virtual(&mut self, f: impl FnOnce(&mut dyn VirtualLayout)) {
        if let Some(v) = self.layout.as_virtual() {
            f(v);
        }
    }

    fn recycler_for(&self, key: &K, index: usize) -> RecyclerId {
        let id = self
            .recycler_id_fn
            .as_ref()
            .map_or(RecyclerId::DEFAULT, |f| f(key, index));
        self.store.resolve_recycler(id)
    }

    fn state_for<S: PassSource<K>>(&self, key: K, index: usize, source: &S) -> ItemState<K> {
        ItemState {
            data: key,
            index,
            location: source.location(index),
            selected: source.is_selected(index),
            enabled: self.enabled,
        }
    }

    fn queue_signals(&mut self, id: RendererId, mut signals: RendererSignals) {
        if self.ignore_selection_changes || self.scrolling {
            signals.remove(RendererSignals::TOGGLED);
        }
        if self.ignore_renderer_resizing {
            signals.remove(RendererSignals::RESIZED);
        }
        if !signals.is_empty() {
            self.pending_signals.push((id, signals));
        }
    }

    /// Collects signals from every active renderer.
    pub(crate) fn poll_signals(&mut self) {
        for index in 0..self.slots.len() {
            let Some(id) = self.slots[index] else {
                continue;
            };
            let signals = match self.store.get_mut(id) {
                Some(renderer) => renderer.take_signals(),
                None => continue,
            };
            self.queue_signals(id, signals);
        }
    }

    /// Moves collected signals into `out`.
    pub(crate) fn drain_signals(&mut self, out: &mut Vec<(RendererId, RendererSignals)>) {
        out.append(&mut self.pending_signals);
    }

    /// Runs one validation pass if anything is invalid.
    ///
    /// `after_layout` runs between layout and renderer validation.
    pub(crate) fn validate_pass<S, F>(
        &mut self,
        source: &S,
        after_layout: F,
    ) -> Result<(), ViewPortError>
    where
        S: PassSource<K>,
        F: FnOnce(&mut ViewPortStore<K, R>, &[Option<RendererId>], &LayoutResult),
    {
        let flags = core::mem::take(&mut self.flags);
        if flags.is_empty() {
            return Ok(());
        }
        let mut deferred = InvalidationFlags::empty();
        let basics = flags.basics();

        if basics {
            self.store.begin_pass()?;
            if flags.contains(InvalidationFlags::RENDERER_FACTORY) {
                self.release_all();
            }
        }

        if flags.intersects(
            InvalidationFlags::DATA | InvalidationFlags::LAYOUT | InvalidationFlags::RENDERER_FACTORY,
        ) {
            self.refresh_typical(source)?;
        }

        if basics {
            self.recycle(source)?;
        }

        if basics || flags.contains(InvalidationFlags::SELECTION) {
            self.sync_selection(source);
        }

        if basics || flags.contains(InvalidationFlags::STATE) {
            self.sync_enabled();
        }

        self.ignore_renderer_resizing = true;
        let result = self.run_layout(&mut deferred);
        if result.is_ok() {
            after_layout(&mut self.store, &self.slots, &self.result);
            for index in 0..self.slots.len() {
                let Some(id) = self.slots[index] else {
                    continue;
                };
                let signals = match self.store.get_mut(id) {
                    Some(renderer) => {
                        renderer.validate();
                        renderer.take_signals()
                    }
                    None => continue,
                };
                self.queue_signals(id, signals);
            }
        }
        self.ignore_renderer_resizing = false;
        result?;

        ddebug!(
            ?flags,
            ?deferred,
            active = self.store.active_len(),
            idle = self.store.idle_len(),
            "validated view port"
        );
        self.flags |= deferred;
        Ok(())
    }

    fn release_all(&mut self) {
        self.recover_inactive();
        self.free_idle(0);
        self.destroy_typical();
        self.slots.clear();
    }

    fn recover_inactive(&mut self) {
        self.recovered.clear();
        self.store.recover(&mut self.recovered);
        dtrace!(count = self.recovered.len(), "recovered renderers");
        for recovered in self.recovered.drain(..) {
            if let Some(renderer) = self.store.get_mut(recovered.id) {
                unbind::<K, R>(renderer);
            }
            self.events.push(ViewPortEvent::RendererRemoved {
                id: recovered.id,
                key: recovered.key,
            });
        }
    }

    fn free_idle(&mut self, min_keep: usize) {
        self.destroyed.clear();
        self.store.free(min_keep, &mut self.destroyed);
        dtrace!(min_keep, destroyed = self.destroyed.len(), "freed idle renderers");
        for &id in &self.destroyed {
            self.events.push(ViewPortEvent::RendererDestroyed { id });
        }
        self.destroyed.clear();
    }

    fn destroy_typical(&mut self) {
        if let Some(id) = self.typical_renderer.take()
            && self.store.destroy(id).is_ok()
        {
            self.events.push(ViewPortEvent::RendererDestroyed { id });
        }
    }

    fn set_typical_size(&mut self, size: Option<Size>) {
        if let Some(v) = self.layout.as_virtual() {
            v.set_typical_item_size(size);
        }
    }

    fn refresh_typical<S: PassSource<K>>(&mut self, source: &S) -> Result<(), ViewPortError> {
        let Some(key) = self.typical_item.clone().or_else(|| source.typical_key()) else {
            self.destroy_typical();
            self.set_typical_size(None);
            return Ok(());
        };
        let custom = self.custom_item_size;
        if custom.is_some() {
            // Every renderer takes the forced size; nothing to measure.
            self.destroy_typical();
            self.set_typical_size(custom);
            return Ok(());
        }

        let forced = self
            .layout
            .as_virtual()
            .is_some_and(|v| v.forces_typical_size());
        if let Some(id) = self.store.find_bound(&key).filter(|_| !forced) {
            // A renderer already displays the typical item; measure that one.
            let size = self.store.get_mut(id).map(|r| {
                r.validate();
                r.size()
            });
            self.set_typical_size(size);
            return Ok(());
        }

        let id = match self.typical_renderer {
            Some(id) => id,
            None => {
                let recycler = self.recycler_for(&key, 0);
                let id = self.store.acquire(recycler, false);
                dtrace!(?id, "created typical item renderer");
                self.typical_renderer = Some(id);
                id
            }
        };
        let state = ItemState {
            data: key,
            index: 0,
            location: None,
            selected: false,
            enabled: self.enabled,
        };
        self.store.update(id, state)?;
        let size = match self.store.renderer_and_state_mut(id) {
            Some((renderer, state)) => {
                push_binding(renderer, state, custom);
                renderer.validate();
                renderer.set_visible(false);
                Some(renderer.size())
            }
            None => None,
        };
        self.set_typical_size(size);
        Ok(())
    }

    fn recycle<S: PassSource<K>>(&mut self, source: &S) -> Result<(), ViewPortError> {
        let count = source.len();
        self.layout.set_header_indices(source.header_indices());

        self.visible.clear();
        let virtualized = match self.layout.as_virtual() {
            Some(v) if v.is_virtual() => {
                v.visible_indices(count, &self.bounds, &mut self.visible)?;
                true
            }
            _ => false,
        };
        if !virtualized {
            self.visible.extend(0..count);
        }

        self.slots.clear();
        self.slots.resize(count, None);
        self.unrendered.clear();

        let visible = core::mem::take(&mut self.visible);
        let kept = self.reclaim_visible(source, &visible);
        let min_keep = if virtualized {
            visible.len() + RETAINED_SPARES
        } else {
            0
        };
        self.visible = visible;
        kept?;

        self.recover_inactive();

        let unrendered = core::mem::take(&mut self.unrendered);
        let created = self.bind_unrendered(source, &unrendered);
        self.unrendered = unrendered;
        created?;

        self.free_idle(min_keep);
        dtrace!(
            count,
            visible = self.visible.len(),
            active = self.store.active_len(),
            "recycled renderers"
        );
        Ok(())
    }

    fn reclaim_visible<S: PassSource<K>>(
        &mut self,
        source: &S,
        visible: &[usize],
    ) -> Result<(), ViewPortError> {
        let custom = self.custom_item_size;
        for &index in visible {
            if index >= self.slots.len() {
                continue;
            }
            let Some(key) = source.key(index) else {
                continue;
            };
            let wanted = self.recycler_for(&key, index);
            let Some(id) = self
                .store
                .find_bound(&key)
                .filter(|&id| self.store.recycler_of(id) == Some(wanted))
            else {
                self.unrendered.push(index);
                continue;
            };
            self.store
                .reclaim(id)
                .map_err(|err| ViewPortError::at_index(err, index))?;
            let state = self.state_for(key, index, source);
            self.store.update(id, state)?;
            if let Some((renderer, state)) = self.store.renderer_and_state_mut(id) {
                push_binding(renderer, state, custom);
            }
            self.slots[index] = Some(id);
        }
        Ok(())
    }

    fn bind_unrendered<S: PassSource<K>>(
        &mut self,
        source: &S,
        unrendered: &[usize],
    ) -> Result<(), ViewPortError> {
        let custom = self.custom_item_size;
        for &index in unrendered {
            let Some(key) = source.key(index) else {
                continue;
            };
            let recycler = self.recycler_for(&key, index);
            let id = self.store.acquire(recycler, true);
            let state = self.state_for(key.clone(), index, source);
            self.store
                .activate(id, key, state)
                .map_err(|err| ViewPortError::at_index(err, index))?;
            if let Some((renderer, state)) = self.store.renderer_and_state_mut(id) {
                push_binding(renderer, state, custom);
            }
            self.slots[index] = Some(id);
            self.events.push(ViewPortEvent::RendererAdded { id, index });
        }
        Ok(())
    }

    fn sync_selection<S: PassSource<K>>(&mut self, source: &S) {
        self.ignore_selection_changes = true;
        for index in 0..self.slots.len() {
            let Some(id) = self.slots[index] else {
                continue;
            };
            let selected = source.is_selected(index);
            let signals = match self.store.renderer_and_state_mut(id) {
                Some((renderer, state)) => {
                    state.selected = selected;
                    if renderer.capabilities().contains(RendererCaps::SELECTABLE) {
                        renderer.set_selected(selected);
                    }
                    renderer.take_signals()
                }
                None => continue,
            };
            self.queue_signals(id, signals);
        }
        self.ignore_selection_changes = false;
    }

    fn sync_enabled(&mut self) {
        let enabled = self.enabled;
        for index in 0..self.slots.len() {
            let Some(id) = self.slots[index] else {
                continue;
            };
            if let Some((renderer, state)) = self.store.renderer_and_state_mut(id) {
                state.enabled = enabled;
                if renderer.capabilities().contains(RendererCaps::ENABLEABLE) {
                    renderer.set_enabled(enabled);
                }
            }
        }
    }

    fn run_layout(&mut self, deferred: &mut InvalidationFlags) -> Result<(), ViewPortError> {
        let mut items = SlotItems {
            store: &mut self.store,
            slots: &self.slots,
        };
        self.result = self.layout.layout(&mut items, &self.bounds)?;

        let virtualized = self.layout.as_virtual().is_some_and(|v| v.is_virtual());
        self.layout.drain_events(&mut self.layout_events);
        for event in self.layout_events.drain(..) {
            match event {
                LayoutEvent::ExtentsChanged => {
                    if virtualized {
                        *deferred |= InvalidationFlags::LAYOUT;
                    }
                }
                LayoutEvent::Scroll(delta) => {
                    self.bounds.scroll += delta;
                    self.events.push(ViewPortEvent::ScrollCompensation(delta));
                    *deferred |= InvalidationFlags::SCROLL;
                    if self.layout.requires_layout_on_scroll() {
                        *deferred |= InvalidationFlags::LAYOUT;
                    }
                }
            }
        }
        Ok(())
    }
}
