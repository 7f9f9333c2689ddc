// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout traits.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use understory_virtual_list::ScrollAlign;

use crate::{LayoutError, LayoutEvent, LayoutItems, LayoutResult, NavigationKey, ViewportBounds};

/// A layout algorithm: sizes and positions a list of slots inside a viewport.
pub trait Layout {
    /// Sizes and positions every occupied slot and returns the content bounds.
    ///
    /// Placeholders (`None` slots) are not touched but still occupy their
    /// estimated space.
    fn layout<I>(
        &mut self,
        items: &mut I,
        bounds: &ViewportBounds,
    ) -> Result<LayoutResult, LayoutError>
    where
        I: LayoutItems + ?Sized;

    /// Whether a scroll change alone requires another layout pass.
    fn requires_layout_on_scroll(&self) -> bool {
        false
    }

    /// Returns the virtualization interface, if this layout has one.
    ///
    /// Callers should also check [`VirtualLayout::is_virtual`]; a layout may
    /// support virtualization but have it switched off.
    fn as_virtual(&mut self) -> Option<&mut dyn VirtualLayout> {
        None
    }

    /// Scroll position that brings `index` into view with the given alignment.
    ///
    /// Layouts without index-based scrolling keep the current position.
    fn scroll_position_for_index(
        &mut self,
        index: usize,
        item_count: usize,
        bounds: &ViewportBounds,
        align: ScrollAlign,
    ) -> Point {
        let _ = (index, item_count, align);
        bounds.scroll.to_point()
    }

    /// Destination index for a keyboard action starting at `current`.
    ///
    /// Returns `None` when the layout does not support keyboard navigation or
    /// there are no items.
    fn next_index(
        &mut self,
        current: Option<usize>,
        key: NavigationKey,
        item_count: usize,
        bounds: &ViewportBounds,
    ) -> Option<usize> {
        let _ = (current, key, item_count, bounds);
        None
    }

    /// Marks which slot indices are group headers.
    fn set_header_indices(&mut self, headers: &[usize]) {
        let _ = headers;
    }

    /// Moves recorded [`LayoutEvent`]s into `out`.
    fn drain_events(&mut self, out: &mut Vec<LayoutEvent>) {
        let _ = out;
    }
}

/// Queries and cache maintenance for layouts that virtualize their items.
///
/// This trait is object safe so owners can reach it through
/// [`Layout::as_virtual`] without knowing the concrete layout.
pub trait VirtualLayout {
    /// Whether virtualization is currently enabled.
    fn is_virtual(&self) -> bool;

    /// Sets the size used to estimate items that have never been measured.
    fn set_typical_item_size(&mut self, size: Option<Size>);

    /// The size used to estimate unmeasured items.
    fn typical_item_size(&self) -> Option<Size>;

    /// Whether laid-out items are resized to the typical size along the
    /// stacking axis, so their own size no longer measures their item.
    fn forces_typical_size(&self) -> bool;

    /// Estimates the viewport size for `item_count` items without laying them out.
    fn measure_viewport(
        &mut self,
        item_count: usize,
        bounds: &ViewportBounds,
    ) -> Result<Size, LayoutError>;

    /// Appends the indices that should have a renderer to `out`, in ascending order.
    fn visible_indices(
        &mut self,
        item_count: usize,
        bounds: &ViewportBounds,
        out: &mut Vec<usize>,
    ) -> Result<(), LayoutError>;

    /// Forgets every cached extent.
    fn reset_cache(&mut self);

    /// Inserts an unmeasured entry at `index`, shifting later entries.
    fn insert_cache_entry(&mut self, index: usize);

    /// Removes the entry at `index`, shifting later entries.
    fn remove_cache_entry(&mut self, index: usize);

    /// Forgets the cached extent at `index`.
    fn invalidate_cache_entry(&mut self, index: usize);
}
