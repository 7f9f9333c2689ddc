// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a view port expects from its renderers.

use understory_layout::LayoutItem;
use understory_recycle::Recyclable;

use crate::GroupLocation;

bitflags::bitflags! {
    /// Optional renderer capabilities.
    ///
    /// A view port only pushes the matching state to renderers that report a
    /// capability.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RendererCaps: u8 {
        /// Wants its position in the data via [`ItemRenderer::set_index`].
        const INDEXED    = 0b0000_0001;
        /// Shows selection via [`ItemRenderer::set_selected`].
        const SELECTABLE = 0b0000_0010;
        /// Shows enabled state via [`ItemRenderer::set_enabled`].
        const ENABLEABLE = 0b0000_0100;
        /// Wants its group location via [`ItemRenderer::set_location`].
        const LOCATED    = 0b0000_1000;
        /// Manages its own selection through toggling; triggering it does not select.
        const TOGGLE     = 0b0001_0000;
    }
}

bitflags::bitflags! {
    /// Interactions a renderer reports to its view port.
    ///
    /// Renderers accumulate signals as they happen and the view port collects
    /// them with [`ItemRenderer::take_signals`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RendererSignals: u8 {
        /// The user activated the renderer (click, tap, Enter).
        const TRIGGERED = 0b0000_0001;
        /// The renderer's own selected state flipped.
        const TOGGLED   = 0b0000_0010;
        /// The renderer's preferred size changed.
        const RESIZED   = 0b0000_0100;
    }
}

/// A recyclable renderer that displays one item of type `T`.
pub trait ItemRenderer<T>: LayoutItem + Recyclable {
    /// Capabilities this renderer supports.
    fn capabilities(&self) -> RendererCaps {
        RendererCaps::INDEXED
    }

    /// Binds the renderer to `data`, or unbinds it for `None`.
    fn set_data(&mut self, data: Option<&T>);

    /// Sets the flat index of the bound item. Requires [`RendererCaps::INDEXED`].
    fn set_index(&mut self, index: Option<usize>) {
        let _ = index;
    }

    /// Sets the group location of the bound item. Requires [`RendererCaps::LOCATED`].
    fn set_location(&mut self, location: Option<GroupLocation>) {
        let _ = location;
    }

    /// Shows or clears selection. Requires [`RendererCaps::SELECTABLE`].
    fn set_selected(&mut self, selected: bool) {
        let _ = selected;
    }

    /// Whether the renderer currently shows itself as selected.
    fn is_selected(&self) -> bool {
        false
    }

    /// Enables or disables interaction. Requires [`RendererCaps::ENABLEABLE`].
    fn set_enabled(&mut self, enabled: bool) {
        let _ = enabled;
    }

    /// Returns and clears the interactions recorded since the last call.
    fn take_signals(&mut self) -> RendererSignals {
        RendererSignals::empty()
    }
}

/// Horizontal extent of one grid column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnSpan {
    /// Left edge relative to the row.
    pub x: f64,
    /// Column width.
    pub width: f64,
}

/// A grid row renderer: one renderer per data item, laid out in columns.
pub trait GridRowRenderer<T>: ItemRenderer<T> {
    /// Receives the column layout shared by every row.
    fn set_columns(&mut self, columns: &[ColumnSpan]);
}

/// Binding state a view port keeps per renderer and passes to recycler hooks.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemState<K> {
    /// The bound item.
    pub data: K,
    /// Flat index of the item.
    pub index: usize,
    /// Group location for grouped data.
    pub location: Option<GroupLocation>,
    /// Whether the item is selected.
    pub selected: bool,
    /// Whether the view port is enabled.
    pub enabled: bool,
}
