// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared renderer and helpers for view-port integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use core::hash::Hash;

use kurbo::{Point, Size};
use understory_data_view::{
    ColumnSpan, GridRowRenderer, GroupLocation, ItemRenderer, ItemState, RendererCaps,
    RendererSignals, ViewPortCore, ViewPortEvent,
};
use understory_layout::{Layout, LayoutItem, ViewportBounds};
use understory_recycle::{Recyclable, Recycler};

/// A renderer that records everything the view port pushes into it.
#[derive(Clone, Debug)]
pub(crate) struct Row<T> {
    pub(crate) size: Size,
    pub(crate) origin: Point,
    pub(crate) data: Option<T>,
    pub(crate) index: Option<usize>,
    pub(crate) location: Option<GroupLocation>,
    pub(crate) selected: bool,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) columns: Vec<ColumnSpan>,
    pub(crate) caps: RendererCaps,
    pub(crate) signals: RendererSignals,
    /// Height added every time the row is validated.
    pub(crate) growth: f64,
}

impl<T> Row<T> {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            size,
            origin: Point::ZERO,
            data: None,
            index: None,
            location: None,
            selected: false,
            enabled: true,
            visible: false,
            columns: Vec::new(),
            caps: RendererCaps::INDEXED
                | RendererCaps::SELECTABLE
                | RendererCaps::ENABLEABLE
                | RendererCaps::LOCATED,
            signals: RendererSignals::empty(),
            growth: 0.0,
        }
    }

    /// Simulates a click.
    pub(crate) fn trigger(&mut self) {
        self.signals |= RendererSignals::TRIGGERED;
    }

    /// Simulates the user flipping the renderer's own selected state.
    pub(crate) fn toggle(&mut self) {
        self.selected = !self.selected;
        self.signals |= RendererSignals::TOGGLED;
    }
}

impl<T> LayoutItem for Row<T> {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn validate(&mut self) {
        self.size.height += self.growth;
    }
}

impl<T> Recyclable for Row<T> {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl<T: Clone> ItemRenderer<T> for Row<T> {
    fn capabilities(&self) -> RendererCaps {
        self.caps
    }

    fn set_data(&mut self, data: Option<&T>) {
        self.data = data.cloned();
    }

    fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn set_location(&mut self, location: Option<GroupLocation>) {
        self.location = location;
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn take_signals(&mut self) -> RendererSignals {
        core::mem::take(&mut self.signals)
    }
}

impl<T: Clone> GridRowRenderer<T> for Row<T> {
    fn set_columns(&mut self, columns: &[ColumnSpan]) {
        self.columns = columns.to_vec();
    }
}

/// Rows 100 wide and `height` tall.
pub(crate) fn rows<T>(height: f64) -> Recycler<Row<T>, ItemState<T>> {
    Recycler::new(move || Row::new(Size::new(100.0, height)))
}

pub(crate) fn viewport(width: f64, height: f64) -> ViewportBounds {
    ViewportBounds::fixed(Size::new(width, height))
}

pub(crate) fn drain<K, R, L>(core: &mut ViewPortCore<K, R, L>) -> Vec<ViewPortEvent<K>>
where
    K: Clone + Eq + Hash,
    R: ItemRenderer<K>,
    L: Layout,
{
    let mut events = Vec::new();
    core.drain_events(&mut events);
    events
}

pub(crate) fn added<K>(events: &[ViewPortEvent<K>]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ViewPortEvent::RendererAdded { .. }))
        .count()
}

pub(crate) fn removed<K>(events: &[ViewPortEvent<K>]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ViewPortEvent::RendererRemoved { .. }))
        .count()
}

pub(crate) fn destroyed<K>(events: &[ViewPortEvent<K>]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ViewPortEvent::RendererDestroyed { .. }))
        .count()
}

/// Flat indices that currently have a renderer.
pub(crate) fn active_indices<K, R, L>(core: &ViewPortCore<K, R, L>) -> Vec<usize>
where
    K: Clone + Eq + Hash,
    R: ItemRenderer<K>,
    L: Layout,
{
    core.active_renderers().map(|(index, _)| index).collect()
}
