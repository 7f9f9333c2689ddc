// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_data_view --heading-base-level=0

//! Understory Data View: virtualized view ports over data collections.
//!
//! A view port maps a data collection to a bounded set of reusable
//! renderers. Only items inside the viewport (plus a little overscan) get a
//! renderer; scrolling rebinds renderers that fell out of view instead of
//! building new ones.
//!
//! Three view ports are provided:
//!
//! - [`ListViewPort`]: a flat [`DataCollection`], one renderer per visible item.
//! - [`GridViewPort`]: a list of row renderers sharing [`GridColumn`] widths.
//! - [`GroupedListViewPort`]: a [`GroupedCollection`] flattened into headers,
//!   items, and optional footers, with sticky headers available.
//!
//! All three share a [`ViewPortCore`] that owns the renderers (through an
//! [`understory_recycle::RendererStore`]), the layout (any
//! [`understory_layout::Layout`]), the viewport bounds, and a set of
//! [`InvalidationFlags`]. Mutations only mark flags dirty; `validate` does
//! the work in one ordered pass:
//!
//! 1. Data changes recorded by the collection patch the extent cache and the selection.
//! 2. The typical item is measured to estimate virtualized extents.
//! 3. Renderers are recycled: kept, recovered, bound, or freed.
//! 4. Selection and enabled state are pushed into renderers.
//! 5. The layout positions the renderers.
//!
//! Renderers implement [`ItemRenderer`] and report interactions as
//! [`RendererSignals`], which the view port collects after each pass or on
//! [`ListViewPort::poll_renderers`]. Outcomes are queued as
//! [`ViewPortEvent`]s for the owner to drain.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use understory_data_view::{ArrayCollection, ItemRenderer, ListViewPort, ViewPortEvent};
//! use understory_layout::{LayoutItem, ViewportBounds};
//! use understory_recycle::{Recyclable, Recycler};
//!
//! #[derive(Default)]
//! struct Label { origin: Point, text: Option<&'static str> }
//!
//! impl LayoutItem for Label {
//!     fn size(&self) -> Size { Size::new(80.0, 25.0) }
//!     fn set_size(&mut self, _: Size) {}
//!     fn origin(&self) -> Point { self.origin }
//!     fn set_origin(&mut self, origin: Point) { self.origin = origin; }
//! }
//! impl Recyclable for Label {
//!     fn set_visible(&mut self, _: bool) {}
//! }
//! impl ItemRenderer<&'static str> for Label {
//!     fn set_data(&mut self, data: Option<&&'static str>) { self.text = data.copied(); }
//! }
//!
//! let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];
//! let data: ArrayCollection<&'static str> = words.into_iter().collect();
//! let mut list = ListViewPort::new(data, Recycler::<Label, _>::from_default());
//! list.core_mut().set_bounds(ViewportBounds::fixed(Size::new(80.0, 50.0)));
//! list.validate_until_settled().unwrap();
//!
//! let first = list.core().renderer_for_index(0).unwrap();
//! assert_eq!(list.core().renderer(first).unwrap().text, Some("alpha"));
//!
//! // Scroll to the end: renderers are rebound rather than rebuilt.
//! list.core_mut().set_scroll(Vec2::new(0.0, 150.0));
//! let mut events = Vec::new();
//! list.core_mut().drain_events(&mut events);
//! list.validate_until_settled().unwrap();
//! events.clear();
//! list.core_mut().drain_events(&mut events);
//! assert!(!events.iter().any(|e| matches!(e, ViewPortEvent::RendererDestroyed { .. })));
//! assert!(list.core().renderer_for_index(7).is_some());
//! ```
//!
//! ## Features
//!
//! - `std` (default): builds the dependencies with `std`.
//! - `libm`: float math for `no_std` targets.
//! - `tracing`: emits events under the `understory_data_view` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod collection;
mod error;
mod event;
mod flags;
mod grid;
mod grouped;
mod grouped_list;
mod list;
mod port;
mod renderer;
mod selection;

pub use collection::{ArrayCollection, CollectionChange, DataCollection};
pub use error::ViewPortError;
pub use event::ViewPortEvent;
pub use flags::InvalidationFlags;
pub use grid::{GridColumn, GridViewPort, layout_columns};
pub use grouped::{
    GroupLocation, GroupedArrayCollection, GroupedChange, GroupedCollection, GroupedEntry,
};
pub use grouped_list::{FOOTER_RECYCLER, GroupedKey, GroupedListViewPort, HEADER_RECYCLER};
pub use list::ListViewPort;
pub use port::{MAX_VALIDATION_PASSES, ViewPortCore, ViewPortStore};
pub use renderer::{
    ColumnSpan, GridRowRenderer, ItemRenderer, ItemState, RendererCaps, RendererSignals,
};
pub use selection::{IndexSelection, SelectionMode};
