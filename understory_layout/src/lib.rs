// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_layout --heading-base-level=0

//! Understory Layout: layout algorithms for recycled, virtualized item lists.
//!
//! A layout consumes a list of *slots* plus [`ViewportBounds`] and produces a
//! [`LayoutResult`] (content origin, content size, viewport size) while
//! assigning a size and position to every occupied slot. Slots come from a
//! [`LayoutItems`] implementation; an empty slot is a placeholder for an item
//! that is virtualized away and has no renderer.
//!
//! Two algorithms are provided:
//!
//! - [`LinearLayout`]: a single row or column with padding, a uniform gap plus
//!   optional first/last gaps, alignment on both axes, percentage sizing, and
//!   optional virtualization backed by an
//!   [`ExtentCache`](understory_virtual_list::ExtentCache).
//! - [`AnchorLayout`]: edges anchored to the viewport or to other items,
//!   resolved in rounds with cycle detection.
//!
//! Layouts that virtualize expose [`VirtualLayout`] through
//! [`Layout::as_virtual`]: visible index queries, viewport estimation, and
//! cache maintenance for data changes. Layouts report side effects as
//! [`LayoutEvent`]s that the owner drains after each pass.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_layout::{Layout, LayoutItem, LinearLayout, ViewportBounds};
//!
//! #[derive(Clone)]
//! struct Cell {
//!     size: Size,
//!     origin: Point,
//! }
//!
//! impl LayoutItem for Cell {
//!     fn size(&self) -> Size { self.size }
//!     fn set_size(&mut self, size: Size) { self.size = size; }
//!     fn origin(&self) -> Point { self.origin }
//!     fn set_origin(&mut self, origin: Point) { self.origin = origin; }
//! }
//!
//! let mut layout = LinearLayout::horizontal();
//! layout.gap = 10.0;
//!
//! let cell = Cell { size: Size::new(100.0, 20.0), origin: Point::ZERO };
//! let mut items = vec![Some(cell.clone()), Some(cell.clone()), Some(cell)];
//! let result = layout.layout(&mut items, &ViewportBounds::default()).unwrap();
//!
//! assert_eq!(result.content_size.width, 320.0);
//! assert_eq!(result.viewport_size.width, 320.0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): builds `kurbo` with `std`.
//! - `libm`: float math for `no_std` targets.
//! - `tracing`: emits `trace`/`warn` events under the `understory_layout` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod anchor;
mod bounds;
mod error;
mod item;
mod layout;
mod linear;
mod navigation;

pub use anchor::{Anchor, AnchorLayout, AnchorLayoutData};
pub use bounds::{LayoutEvent, LayoutResult, ViewportBounds};
pub use error::LayoutError;
pub use item::{LayoutItem, LayoutItems, LinearLayoutData, SizeConstraints};
pub use layout::{Layout, VirtualLayout};
pub use linear::{Align, LinearLayout, Orientation};
pub use navigation::NavigationKey;

pub use understory_virtual_list::ScrollAlign;
