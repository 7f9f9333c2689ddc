// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_list --heading-base-level=0

//! Understory Virtual List: core 1D virtualization primitives.
//!
//! This crate provides a small, renderer-agnostic core for virtualizing a dense strip
//! of items indexed `0..len`. Layout algorithms use it to estimate the extent of items
//! that have no renderer yet and to decide which indices must be realized.
//!
//! The core concepts are:
//!
//! - [`ExtentCache`]: per-index cached extents. Entries are *unset* until an item at
//!   that index is measured; unset entries report a *typical* extent. The cache
//!   follows data changes with [`ExtentCache::insert`], [`ExtentCache::remove`],
//!   [`ExtentCache::invalidate`], and [`ExtentCache::reset`].
//! - [`ExtentModel`]: a trait describing a 1D strip with prefix-sum-style queries.
//! - [`Strip`] and [`StripMetrics`]: an [`ExtentModel`] that layers padding, a
//!   uniform gap, and optional first/last gaps over an [`ExtentCache`].
//! - [`compute_visible_range`]: given a scroll offset, viewport extent, and an
//!   overscan item count, returns which indices should be realized.
//! - [`scroll_offset_for_index`] with [`ScrollAlign`]: index-aligned scrolling.
//!
//! This crate deliberately does **not** know about widgets, display trees, or any
//! particular UI framework.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_virtual_list::{
//!     ExtentCache, ExtentModel, Strip, StripMetrics, compute_visible_range,
//! };
//!
//! // 1000 items estimated at 50 logical pixels each.
//! let mut cache = ExtentCache::with_len(1_000, 50.0);
//! // Item 2 turned out taller once it was laid out.
//! cache.set(2, 80.0);
//!
//! let metrics = StripMetrics { gap: 4.0, ..StripMetrics::default() };
//! let mut strip = Strip::new(&mut cache, metrics);
//! let range = compute_visible_range(&mut strip, 275.0, 500.0, 1);
//!
//! assert!(range.start <= 5);
//! assert!(range.len() < 20);
//! assert!(strip.total_extent() > 50_000.0);
//! ```
//!
//! All extents and offsets live in a caller-chosen 1D coordinate space
//! (typically logical pixels) and are expected to be finite and non-negative.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod align;
mod cache;
mod model;
mod strip;

pub use align::{ScrollAlign, scroll_offset_for_index};
pub use cache::ExtentCache;
pub use model::{ExtentModel, VisibleRange, compute_visible_range};
pub use strip::{Strip, StripMetrics};
