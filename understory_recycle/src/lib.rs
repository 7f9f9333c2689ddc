// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_recycle --heading-base-level=0

//! Understory Recycle: renderer pooling for virtualized views.
//!
//! A virtualized view keeps a small set of renderers alive and rebinds them as
//! items scroll in and out. This crate provides the bookkeeping:
//!
//! - [`RendererSlab`] stores renderers behind generational [`RendererId`] handles.
//! - [`RendererPool`] tracks which renderers are active in the current pass and
//!   which are available for reuse.
//! - [`ItemIndex`] maps item keys to the renderers bound to them.
//! - [`Recycler`] creates renderers and runs lifecycle hooks.
//! - [`RendererStore`] ties all of the above together, one pool per [`RecyclerId`].
//!
//! ## Example
//!
//! ```rust
//! use understory_recycle::{Recyclable, Recycler, RecyclerId, RendererStore};
//!
//! #[derive(Default)]
//! struct Label { text: String, visible: bool }
//!
//! impl Recyclable for Label {
//!     fn set_visible(&mut self, visible: bool) { self.visible = visible; }
//! }
//!
//! let recycler = Recycler::from_default()
//!     .with_update(|label: &mut Label, item: &&str| label.text = item.to_string());
//! let mut store: RendererStore<usize, Label, &str> = RendererStore::new(recycler);
//!
//! // First pass binds two items.
//! store.begin_pass().unwrap();
//! for (key, item) in ["a", "b"].into_iter().enumerate() {
//!     let id = store.acquire(RecyclerId::DEFAULT, true);
//!     store.activate(id, key, item).unwrap();
//! }
//! let mut destroyed = Vec::new();
//! store.free(0, &mut destroyed);
//!
//! // Second pass keeps item 1 and replaces item 0 with item 2.
//! store.begin_pass().unwrap();
//! let kept = store.find_bound(&1).unwrap();
//! store.reclaim(kept).unwrap();
//! let mut recovered = Vec::new();
//! store.recover(&mut recovered);
//! let id = store.acquire(RecyclerId::DEFAULT, true);
//! assert_eq!(id, recovered[0].id);
//! store.activate(id, 2, "c").unwrap();
//! store.free(0, &mut destroyed);
//!
//! assert_eq!(store.get(id).unwrap().text, "c");
//! assert_eq!(store.len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod index;
mod pool;
mod recycler;
mod slab;
mod store;

pub use error::RecycleError;
pub use index::ItemIndex;
pub use pool::{RecyclerId, RendererPool};
pub use recycler::{Recyclable, Recycler};
pub use slab::{RendererId, RendererSlab};
pub use store::{Recovered, RendererStore};
