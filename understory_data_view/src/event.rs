// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications a view port records for its owner.

use kurbo::Vec2;
use understory_recycle::RendererId;

/// Something the owner of a view port may want to react to.
///
/// View ports queue events during validation and interaction handling; the
/// owner drains them afterwards.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewPortEvent<K> {
    /// A renderer was bound to the item at `index` and became active.
    RendererAdded {
        /// The renderer.
        id: RendererId,
        /// Flat index of its item.
        index: usize,
    },
    /// A renderer was unbound from `key` and is about to be reused or freed.
    RendererRemoved {
        /// The renderer.
        id: RendererId,
        /// The item it was bound to.
        key: K,
    },
    /// A renderer was destroyed. Its id is no longer valid.
    RendererDestroyed {
        /// The renderer.
        id: RendererId,
    },
    /// The renderer for the item at `index` was triggered.
    ItemTriggered {
        /// The renderer.
        id: RendererId,
        /// Flat index of its item.
        index: usize,
        /// The item.
        key: K,
    },
    /// The selection changed.
    SelectionChanged,
    /// Items before the scroll position changed size; the scroll position
    /// was moved by this delta so the visible content stays put.
    ScrollCompensation(Vec2),
}
