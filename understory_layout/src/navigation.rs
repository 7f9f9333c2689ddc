// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Keyboard actions that move the current index of a list-like container.
///
/// Layouts map a key plus the current index to a destination index. Keys along
/// the cross axis of a one-dimensional layout leave the index unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    /// Move toward the top.
    Up,
    /// Move toward the bottom.
    Down,
    /// Move toward the left.
    Left,
    /// Move toward the right.
    Right,
    /// Move back by roughly one viewport.
    PageUp,
    /// Move forward by roughly one viewport.
    PageDown,
    /// Jump to the first index.
    Home,
    /// Jump to the last index.
    End,
}
