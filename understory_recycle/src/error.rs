// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Bookkeeping violations detected by pools and indices.
///
/// These indicate misuse (for example duplicate keys in a data set) or a bug in
/// the caller's pass bookkeeping. They are never transient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecycleError {
    /// A pass began while renderers from the previous pass were still
    /// waiting in the inactive list, so `free` was skipped.
    ActivePoolNotEmpty,
    /// A bound renderer was not found in the inactive list it should have
    /// been reclaimed from. This happens when the same key appears twice.
    NotInInactivePool,
    /// A key is already bound to a different renderer.
    DuplicateKey,
    /// The renderer handle is stale or was never issued by this store.
    UnknownRenderer,
}

impl fmt::Display for RecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ActivePoolNotEmpty => "active renderer pool is not empty at the start of a pass",
            Self::NotInInactivePool => "bound renderer is missing from the inactive pool",
            Self::DuplicateKey => "item is already bound to another renderer",
            Self::UnknownRenderer => "unknown or stale renderer id",
        })
    }
}

impl core::error::Error for RecycleError {}
