// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout errors.

use core::fmt;

/// Configuration or API-misuse errors raised by layout algorithms.
///
/// None of these are transient: they describe a modeling error in the items,
/// the anchors, or the bounds handed to a layout, and retrying the same call
/// fails the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A virtualization-only query was made while virtualization is disabled.
    NotVirtual,
    /// Anchors form a cycle; `item` waits on `target`, which never resolves.
    CircularAnchor {
        /// Index of an item that could not be resolved.
        item: usize,
        /// The anchor target that item is waiting on.
        target: usize,
    },
    /// An anchor names an item that does not exist, is itself, or is not laid out.
    InvalidAnchorTarget {
        /// Index of the anchored item.
        item: usize,
        /// The offending target index.
        target: usize,
    },
    /// A numeric input is NaN or otherwise unusable.
    InvalidValue {
        /// Name of the rejected field.
        field: &'static str,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotVirtual => f.write_str("operation requires a virtual layout"),
            Self::CircularAnchor { item, target } => write!(
                f,
                "circular anchor reference: item {item} depends on unresolved item {target}"
            ),
            Self::InvalidAnchorTarget { item, target } => {
                write!(f, "item {item} is anchored to invalid target {target}")
            }
            Self::InvalidValue { field } => write!(f, "invalid value for `{field}`"),
        }
    }
}

impl core::error::Error for LayoutError {}
