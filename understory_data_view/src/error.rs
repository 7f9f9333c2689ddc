// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-port errors.

use core::fmt;

use understory_layout::LayoutError;
use understory_recycle::RecycleError;

/// Fatal errors raised while validating a view port.
///
/// Each variant reports misuse of the data, the layout, or the validation
/// loop. They are never retried internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPortError {
    /// Renderer bookkeeping failed.
    Recycle(RecycleError),
    /// The layout rejected its configuration.
    Layout(LayoutError),
    /// The data contains the item at `index` more than once.
    DuplicateItem {
        /// Index of the second occurrence.
        index: usize,
    },
    /// Validation kept invalidating itself.
    ValidationLoop {
        /// Number of passes run before giving up.
        passes: usize,
    },
}

impl fmt::Display for ViewPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recycle(err) => write!(f, "renderer bookkeeping failed: {err}"),
            Self::Layout(err) => write!(f, "layout failed: {err}"),
            Self::DuplicateItem { index } => write!(
                f,
                "item at index {index} appears more than once in the data; items must be unique"
            ),
            Self::ValidationLoop { passes } => write!(
                f,
                "view port was still invalid after {passes} validation passes"
            ),
        }
    }
}

impl core::error::Error for ViewPortError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Recycle(err) => Some(err),
            Self::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecycleError> for ViewPortError {
    fn from(err: RecycleError) -> Self {
        Self::Recycle(err)
    }
}

impl From<LayoutError> for ViewPortError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl ViewPortError {
    /// Maps index bookkeeping failures for the item at `index` to
    /// [`ViewPortError::DuplicateItem`].
    pub(crate) fn at_index(err: RecycleError, index: usize) -> Self {
        match err {
            RecycleError::NotInInactivePool | RecycleError::DuplicateKey => {
                dwarn!(index, "duplicate item in data");
                Self::DuplicateItem { index }
            }
            other => Self::Recycle(other),
        }
    }
}
