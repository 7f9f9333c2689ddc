// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item model layouts operate on.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::AnchorLayoutData;

/// Minimum and maximum size an item accepts from a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeConstraints {
    /// Smallest size the item may be given.
    pub min: Size,
    /// Largest size the item may be given. Use `f64::INFINITY` for "no limit".
    pub max: Size,
}

impl SizeConstraints {
    /// No lower bound and no upper bound.
    pub const UNBOUNDED: Self = Self {
        min: Size::ZERO,
        max: Size::new(f64::INFINITY, f64::INFINITY),
    };

    /// Clamps a width into `[min.width, max.width]`.
    #[must_use]
    pub fn clamp_width(&self, width: f64) -> f64 {
        width.min(self.max.width).max(self.min.width)
    }

    /// Clamps a height into `[min.height, max.height]`.
    #[must_use]
    pub fn clamp_height(&self, height: f64) -> f64 {
        height.min(self.max.height).max(self.min.height)
    }
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Percentage sizing hints consumed by [`LinearLayout`](crate::LinearLayout).
///
/// Percentages are expressed in `0..=100` and resolve against the space left
/// over after fixed-size items, padding, and gaps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearLayoutData {
    /// Share of the available width.
    pub percent_width: Option<f64>,
    /// Share of the available height.
    pub percent_height: Option<f64>,
}

/// An item a layout can measure, size, and position.
///
/// Sizes and origins are in the layout's content coordinate space. A layout
/// calls [`LayoutItem::validate`] before reading [`LayoutItem::size`] so that
/// items with pending measurement can settle first.
pub trait LayoutItem {
    /// Current size of the item.
    fn size(&self) -> Size;

    /// Assigns a new size.
    fn set_size(&mut self, size: Size);

    /// Current top-left position of the item.
    fn origin(&self) -> Point;

    /// Assigns a new top-left position.
    fn set_origin(&mut self, origin: Point);

    /// Items returning `false` are skipped entirely.
    fn include_in_layout(&self) -> bool {
        true
    }

    /// Size limits applied when a layout resizes the item.
    fn constraints(&self) -> SizeConstraints {
        SizeConstraints::UNBOUNDED
    }

    /// Percentage sizing hints for linear layouts.
    fn linear_data(&self) -> Option<LinearLayoutData> {
        None
    }

    /// Anchor constraints for anchor layouts.
    fn anchors(&self) -> Option<AnchorLayoutData> {
        None
    }

    /// Settles any pending measurement so [`LayoutItem::size`] is current.
    fn validate(&mut self) {}
}

/// An indexed sequence of layout slots.
///
/// A slot is either a real item or a placeholder (`None`) standing in for an
/// item that is virtualized away. Placeholders still occupy space; layouts
/// estimate their extent.
pub trait LayoutItems {
    /// The item type stored in occupied slots.
    type Item: LayoutItem + ?Sized;

    /// Number of slots, placeholders included.
    fn len(&self) -> usize;

    /// Returns `true` if there are no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the item at `index`, or `None` for a placeholder.
    fn get(&self, index: usize) -> Option<&Self::Item>;

    /// Mutably borrows the item at `index`, or `None` for a placeholder.
    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Item>;
}

impl<T: LayoutItem> LayoutItems for [Option<T>] {
    type Item = T;

    fn len(&self) -> usize {
        <[Option<T>]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[Option<T>]>::get(self, index)?.as_ref()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        <[Option<T>]>::get_mut(self, index)?.as_mut()
    }
}

impl<T: LayoutItem> LayoutItems for Vec<Option<T>> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)?.as_ref()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)?.as_mut()
    }
}
