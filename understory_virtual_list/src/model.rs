// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extent model trait and visible-range computation.

/// A 1D model over a dense strip of items, indexed `0..len`.
///
/// All extents and offsets are in the same coordinate space as the scroll
/// offset and viewport extent (typically logical pixels).
///
/// Methods that consult prefix sums take `&mut self` so implementations are
/// free to maintain internal caches without interior mutability.
pub trait ExtentModel {
    /// Number of items in this strip.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items in this strip.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total extent of the strip, including any leading and trailing padding.
    fn total_extent(&mut self) -> f64;

    /// Size of a single item.
    fn extent_of(&mut self, index: usize) -> f64;

    /// Offset of the start of the given item from the start of the strip.
    ///
    /// Implementations must guarantee that for all valid `i`,
    /// `offset_of(i + 1) >= offset_of(i) + extent_of(i)`.
    fn offset_of(&mut self, index: usize) -> f64;

    /// Returns the last index whose start is at or before `offset`, clamped into `0..len()`.
    fn index_at_offset(&mut self, offset: f64) -> usize;
}

/// Result of a visibility query over a 1D strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    /// First index to realize (inclusive).
    pub start: usize,
    /// One past the last index to realize (exclusive).
    pub end: usize,
    /// Extent of the strip before `start`.
    pub before_extent: f64,
    /// Extent of the strip after `end`.
    pub after_extent: f64,
    /// Extent of the entire strip.
    pub content_extent: f64,
}

impl VisibleRange {
    /// An empty range over an empty strip.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        before_extent: 0.0,
        after_extent: 0.0,
        content_extent: 0.0,
    };

    /// Returns `true` if there are no indices to realize.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of indices to realize.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns the range of indices to realize.
    #[must_use]
    pub const fn indices(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

/// Computes which indices of a strip intersect the viewport.
///
/// - `scroll_offset`: leading edge of the viewport in strip coordinates.
/// - `viewport_extent`: size of the viewport along the strip.
/// - `overscan`: number of extra indices realized on *each* side of the
///   intersecting run, so that small scrolls do not churn renderers.
///
/// The intersecting run always includes the item under `scroll_offset` and
/// every item starting before `scroll_offset + viewport_extent`.
///
/// A strip whose total extent is zero cannot be windowed; the first
/// `1 + overscan` indices are returned so that something gets measured.
pub fn compute_visible_range<M>(
    model: &mut M,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
) -> VisibleRange
where
    M: ExtentModel + ?Sized,
{
    let len = model.len();
    if len == 0 {
        return VisibleRange::EMPTY;
    }

    let content_extent = model.total_extent().max(0.0);
    if content_extent == 0.0 {
        return VisibleRange {
            start: 0,
            end: len.min(overscan + 1),
            before_extent: 0.0,
            after_extent: 0.0,
            content_extent: 0.0,
        };
    }

    let min = scroll_offset.max(0.0).min(content_extent);
    let max = (min + viewport_extent.max(0.0)).min(content_extent);

    let mut start = model.index_at_offset(min).min(len - 1);
    // Walk backwards in case the model's lookup landed past `min`.
    while start > 0 && model.offset_of(start) > min {
        start -= 1;
    }
    // Skip items that end exactly where the viewport begins.
    while start + 1 < len && model.offset_of(start) + model.extent_of(start) <= min && min < max {
        start += 1;
    }

    let mut end = start + 1;
    while end < len && model.offset_of(end) < max {
        end += 1;
    }

    let start = start.saturating_sub(overscan);
    let end = end.saturating_add(overscan).min(len);

    let before_extent = model.offset_of(start);
    let after_extent = if end < len {
        (content_extent - model.offset_of(end)).max(0.0)
    } else {
        0.0
    };

    VisibleRange {
        start,
        end,
        before_extent,
        after_extent,
        content_extent,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{ExtentModel, VisibleRange, compute_visible_range};

    #[derive(Clone, Debug)]
    struct SimpleModel {
        extents: Vec<f64>,
    }

    impl SimpleModel {
        fn new(extents: &[f64]) -> Self {
            Self {
                extents: extents.to_vec(),
            }
        }
    }

    impl ExtentModel for SimpleModel {
        fn len(&self) -> usize {
            self.extents.len()
        }

        fn total_extent(&mut self) -> f64 {
            self.extents.iter().copied().sum()
        }

        fn extent_of(&mut self, index: usize) -> f64 {
            self.extents.get(index).copied().unwrap_or(0.0)
        }

        fn offset_of(&mut self, index: usize) -> f64 {
            self.extents.iter().take(index).copied().sum()
        }

        fn index_at_offset(&mut self, offset: f64) -> usize {
            let mut pos = 0.0;
            for (i, extent) in self.extents.iter().copied().enumerate() {
                if pos + extent > offset {
                    return i;
                }
                pos += extent;
            }
            self.extents.len().saturating_sub(1)
        }
    }

    #[test]
    fn empty_model_yields_empty_range() {
        let mut model = SimpleModel::new(&[]);
        let range = compute_visible_range(&mut model, 0.0, 100.0, 1);
        assert_eq!(range, VisibleRange::EMPTY);
    }

    #[test]
    fn simple_visible_range() {
        let mut model = SimpleModel::new(&[10.0, 10.0, 10.0]);
        let range = compute_visible_range(&mut model, 5.0, 10.0, 0);
        assert_eq!(range.indices(), 0..2);
        assert_eq!(range.before_extent, 0.0);
        assert_eq!(range.after_extent, 10.0);
        assert_eq!(range.content_extent, 30.0);
    }

    #[test]
    fn overscan_pads_both_sides() {
        let mut model = SimpleModel::new(&[10.0; 10]);
        let range = compute_visible_range(&mut model, 30.0, 20.0, 1);
        // Items 3 and 4 intersect; one extra on each side.
        assert_eq!(range.indices(), 2..6);
        assert_eq!(range.before_extent, 20.0);
        assert_eq!(range.after_extent, 40.0);
    }

    #[test]
    fn zero_extent_strip_realizes_a_seed_item() {
        let mut model = SimpleModel::new(&[0.0, 0.0, 0.0]);
        let range = compute_visible_range(&mut model, 0.0, 100.0, 1);
        assert_eq!(range.indices(), 0..2);
    }

    #[test]
    fn scroll_past_the_end_keeps_the_tail() {
        let mut model = SimpleModel::new(&[10.0; 5]);
        let range = compute_visible_range(&mut model, 500.0, 20.0, 0);
        assert_eq!(range.end, 5);
        assert!(!range.is_empty());
    }
}
