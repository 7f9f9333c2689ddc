// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-aligned scrolling.

use crate::ExtentModel;

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Align the start (top/leading edge) of the item with the viewport.
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end (bottom/trailing edge) of the item with the viewport.
    End,
    /// Move just enough to make the item fully visible, preferring the
    /// smallest change from the current scroll offset.
    #[default]
    Nearest,
}

/// Returns the scroll offset that brings `index` into view with the given alignment.
///
/// The result is clamped to `0..=max(0, total_extent - viewport_extent)`.
/// An empty model always yields `0.0`; out-of-range indices are clamped to the
/// last item.
pub fn scroll_offset_for_index<M>(
    model: &mut M,
    index: usize,
    viewport_extent: f64,
    current_offset: f64,
    align: ScrollAlign,
) -> f64
where
    M: ExtentModel + ?Sized,
{
    let len = model.len();
    if len == 0 {
        return 0.0;
    }
    let idx = index.min(len - 1);
    let item_start = model.offset_of(idx);
    let item_end = item_start + model.extent_of(idx);
    let viewport = viewport_extent.max(0.0);

    let offset = match align {
        ScrollAlign::Start => item_start,
        ScrollAlign::End => item_end - viewport,
        ScrollAlign::Center => (item_start + item_end) / 2.0 - viewport / 2.0,
        ScrollAlign::Nearest => {
            let viewport_start = current_offset;
            let viewport_end = current_offset + viewport;
            if item_start >= viewport_start && item_end <= viewport_end {
                current_offset
            } else if item_start < viewport_start {
                item_start
            } else {
                item_end - viewport
            }
        }
    };

    let max_offset = (model.total_extent() - viewport).max(0.0);
    offset.clamp(0.0, max_offset)
}

#[cfg(test)]
mod tests {
    use super::{ScrollAlign, scroll_offset_for_index};
    use crate::{ExtentCache, Strip, StripMetrics};

    #[test]
    fn alignment_behaves_as_expected() {
        let mut cache = ExtentCache::with_len(10, 10.0);
        let mut strip = Strip::new(&mut cache, StripMetrics::default());

        let start = scroll_offset_for_index(&mut strip, 3, 30.0, 0.0, ScrollAlign::Start);
        assert_eq!(start, 30.0);

        let end = scroll_offset_for_index(&mut strip, 3, 30.0, 0.0, ScrollAlign::End);
        assert_eq!(end, 10.0);

        let center = scroll_offset_for_index(&mut strip, 3, 30.0, 0.0, ScrollAlign::Center);
        assert_eq!(center, 20.0);

        // Already fully visible: keep the current offset.
        let nearest = scroll_offset_for_index(&mut strip, 3, 30.0, 15.0, ScrollAlign::Nearest);
        assert_eq!(nearest, 15.0);
    }

    #[test]
    fn offsets_are_clamped_to_the_scroll_range() {
        let mut cache = ExtentCache::with_len(5, 10.0);
        let mut strip = Strip::new(&mut cache, StripMetrics::default());
        // Content 50, viewport 30: max offset 20.
        let last = scroll_offset_for_index(&mut strip, 4, 30.0, 0.0, ScrollAlign::Start);
        assert_eq!(last, 20.0);
        let first = scroll_offset_for_index(&mut strip, 0, 30.0, 0.0, ScrollAlign::End);
        assert_eq!(first, 0.0);
    }
}
