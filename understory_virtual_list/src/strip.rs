// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strip geometry: padding and gaps layered over an [`ExtentCache`].

use crate::{ExtentCache, ExtentModel};

/// Spacing applied around and between the items of a strip.
///
/// The gap after item `i` is:
/// - `first_gap` when `i == 0` and it is set,
/// - otherwise `last_gap` when `i` is the second-to-last item and it is set,
/// - otherwise `gap`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StripMetrics {
    /// Space before the first item.
    pub padding_start: f64,
    /// Space after the last item.
    pub padding_end: f64,
    /// Space between consecutive items.
    pub gap: f64,
    /// Overrides the gap between the first and second items.
    pub first_gap: Option<f64>,
    /// Overrides the gap between the second-to-last and last items.
    pub last_gap: Option<f64>,
}

impl StripMetrics {
    /// Returns the gap that follows item `index` in a strip of `len` items.
    #[must_use]
    pub fn gap_after(&self, index: usize, len: usize) -> f64 {
        if index == 0
            && let Some(first) = self.first_gap
        {
            return first;
        }
        if index + 2 == len
            && let Some(last) = self.last_gap
        {
            return last;
        }
        self.gap
    }

    /// Sum of the gaps that precede item `index` in a strip of `len` items.
    #[must_use]
    pub fn gaps_before(&self, index: usize, len: usize) -> f64 {
        let index = index.min(len.saturating_sub(1));
        if index == 0 {
            return 0.0;
        }
        let mut total = self.gap * index as f64;
        let first_overridden = self.first_gap.is_some();
        if let Some(first) = self.first_gap {
            total += first - self.gap;
        }
        // The second-to-last gap is only distinct when it is not also the first.
        if let Some(last) = self.last_gap
            && len >= 2
            && index == len - 1
            && !(len == 2 && first_overridden)
        {
            total += last - self.gap;
        }
        total
    }
}

/// An [`ExtentModel`] over an [`ExtentCache`] plus [`StripMetrics`].
///
/// Offsets include leading padding and every preceding gap, so they can be
/// compared directly against a scroll offset.
#[derive(Debug)]
pub struct Strip<'a> {
    cache: &'a mut ExtentCache,
    metrics: StripMetrics,
}

impl<'a> Strip<'a> {
    /// Wraps `cache` with the given spacing.
    pub fn new(cache: &'a mut ExtentCache, metrics: StripMetrics) -> Self {
        Self { cache, metrics }
    }

    /// Returns the spacing applied by this strip.
    #[must_use]
    pub const fn metrics(&self) -> &StripMetrics {
        &self.metrics
    }

    /// Offset of the end of item `index` (its start plus its extent).
    pub fn end_of(&mut self, index: usize) -> f64 {
        self.offset_of(index) + self.extent_of(index)
    }
}

impl ExtentModel for Strip<'_> {
    fn len(&self) -> usize {
        self.cache.len()
    }

    fn total_extent(&mut self) -> f64 {
        let len = self.cache.len();
        let m = self.metrics;
        if len == 0 {
            return m.padding_start + m.padding_end;
        }
        m.padding_start + self.cache.total() + m.gaps_before(len - 1, len) + m.padding_end
    }

    fn extent_of(&mut self, index: usize) -> f64 {
        self.cache.extent_of(index)
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        let len = self.cache.len();
        if index >= len {
            return self.total_extent() - self.metrics.padding_end;
        }
        self.metrics.padding_start
            + self.cache.offset_of(index)
            + self.metrics.gaps_before(index, len)
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        let len = self.cache.len();
        if len == 0 {
            return 0;
        }
        // Offsets are monotonic in the index; binary search over them.
        let (mut lo, mut hi) = (0_usize, len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.offset_of(mid) <= offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::{Strip, StripMetrics};
    use crate::{ExtentCache, ExtentModel, compute_visible_range};

    #[test]
    fn gaps_and_padding_shift_offsets() {
        let mut cache = ExtentCache::with_len(3, 100.0);
        let metrics = StripMetrics {
            gap: 10.0,
            ..StripMetrics::default()
        };
        let mut strip = Strip::new(&mut cache, metrics);
        assert_eq!(strip.offset_of(0), 0.0);
        assert_eq!(strip.offset_of(1), 110.0);
        assert_eq!(strip.offset_of(2), 220.0);
        assert_eq!(strip.total_extent(), 320.0);
    }

    #[test]
    fn first_and_last_gap_override_the_uniform_gap() {
        let mut cache = ExtentCache::with_len(4, 10.0);
        let metrics = StripMetrics {
            padding_start: 5.0,
            padding_end: 5.0,
            gap: 2.0,
            first_gap: Some(20.0),
            last_gap: Some(30.0),
        };
        let mut strip = Strip::new(&mut cache, metrics);
        assert_eq!(strip.offset_of(1), 5.0 + 10.0 + 20.0);
        assert_eq!(strip.offset_of(2), 35.0 + 10.0 + 2.0);
        assert_eq!(strip.offset_of(3), 47.0 + 10.0 + 30.0);
        assert_eq!(strip.total_extent(), 87.0 + 10.0 + 5.0);
    }

    #[test]
    fn two_items_prefer_first_gap() {
        let metrics = StripMetrics {
            gap: 1.0,
            first_gap: Some(4.0),
            last_gap: Some(9.0),
            ..StripMetrics::default()
        };
        assert_eq!(metrics.gap_after(0, 2), 4.0);
        assert_eq!(metrics.gaps_before(1, 2), 4.0);

        let only_last = StripMetrics {
            gap: 1.0,
            last_gap: Some(9.0),
            ..StripMetrics::default()
        };
        assert_eq!(only_last.gap_after(0, 2), 9.0);
        assert_eq!(only_last.gaps_before(1, 2), 9.0);
    }

    #[test]
    fn index_lookup_accounts_for_gaps() {
        let mut cache = ExtentCache::with_len(5, 10.0);
        let metrics = StripMetrics {
            gap: 10.0,
            ..StripMetrics::default()
        };
        let mut strip = Strip::new(&mut cache, metrics);
        assert_eq!(strip.index_at_offset(0.0), 0);
        // Offset 15 lies in the gap after item 0.
        assert_eq!(strip.index_at_offset(15.0), 0);
        assert_eq!(strip.index_at_offset(20.0), 1);
        assert_eq!(strip.index_at_offset(1_000.0), 4);
    }

    #[test]
    fn thousand_item_window() {
        let mut cache = ExtentCache::with_len(1_000, 50.0);
        let mut strip = Strip::new(&mut cache, StripMetrics::default());
        let range = compute_visible_range(&mut strip, 275.0, 500.0, 1);
        assert!(range.start <= 5 && range.start >= 3);
        assert!(range.end >= 15 && range.end <= 18);
        assert!(range.len() < 20);
    }
}
