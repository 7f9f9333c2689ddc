// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-index extent cache with a typical-extent fallback and lazy prefix sums.

use alloc::vec::Vec;

/// Cached extents along one axis for a dense strip of items indexed `0..len`.
///
/// Each entry is either *unset* (the item has never been measured) or holds the
/// extent the item had the last time it was laid out. Unset entries report the
/// *typical* extent, so a strip can be sized before most of its items exist.
///
/// Offsets are served from a prefix-sum array that is rebuilt lazily from the
/// first dirty index. While no entry has been measured the strip is uniform and
/// offsets are computed directly as `index * typical` without touching the
/// prefix array.
///
/// Mutations mirror the changes a data collection can report:
/// - [`ExtentCache::insert`] and [`ExtentCache::remove`] shift later entries,
/// - [`ExtentCache::invalidate`] forgets one measurement,
/// - [`ExtentCache::reset`] forgets every measurement.
#[derive(Clone, Debug, Default)]
pub struct ExtentCache {
    extents: Vec<Option<f64>>,
    starts: Vec<f64>,
    dirty_from: Option<usize>,
    typical: f64,
    measured: usize,
}

impl ExtentCache {
    /// Creates an empty cache with a typical extent of zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extents: Vec::new(),
            starts: Vec::new(),
            dirty_from: None,
            typical: 0.0,
            measured: 0,
        }
    }

    /// Creates a cache of `len` unset entries estimated at `typical` each.
    #[must_use]
    pub fn with_len(len: usize, typical: f64) -> Self {
        let mut cache = Self::new();
        cache.set_typical(typical);
        cache.set_len(len);
        cache
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Returns `true` if the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Number of entries holding a measured extent.
    #[must_use]
    pub const fn measured_len(&self) -> usize {
        self.measured
    }

    /// Returns `true` while no entry has been measured.
    ///
    /// A uniform cache answers offset and index queries in constant time.
    #[must_use]
    pub const fn is_uniform(&self) -> bool {
        self.measured == 0
    }

    /// The extent reported for unset entries.
    #[must_use]
    pub const fn typical(&self) -> f64 {
        self.typical
    }

    /// Sets the extent reported for unset entries.
    ///
    /// Returns `true` if the value changed.
    pub fn set_typical(&mut self, extent: f64) -> bool {
        let extent = sanitize(extent);
        if extent == self.typical {
            return false;
        }
        self.typical = extent;
        if self.measured < self.extents.len() {
            self.mark_dirty(0);
        }
        true
    }

    /// Grows or truncates the cache to `len` entries. New entries are unset.
    pub fn set_len(&mut self, len: usize) {
        let old_len = self.extents.len();
        if len == old_len {
            return;
        }
        if len < old_len {
            let dropped = self.extents[len..].iter().filter(|e| e.is_some()).count();
            self.measured -= dropped;
        }
        self.extents.resize(len, None);
        self.starts.resize(len, 0.0);
        self.mark_dirty(old_len.min(len));
    }

    /// Returns the measured extent at `index`, or `None` if it is unset or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.extents.get(index).copied().flatten()
    }

    /// Returns the extent used for `index`: the measured value, else the typical extent.
    #[must_use]
    pub fn extent_of(&self, index: usize) -> f64 {
        self.get(index).unwrap_or(self.typical)
    }

    /// Records a measured extent for `index`, growing the cache if needed.
    ///
    /// Returns the extent that was in effect before the call (the previous
    /// measurement or the typical estimate), so callers can detect drift.
    pub fn set(&mut self, index: usize, extent: f64) -> f64 {
        if index >= self.extents.len() {
            self.set_len(index + 1);
        }
        debug_assert!(
            extent.is_finite(),
            "ExtentCache extents must be finite; got {extent:?}"
        );
        let extent = sanitize(extent);
        let previous = self.extent_of(index);
        if self.extents[index].is_none() {
            self.measured += 1;
        }
        self.extents[index] = Some(extent);
        if previous != extent {
            self.mark_dirty(index);
        }
        previous
    }

    /// Forgets the measurement at `index` so it reports the typical extent again.
    pub fn invalidate(&mut self, index: usize) {
        if let Some(slot) = self.extents.get_mut(index)
            && slot.take().is_some()
        {
            self.measured -= 1;
            self.mark_dirty(index);
        }
    }

    /// Inserts an unset entry at `index`, shifting later entries back by one.
    ///
    /// An `index` past the end appends.
    pub fn insert(&mut self, index: usize) {
        let index = index.min(self.extents.len());
        self.extents.insert(index, None);
        self.starts.push(0.0);
        self.mark_dirty(index);
    }

    /// Removes the entry at `index`, shifting later entries forward by one.
    ///
    /// Returns the removed measurement, if there was one.
    pub fn remove(&mut self, index: usize) -> Option<f64> {
        if index >= self.extents.len() {
            return None;
        }
        let removed = self.extents.remove(index);
        self.starts.pop();
        if removed.is_some() {
            self.measured -= 1;
        }
        self.mark_dirty(index);
        removed
    }

    /// Forgets every measurement while keeping the current length.
    pub fn reset(&mut self) {
        self.extents.iter_mut().for_each(|e| *e = None);
        self.measured = 0;
        self.mark_dirty(0);
    }

    /// Offset of the start of `index` from the start of the strip.
    ///
    /// `index == len()` yields the total extent. Larger indices are clamped.
    pub fn offset_of(&mut self, index: usize) -> f64 {
        let index = index.min(self.extents.len());
        if index == 0 {
            return 0.0;
        }
        if self.is_uniform() {
            return self.typical * index as f64;
        }
        let last = index - 1;
        self.ensure_prefix_through(last);
        self.starts[last] + self.extent_of(last)
    }

    /// Sum of all extents.
    pub fn total(&mut self) -> f64 {
        self.offset_of(self.extents.len())
    }

    /// Returns the index of the entry covering `offset`.
    ///
    /// The result is the last index whose start is at or before `offset`,
    /// clamped into `0..len()`. An empty cache yields `0`.
    pub fn index_at_offset(&mut self, offset: f64) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        let target = offset.max(0.0);
        if self.is_uniform() {
            if self.typical <= 0.0 {
                return 0;
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "Index approximation; clamped into range immediately"
            )]
            let i = (target / self.typical) as usize;
            return i.min(len - 1);
        }
        self.ensure_prefix_through(len - 1);
        let i = self.starts[..len].partition_point(|start| *start <= target);
        i.saturating_sub(1)
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    fn ensure_prefix_through(&mut self, through: usize) {
        let len = self.extents.len();
        if len == 0 || through >= len {
            return;
        }
        let dirty_from = match self.dirty_from {
            Some(d) if d <= through => d,
            _ => return,
        };

        let mut pos = if dirty_from == 0 {
            0.0
        } else {
            self.starts[dirty_from - 1] + self.extent_of(dirty_from - 1)
        };
        for i in dirty_from..=through {
            self.starts[i] = pos;
            pos += self.extent_of(i);
        }

        self.dirty_from = if through + 1 >= len {
            None
        } else {
            Some(through + 1)
        };
    }
}

fn sanitize(extent: f64) -> f64 {
    if extent.is_sign_negative() || extent.is_nan() {
        0.0
    } else {
        extent
    }
}
