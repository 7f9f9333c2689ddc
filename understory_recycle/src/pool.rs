// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active and inactive renderer lists for one recycler.

use alloc::vec::Vec;

use crate::{RecycleError, RendererId};

/// Identifies a recycler (a renderer factory plus its hooks).
///
/// Each recycler has its own pools, so renderers are only ever reused for
/// items that map to the same recycler.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RecyclerId(pub u32);

impl RecyclerId {
    /// The recycler every store is constructed with.
    pub const DEFAULT: Self = Self(0);
}

/// Tracks which renderers are bound in the current pass and which are
/// available for reuse.
///
/// A validation pass runs:
/// 1. [`RendererPool::begin_pass`]: last pass's active renderers (and retained
///    spares) become inactive.
/// 2. [`RendererPool::take_inactive`] for every renderer that keeps its item.
/// 3. [`RendererPool::pop_inactive`] or fresh creation plus
///    [`RendererPool::push_active`] for items without a renderer.
/// 4. [`RendererPool::free`] to retain a few leftovers and release the rest.
///
/// The inactive list keeps holes where renderers were taken out, so taking
/// one does not shift the rest; popping skips holes.
#[derive(Clone, Debug, Default)]
pub struct RendererPool {
    active: Vec<RendererId>,
    inactive: Vec<Option<RendererId>>,
    spare: Vec<RendererId>,
}

impl RendererPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: Vec::new(),
            inactive: Vec::new(),
            spare: Vec::new(),
        }
    }

    /// Moves every active and retained renderer into the inactive list.
    ///
    /// Fails with [`RecycleError::ActivePoolNotEmpty`] if the previous pass
    /// left renderers in the inactive list, which means it never called
    /// [`RendererPool::free`].
    pub fn begin_pass(&mut self) -> Result<(), RecycleError> {
        if self.inactive.iter().any(Option::is_some) {
            return Err(RecycleError::ActivePoolNotEmpty);
        }
        self.inactive.clear();
        self.inactive.extend(self.active.drain(..).map(Some));
        self.inactive.extend(self.spare.drain(..).map(Some));
        Ok(())
    }

    /// Moves `id` from the inactive list to the active list, leaving a hole.
    pub fn take_inactive(&mut self, id: RendererId) -> Result<(), RecycleError> {
        let slot = self
            .inactive
            .iter_mut()
            .find(|slot| **slot == Some(id))
            .ok_or(RecycleError::NotInInactivePool)?;
        *slot = None;
        self.active.push(id);
        Ok(())
    }

    /// Marks `id` as active.
    pub fn push_active(&mut self, id: RendererId) {
        self.active.push(id);
    }

    /// Returns `id` to the inactive list, to be retained or released by the
    /// next [`RendererPool::free`].
    pub fn push_inactive(&mut self, id: RendererId) {
        self.inactive.push(Some(id));
    }

    /// Removes the last inactive renderer, skipping holes.
    pub fn pop_inactive(&mut self) -> Option<RendererId> {
        while let Some(slot) = self.inactive.pop() {
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    /// Renderers bound during the current pass.
    #[must_use]
    pub fn active(&self) -> &[RendererId] {
        &self.active
    }

    /// Renderers waiting to be reused or released in the current pass.
    pub fn inactive(&self) -> impl Iterator<Item = RendererId> + '_ {
        self.inactive.iter().flatten().copied()
    }

    /// Renderers retained by the last [`RendererPool::free`].
    #[must_use]
    pub fn spare(&self) -> &[RendererId] {
        &self.spare
    }

    /// Number of renderers that are not active.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.spare.len() + self.inactive().count()
    }

    /// Total number of renderers tracked by this pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len() + self.idle_len()
    }

    /// Returns `true` if the pool tracks no renderers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retains up to `min_keep - active` inactive renderers as spares and
    /// appends the rest to `released`.
    ///
    /// Afterwards the inactive list is empty and
    /// `active + spare >= min_keep` whenever enough renderers existed.
    pub fn free(&mut self, min_keep: usize, released: &mut Vec<RendererId>) {
        let keep = min_keep.saturating_sub(self.active.len());
        for id in self.inactive.drain(..).flatten() {
            if self.spare.len() < keep {
                self.spare.push(id);
            } else {
                released.push(id);
            }
        }
    }

    /// Forgets `id` wherever it is tracked. Returns `true` if it was found.
    pub fn remove(&mut self, id: RendererId) -> bool {
        if let Some(pos) = self.active.iter().position(|&a| a == id) {
            self.active.remove(pos);
            return true;
        }
        if let Some(slot) = self.inactive.iter_mut().find(|slot| **slot == Some(id)) {
            *slot = None;
            return true;
        }
        if let Some(pos) = self.spare.iter().position(|&s| s == id) {
            self.spare.remove(pos);
            return true;
        }
        false
    }

    /// Empties the pool, appending every renderer to `out`.
    pub fn drain_all(&mut self, out: &mut Vec<RendererId>) {
        out.append(&mut self.active);
        out.extend(self.inactive.drain(..).flatten());
        out.append(&mut self.spare);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::RendererPool;
    use crate::{RecycleError, RendererId};

    fn ids(n: u32) -> Vec<RendererId> {
        (0..n).map(|i| RendererId::new(i, 1)).collect()
    }

    #[test]
    fn pass_cycle_swaps_and_retains() {
        let ids = ids(4);
        let mut pool = RendererPool::new();
        for &id in &ids {
            pool.push_active(id);
        }
        pool.begin_pass().unwrap();
        assert!(pool.active().is_empty());
        assert_eq!(pool.inactive().count(), 4);

        pool.take_inactive(ids[1]).unwrap();
        assert_eq!(pool.active(), &[ids[1]]);

        let mut released = Vec::new();
        pool.free(3, &mut released);
        assert_eq!(pool.spare().len(), 2);
        assert_eq!(released.len(), 1);
        assert_eq!(pool.inactive().count(), 0);
        assert!(pool.active().len() + pool.spare().len() >= 3);
    }

    #[test]
    fn pop_skips_holes() {
        let ids = ids(3);
        let mut pool = RendererPool::new();
        for &id in &ids {
            pool.push_active(id);
        }
        pool.begin_pass().unwrap();
        pool.take_inactive(ids[2]).unwrap();
        assert_eq!(pool.pop_inactive(), Some(ids[1]));
        assert_eq!(pool.pop_inactive(), Some(ids[0]));
        assert_eq!(pool.pop_inactive(), None);
    }

    #[test]
    fn missing_and_skipped_bookkeeping_is_reported() {
        let ids = ids(2);
        let mut pool = RendererPool::new();
        pool.push_active(ids[0]);
        pool.begin_pass().unwrap();
        assert_eq!(
            pool.take_inactive(ids[1]),
            Err(RecycleError::NotInInactivePool)
        );
        // `free` was never called, so the next pass cannot start.
        assert_eq!(pool.begin_pass(), Err(RecycleError::ActivePoolNotEmpty));

        let mut out = Vec::new();
        pool.drain_all(&mut out);
        assert_eq!(out, vec![ids[0]]);
        assert!(pool.is_empty());
    }
}
