// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational storage for renderers.

use alloc::vec::Vec;
use core::fmt;

/// Handle to a renderer stored in a [`RendererSlab`].
///
/// Handles are generational: once a renderer is removed its slot may be reused,
/// but the old handle stays stale and never aliases the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub(crate) u32, pub(crate) u32);

impl RendererId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Slot storage addressed by [`RendererId`].
pub struct RendererSlab<T> {
    slots: Vec<Option<T>>,
    /// last generation per slot (persists across removals)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<T> fmt::Debug for RendererSlab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererSlab")
            .field("slots_total", &self.slots.len())
            .field("alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish()
    }
}

impl<T> Default for RendererSlab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RendererSlab<T> {
    /// Creates an empty slab.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> RendererId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(value);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "RendererId uses 32-bit indices."
            )]
            RendererId::new(idx as u32, generation)
        } else {
            self.slots.push(Some(value));
            self.generations.push(1);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "RendererId uses 32-bit indices."
            )]
            RendererId::new((self.slots.len() - 1) as u32, 1)
        }
    }

    /// Removes and returns the value for `id`, if it is live.
    pub fn remove(&mut self, id: RendererId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let value = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        value
    }

    /// Returns `true` if `id` refers to a live value.
    #[must_use]
    pub fn contains(&self, id: RendererId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1)
            && self.slots.get(id.idx()).is_some_and(Option::is_some)
    }

    /// Borrows the value for `id`.
    #[must_use]
    pub fn get(&self, id: RendererId) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_ref()
    }

    /// Mutably borrows the value for `id`.
    pub fn get_mut(&mut self, id: RendererId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_mut()
    }

    /// Number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Returns `true` if no value is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (RendererId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "RendererId uses 32-bit indices."
            )]
            let id = RendererId::new(i as u32, self.generations[i]);
            slot.as_ref().map(|value| (id, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RendererSlab;

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut slab = RendererSlab::new();
        let a = slab.insert("a");
        assert_eq!(slab.remove(a), Some("a"));
        let b = slab.insert("b");
        assert_eq!(a.index(), b.index());
        assert!(b.generation() > a.generation());
        assert_eq!(slab.get(a), None);
        assert_eq!(slab.get(b), Some(&"b"));
        assert_eq!(slab.remove(a), None);
        assert_eq!(slab.len(), 1);
    }

    #[test]
    fn iteration_skips_free_slots() {
        let mut slab = RendererSlab::new();
        let a = slab.insert(1);
        let b = slab.insert(2);
        let c = slab.insert(3);
        slab.remove(b);
        let live: alloc::vec::Vec<_> = slab.iter().map(|(id, v)| (id, *v)).collect();
        assert_eq!(live, alloc::vec![(a, 1), (c, 3)]);
    }
}
