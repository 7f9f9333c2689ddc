// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selected indices and how they follow data changes.

use smallvec::SmallVec;

use crate::CollectionChange;

/// How many items may be selected at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one item.
    #[default]
    Single,
    /// Any number of items.
    Multiple,
}

/// A sorted set of selected indices.
///
/// In [`SelectionMode::Single`] the set holds at most one index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexSelection {
    mode: SelectionMode,
    indices: SmallVec<[usize; 4]>,
}

impl IndexSelection {
    /// An empty selection in `mode`.
    #[must_use]
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            indices: SmallVec::new(),
        }
    }

    /// The selection mode.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Changes the mode. Switching to single keeps only the first index.
    ///
    /// Returns `true` if the selected set changed.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        self.mode = mode;
        if mode == SelectionMode::Single && self.indices.len() > 1 {
            self.indices.truncate(1);
            return true;
        }
        false
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The lowest selected index.
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns `true` if `index` is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Selects `index`. In single mode this replaces the previous selection.
    pub fn select(&mut self, index: usize) -> bool {
        if self.mode == SelectionMode::Single {
            if self.indices.as_slice() == [index] {
                return false;
            }
            self.indices.clear();
            self.indices.push(index);
            return true;
        }
        match self.indices.binary_search(&index) {
            Ok(_) => false,
            Err(pos) => {
                self.indices.insert(pos, index);
                true
            }
        }
    }

    /// Deselects `index`.
    pub fn deselect(&mut self, index: usize) -> bool {
        match self.indices.binary_search(&index) {
            Ok(pos) => {
                self.indices.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Selects or deselects `index`.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> bool {
        if selected {
            self.select(index)
        } else {
            self.deselect(index)
        }
    }

    /// Replaces the selection. Single mode keeps only the first index given.
    pub fn set_indices(&mut self, indices: &[usize]) -> bool {
        let mut next: SmallVec<[usize; 4]> = SmallVec::new();
        match self.mode {
            SelectionMode::Single => next.extend(indices.first().copied()),
            SelectionMode::Multiple => {
                next.extend_from_slice(indices);
                next.sort_unstable();
                next.dedup();
            }
        }
        if next == self.indices {
            return false;
        }
        self.indices = next;
        true
    }

    /// Deselects everything.
    pub fn clear(&mut self) -> bool {
        let changed = !self.indices.is_empty();
        self.indices.clear();
        changed
    }

    /// Drops indices at or beyond `len`.
    pub fn truncate(&mut self, len: usize) -> bool {
        let before = self.indices.len();
        self.indices.retain(|i| *i < len);
        before != self.indices.len()
    }

    /// Adjusts the selection for a data change. Returns `true` if it changed.
    ///
    /// Adds shift later indices up, removals drop the removed index and shift
    /// later ones down, replacements drop the replaced index, and changes that
    /// reorder or replace everything clear the selection.
    pub fn apply_change(&mut self, change: CollectionChange) -> bool {
        match change {
            CollectionChange::Add { index } => {
                let mut changed = false;
                for i in self.indices.iter_mut().filter(|i| **i >= index) {
                    *i += 1;
                    changed = true;
                }
                changed
            }
            CollectionChange::Remove { index } => {
                let mut changed = self.deselect(index);
                for i in self.indices.iter_mut().filter(|i| **i > index) {
                    *i -= 1;
                    changed = true;
                }
                changed
            }
            CollectionChange::Replace { index } => self.deselect(index),
            CollectionChange::Reset | CollectionChange::FilterChange | CollectionChange::SortChange => {
                self.clear()
            }
            CollectionChange::UpdateAt { .. } | CollectionChange::UpdateAll => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexSelection, SelectionMode};
    use crate::CollectionChange;

    #[test]
    fn single_mode_holds_one_index() {
        let mut s = IndexSelection::new(SelectionMode::Single);
        assert!(s.select(3));
        assert!(s.select(5));
        assert!(!s.select(5));
        assert_eq!(s.indices(), &[5]);
        assert!(s.set_indices(&[7, 2]));
        assert_eq!(s.indices(), &[7]);
    }

    #[test]
    fn selection_follows_data_changes() {
        let mut s = IndexSelection::new(SelectionMode::Multiple);
        s.set_indices(&[6, 2, 4]);
        assert!(s.apply_change(CollectionChange::Add { index: 3 }));
        assert_eq!(s.indices(), &[2, 5, 7]);
        assert!(s.apply_change(CollectionChange::Remove { index: 5 }));
        assert_eq!(s.indices(), &[2, 6]);
        assert!(s.apply_change(CollectionChange::Replace { index: 2 }));
        assert_eq!(s.indices(), &[6]);
        assert!(!s.apply_change(CollectionChange::UpdateAll));
        assert!(s.apply_change(CollectionChange::SortChange));
        assert!(s.is_empty());
    }
}
