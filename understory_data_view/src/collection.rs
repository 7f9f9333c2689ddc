// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat data collections and their change log.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

/// A change recorded by a [`DataCollection`].
///
/// Indices refer to the collection as seen after the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionChange {
    /// Everything may have changed.
    Reset,
    /// An item was inserted at `index`.
    Add {
        /// Position of the new item.
        index: usize,
    },
    /// The item at `index` was removed.
    Remove {
        /// Former position of the removed item.
        index: usize,
    },
    /// The item at `index` was replaced by a different one.
    Replace {
        /// Position of the replaced item.
        index: usize,
    },
    /// The item at `index` was modified in place.
    UpdateAt {
        /// Position of the modified item.
        index: usize,
    },
    /// Every item may have been modified in place.
    UpdateAll,
    /// The filter changed, so the visible items may be entirely different.
    FilterChange,
    /// The sort order changed.
    SortChange,
}

impl CollectionChange {
    /// Returns `true` if per-index caches cannot be patched and must be cleared.
    #[must_use]
    pub const fn is_full_refresh(self) -> bool {
        matches!(
            self,
            Self::Reset | Self::UpdateAll | Self::FilterChange | Self::SortChange
        )
    }
}

/// An ordered, indexed data source that records its own changes.
///
/// View ports drain the change log at the start of every validation and
/// patch their caches and selection accordingly.
pub trait DataCollection {
    /// Item type.
    type Item;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the item at `index`.
    fn get(&self, index: usize) -> Option<&Self::Item>;

    /// Moves recorded changes into `out`, oldest first.
    fn drain_changes(&mut self, out: &mut Vec<CollectionChange>);
}

impl<T> DataCollection for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// A bare vector records nothing; replace it wholesale to refresh a view.
    fn drain_changes(&mut self, out: &mut Vec<CollectionChange>) {
        let _ = out;
    }
}

type FilterFn<T> = Box<dyn Fn(&T) -> bool>;
type SortFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A vector-backed [`DataCollection`] with an optional filter and sort.
///
/// Without a filter or sort, every mutation records a precise change. While
/// either is active, positions are recomputed on mutation and the change is
/// recorded as [`CollectionChange::Reset`].
pub struct ArrayCollection<T> {
    source: Vec<T>,
    /// Source positions in view order when a filter or sort is active.
    view: Option<Vec<usize>>,
    filter: Option<FilterFn<T>>,
    sort: Option<SortFn<T>>,
    changes: Vec<CollectionChange>,
}

impl<T: fmt::Debug> fmt::Debug for ArrayCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayCollection")
            .field("source", &self.source)
            .field("filtered", &self.filter.is_some())
            .field("sorted", &self.sort.is_some())
            .field("pending_changes", &self.changes.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ArrayCollection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FromIterator<T> for ArrayCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> ArrayCollection<T> {
    /// Wraps `items` without filtering or sorting.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            source: items,
            view: None,
            filter: None,
            sort: None,
            changes: Vec::new(),
        }
    }

    /// All items in source order, ignoring the filter and sort.
    #[must_use]
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Iterates the items in view order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    fn source_index(&self, index: usize) -> Option<usize> {
        match &self.view {
            Some(view) => view.get(index).copied(),
            None => (index < self.source.len()).then_some(index),
        }
    }

    fn refresh_view(&mut self) {
        if self.filter.is_none() && self.sort.is_none() {
            self.view = None;
            return;
        }
        let mut view: Vec<usize> = match &self.filter {
            Some(filter) => (0..self.source.len())
                .filter(|&i| filter(&self.source[i]))
                .collect(),
            None => (0..self.source.len()).collect(),
        };
        if let Some(sort) = &self.sort {
            view.sort_by(|&a, &b| sort(&self.source[a], &self.source[b]));
        }
        self.view = Some(view);
    }

    fn record(&mut self, precise: CollectionChange) {
        if self.view.is_some() {
            self.refresh_view();
            self.changes.push(CollectionChange::Reset);
        } else {
            self.changes.push(precise);
        }
    }

    /// Appends an item.
    pub fn push(&mut self, item: T) {
        let index = self.len();
        self.source.push(item);
        self.record(CollectionChange::Add { index });
    }

    /// Inserts an item so that it appears at `index` (clamped to the length).
    ///
    /// With a sort active the final position is decided by the sort.
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.len());
        let at = self.source_index(index).unwrap_or(self.source.len());
        self.source.insert(at, item);
        self.record(CollectionChange::Add { index });
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let at = self.source_index(index)?;
        let item = self.source.remove(at);
        self.record(CollectionChange::Remove { index });
        Some(item)
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, item: T) -> Option<T> {
        let at = self.source_index(index)?;
        let old = core::mem::replace(&mut self.source[at], item);
        self.record(CollectionChange::Replace { index });
        Some(old)
    }

    /// Mutably borrows the item at `index`.
    ///
    /// Call [`ArrayCollection::update_at`] afterwards so views refresh it.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let at = self.source_index(index)?;
        self.source.get_mut(at)
    }

    /// Records that the item at `index` was modified in place.
    pub fn update_at(&mut self, index: usize) {
        if index < self.len() {
            self.changes.push(CollectionChange::UpdateAt { index });
        }
    }

    /// Records that every item may have been modified in place.
    pub fn update_all(&mut self) {
        self.changes.push(CollectionChange::UpdateAll);
    }

    /// Replaces every item.
    pub fn set_all(&mut self, items: Vec<T>) {
        self.source = items;
        self.refresh_view();
        self.changes.push(CollectionChange::Reset);
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.set_all(Vec::new());
    }

    /// Shows only the items for which `filter` returns `true`, or all items for `None`.
    pub fn set_filter(&mut self, filter: Option<impl Fn(&T) -> bool + 'static>) {
        self.filter = filter.map(|f| Box::new(f) as FilterFn<T>);
        self.refresh_view();
        self.changes.push(CollectionChange::FilterChange);
    }

    /// Re-applies the current filter after items changed in ways it depends on.
    pub fn refresh_filter(&mut self) {
        self.refresh_view();
        self.changes.push(CollectionChange::FilterChange);
    }

    /// Orders the items with `compare`, or restores source order for `None`.
    pub fn set_sort(&mut self, compare: Option<impl Fn(&T, &T) -> Ordering + 'static>) {
        self.sort = compare.map(|f| Box::new(f) as SortFn<T>);
        self.refresh_view();
        self.changes.push(CollectionChange::SortChange);
    }
}

impl<T> DataCollection for ArrayCollection<T> {
    type Item = T;

    fn len(&self) -> usize {
        match &self.view {
            Some(view) => view.len(),
            None => self.source.len(),
        }
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.source_index(index).and_then(|i| self.source.get(i))
    }

    fn drain_changes(&mut self, out: &mut Vec<CollectionChange>) {
        out.append(&mut self.changes);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{ArrayCollection, CollectionChange, DataCollection};

    fn drain<T>(c: &mut ArrayCollection<T>) -> Vec<CollectionChange> {
        let mut out = Vec::new();
        c.drain_changes(&mut out);
        out
    }

    #[test]
    fn mutations_record_precise_changes() {
        let mut c: ArrayCollection<u32> = (0..3).collect();
        c.push(3);
        c.insert(0, 9);
        assert_eq!(c.remove(1), Some(0));
        assert_eq!(c.replace(0, 8), Some(9));
        c.update_at(2);
        c.update_at(40);
        assert_eq!(
            drain(&mut c),
            vec![
                CollectionChange::Add { index: 3 },
                CollectionChange::Add { index: 0 },
                CollectionChange::Remove { index: 1 },
                CollectionChange::Replace { index: 0 },
                CollectionChange::UpdateAt { index: 2 },
            ]
        );
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![8, 1, 2, 3]);
        assert!(drain(&mut c).is_empty());
    }

    #[test]
    fn filter_and_sort_reorder_the_view() {
        let mut c = ArrayCollection::new(vec![5, 2, 8, 1, 4]);
        c.set_filter(Some(|n: &i32| n % 2 == 0));
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![2, 8, 4]);
        c.set_sort(Some(|a: &i32, b: &i32| a.cmp(b)));
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![2, 4, 8]);
        assert_eq!(
            drain(&mut c),
            vec![CollectionChange::FilterChange, CollectionChange::SortChange]
        );

        // Mutating under a filter records a reset and re-filters.
        c.push(6);
        c.push(7);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![2, 4, 6, 8]);
        assert!(drain(&mut c).iter().all(|&ch| ch == CollectionChange::Reset));

        c.set_filter(None::<fn(&i32) -> bool>);
        c.set_sort(None::<fn(&i32, &i32) -> core::cmp::Ordering>);
        assert_eq!(c.len(), 7);
        assert_eq!(c.get(0), Some(&5));
    }
}
