// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-level data: groups of items.

use alloc::vec::Vec;

/// Position of an item inside grouped data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupLocation {
    /// Group index.
    pub group: usize,
    /// Item index within the group.
    pub item: usize,
}

impl GroupLocation {
    /// Creates a location.
    #[must_use]
    pub const fn new(group: usize, item: usize) -> Self {
        Self { group, item }
    }
}

/// What a grouped list renders at one flat position.
///
/// This is also the key a grouped list binds renderers by, so headers,
/// footers, and items never share a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupedEntry<G, T> {
    /// The header of a group.
    Header(G),
    /// An item.
    Item(T),
    /// The footer of a group.
    Footer(G),
}

impl<G, T> GroupedEntry<G, T> {
    /// Returns `true` for headers and footers.
    #[must_use]
    pub const fn is_group_chrome(&self) -> bool {
        !matches!(self, Self::Item(_))
    }
}

/// A change recorded by a [`GroupedCollection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupedChange {
    /// Everything may have changed.
    Reset,
    /// A group was inserted at `group`.
    AddGroup {
        /// Position of the new group.
        group: usize,
    },
    /// The group at `group` was removed.
    RemoveGroup {
        /// Former position of the removed group.
        group: usize,
    },
    /// The group value at `group` was replaced.
    ReplaceGroup {
        /// Position of the replaced group.
        group: usize,
    },
    /// An item was inserted.
    Add(GroupLocation),
    /// An item was removed.
    Remove(GroupLocation),
    /// An item was replaced by a different one.
    Replace(GroupLocation),
    /// An item was modified in place.
    UpdateAt(GroupLocation),
    /// Every item may have been modified in place.
    UpdateAll,
}

/// Grouped data that records its own changes.
pub trait GroupedCollection {
    /// Group value, shown by headers and footers.
    type Group;
    /// Item type.
    type Item;

    /// Number of groups.
    fn group_count(&self) -> usize;

    /// Borrows the group value at `group`.
    fn group(&self, group: usize) -> Option<&Self::Group>;

    /// Number of items in `group`.
    fn item_count(&self, group: usize) -> usize;

    /// Borrows the item at `location`.
    fn item(&self, location: GroupLocation) -> Option<&Self::Item>;

    /// Moves recorded changes into `out`, oldest first.
    fn drain_changes(&mut self, out: &mut Vec<GroupedChange>);
}

/// A vector-backed [`GroupedCollection`].
#[derive(Clone, Debug)]
pub struct GroupedArrayCollection<G, T> {
    groups: Vec<(G, Vec<T>)>,
    changes: Vec<GroupedChange>,
}

impl<G, T> Default for GroupedArrayCollection<G, T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<G, T> GroupedArrayCollection<G, T> {
    /// Wraps `groups`, each a group value and its items.
    #[must_use]
    pub fn new(groups: Vec<(G, Vec<T>)>) -> Self {
        Self {
            groups,
            changes: Vec::new(),
        }
    }

    /// All groups with their items.
    #[must_use]
    pub fn groups(&self) -> &[(G, Vec<T>)] {
        &self.groups
    }

    /// Appends a group.
    pub fn push_group(&mut self, group: G, items: Vec<T>) {
        self.groups.push((group, items));
        self.changes.push(GroupedChange::AddGroup {
            group: self.groups.len() - 1,
        });
    }

    /// Inserts a group at `index` (clamped to the group count).
    pub fn insert_group(&mut self, index: usize, group: G, items: Vec<T>) {
        let index = index.min(self.groups.len());
        self.groups.insert(index, (group, items));
        self.changes.push(GroupedChange::AddGroup { group: index });
    }

    /// Removes a group and its items.
    pub fn remove_group(&mut self, index: usize) -> Option<(G, Vec<T>)> {
        if index >= self.groups.len() {
            return None;
        }
        let removed = self.groups.remove(index);
        self.changes.push(GroupedChange::RemoveGroup { group: index });
        Some(removed)
    }

    /// Replaces a group value, keeping its items.
    pub fn replace_group(&mut self, index: usize, group: G) -> Option<G> {
        let slot = self.groups.get_mut(index)?;
        let old = core::mem::replace(&mut slot.0, group);
        self.changes.push(GroupedChange::ReplaceGroup { group: index });
        Some(old)
    }

    /// Appends an item to `group`. Returns `false` if the group does not exist.
    pub fn push_item(&mut self, group: usize, item: T) -> bool {
        let Some((_, items)) = self.groups.get_mut(group) else {
            return false;
        };
        items.push(item);
        let location = GroupLocation::new(group, items.len() - 1);
        self.changes.push(GroupedChange::Add(location));
        true
    }

    /// Inserts an item at `location` (item index clamped to the group length).
    pub fn insert_item(&mut self, location: GroupLocation, item: T) -> bool {
        let Some((_, items)) = self.groups.get_mut(location.group) else {
            return false;
        };
        let at = location.item.min(items.len());
        items.insert(at, item);
        self.changes
            .push(GroupedChange::Add(GroupLocation::new(location.group, at)));
        true
    }

    /// Removes the item at `location`.
    pub fn remove_item(&mut self, location: GroupLocation) -> Option<T> {
        let (_, items) = self.groups.get_mut(location.group)?;
        if location.item >= items.len() {
            return None;
        }
        let item = items.remove(location.item);
        self.changes.push(GroupedChange::Remove(location));
        Some(item)
    }

    /// Replaces the item at `location`, returning the previous one.
    pub fn replace_item(&mut self, location: GroupLocation, item: T) -> Option<T> {
        let slot = self
            .groups
            .get_mut(location.group)?
            .1
            .get_mut(location.item)?;
        let old = core::mem::replace(slot, item);
        self.changes.push(GroupedChange::Replace(location));
        Some(old)
    }

    /// Mutably borrows the item at `location`.
    ///
    /// Call [`GroupedArrayCollection::update_at`] afterwards so views refresh it.
    pub fn item_mut(&mut self, location: GroupLocation) -> Option<&mut T> {
        self.groups
            .get_mut(location.group)?
            .1
            .get_mut(location.item)
    }

    /// Records that the item at `location` was modified in place.
    pub fn update_at(&mut self, location: GroupLocation) {
        self.changes.push(GroupedChange::UpdateAt(location));
    }

    /// Records that every item may have been modified in place.
    pub fn update_all(&mut self) {
        self.changes.push(GroupedChange::UpdateAll);
    }

    /// Replaces all groups.
    pub fn set_all(&mut self, groups: Vec<(G, Vec<T>)>) {
        self.groups = groups;
        self.changes.push(GroupedChange::Reset);
    }
}

impl<G, T> GroupedCollection for GroupedArrayCollection<G, T> {
    type Group = G;
    type Item = T;

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn group(&self, group: usize) -> Option<&G> {
        self.groups.get(group).map(|(g, _)| g)
    }

    fn item_count(&self, group: usize) -> usize {
        self.groups.get(group).map_or(0, |(_, items)| items.len())
    }

    fn item(&self, location: GroupLocation) -> Option<&T> {
        self.groups.get(location.group)?.1.get(location.item)
    }

    fn drain_changes(&mut self, out: &mut Vec<GroupedChange>) {
        out.append(&mut self.changes);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{GroupLocation, GroupedArrayCollection, GroupedChange, GroupedCollection};

    #[test]
    fn group_edits_are_recorded() {
        let mut c = GroupedArrayCollection::new(vec![("a", vec![1, 2]), ("b", vec![3])]);
        assert!(c.push_item(1, 4));
        assert!(!c.push_item(5, 4));
        assert_eq!(c.remove_item(GroupLocation::new(0, 0)), Some(1));
        c.insert_group(0, "z", Vec::new());
        assert_eq!(c.group(0), Some(&"z"));
        assert_eq!(c.item_count(2), 2);
        assert_eq!(c.item(GroupLocation::new(2, 1)), Some(&4));

        let mut changes = Vec::new();
        c.drain_changes(&mut changes);
        assert_eq!(
            changes,
            vec![
                GroupedChange::Add(GroupLocation::new(1, 1)),
                GroupedChange::Remove(GroupLocation::new(0, 0)),
                GroupedChange::AddGroup { group: 0 },
            ]
        );
    }
}
