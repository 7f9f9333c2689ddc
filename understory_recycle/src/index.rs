// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item to renderer mapping.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::{RecycleError, RendererId};

/// Two-way map between item keys and the renderers bound to them.
///
/// At most one renderer is bound to a key and at most one key to a renderer.
#[derive(Clone, Debug)]
pub struct ItemIndex<K> {
    forward: HashMap<K, RendererId>,
    reverse: HashMap<RendererId, K>,
}

impl<K> Default for ItemIndex<K> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> ItemIndex<K> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `id`.
    ///
    /// Re-binding a key to the renderer it is already bound to is a no-op.
    /// Fails with [`RecycleError::DuplicateKey`] if `key` is bound elsewhere.
    pub fn insert(&mut self, key: K, id: RendererId) -> Result<(), RecycleError> {
        match self.forward.get(&key) {
            Some(&existing) if existing == id => return Ok(()),
            Some(_) => return Err(RecycleError::DuplicateKey),
            None => {}
        }
        if let Some(old) = self.reverse.insert(id, key.clone()) {
            self.forward.remove(&old);
        }
        self.forward.insert(key, id);
        Ok(())
    }

    /// Renderer bound to `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<RendererId> {
        self.forward.get(key).copied()
    }

    /// Key bound to `id`.
    #[must_use]
    pub fn key_of(&self, id: RendererId) -> Option<&K> {
        self.reverse.get(&id)
    }

    /// Unbinds `key`, returning its renderer.
    pub fn remove_key(&mut self, key: &K) -> Option<RendererId> {
        let id = self.forward.remove(key)?;
        self.reverse.remove(&id);
        Some(id)
    }

    /// Unbinds `id`, returning its key.
    pub fn remove_renderer(&mut self, id: RendererId) -> Option<K> {
        let key = self.reverse.remove(&id)?;
        self.forward.remove(&key);
        Some(key)
    }

    /// Number of bound pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Unbinds everything.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Iterates bound pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, RendererId)> + '_ {
        self.forward.iter().map(|(k, id)| (k, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::ItemIndex;
    use crate::{RecycleError, RendererId};

    #[test]
    fn keys_bind_to_one_renderer() {
        let a = RendererId::new(0, 1);
        let b = RendererId::new(1, 1);
        let mut index = ItemIndex::new();
        index.insert("x", a).unwrap();
        index.insert("x", a).unwrap();
        assert_eq!(index.insert("x", b), Err(RecycleError::DuplicateKey));
        assert_eq!(index.get(&"x"), Some(a));
        assert_eq!(index.key_of(a), Some(&"x"));

        // Rebinding a renderer drops its old key.
        index.insert("y", a).unwrap();
        assert_eq!(index.get(&"x"), None);
        assert_eq!(index.len(), 1);

        assert_eq!(index.remove_renderer(a), Some("y"));
        assert!(index.is_empty());
    }
}
