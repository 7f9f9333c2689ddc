// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderers, their pools, and the item index in one place.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{
    ItemIndex, Recyclable, RecycleError, Recycler, RecyclerId, RendererId, RendererPool,
    RendererSlab,
};

struct Entry<R, S> {
    renderer: R,
    recycler: RecyclerId,
    state: Option<S>,
}

/// A renderer that was unbound by [`RendererStore::recover`].
#[derive(Clone, Debug, PartialEq)]
pub struct Recovered<K, S> {
    /// The renderer, still alive and now available for reuse.
    pub id: RendererId,
    /// The key it was bound to.
    pub key: K,
    /// The state it was last bound with.
    pub state: Option<S>,
}

/// Owns every renderer of a view together with its pools and item index.
///
/// - `K` is the item key (one renderer per key).
/// - `R` is the renderer type.
/// - `S` is the per-binding state handed to recycler hooks.
///
/// The store keeps these invariants between passes: a renderer bound to a key
/// is active in exactly one pool and indexed under exactly one key; an unbound
/// renderer is idle and indexed nowhere.
pub struct RendererStore<K, R, S> {
    slab: RendererSlab<Entry<R, S>>,
    pools: SmallVec<[(RecyclerId, RendererPool); 2]>,
    default: Recycler<R, S>,
    recyclers: HashMap<RecyclerId, Recycler<R, S>>,
    index: ItemIndex<K>,
    scratch: Vec<RendererId>,
}

impl<K, R, S> fmt::Debug for RendererStore<K, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererStore")
            .field("renderers", &self.slab.len())
            .field("pools", &self.pools.len())
            .field("recyclers", &(self.recyclers.len() + 1))
            .finish_non_exhaustive()
    }
}

fn pick<'a, R, S>(
    recyclers: &'a mut HashMap<RecyclerId, Recycler<R, S>>,
    default: &'a mut Recycler<R, S>,
    id: RecyclerId,
) -> &'a mut Recycler<R, S> {
    match recyclers.get_mut(&id) {
        Some(recycler) => recycler,
        None => default,
    }
}

fn pool_for(
    pools: &mut SmallVec<[(RecyclerId, RendererPool); 2]>,
    id: RecyclerId,
) -> &mut RendererPool {
    let pos = match pools.iter().position(|(rid, _)| *rid == id) {
        Some(pos) => pos,
        None => {
            pools.push((id, RendererPool::new()));
            pools.len() - 1
        }
    };
    &mut pools[pos].1
}

impl<K, R, S> RendererStore<K, R, S>
where
    K: Clone + Eq + Hash,
    R: Recyclable,
{
    /// Creates an empty store whose [`RecyclerId::DEFAULT`] recycler is `default`.
    pub fn new(default: Recycler<R, S>) -> Self {
        Self {
            slab: RendererSlab::new(),
            pools: SmallVec::new(),
            default,
            recyclers: HashMap::new(),
            index: ItemIndex::new(),
            scratch: Vec::new(),
        }
    }

    /// Registers `recycler` under `id`, returning the one it replaces.
    ///
    /// Registering [`RecyclerId::DEFAULT`] replaces the default recycler.
    pub fn set_recycler(&mut self, id: RecyclerId, recycler: Recycler<R, S>) -> Option<Recycler<R, S>> {
        if id == RecyclerId::DEFAULT {
            Some(core::mem::replace(&mut self.default, recycler))
        } else {
            self.recyclers.insert(id, recycler)
        }
    }

    /// Unregisters the recycler for `id`. The default recycler cannot be removed.
    pub fn remove_recycler(&mut self, id: RecyclerId) -> Option<Recycler<R, S>> {
        self.recyclers.remove(&id)
    }

    /// Returns `true` if `id` resolves to its own recycler rather than the default.
    #[must_use]
    pub fn has_recycler(&self, id: RecyclerId) -> bool {
        id == RecyclerId::DEFAULT || self.recyclers.contains_key(&id)
    }

    /// The recycler `id` resolves to: itself if registered, else the default.
    #[must_use]
    pub fn resolve_recycler(&self, id: RecyclerId) -> RecyclerId {
        if self.has_recycler(id) {
            id
        } else {
            RecyclerId::DEFAULT
        }
    }

    /// Starts a pass: every pool moves its active renderers to inactive.
    pub fn begin_pass(&mut self) -> Result<(), RecycleError> {
        for (_, pool) in &mut self.pools {
            pool.begin_pass()?;
        }
        Ok(())
    }

    /// Renderer currently bound to `key`.
    #[must_use]
    pub fn find_bound(&self, key: &K) -> Option<RendererId> {
        self.index.get(key)
    }

    /// Key currently bound to `id`.
    #[must_use]
    pub fn key_of(&self, id: RendererId) -> Option<&K> {
        self.index.key_of(id)
    }

    /// The item index.
    #[must_use]
    pub fn index(&self) -> &ItemIndex<K> {
        &self.index
    }

    /// Recycler that created `id`.
    #[must_use]
    pub fn recycler_of(&self, id: RendererId) -> Option<RecyclerId> {
        self.slab.get(id).map(|e| e.recycler)
    }

    /// Pool for `id`, if it has been used.
    #[must_use]
    pub fn pool(&self, id: RecyclerId) -> Option<&RendererPool> {
        self.pools.iter().find(|(rid, _)| *rid == id).map(|(_, p)| p)
    }

    /// Keeps a bound renderer for the current pass.
    ///
    /// Fails with [`RecycleError::NotInInactivePool`] if it was already
    /// reclaimed in this pass, which means two slots share one key.
    pub fn reclaim(&mut self, id: RendererId) -> Result<(), RecycleError> {
        let recycler = self.recycler_of(id).ok_or(RecycleError::UnknownRenderer)?;
        pool_for(&mut self.pools, recycler).take_inactive(id)
    }

    /// Unbinds every inactive renderer that is still bound to a key.
    ///
    /// Each one loses its index entry and state, its recycler's `reset` hook
    /// runs, and it is reported in `out`. Idle renderers that were already
    /// unbound are skipped.
    pub fn recover(&mut self, out: &mut Vec<Recovered<K, S>>) {
        let mut ids = core::mem::take(&mut self.scratch);
        ids.clear();
        for (_, pool) in &self.pools {
            ids.extend(pool.inactive());
        }
        for &id in &ids {
            let Some(key) = self.index.remove_renderer(id) else {
                continue;
            };
            let Some(entry) = self.slab.get_mut(id) else {
                continue;
            };
            let state = entry.state.take();
            if let Some(state) = state.as_ref() {
                pick(&mut self.recyclers, &mut self.default, entry.recycler)
                    .reset(&mut entry.renderer, state);
            }
            out.push(Recovered { id, key, state });
        }
        ids.clear();
        self.scratch = ids;
    }

    /// Returns an unbound renderer for `recycler`.
    ///
    /// With `use_cache`, an inactive renderer from that recycler's pool is
    /// reused when available; otherwise a new one is created. Unregistered ids
    /// fall back to the default recycler. The renderer is not active until
    /// [`RendererStore::activate`] is called.
    pub fn acquire(&mut self, recycler: RecyclerId, use_cache: bool) -> RendererId {
        let recycler = self.resolve_recycler(recycler);
        if use_cache
            && let Some(id) = pool_for(&mut self.pools, recycler).pop_inactive()
        {
            return id;
        }
        let renderer = pick(&mut self.recyclers, &mut self.default, recycler).create();
        self.slab.insert(Entry {
            renderer,
            recycler,
            state: None,
        })
    }

    /// Binds `id` to `key` with `state`, shows it, and marks it active.
    pub fn activate(&mut self, id: RendererId, key: K, state: S) -> Result<(), RecycleError> {
        if !self.slab.contains(id) {
            return Err(RecycleError::UnknownRenderer);
        }
        if let Err(err) = self.index.insert(key, id) {
            // Hand the renderer back so the end of the pass retains or releases it.
            let recycler = self.recycler_of(id).unwrap_or(RecyclerId::DEFAULT);
            pool_for(&mut self.pools, recycler).push_inactive(id);
            return Err(err);
        }
        let recycler = self.bind(id, state)?;
        pool_for(&mut self.pools, recycler).push_active(id);
        Ok(())
    }

    /// Replaces the state of `id` and runs its `update` hook.
    ///
    /// Works for any live renderer, including temporaries that belong to no
    /// pool.
    pub fn update(&mut self, id: RendererId, state: S) -> Result<(), RecycleError> {
        self.bind(id, state).map(|_| ())
    }

    fn bind(&mut self, id: RendererId, state: S) -> Result<RecyclerId, RecycleError> {
        let entry = self.slab.get_mut(id).ok_or(RecycleError::UnknownRenderer)?;
        entry.renderer.set_visible(true);
        pick(&mut self.recyclers, &mut self.default, entry.recycler)
            .update(&mut entry.renderer, &state);
        entry.state = Some(state);
        Ok(entry.recycler)
    }

    /// Ends the current pass for every pool.
    ///
    /// Each pool keeps up to `min_keep - active` of its inactive renderers as
    /// hidden spares. The rest are destroyed and appended to `destroyed`.
    pub fn free(&mut self, min_keep: usize, destroyed: &mut Vec<RendererId>) {
        let mut released = core::mem::take(&mut self.scratch);
        released.clear();
        for (_, pool) in &mut self.pools {
            pool.free(min_keep, &mut released);
            for &id in pool.spare() {
                if let Some(entry) = self.slab.get_mut(id) {
                    entry.renderer.set_visible(false);
                }
            }
        }
        for &id in &released {
            self.destroy_entry(id);
        }
        destroyed.extend_from_slice(&released);
        released.clear();
        self.scratch = released;
    }

    /// Destroys one renderer, removing it from its pool and the index.
    pub fn destroy(&mut self, id: RendererId) -> Result<(), RecycleError> {
        let recycler = self.recycler_of(id).ok_or(RecycleError::UnknownRenderer)?;
        if let Some((_, pool)) = self.pools.iter_mut().find(|(rid, _)| *rid == recycler) {
            pool.remove(id);
        }
        self.destroy_entry(id);
        Ok(())
    }

    /// Destroys every renderer, appending their ids to `destroyed`.
    pub fn destroy_all(&mut self, destroyed: &mut Vec<RendererId>) {
        let mut ids = core::mem::take(&mut self.scratch);
        ids.clear();
        for (_, pool) in &mut self.pools {
            pool.drain_all(&mut ids);
        }
        ids.clear();
        ids.extend(self.slab.iter().map(|(id, _)| id));
        for &id in &ids {
            self.destroy_entry(id);
        }
        self.index.clear();
        destroyed.extend_from_slice(&ids);
        ids.clear();
        self.scratch = ids;
    }

    fn destroy_entry(&mut self, id: RendererId) {
        self.index.remove_renderer(id);
        if let Some(mut entry) = self.slab.remove(id) {
            pick(&mut self.recyclers, &mut self.default, entry.recycler)
                .destroy(&mut entry.renderer);
        }
    }

    /// Borrows a renderer.
    #[must_use]
    pub fn get(&self, id: RendererId) -> Option<&R> {
        self.slab.get(id).map(|e| &e.renderer)
    }

    /// Mutably borrows a renderer.
    pub fn get_mut(&mut self, id: RendererId) -> Option<&mut R> {
        self.slab.get_mut(id).map(|e| &mut e.renderer)
    }

    /// State `id` is bound with.
    #[must_use]
    pub fn state(&self, id: RendererId) -> Option<&S> {
        self.slab.get(id).and_then(|e| e.state.as_ref())
    }

    /// Mutably borrows a bound renderer together with its state.
    pub fn renderer_and_state_mut(&mut self, id: RendererId) -> Option<(&mut R, &mut S)> {
        let entry = self.slab.get_mut(id)?;
        let state = entry.state.as_mut()?;
        Some((&mut entry.renderer, state))
    }

    /// Renderers active in the current pass, across all pools.
    pub fn active_ids(&self) -> impl Iterator<Item = RendererId> + '_ {
        self.pools.iter().flat_map(|(_, pool)| pool.active().iter().copied())
    }

    /// Number of active renderers.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.pools.iter().map(|(_, pool)| pool.active().len()).sum()
    }

    /// Number of pooled renderers that are not active.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.pools.iter().map(|(_, pool)| pool.idle_len()).sum()
    }

    /// Number of live renderers, temporaries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Returns `true` if no renderer is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }
}
