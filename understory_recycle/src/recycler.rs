// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer factories and lifecycle hooks.

use alloc::boxed::Box;
use core::fmt;

/// A renderer that can be shown and hidden by its pool.
pub trait Recyclable {
    /// Shows or hides the renderer.
    fn set_visible(&mut self, visible: bool);
}

type CreateFn<R> = Box<dyn FnMut() -> R>;
type StateFn<R, S> = Box<dyn FnMut(&mut R, &S)>;
type DestroyFn<R> = Box<dyn FnMut(&mut R)>;

/// Creates renderers and observes their lifecycle.
///
/// - `create` runs when a pool has nothing to reuse.
/// - `update` runs every time a renderer is bound or rebound to an item.
/// - `reset` runs when a renderer is unbound from its item.
/// - `destroy` runs just before a renderer is dropped.
///
/// ```rust
/// use understory_recycle::Recycler;
///
/// let recycler: Recycler<String, u32> = Recycler::new(String::new)
///     .with_update(|label: &mut String, n: &u32| *label = n.to_string())
///     .with_reset(|label: &mut String, _: &u32| label.clear());
/// # let _ = recycler;
/// ```
pub struct Recycler<R, S> {
    create: CreateFn<R>,
    update: Option<StateFn<R, S>>,
    reset: Option<StateFn<R, S>>,
    destroy: Option<DestroyFn<R>>,
}

impl<R, S> fmt::Debug for Recycler<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("update", &self.update.is_some())
            .field("reset", &self.reset.is_some())
            .field("destroy", &self.destroy.is_some())
            .finish_non_exhaustive()
    }
}

impl<R, S> Recycler<R, S> {
    /// A recycler that builds renderers with `create`.
    pub fn new(create: impl FnMut() -> R + 'static) -> Self {
        Self {
            create: Box::new(create),
            update: None,
            reset: None,
            destroy: None,
        }
    }

    /// Adds a hook run on every bind.
    #[must_use]
    pub fn with_update(mut self, update: impl FnMut(&mut R, &S) + 'static) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    /// Adds a hook run when a renderer is unbound.
    #[must_use]
    pub fn with_reset(mut self, reset: impl FnMut(&mut R, &S) + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Adds a hook run before a renderer is dropped.
    #[must_use]
    pub fn with_destroy(mut self, destroy: impl FnMut(&mut R) + 'static) -> Self {
        self.destroy = Some(Box::new(destroy));
        self
    }

    pub(crate) fn create(&mut self) -> R {
        (self.create)()
    }

    pub(crate) fn update(&mut self, renderer: &mut R, state: &S) {
        if let Some(update) = self.update.as_mut() {
            update(renderer, state);
        }
    }

    pub(crate) fn reset(&mut self, renderer: &mut R, state: &S) {
        if let Some(reset) = self.reset.as_mut() {
            reset(renderer, state);
        }
    }

    pub(crate) fn destroy(&mut self, renderer: &mut R) {
        if let Some(destroy) = self.destroy.as_mut() {
            destroy(renderer);
        }
    }
}

impl<R: Default + 'static, S> Recycler<R, S> {
    /// A recycler that builds renderers with [`Default`].
    #[must_use]
    pub fn from_default() -> Self {
        Self::new(R::default)
    }
}
