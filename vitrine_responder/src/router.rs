// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs the root→target path for a target node and emits dispatch steps:
//! capture for every ancestor (root first), the target itself, then bubble for every
//! ancestor (parent first). Non-bubbling events stop after the target step.
//!
//! Paths can also be supplied directly with [`Router::route_path`] when the caller already
//! has one (for example from a hit test).

use alloc::vec::Vec;

use crate::types::{Dispatch, NoParent, ParentLookup};

/// Deterministic responder chain router.
///
/// Construct with [`Router::new`] when callers always provide a full path, or with
/// [`Router::with_parent`] to enable path reconstruction via a [`ParentLookup`].
pub struct Router<K, P: ParentLookup<K> = NoParent> {
    pub(crate) parent: P,
    pub(crate) _phantom: core::marker::PhantomData<fn() -> K>,
}

impl<K, P: ParentLookup<K>> core::fmt::Debug for Router<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Router<K, P> {
    /// Create a router with a default parent lookup.
    pub fn new() -> Self {
        Self {
            parent: P::default(),
            _phantom: core::marker::PhantomData,
        }
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Default for Router<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K>> Router<K, P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self {
            parent,
            _phantom: core::marker::PhantomData,
        }
    }

    /// Produce the propagation sequence for `target`.
    pub fn route(&self, target: K, bubbles: bool) -> Vec<Dispatch<K>> {
        self.route_path(&self.reconstruct_path(target), bubbles)
    }

    /// Produce the propagation sequence for a known root→target path.
    ///
    /// An empty path yields an empty sequence.
    pub fn route_path(&self, path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
        let Some((&target, ancestors)) = path.split_last() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(path.len() * 2);
        // Capture: root→parent
        out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
        out.push(Dispatch::target(target));
        if bubbles {
            // Bubble: parent→root
            out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
        }
        out
    }

    fn reconstruct_path(&self, target: K) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = target;
        // Collect to root; caller ensures acyclic ancestry.
        loop {
            out.push(cur);
            match self.parent.parent_of(&cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}
