// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry.
//!
//! ## Overview
//!
//! [`Listeners`] stores handlers keyed by node and event kind. For a dispatch sequence from the
//! [router](crate::router::Router), [`Listeners::plan`] snapshots the handlers that fire, in
//! order: for each step, capture listeners precede bubble listeners at the target, and within a
//! group listeners fire in registration order.
//!
//! Plans hold cloned handler handles, so the registry can be mutated (listeners added or
//! removed) while a plan is being delivered. Callers that want removal to take effect mid-dispatch
//! check [`Listeners::contains`] before invoking each planned handler.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::types::{Dispatch, ListenerOptions, Outcome, Phase};

/// Shared handler for events of type `E`.
pub type Handler<E> = Rc<dyn Fn(&mut E) -> Outcome>;

/// Handle returned by [`Listeners::add`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerId(u64);

struct Entry<K, T, E> {
    id: ListenerId,
    node: K,
    kind: T,
    options: ListenerOptions,
    handler: Handler<E>,
}

/// One handler scheduled for one dispatch step.
pub struct Planned<K, E> {
    /// Step this handler fires on.
    pub dispatch: Dispatch<K>,
    /// Listener that registered the handler.
    pub id: ListenerId,
    /// Whether the listener detaches after this delivery.
    pub once: bool,
    /// The handler itself.
    pub handler: Handler<E>,
}

impl<K, E> AsRef<Dispatch<K>> for Planned<K, E> {
    fn as_ref(&self) -> &Dispatch<K> {
        &self.dispatch
    }
}

impl<K: core::fmt::Debug, E> core::fmt::Debug for Planned<K, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Planned")
            .field("dispatch", &self.dispatch)
            .field("id", &self.id)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

/// Registry of event listeners.
pub struct Listeners<K, T, E> {
    entries: Vec<Entry<K, T, E>>,
    next_id: u64,
}

impl<K, T, E> core::fmt::Debug for Listeners<K, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<K, T, E> Default for Listeners<K, T, E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K: Copy + Eq, T: Copy + Eq, E> Listeners<K, T, E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind` on `node`.
    pub fn add(
        &mut self,
        node: K,
        kind: T,
        options: ListenerOptions,
        handler: impl Fn(&mut E) -> Outcome + 'static,
    ) -> ListenerId {
        self.add_shared(node, kind, options, Rc::new(handler))
    }

    /// Register an already shared handler.
    pub fn add_shared(
        &mut self,
        node: K,
        kind: T,
        options: ListenerOptions,
        handler: Handler<E>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            node,
            kind,
            options,
            handler,
        });
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every listener attached to `node`. Returns how many were removed.
    pub fn remove_node(&mut self, node: K) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.node != node);
        before - self.entries.len()
    }

    /// Whether the listener is still registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners for `kind` on `node`.
    pub fn count(&self, node: K, kind: T) -> usize {
        self.entries
            .iter()
            .filter(|e| e.node == node && e.kind == kind)
            .count()
    }

    /// Snapshot the handlers that fire for `kind` along `seq`.
    pub fn plan(&self, seq: &[Dispatch<K>], kind: T) -> Vec<Planned<K, E>> {
        let mut out = Vec::new();
        for d in seq {
            // At the target, capture listeners run before bubble listeners.
            let groups: &[bool] = match d.phase {
                Phase::Capture => &[true],
                Phase::Target => &[true, false],
                Phase::Bubble => &[false],
            };
            for &capture in groups {
                for e in &self.entries {
                    if e.node == d.node && e.kind == kind && e.options.capture == capture {
                        out.push(Planned {
                            dispatch: *d,
                            id: e.id,
                            once: e.options.once,
                            handler: e.handler.clone(),
                        });
                    }
                }
            }
        }
        out
    }
}
