// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the responder: phases, outcomes, parent lookups, listener options, and dispatch.
//!
//! ## Overview
//!
//! These types describe the responder protocol and its inputs/outputs.
//! They are referenced by the [`router`](crate::router), the [`listeners`](crate::listeners)
//! registry, and the [`dispatcher`](crate::dispatcher).

/// Phases of event propagation.
///
/// Appears on each [`Dispatch`] item produced by
/// [`Router::route`](crate::router::Router::route).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Root-to-parent traversal, before the target.
    Capture,
    /// Target node.
    Target,
    /// Parent-to-root traversal, after the target.
    Bubble,
}

/// Handler outcome controlling propagation.
///
/// Listener handlers return this to the [dispatcher](crate::dispatcher::run).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Continue propagation.
    Continue,
    /// Finish the current node's handlers, then stop propagation.
    Stop,
    /// Stop immediately, skipping the current node's remaining handlers.
    StopAndConsume,
}

/// Look up the parent of a node to reconstruct a root→target path for propagation.
///
/// The [router](crate::router::Router) consults this when constructed via
/// [`Router::with_parent`](crate::router::Router::with_parent).
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, T: ParentLookup<K> + ?Sized> ParentLookup<K> for &T {
    #[inline]
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}

/// A no‑op parent provider used by default when no parent lookup is needed.
///
/// Used by [`Router::new`](crate::router::Router::new). All calls to
/// [`ParentLookup::parent_of`] return `None`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

/// A single dispatch step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Node associated with this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture step.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target step.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

impl<K> AsRef<Self> for Dispatch<K> {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Registration options for a listener.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ListenerOptions {
    /// Fire during the capture phase instead of the bubble phase.
    pub capture: bool,
    /// Detach after the first delivery.
    pub once: bool,
}

impl ListenerOptions {
    /// Bubble-phase listener.
    pub const BUBBLE: Self = Self {
        capture: false,
        once: false,
    };

    /// Capture-phase listener.
    pub const CAPTURE: Self = Self {
        capture: true,
        once: false,
    };

    /// Whether a listener with these options fires on a step in `phase`.
    pub const fn fires_in(self, phase: Phase) -> bool {
        match phase {
            Phase::Capture => self.capture,
            Phase::Target => true,
            Phase::Bubble => !self.capture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_phase_matching() {
        assert!(ListenerOptions::CAPTURE.fires_in(Phase::Capture));
        assert!(ListenerOptions::CAPTURE.fires_in(Phase::Target));
        assert!(!ListenerOptions::CAPTURE.fires_in(Phase::Bubble));
        assert!(!ListenerOptions::BUBBLE.fires_in(Phase::Capture));
        assert!(ListenerOptions::BUBBLE.fires_in(Phase::Target));
        assert!(ListenerOptions::BUBBLE.fires_in(Phase::Bubble));
    }

    #[test]
    fn parent_lookup_through_reference() {
        struct Halve;
        impl ParentLookup<u32> for Halve {
            fn parent_of(&self, node: &u32) -> Option<u32> {
                (*node > 1).then_some(node / 2)
            }
        }
        let by_ref = &Halve;
        assert_eq!(by_ref.parent_of(&8), Some(4));
        assert_eq!(NoParent.parent_of(&8_u32), None);
    }
}
