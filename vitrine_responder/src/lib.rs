// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vitrine Responder: a deterministic, `no_std` event router and listener dispatcher.
//!
//! ## Overview
//!
//! This crate builds the responder chain sequence (capture → target → bubble) for a target
//! node and delivers it to registered listeners. It does not perform hit testing; the
//! [`adapters::dom`] module (feature `dom_adapter`) bridges to the document's hit test.
//!
//! ## Routing
//!
//! [`Router`](crate::router::Router) reconstructs the root→target path through a
//! [`ParentLookup`](crate::types::ParentLookup), then emits capture steps for every ancestor
//! (root first), the target step, and, for bubbling events, bubble steps for every ancestor
//! (parent first).
//!
//! ## Listeners
//!
//! [`Listeners`](crate::listeners::Listeners) registers handlers per node and event kind, as
//! capture or bubble listeners, optionally detaching after one delivery.
//! [`plan`](crate::listeners::Listeners::plan) snapshots the handlers for a sequence. Capture
//! listeners fire on capture steps and at the target; bubble listeners fire at the target and on
//! bubble steps.
//!
//! ## Dispatcher
//!
//! Execute handlers over the sequence and honor stop rules with [`dispatcher::run`].
//!
//! ```
//! use vitrine_responder::dispatcher;
//! use vitrine_responder::listeners::Listeners;
//! use vitrine_responder::router::Router;
//! use vitrine_responder::types::{ListenerOptions, Outcome, ParentLookup};
//!
//! #[derive(Default)]
//! struct Chain;
//! impl ParentLookup<u32> for Chain {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node > 0).then(|| node - 1)
//!     }
//! }
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! struct Click;
//!
//! let mut listeners: Listeners<u32, Click, Vec<u32>> = Listeners::new();
//! listeners.add(0, Click, ListenerOptions::BUBBLE, |log| { log.push(0); Outcome::Continue });
//! listeners.add(2, Click, ListenerOptions::BUBBLE, |log| { log.push(2); Outcome::Continue });
//!
//! let seq = Router::<u32, Chain>::new().route(2, true);
//! let plan = listeners.plan(&seq, Click);
//! let mut log = Vec::new();
//! let stop_at = dispatcher::run(&plan, &mut log, |p, log| (p.handler)(log));
//! assert!(stop_at.is_none());
//! assert_eq!(log, [2, 0]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod listeners;
pub mod router;
pub mod types;
