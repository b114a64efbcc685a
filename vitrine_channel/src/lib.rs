// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vitrine Channel: a typed publish/subscribe channel.
//!
//! Widgets, control buttons, and cart/section plumbing never hold references to each other.
//! They talk through a [`Channel`] handed to them by the page:
//!
//! - [`Topic`] is the closed set of things that can be announced.
//! - [`Message`] carries the payload; each variant belongs to one topic.
//! - [`Channel::publish`] delivers synchronously, in subscription order, to the listeners
//!   subscribed at the moment of publishing.
//! - [`Subscription::unsubscribe`] detaches a listener; it is idempotent and may be called
//!   from inside any listener, including the one being detached.
//!
//! There is no persistence and no replay: a listener only sees messages published after it
//! subscribed.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vitrine_channel::{Channel, Message, Topic, ToggleTarget};
//!
//! let channel = Channel::new();
//! let opened = Rc::new(Cell::new(0));
//! let seen = opened.clone();
//! let sub = channel.subscribe(Topic::ToggleElementOpen, move |msg| {
//!     if msg.target().is_some_and(|t| t.id == "cart-drawer") {
//!         seen.set(seen.get() + 1);
//!     }
//! });
//!
//! channel.publish(&Message::Open(ToggleTarget::new("cart-drawer")));
//! sub.unsubscribe();
//! channel.publish(&Message::Open(ToggleTarget::new("cart-drawer")));
//! assert_eq!(opened.get(), 1);
//! ```
//!
//! The channel is single-threaded (`Rc`-based); clone the handle to share it.

mod channel;
mod message;
mod topic;

pub use channel::{Channel, Subscription};
pub use message::{Message, SectionUpdate, ToggleTarget};
pub use topic::{ParseTopicError, Topic};
