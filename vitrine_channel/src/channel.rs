// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The channel and its subscription handles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::message::Message;
use crate::topic::Topic;

type Listener = Rc<dyn Fn(&Message)>;

struct Slot {
    id: u64,
    topic: Topic,
    active: Rc<Cell<bool>>,
    listener: Listener,
}

#[derive(Default)]
struct Inner {
    slots: Vec<Slot>,
    next_id: u64,
}

/// Single-threaded publish/subscribe channel.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct Channel {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Channel")
            .field("subscriptions", &inner.slots.len())
            .finish_non_exhaustive()
    }
}

impl Channel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` for every message published on `topic` from now on.
    pub fn subscribe(&self, topic: Topic, listener: impl Fn(&Message) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let active = Rc::new(Cell::new(true));
        inner.slots.push(Slot {
            id,
            topic,
            active: active.clone(),
            listener: Rc::new(listener),
        });
        trace!(%topic, id, "subscribe");
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
            topic,
            active,
        }
    }

    /// Deliver `message` to the current subscribers of its topic, in subscription order.
    ///
    /// Subscribers are snapshotted before delivery: a listener subscribed during the
    /// broadcast waits for the next message, and one unsubscribed during it is skipped.
    /// Returns how many listeners ran.
    pub fn publish(&self, message: &Message) -> usize {
        let topic = message.topic();
        let targets: Vec<(Rc<Cell<bool>>, Listener)> = self
            .inner
            .borrow()
            .slots
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| (s.active.clone(), s.listener.clone()))
            .collect();
        trace!(%topic, listeners = targets.len(), "publish");
        let mut delivered = 0;
        for (active, listener) in targets {
            if active.get() {
                listener(message);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of live subscriptions for `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .slots
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }
}

/// Handle to a subscription.
///
/// Dropping the handle leaves the listener attached.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    id: u64,
    topic: Topic,
    active: Rc<Cell<bool>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Topic this subscription listens on.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Whether the listener is still attached.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Detach the listener. Safe to call more than once and from inside a listener.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().slots.retain(|s| s.id != self.id);
        }
        trace!(topic = %self.topic, id = self.id, "unsubscribe");
    }
}
