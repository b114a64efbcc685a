// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus trapping.
//!
//! While a [`FocusTrap`] is active:
//!
//! - focus landing outside the container is redirected to the first target, and
//! - Tab on the last target wraps to the first (Shift+Tab on the first wraps to the last).
//!
//! Targets are the container's sequentially focusable descendants, fixed at activation. A
//! container with none traps focus on itself. Releasing the trap restores focus to whatever
//! held it before activation, provided that element is still attached.

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;
use vitrine_dom::NodeId;
use vitrine_responder::listeners::ListenerId;
use vitrine_responder::types::{ListenerOptions, Outcome};

use crate::event::{EventKind, Key};
use crate::page::Page;

/// An active (or released) focus trap.
pub struct FocusTrap {
    page: Weak<Page>,
    container: NodeId,
    previous: Option<NodeId>,
    first: NodeId,
    last: NodeId,
    listeners: Vec<ListenerId>,
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("container", &self.container)
            .field("previous", &self.previous)
            .field("first", &self.first)
            .field("last", &self.last)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl FocusTrap {
    /// Trap focus inside `container`.
    ///
    /// With `exclude_hidden`, descendants that are not rendered or not visible are not targets.
    pub fn activate(page: &Rc<Page>, container: NodeId, exclude_hidden: bool) -> Self {
        let (previous, targets) = {
            let doc = page.document();
            let targets: Vec<NodeId> = doc
                .focusable_descendants(container, exclude_hidden)
                .into_iter()
                .filter(|&n| doc.tab_index(n).is_none_or(|t| t >= 0))
                .collect();
            (doc.active_element(), targets)
        };
        let first = targets.first().copied().unwrap_or(container);
        let last = targets.last().copied().unwrap_or(container);

        page.focus(container);

        let weak = Rc::downgrade(page);
        let root = page.root();
        let redirect = page.listen(EventKind::Focus, root, ListenerOptions::CAPTURE, {
            let weak = weak.clone();
            move |ev| {
                let Some(page) = weak.upgrade() else {
                    return Outcome::Continue;
                };
                let inside = page.document().contains(container, ev.target);
                if inside {
                    return Outcome::Continue;
                }
                page.focus(first);
                Outcome::StopAndConsume
            }
        });
        let wrap = page.listen(
            EventKind::KeyDown,
            container,
            ListenerOptions::BUBBLE,
            move |ev| {
                if ev.key != Some(Key::Tab) {
                    return Outcome::Continue;
                }
                let Some(page) = weak.upgrade() else {
                    return Outcome::Continue;
                };
                let active = page.active_element();
                let (from, to) = if ev.shift { (first, last) } else { (last, first) };
                if active == Some(from) {
                    page.focus(to);
                    ev.prevent_default();
                }
                Outcome::Continue
            },
        );
        debug!(?container, targets = targets.len(), "focus trap activated");
        Self {
            page: Rc::downgrade(page),
            container,
            previous,
            first,
            last,
            listeners: vec![redirect, wrap],
        }
    }

    /// Container focus is trapped in.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Whether the trap still holds its listeners.
    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Remove the listeners, blur the container, and restore the previous focus.
    ///
    /// Releasing twice does nothing the second time.
    pub fn release(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let Some(page) = self.page.upgrade() else {
            self.listeners.clear();
            return;
        };
        for id in self.listeners.drain(..) {
            page.off(id);
        }
        page.blur(self.container);
        if let Some(previous) = self.previous
            && page.document().is_connected(previous)
        {
            page.focus(previous);
        }
        debug!(container = ?self.container, "focus trap released");
    }
}
