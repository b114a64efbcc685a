// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buttons that command toggle widgets over the channel.
//!
//! A `toggle-element-button` wraps a clickable first child. Clicking it publishes
//! `toggle-element-<action>` with the `toggle-id` attribute as payload. The control never
//! talks to a widget directly, so a single button can drive a widget anywhere on the page (or
//! nothing at all, if no widget carries that id).

use core::str::FromStr;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};
use vitrine_channel::{Message, ToggleTarget};
use vitrine_dom::NodeId;
use vitrine_responder::listeners::ListenerId;
use vitrine_responder::types::{ListenerOptions, Outcome};

use crate::error::Error;
use crate::event::{DomEvent, EventKind};
use crate::page::Page;

/// Tag name of toggle controls.
pub const TAG: &str = "toggle-element-button";

const TARGET_ATTRIBUTE: &str = "toggle-id";
const ACTION_ATTRIBUTE: &str = "action";

/// Command a control sends.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ToggleAction {
    /// `toggle-element-open`.
    #[default]
    Open,
    /// `toggle-element-close`.
    Close,
    /// `toggle-element-toggle`.
    Toggle,
}

impl ToggleAction {
    /// The message commanding widget `id`.
    pub fn message(self, id: impl Into<String>) -> Message {
        let target = ToggleTarget::new(id);
        match self {
            Self::Open => Message::Open(target),
            Self::Close => Message::Close(target),
            Self::Toggle => Message::Toggle(target),
        }
    }
}

impl FromStr for ToggleAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "toggle" => Ok(Self::Toggle),
            other => Err(other.to_owned()),
        }
    }
}

/// A connected toggle control.
pub struct ToggleControl {
    page: Weak<Page>,
    node: NodeId,
    button: NodeId,
    listener: Cell<Option<ListenerId>>,
}

impl fmt::Debug for ToggleControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleControl")
            .field("node", &self.node)
            .field("button", &self.button)
            .field("listener", &self.listener.get())
            .finish_non_exhaustive()
    }
}

impl ToggleControl {
    /// Connect the `toggle-element-button` on `node`.
    ///
    /// The `action` and `toggle-id` attributes are read at click time; only the presence of
    /// `toggle-id` and of a first child is checked here.
    pub fn connect(page: &Rc<Page>, node: NodeId) -> Result<Rc<Self>, Error> {
        if let Some(existing) = page.control(node) {
            return Ok(existing);
        }
        let button = {
            let doc = page.document();
            if !doc.is_connected(node) {
                return Err(Error::Detached(node));
            }
            let tag = || doc.tag(node).unwrap_or(TAG).to_owned();
            if !doc.has_attribute(node, TARGET_ATTRIBUTE) {
                return Err(Error::MissingAttribute {
                    attribute: TARGET_ATTRIBUTE,
                    tag: tag(),
                });
            }
            doc.first_child(node).ok_or_else(|| Error::MissingRef {
                name: "button",
                tag: tag(),
            })?
        };
        let control = Rc::new(Self {
            page: Rc::downgrade(page),
            node,
            button,
            listener: Cell::new(None),
        });
        let weak = Rc::downgrade(&control);
        let id = page.listen(EventKind::Click, button, ListenerOptions::BUBBLE, move |ev| {
            if let Some(c) = weak.upgrade() {
                c.activate(ev);
            }
            Outcome::Continue
        });
        control.listener.set(Some(id));
        page.register_control(control.clone());
        debug!(?node, "toggle control connected");
        Ok(control)
    }

    /// Backing element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Element whose clicks the control handles.
    pub fn button(&self) -> NodeId {
        self.button
    }

    /// Detach the click listener and unregister.
    pub fn disconnect(&self) {
        let Some(page) = self.page.upgrade() else {
            return;
        };
        if let Some(id) = self.listener.take() {
            page.off(id);
        }
        page.unregister_control(self.node);
    }

    fn activate(&self, ev: &mut DomEvent) {
        let Some(page) = self.page.upgrade() else {
            return;
        };
        let (disabled, action, target) = {
            let doc = page.document();
            (
                doc.attribute_value(self.node, "disabled")
                    .is_some_and(|v| v.truthy()),
                doc.attribute(self.node, ACTION_ATTRIBUTE)
                    .map(str::to_owned),
                doc.attribute(self.node, TARGET_ATTRIBUTE)
                    .map(str::to_owned),
            )
        };
        if disabled {
            trace!(node = ?self.node, "disabled control ignored click");
            return;
        }
        ev.prevent_default();
        let action = match action.as_deref().map(str::parse::<ToggleAction>) {
            None => ToggleAction::default(),
            Some(Ok(action)) => action,
            Some(Err(unknown)) => {
                warn!(node = ?self.node, action = %unknown, "unknown toggle action");
                return;
            }
        };
        let Some(target) = target else {
            warn!(node = ?self.node, "toggle control lost its toggle-id");
            return;
        };
        page.channel().publish(&action.message(target));
    }
}
