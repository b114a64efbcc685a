// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed message payloads.

use std::collections::BTreeMap;

use crate::topic::Topic;

/// Payload naming a toggle widget by its `id` attribute.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToggleTarget {
    /// Widget identity.
    pub id: String,
}

impl ToggleTarget {
    /// Target the widget with `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Fresh markup for one or more sections, keyed by section id.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionUpdate {
    /// Section id → rendered markup.
    pub sections: BTreeMap<String, String>,
}

/// A message published on the channel.
///
/// Every variant belongs to exactly one [`Topic`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Open a widget.
    Open(ToggleTarget),
    /// Close a widget.
    Close(ToggleTarget),
    /// Toggle a widget.
    Toggle(ToggleTarget),
    /// A widget finished opening.
    Opening(ToggleTarget),
    /// The Escape key was released.
    EscapeKey,
    /// The cart contents changed.
    CartUpdated,
    /// An item was added to the cart.
    CartAdded,
    /// Fresh section markup.
    SectionUpdate(SectionUpdate),
}

impl Message {
    /// Topic this message is delivered on.
    pub fn topic(&self) -> Topic {
        match self {
            Self::Open(_) => Topic::ToggleElementOpen,
            Self::Close(_) => Topic::ToggleElementClose,
            Self::Toggle(_) => Topic::ToggleElementToggle,
            Self::Opening(_) => Topic::ToggleElementOpening,
            Self::EscapeKey => Topic::EscapeKey,
            Self::CartUpdated => Topic::CartUpdated,
            Self::CartAdded => Topic::CartAdded,
            Self::SectionUpdate(_) => Topic::SectionUpdate,
        }
    }

    /// The widget a toggle command or opening notice refers to.
    pub fn target(&self) -> Option<&ToggleTarget> {
        match self {
            Self::Open(t) | Self::Close(t) | Self::Toggle(t) | Self::Opening(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_and_targets() {
        let open = Message::Open(ToggleTarget::new("cart-drawer"));
        assert_eq!(open.topic(), Topic::ToggleElementOpen);
        assert_eq!(open.target().map(|t| t.id.as_str()), Some("cart-drawer"));
        assert_eq!(Message::EscapeKey.topic(), Topic::EscapeKey);
        assert!(Message::CartAdded.target().is_none());

        let mut sections = BTreeMap::new();
        sections.insert("header".to_owned(), "<div></div>".to_owned());
        let update = Message::SectionUpdate(SectionUpdate { sections });
        assert_eq!(update.topic(), Topic::SectionUpdate);
    }
}
