// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events routed through the page.

use vitrine_dom::NodeId;
use vitrine_responder::types::Phase;

/// Theme editor notifications, raised on a section container.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EditorEvent {
    /// A section was selected in the editor.
    SectionSelect,
    /// A section was deselected.
    SectionDeselect,
    /// Sections were reordered.
    SectionReorder,
    /// A block inside a section was selected.
    BlockSelect,
    /// A block was deselected.
    BlockDeselect,
}

impl EditorEvent {
    /// Event name as raised by the editor.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SectionSelect => "shopify:section:select",
            Self::SectionDeselect => "shopify:section:deselect",
            Self::SectionReorder => "shopify:section:reorder",
            Self::BlockSelect => "shopify:block:select",
            Self::BlockDeselect => "shopify:block:deselect",
        }
    }
}

/// Keys the page knows how to route.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Key {
    /// Tab (Shift+Tab with the shift modifier).
    Tab,
    /// Escape.
    Escape,
    /// Enter.
    Enter,
    /// Any printable character.
    Character(char),
}

/// Kind of a routed event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// An element received focus.
    Focus,
    /// An element lost focus.
    Blur,
    /// A CSS transition finished.
    TransitionEnd,
    /// The viewport changed size.
    Resize,
    /// A toggle widget finished opening.
    Open,
    /// A toggle widget finished closing.
    Close,
    /// Theme editor notification.
    Editor(EditorEvent),
}

impl EventKind {
    /// Whether the event bubbles after reaching its target.
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::Focus | Self::Blur | Self::Resize | Self::Open | Self::Close
        )
    }

    /// Whether the event has a default action that listeners may prevent.
    pub const fn cancelable(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown | Self::KeyUp)
    }
}

/// An event in flight.
#[derive(Clone, Debug)]
pub struct DomEvent {
    /// Kind.
    pub kind: EventKind,
    /// Element the event was raised on.
    pub target: NodeId,
    /// Element whose listener is running.
    pub current: NodeId,
    /// Phase of the running listener.
    pub phase: Phase,
    /// Key for keyboard events.
    pub key: Option<Key>,
    /// Shift modifier for keyboard events.
    pub shift: bool,
    default_prevented: bool,
}

impl DomEvent {
    /// A new event of `kind` targeted at `target`.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current: target,
            phase: Phase::Target,
            key: None,
            shift: false,
            default_prevented: false,
        }
    }

    /// A keyboard event.
    pub fn keyboard(kind: EventKind, target: NodeId, key: Key, shift: bool) -> Self {
        Self {
            key: Some(key),
            shift,
            ..Self::new(kind, target)
        }
    }

    /// Suppress the default action. Ignored for events that are not cancelable.
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    /// Whether a listener suppressed the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_dom::Document;

    #[test]
    fn only_cancelable_events_can_be_prevented() {
        let node = Document::new().root();
        let mut click = DomEvent::new(EventKind::Click, node);
        click.prevent_default();
        assert!(click.default_prevented());
        let mut open = DomEvent::new(EventKind::Open, node);
        open.prevent_default();
        assert!(!open.default_prevented());
    }

    #[test]
    fn bubbling() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::TransitionEnd.bubbles());
        assert!(EventKind::Editor(EditorEvent::SectionSelect).bubbles());
        assert!(!EventKind::Focus.bubbles());
        assert!(!EventKind::Open.bubbles());
        assert_eq!(EditorEvent::BlockSelect.as_str(), "shopify:block:select");
    }
}
