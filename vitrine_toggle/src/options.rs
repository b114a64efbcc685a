// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget configuration resolved from element attributes.
//!
//! Each flag is resolved with the precedence *attribute override > preset > default*. Defaults
//! are all off and no open event. Attribute text is coerced with
//! [`AttrValue`](vitrine_dom::AttrValue), so `close-on-escape`, `close-on-escape=""` and
//! `close-on-escape="true"` all enable the flag while `close-on-escape="false"` (or `"0"`)
//! disables it even over a preset.

use core::str::FromStr;

use vitrine_channel::Topic;
use vitrine_dom::{Document, NodeId};

use crate::error::Error;

/// Attribute naming a [`Preset`].
pub const PRESET_ATTRIBUTE: &str = "preset";

/// A named bundle of defaults.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    /// Modal surfaces: escape and outside-click dismissal, scroll lock, focus trap, and
    /// accessibility attributes.
    Dialog,
}

impl Preset {
    /// Options this preset starts from.
    pub const fn defaults(self) -> ToggleOptions {
        match self {
            Self::Dialog => ToggleOptions {
                open_event: None,
                close_on_escape: true,
                close_on_outside_click: true,
                body_scroll_lock: true,
                trap_focus: true,
                set_a11y_attributes: true,
                open_on_section_select: false,
                hoist: false,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dialog" => Ok(Self::Dialog),
            other => Err(Error::UnknownPreset(other.to_owned())),
        }
    }
}

/// Behaviour flags of a toggle widget. Immutable for the lifetime of a connection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToggleOptions {
    /// Topic that opens the widget (`open-event`).
    pub open_event: Option<Topic>,
    /// Close on `escape-key` (`close-on-escape`).
    pub close_on_escape: bool,
    /// Close on clicks outside the dialog surface (`close-on-body-click`).
    pub close_on_outside_click: bool,
    /// Lock body scrolling while open (`body-scroll-lock`).
    pub body_scroll_lock: bool,
    /// Trap focus inside the widget while open (`trap-focus`).
    pub trap_focus: bool,
    /// Maintain `tabindex`/`aria-hidden` (`set-tabindex`).
    pub set_a11y_attributes: bool,
    /// Open and close with editor section selection (`open-on-section-select`).
    pub open_on_section_select: bool,
    /// Move the element to the end of the root on connection (`hoist`).
    pub hoist: bool,
}

impl ToggleOptions {
    /// Resolve options from the attributes of `node`.
    pub fn from_element(doc: &Document, node: NodeId) -> Result<Self, Error> {
        let base = match doc.attribute(node, PRESET_ATTRIBUTE) {
            Some(name) => name.parse::<Preset>()?.defaults(),
            None => Self::default(),
        };
        let flag = |name: &str, fallback: bool| doc.attribute_flag(node, name, fallback);
        let open_event = match doc
            .attribute_value(node, "open-event")
            .and_then(|v| v.as_text())
        {
            Some(name) => Some(name.parse::<Topic>()?),
            None => base.open_event,
        };
        Ok(Self {
            open_event,
            close_on_escape: flag("close-on-escape", base.close_on_escape),
            close_on_outside_click: flag("close-on-body-click", base.close_on_outside_click),
            body_scroll_lock: flag("body-scroll-lock", base.body_scroll_lock),
            trap_focus: flag("trap-focus", base.trap_focus),
            set_a11y_attributes: flag("set-tabindex", base.set_a11y_attributes),
            open_on_section_select: flag("open-on-section-select", base.open_on_section_select),
            hoist: flag("hoist", base.hoist),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_dom::Element;

    fn resolve(element: Element) -> Result<ToggleOptions, Error> {
        let mut doc = Document::new();
        let node = doc.insert(Some(doc.root()), element);
        ToggleOptions::from_element(&doc, node)
    }

    #[test]
    fn defaults_are_off() {
        let opts = resolve(Element::new("toggle-element").id("menu")).unwrap();
        assert_eq!(opts, ToggleOptions::default());
    }

    #[test]
    fn dialog_preset() {
        let opts = resolve(Element::new("toggle-element").attr("preset", "dialog")).unwrap();
        assert_eq!(opts, Preset::Dialog.defaults());
        assert!(opts.trap_focus && opts.body_scroll_lock && opts.close_on_outside_click);
        assert!(!opts.hoist);
    }

    #[test]
    fn overrides_beat_preset() {
        let opts = resolve(
            Element::new("toggle-element")
                .attr("preset", "dialog")
                .attr("body-scroll-lock", "false")
                .attr("hoist", "")
                .attr("trap-focus", "0"),
        )
        .unwrap();
        assert!(!opts.body_scroll_lock);
        assert!(!opts.trap_focus);
        assert!(opts.hoist);
        assert!(opts.close_on_escape);
    }

    #[test]
    fn open_event_accepts_keys_and_wire_names() {
        let opts = resolve(Element::new("toggle-element").attr("open-event", "cartAdded")).unwrap();
        assert_eq!(opts.open_event, Some(Topic::CartAdded));
        let opts =
            resolve(Element::new("toggle-element").attr("open-event", "cart-updated")).unwrap();
        assert_eq!(opts.open_event, Some(Topic::CartUpdated));
        let opts = resolve(Element::new("toggle-element").attr("open-event", "")).unwrap();
        assert_eq!(opts.open_event, None);
    }

    #[test]
    fn unknown_values_are_errors() {
        assert_eq!(
            resolve(Element::new("toggle-element").attr("preset", "sheet")),
            Err(Error::UnknownPreset("sheet".into()))
        );
        assert!(matches!(
            resolve(Element::new("toggle-element").attr("open-event", "cart-emptied")),
            Err(Error::UnknownTopic(_))
        ));
    }
}
