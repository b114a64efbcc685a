// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, element data, and refs.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

/// Identifier for an element in the [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still
/// refers to a live element. Stale ids never alias a different live element because the
/// generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling layout presence, visibility, and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element takes part in layout (the equivalent of having an offset parent).
        const RENDERED = 0b0000_0001;
        /// Element is visible (not `visibility: hidden`).
        const VISIBLE  = 0b0000_0010;
        /// Element is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0100;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::RENDERED | Self::VISIBLE | Self::PICKABLE
    }
}

/// Computed transition timing for an element, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    /// Computed `transition-duration`.
    pub duration_ms: f64,
    /// Computed `transition-delay`.
    pub delay_ms: f64,
}

impl Transition {
    /// A transition with the given duration and no delay.
    pub const fn duration(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
        }
    }

    /// Whether waiting for a `transitionend` signal is required.
    ///
    /// The duration decides; the delay is only consulted when the duration is zero.
    pub fn is_timed(&self) -> bool {
        let effective = if self.duration_ms != 0.0 {
            self.duration_ms
        } else {
            self.delay_ms
        };
        effective > 0.0
    }
}

/// Element data: tag, attributes, classes, inline style, and geometry.
#[derive(Clone, Debug)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in name order.
    pub attributes: BTreeMap<String, String>,
    /// Class list.
    pub classes: BTreeSet<String>,
    /// Inline style properties.
    pub style: BTreeMap<String, String>,
    /// Page-space bounds used for hit testing.
    pub bounds: Rect,
    /// Paint order hint. Higher is on top.
    pub z_index: i32,
    /// Layout, visibility, and picking flags.
    ///
    /// See [`ElementFlags`] for available bits.
    pub flags: ElementFlags,
    /// Computed transition timing.
    pub transition: Transition,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            style: BTreeMap::new(),
            bounds: Rect::ZERO,
            z_index: 0,
            flags: ElementFlags::default(),
            transition: Transition::default(),
        }
    }
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Set page-space bounds.
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the paint order hint.
    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Replace the flags.
    pub fn flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the computed transition timing.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

/// Named descendants of an element, resolved from `data-ref="<tag>.<name>"` attributes.
///
/// Produced by [`Document::refs`](crate::Document::refs).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Refs {
    pub(crate) entries: BTreeMap<String, Vec<NodeId>>,
}

impl Refs {
    /// First element registered under `name`, in document order.
    pub fn first(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).and_then(|all| all.first().copied())
    }

    /// Every element registered under `name`, in document order.
    pub fn all(&self, name: &str) -> &[NodeId] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any element is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether no refs were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched element.
    pub node: NodeId,
    /// Path from root to element (inclusive).
    pub path: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_timing_rules() {
        assert!(!Transition::default().is_timed());
        assert!(Transition::duration(200.0).is_timed());
        let delayed = Transition {
            duration_ms: 0.0,
            delay_ms: 50.0,
        };
        assert!(delayed.is_timed());
        // A non-zero duration decides on its own, even when the delay is positive.
        let negative = Transition {
            duration_ms: -10.0,
            delay_ms: 50.0,
        };
        assert!(!negative.is_timed());
    }

    #[test]
    fn element_builder_lowercases_tag() {
        let el = Element::new("Toggle-Element").id("drawer").class("is-open");
        assert_eq!(el.tag, "toggle-element");
        assert_eq!(el.attributes.get("id").map(String::as_str), Some("drawer"));
        assert!(el.classes.contains("is-open"));
        assert_eq!(el.flags, ElementFlags::default());
    }
}
