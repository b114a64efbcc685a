// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised while connecting elements.

use vitrine_channel::ParseTopicError;
use vitrine_dom::NodeId;

use crate::breakpoints::ParseBreakpointError;

/// An element could not be connected.
///
/// Lifecycle operations never fail; only construction does.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required attribute is absent.
    #[error("Required attribute \"{attribute}\" not found on element {tag}")]
    MissingAttribute {
        /// Attribute name.
        attribute: &'static str,
        /// Tag of the element being connected.
        tag: String,
    },
    /// A required ref (or structural child) is absent.
    #[error("Required ref \"{name}\" not found in element {tag}")]
    MissingRef {
        /// Ref name.
        name: &'static str,
        /// Tag of the element being connected.
        tag: String,
    },
    /// The `preset` attribute names no known preset.
    #[error("unknown preset \"{0}\"")]
    UnknownPreset(String),
    /// The `until-breakpoint` attribute names no known breakpoint.
    #[error(transparent)]
    UnknownBreakpoint(#[from] ParseBreakpointError),
    /// The `open-event` attribute names no known topic.
    #[error(transparent)]
    UnknownTopic(#[from] ParseTopicError),
    /// The element is not attached to the page's document.
    #[error("element {0:?} is not attached to the document")]
    Detached(NodeId),
}
