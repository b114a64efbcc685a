// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of channel topics.

use core::fmt;
use core::str::FromStr;

/// A channel topic.
///
/// Wire names are kebab-case (`toggle-element-open`). Markup may also refer to topics by their
/// camelCase keys (`cartAdded`), which [`FromStr`] accepts too.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Topic {
    /// Open the widget with the payload id.
    ToggleElementOpen,
    /// Close the widget with the payload id.
    ToggleElementClose,
    /// Toggle the widget with the payload id.
    ToggleElementToggle,
    /// A widget finished opening.
    ToggleElementOpening,
    /// The Escape key was released.
    EscapeKey,
    /// The cart contents changed.
    CartUpdated,
    /// An item was added to the cart.
    CartAdded,
    /// Fresh section markup is available.
    SectionUpdate,
}

impl Topic {
    /// Every topic, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ToggleElementOpen,
        Self::ToggleElementClose,
        Self::ToggleElementToggle,
        Self::ToggleElementOpening,
        Self::EscapeKey,
        Self::CartUpdated,
        Self::CartAdded,
        Self::SectionUpdate,
    ];

    /// Kebab-case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleElementOpen => "toggle-element-open",
            Self::ToggleElementClose => "toggle-element-close",
            Self::ToggleElementToggle => "toggle-element-toggle",
            Self::ToggleElementOpening => "toggle-element-opening",
            Self::EscapeKey => "escape-key",
            Self::CartUpdated => "cart-updated",
            Self::CartAdded => "cart-added",
            Self::SectionUpdate => "section-update",
        }
    }

    /// camelCase key used by markup.
    pub const fn key(self) -> &'static str {
        match self {
            Self::ToggleElementOpen => "toggleElementOpen",
            Self::ToggleElementClose => "toggleElementClose",
            Self::ToggleElementToggle => "toggleElementToggle",
            Self::ToggleElementOpening => "toggleElementOpening",
            Self::EscapeKey => "escapeKey",
            Self::CartUpdated => "cartUpdated",
            Self::CartAdded => "cartAdded",
            Self::SectionUpdate => "sectionUpdate",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text names no known topic.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown topic \"{0}\"")]
pub struct ParseTopicError(pub String);

impl FromStr for Topic {
    type Err = ParseTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.key() == s)
            .ok_or_else(|| ParseTopicError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_keys() {
        assert_eq!("cart-added".parse(), Ok(Topic::CartAdded));
        assert_eq!("cartAdded".parse(), Ok(Topic::CartAdded));
        assert_eq!(" escape-key ".parse(), Ok(Topic::EscapeKey));
        assert_eq!(
            "cart_added".parse::<Topic>(),
            Err(ParseTopicError("cart_added".into()))
        );
    }

    #[test]
    fn display_is_the_wire_name() {
        for t in Topic::ALL {
            assert_eq!(t.to_string().parse::<Topic>(), Ok(t));
        }
        assert_eq!(
            ParseTopicError("nope".into()).to_string(),
            "unknown topic \"nope\""
        );
    }
}
