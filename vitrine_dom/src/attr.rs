// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute value coercion.
//!
//! Markup carries every setting as text. [`AttrValue::parse`] coerces it into a
//! boolean, a number, or leaves it as text:
//!
//! - `""` and `"true"` (any case) are `Bool(true)`; `"false"` is `Bool(false)`.
//! - Text that parses as a finite or infinite `f64` is a `Number`.
//! - Anything else is `Text`.

use alloc::string::{String, ToString};

/// A coerced attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Boolean attribute (`""`, `"true"`, `"false"`).
    Bool(bool),
    /// Numeric attribute.
    Number(f64),
    /// Any other text.
    Text(String),
}

impl AttrValue {
    /// Coerce raw attribute text.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.is_empty() || lower == "true" {
            return Self::Bool(true);
        }
        if lower == "false" {
            return Self::Bool(false);
        }
        let trimmed = raw.trim();
        if !trimmed.is_empty()
            && let Ok(n) = trimmed.parse::<f64>()
            && !n.is_nan()
        {
            return Self::Number(n);
        }
        Self::Text(raw.to_string())
    }

    /// Truthiness as a script host would judge it.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// The value as text, when it was not coerced to a boolean.
    ///
    /// Numbers render through `f64`'s `Display`, so `"42"` round-trips as `"42"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(_) => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans() {
        assert_eq!(AttrValue::parse(""), AttrValue::Bool(true));
        assert_eq!(AttrValue::parse("TRUE"), AttrValue::Bool(true));
        assert_eq!(AttrValue::parse("false"), AttrValue::Bool(false));
    }

    #[test]
    fn numbers_and_text() {
        assert_eq!(AttrValue::parse("42"), AttrValue::Number(42.0));
        assert_eq!(AttrValue::parse(" 1.5 "), AttrValue::Number(1.5));
        assert_eq!(AttrValue::parse("dialog"), AttrValue::Text("dialog".into()));
        assert_eq!(AttrValue::parse("NaN"), AttrValue::Text("NaN".into()));
    }

    #[test]
    fn truthiness() {
        assert!(AttrValue::Bool(true).truthy());
        assert!(!AttrValue::Number(0.0).truthy());
        assert!(AttrValue::Number(-1.0).truthy());
        assert!(AttrValue::Text("medium".into()).truthy());
    }

    #[test]
    fn text_rendering() {
        assert_eq!(AttrValue::parse("42").as_text().as_deref(), Some("42"));
        assert_eq!(AttrValue::parse("medium").as_text().as_deref(), Some("medium"));
        assert_eq!(AttrValue::parse("true").as_text(), None);
    }
}
