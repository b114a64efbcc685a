// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport breakpoints.
//!
//! The table is fixed and ordered: `small` 576, `medium` 768, `large` 1024, `xlarge` 1328 (px).
//! [`Viewport`] answers its predicates at call time; nothing is cached and no events are raised.
//!
//! `is_below(bp)` is the exact complement of `is_at_least(bp)`, so every width, fractional
//! ones included, satisfies exactly one of the pair.

use core::cell::Cell;
use core::fmt;
use core::str::FromStr;

/// A named breakpoint.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Breakpoint {
    /// `small`.
    Small,
    /// `medium`.
    Medium,
    /// `large`.
    Large,
    /// `xlarge`.
    XLarge,
}

impl Breakpoint {
    /// Every breakpoint, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::XLarge];

    /// Name as written in markup.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::XLarge => "xlarge",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text names no known breakpoint.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown breakpoint \"{0}\"")]
pub struct ParseBreakpointError(pub String);

impl FromStr for Breakpoint {
    type Err = ParseBreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ParseBreakpointError(s.to_owned()))
    }
}

/// Pixel thresholds for each breakpoint.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoints {
    /// `small` threshold.
    pub small: u32,
    /// `medium` threshold.
    pub medium: u32,
    /// `large` threshold.
    pub large: u32,
    /// `xlarge` threshold.
    pub xlarge: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            small: 576,
            medium: 768,
            large: 1024,
            xlarge: 1328,
        }
    }
}

impl Breakpoints {
    /// Threshold for `bp`, in px.
    pub const fn px(&self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Small => self.small,
            Breakpoint::Medium => self.medium,
            Breakpoint::Large => self.large,
            Breakpoint::XLarge => self.xlarge,
        }
    }
}

/// The page viewport.
#[derive(Debug)]
pub struct Viewport {
    width: Cell<f64>,
    breakpoints: Breakpoints,
}

impl Viewport {
    /// A viewport of `width` px using `breakpoints`.
    pub fn new(width: f64, breakpoints: Breakpoints) -> Self {
        Self {
            width: Cell::new(width),
            breakpoints,
        }
    }

    /// Current width in px.
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    /// Record a new width.
    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }

    /// The threshold table.
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// `width >= threshold(bp)`.
    pub fn is_at_least(&self, bp: Breakpoint) -> bool {
        self.width() >= f64::from(self.breakpoints.px(bp))
    }

    /// `width < threshold(bp)`.
    pub fn is_below(&self, bp: Breakpoint) -> bool {
        self.width() < f64::from(self.breakpoints.px(bp))
    }
}
