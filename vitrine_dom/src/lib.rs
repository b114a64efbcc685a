// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vitrine DOM: a headless element tree for driving interactive widgets.
//!
//! Vitrine DOM is the host model the rest of the workspace runs against.
//!
//! - Represents a hierarchy of elements with tags, attributes, classes, and inline style.
//! - Tracks which element holds focus.
//! - Resolves named refs and coerces attribute text into typed values.
//! - Hit tests page-space points against element bounds.
//!
//! ## Where this fits
//!
//! - Document (this crate): structure, attributes, focus bookkeeping, geometry.
//! - Responder (`vitrine_responder`): capture → target → bubble routing and listener dispatch.
//! - Toggle (`vitrine_toggle`): the widget state machine and the page event loop.
//!
//! ## Not a browser
//!
//! There is no layout, no CSS cascade, and no script host. Upstream code supplies bounds,
//! visibility flags, and computed transition timing directly on each [`Element`].
//!
//! ## API overview
//!
//! - [`Document`]: container managing elements.
//! - [`Element`]: per-element data (tag, attributes, classes, style, bounds, flags, transition).
//! - [`ElementFlags`]: layout presence, visibility, and picking.
//! - [`NodeId`]: generational handle of an element.
//! - [`Refs`]: named descendants from `data-ref` attributes.
//! - [`AttrValue`]: coerced attribute values.
//!
//! ### Minimal usage
//!
//! ```
//! use vitrine_dom::{Document, Element};
//! use kurbo::{Point, Rect};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//!
//! let drawer = doc.insert(
//!     Some(root),
//!     Element::new("toggle-element")
//!         .id("cart-drawer")
//!         .attr("preset", "dialog")
//!         .bounds(Rect::new(0.0, 0.0, 320.0, 800.0)),
//! );
//! let close = doc.insert(
//!     Some(drawer),
//!     Element::new("button")
//!         .attr("data-ref", "toggle-element.close")
//!         .bounds(Rect::new(280.0, 0.0, 320.0, 40.0)),
//! );
//!
//! assert_eq!(doc.element_by_id("cart-drawer"), Some(drawer));
//! assert_eq!(doc.refs(drawer).all("close"), &[close]);
//! assert_eq!(doc.hit_test_point(Point::new(300.0, 20.0)).node, close);
//! assert_eq!(doc.hit_test_point(Point::new(900.0, 20.0)).node, root);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attr;
mod tree;
mod types;

pub use attr::AttrValue;
pub use tree::{Document, REF_ATTRIBUTE, ROOT_TAG};
pub use types::{Element, ElementFlags, Hit, NodeId, Refs, Transition};
