// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vitrine Toggle: the storefront toggle-widget state machine.
//!
//! ## Overview
//!
//! Dialogs, drawers, menus, and popovers in a storefront theme share one component model, the
//! [`ToggleElement`]. Each widget owns its open/closed/transitioning state, mounts and
//! unmounts with the viewport, and coordinates with its neighbours through the page's
//! [`Channel`](vitrine_channel::Channel) instead of through a central orchestrator:
//!
//! - [`ToggleControl`] buttons publish open/close/toggle commands addressed by widget id.
//! - A widget that finishes opening announces it; every other widget that is neither the
//!   opener nor contains it closes in response.
//! - Escape, clicks outside the dialog surface, and theme editor selection feed the same
//!   state machine.
//!
//! While open, a widget can lock body scrolling, trap focus with a [`FocusTrap`], and keep
//! `tabindex`/`aria-hidden` in step with its state.
//!
//! ## Runtime
//!
//! Everything runs on a [`Page`]: one logical event loop that owns the document, the listener
//! registry, the frame [`Scheduler`], the channel, and the [`Viewport`]. Lifecycle operations
//! return futures; the page's executor drives them and [`Page::settle`] runs until nothing can
//! progress without an external signal such as [`Page::end_transition`].
//!
//! ```
//! use vitrine_dom::{Document, Element};
//! use vitrine_toggle::{Page, PageConfig, ToggleState};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let drawer = doc.insert(
//!     Some(root),
//!     Element::new("toggle-element").id("cart-drawer").attr("preset", "dialog"),
//! );
//! let control = doc.insert(
//!     Some(root),
//!     Element::new("toggle-element-button").attr("toggle-id", "cart-drawer"),
//! );
//! let button = doc.insert(Some(control), Element::new("button"));
//!
//! let page = Page::new(doc, PageConfig::default());
//! let connected = page.connect_all().unwrap();
//! let widget = &connected.widgets[0];
//! assert_eq!(widget.state(), ToggleState::Closed);
//!
//! page.click(button);
//! page.settle();
//! assert_eq!(widget.state(), ToggleState::Open);
//! assert_eq!(page.document().style_property(root, "overflow"), Some("hidden"));
//! assert_eq!(page.active_element(), Some(drawer));
//! ```

pub mod breakpoints;
pub mod control;
pub mod error;
pub mod event;
pub mod focus_trap;
pub mod options;
pub mod page;
pub mod scheduler;
pub mod widget;

pub use breakpoints::{Breakpoint, Breakpoints, ParseBreakpointError, Viewport};
pub use control::{ToggleAction, ToggleControl};
pub use error::Error;
pub use event::{DomEvent, EditorEvent, EventKind, Key};
pub use focus_trap::FocusTrap;
pub use options::{Preset, ToggleOptions};
pub use page::{Connected, Page, PageConfig};
pub use scheduler::Scheduler;
pub use widget::{ToggleElement, ToggleState};
