// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested menus.
//!
//! Opening a submenu opens its menu first; closing the menu closes the submenu first. Both
//! surfaces have timed transitions, so the demo reports `transitionend` by hand and logs
//! each state on the way.
//!
//! Run:
//! - `cargo run -p vitrine_demos --example nested_menus`

use tracing::info;
use tracing_subscriber::EnvFilter;
use vitrine_channel::{Message, ToggleTarget};
use vitrine_dom::{Document, Element, Transition};
use vitrine_toggle::{Page, PageConfig};

fn main() -> Result<(), vitrine_toggle::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut doc = Document::new();
    let root = doc.root();
    let menu = doc.insert(
        Some(root),
        Element::new("toggle-element")
            .id("menu")
            .transition(Transition::duration(300.0)),
    );
    let submenu = doc.insert(
        Some(menu),
        Element::new("toggle-element")
            .id("menu-shop")
            .transition(Transition::duration(150.0)),
    );

    let page = Page::new(doc, PageConfig::default());
    page.connect_all()?;
    let (Some(outer), Some(inner)) = (page.widget(menu), page.widget(submenu)) else {
        return Ok(());
    };
    let report = |step: &str| {
        info!(menu = ?outer.state(), menu_shop = ?inner.state(), "{step}");
    };

    page.channel()
        .publish(&Message::Open(ToggleTarget::new("menu-shop")));
    page.settle();
    report("open menu-shop requested");
    page.end_transition(menu);
    page.settle();
    report("menu transition ended");
    page.end_transition(submenu);
    page.settle();
    report("menu-shop transition ended");

    page.channel()
        .publish(&Message::Close(ToggleTarget::new("menu")));
    page.settle();
    report("close menu requested");
    page.end_transition(submenu);
    page.settle();
    report("menu-shop transition ended");
    page.end_transition(menu);
    page.settle();
    report("menu transition ended");

    Ok(())
}
