// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cart drawer.
//!
//! A dialog-preset drawer opened by a header button, dismissed by a click outside its panel,
//! and reopened when an item is added to the cart.
//!
//! Run:
//! - `cargo run -p vitrine_demos --example cart_drawer`
//! - `RUST_LOG=vitrine_toggle=debug cargo run -p vitrine_demos --example cart_drawer`

use kurbo::{Point, Rect};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vitrine_channel::Message;
use vitrine_dom::{Document, Element};
use vitrine_toggle::{Page, PageConfig};

fn main() -> Result<(), vitrine_toggle::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut doc = Document::new();
    let root = doc.root();
    if let Some(body) = doc.element_mut(root) {
        body.bounds = Rect::new(0.0, 0.0, 1280.0, 800.0);
    }
    let header = doc.insert(Some(root), Element::new("header"));
    let control = doc.insert(
        Some(header),
        Element::new("toggle-element-button").attr("toggle-id", "cart-drawer"),
    );
    let cart_button = doc.insert(Some(control), Element::new("button"));
    let drawer = doc.insert(
        Some(root),
        Element::new("toggle-element")
            .id("cart-drawer")
            .attr("preset", "dialog")
            .attr("open-event", "cartAdded"),
    );
    let panel = doc.insert(
        Some(drawer),
        Element::new("div")
            .attr("data-ref", "toggle-element.dialog")
            .bounds(Rect::new(880.0, 0.0, 1280.0, 800.0)),
    );
    doc.insert(Some(panel), Element::new("a").attr("href", "/cart"));
    doc.insert(Some(panel), Element::new("button").attr("name", "checkout"));

    let page = Page::new(doc, PageConfig::default());
    let connected = page.connect_all()?;
    let widget = &connected.widgets[0];

    let report = |step: &str| {
        let doc = page.document();
        info!(
            state = ?widget.state(),
            overflow = ?doc.style_property(root, "overflow"),
            aria_hidden = ?doc.attribute(drawer, "aria-hidden"),
            focus = ?doc.active_element(),
            "{step}"
        );
    };
    report("connected");

    page.click(cart_button);
    page.settle();
    report("header button clicked");

    page.click_at(Point::new(1000.0, 400.0));
    page.settle();
    report("clicked inside panel");

    page.click_at(Point::new(200.0, 400.0));
    page.settle();
    report("clicked outside");

    page.channel().publish(&Message::CartAdded);
    page.settle();
    report("item added to cart");

    Ok(())
}
