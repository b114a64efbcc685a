// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responsive drawer.
//!
//! A navigation drawer that only exists below the `large` breakpoint. Resizing across the
//! threshold mounts and destroys it; an open drawer is closed before it unmounts.
//!
//! Run:
//! - `cargo run -p vitrine_demos --example responsive_drawer`

use tracing::info;
use tracing_subscriber::EnvFilter;
use vitrine_dom::{Document, Element};
use vitrine_toggle::{Breakpoint, Page, PageConfig};

fn main() -> Result<(), vitrine_toggle::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut doc = Document::new();
    let root = doc.root();
    let nav = doc.insert(
        Some(root),
        Element::new("toggle-element")
            .id("mobile-nav")
            .attr("until-breakpoint", "large")
            .attr("set-tabindex", ""),
    );
    doc.insert(Some(nav), Element::new("a").attr("href", "/collections"));

    let page = Page::new(
        doc,
        PageConfig {
            viewport_width: 1440.0,
            ..PageConfig::default()
        },
    );
    page.connect_all()?;
    let Some(drawer) = page.widget(nav) else {
        return Ok(());
    };

    for width in [1440.0, 900.0, 1023.0, 1024.0, 600.0] {
        page.resize(width);
        page.settle();
        if drawer.is_mounted() {
            page.drive(drawer.open());
        }
        info!(
            width,
            below_large = page.viewport().is_below(Breakpoint::Large),
            state = ?drawer.state(),
            aria_hidden = ?page.document().attribute(nav, "aria-hidden"),
            "resized"
        );
    }

    Ok(())
}
