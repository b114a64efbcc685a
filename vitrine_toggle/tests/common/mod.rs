// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use vitrine_channel::{Subscription, Topic};
use vitrine_dom::{Document, Element, NodeId};
use vitrine_responder::types::{ListenerOptions, Outcome};
use vitrine_toggle::{EventKind, Page, PageConfig};

/// Route `tracing` output to the test harness. `RUST_LOG=vitrine_toggle=debug` shows state changes.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A page over `doc` with the default settings.
pub fn page(doc: Document) -> Rc<Page> {
    page_at(doc, 1280.0)
}

/// A page over `doc` with the viewport `width` px wide.
pub fn page_at(doc: Document, width: f64) -> Rc<Page> {
    init_tracing();
    Page::new(
        doc,
        PageConfig {
            viewport_width: width,
            ..PageConfig::default()
        },
    )
}

/// A `toggle-element` with the given id.
pub fn toggle(id: &str) -> Element {
    Element::new("toggle-element").id(id)
}

/// Mark `element` as `<tag>.<name>` ref of its enclosing `tag`.
pub fn with_ref(element: Element, tag: &str, name: &str) -> Element {
    element.attr("data-ref", &format!("{tag}.{name}"))
}

/// Ids carried by every message on `topic`, in publish order.
pub fn record_topic(page: &Page, topic: Topic) -> (Rc<RefCell<Vec<String>>>, Subscription) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let sub = page.channel().subscribe(topic, move |msg| {
        let id = msg.target().map(|t| t.id.clone()).unwrap_or_default();
        sink.borrow_mut().push(id);
    });
    (log, sub)
}

/// Record `label` each time `kind` is delivered to `node`.
pub fn record_event(
    page: &Page,
    kind: EventKind,
    nodes: &[(NodeId, &'static str)],
) -> Rc<RefCell<Vec<&'static str>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for &(node, label) in nodes {
        let sink = log.clone();
        page.listen(kind, node, ListenerOptions::BUBBLE, move |ev| {
            if ev.target == node {
                sink.borrow_mut().push(label);
            }
            Outcome::Continue
        });
    }
    log
}
