// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close ordering, idempotence, scroll locking, and breakpoint-bound mounting.

mod common;

use common::{page, page_at, record_event, record_topic, toggle, with_ref};
use vitrine_channel::{Message, ToggleTarget, Topic};
use vitrine_dom::{Document, Element, Transition};
use vitrine_toggle::widget::{OPEN_CLASS, TRANSITIONING_CLASS};
use vitrine_toggle::{EventKind, ToggleState};

#[test]
fn opening_a_child_opens_its_parent_first() {
    let mut doc = Document::new();
    let root = doc.root();
    let menu = doc.insert(Some(root), toggle("menu"));
    let submenu = doc.insert(Some(menu), toggle("submenu"));
    let page = page(doc);
    page.connect_all().unwrap();
    let (opened, _sub) = record_topic(&page, Topic::ToggleElementOpening);

    let child = page.widget(submenu).unwrap();
    assert!(page.drive(child.open()));

    assert_eq!(page.widget(menu).unwrap().state(), ToggleState::Open);
    assert_eq!(child.state(), ToggleState::Open);
    assert_eq!(*opened.borrow(), ["menu", "submenu"]);
    // The parent's broadcast did not dismiss the child that was waiting on it.
    assert_eq!(child.parent().unwrap().id(), "menu");
}

#[test]
fn closing_closes_open_descendants_first() {
    let mut doc = Document::new();
    let root = doc.root();
    let menu = doc.insert(Some(root), toggle("menu"));
    let submenu = doc.insert(Some(menu), toggle("submenu"));
    let leaf = doc.insert(Some(submenu), toggle("leaf"));
    let page = page(doc);
    page.connect_all().unwrap();
    let closed = record_event(
        &page,
        EventKind::Close,
        &[(menu, "menu"), (submenu, "submenu"), (leaf, "leaf")],
    );

    assert!(page.drive(page.widget(leaf).unwrap().open()));
    assert!(page.drive(page.widget(menu).unwrap().close()));

    for node in [menu, submenu, leaf] {
        assert_eq!(page.widget(node).unwrap().state(), ToggleState::Closed);
        assert!(!page.document().has_class(node, OPEN_CLASS));
    }
    assert_eq!(*closed.borrow(), ["leaf", "submenu", "menu"]);
}

#[test]
fn open_twice_runs_one_transition() {
    let mut doc = Document::new();
    let root = doc.root();
    let drawer = doc.insert(
        Some(root),
        toggle("drawer").transition(Transition::duration(250.0)),
    );
    let page = page(doc);
    page.connect_all().unwrap();
    let (opened, _sub) = record_topic(&page, Topic::ToggleElementOpening);
    let open_events = record_event(&page, EventKind::Open, &[(drawer, "drawer")]);

    let widget = page.widget(drawer).unwrap();
    page.spawn(widget.open());
    page.spawn(widget.open());
    page.channel()
        .publish(&Message::Open(ToggleTarget::new("drawer")));
    page.settle();
    assert_eq!(widget.state(), ToggleState::Opening);
    assert!(page.document().has_class(drawer, TRANSITIONING_CLASS));
    assert_eq!(page.listener_count(drawer, EventKind::TransitionEnd), 1);

    page.end_transition(drawer);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Open);
    assert!(!page.document().has_class(drawer, TRANSITIONING_CLASS));
    assert_eq!(*opened.borrow(), ["drawer"]);
    assert_eq!(*open_events.borrow(), ["drawer"]);

    // Open again once settled: still a no-op.
    assert!(page.drive(widget.open()));
    assert_eq!(opened.borrow().len(), 1);
}

#[test]
fn close_during_opening_runs_once_open() {
    let mut doc = Document::new();
    let root = doc.root();
    let drawer = doc.insert(
        Some(root),
        toggle("drawer").transition(Transition::duration(250.0)),
    );
    let page = page(doc);
    page.connect_all().unwrap();
    let widget = page.widget(drawer).unwrap();

    page.spawn(widget.open());
    page.settle();
    page.channel()
        .publish(&Message::Close(ToggleTarget::new("drawer")));
    page.settle();
    assert_eq!(widget.state(), ToggleState::Opening);

    page.end_transition(drawer);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Closing);
    assert!(!page.document().has_class(drawer, OPEN_CLASS));

    page.end_transition(drawer);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Closed);
}

#[test]
fn opening_a_child_while_its_parent_closes_reopens_the_parent() {
    let mut doc = Document::new();
    let root = doc.root();
    let outer = doc.insert(Some(root), toggle("outer"));
    let a = doc.insert(
        Some(outer),
        toggle("a").transition(Transition::duration(200.0)),
    );
    let b = doc.insert(Some(outer), toggle("b"));
    let page = page(doc);
    page.connect_all().unwrap();
    let (outer_w, a_w, b_w) = (
        page.widget(outer).unwrap(),
        page.widget(a).unwrap(),
        page.widget(b).unwrap(),
    );

    page.spawn(a_w.open());
    page.settle();
    page.end_transition(a);
    page.settle();
    assert_eq!(a_w.state(), ToggleState::Open);

    // The outer close is parked on `a` when `b` asks to open.
    page.channel()
        .publish(&Message::Close(ToggleTarget::new("outer")));
    page.settle();
    page.channel()
        .publish(&Message::Open(ToggleTarget::new("b")));
    page.settle();
    assert_eq!(outer_w.state(), ToggleState::Closing);
    assert_eq!(b_w.state(), ToggleState::Opening);

    page.end_transition(a);
    page.settle();
    assert_eq!(a_w.state(), ToggleState::Closed);
    assert_eq!(outer_w.state(), ToggleState::Open);
    assert_eq!(b_w.state(), ToggleState::Open);

    for id in ["outer", "b"] {
        page.channel().publish(&Message::Close(ToggleTarget::new(id)));
    }
    page.settle();
    for w in [&outer_w, &a_w, &b_w] {
        assert_eq!(w.state(), ToggleState::Closed);
    }
}

#[test]
fn scroll_lock_is_released_by_the_last_holder() {
    let mut doc = Document::new();
    let root = doc.root();
    let outer = doc.insert(Some(root), toggle("outer").attr("body-scroll-lock", ""));
    let inner = doc.insert(Some(outer), toggle("inner").attr("body-scroll-lock", ""));
    let page = page(doc);
    page.connect_all().unwrap();
    let overflow = || {
        page.document()
            .style_property(root, "overflow")
            .map(str::to_owned)
    };

    assert!(page.drive(page.widget(inner).unwrap().open()));
    assert_eq!(overflow().as_deref(), Some("hidden"));

    assert!(page.drive(page.widget(inner).unwrap().close()));
    assert_eq!(page.widget(outer).unwrap().state(), ToggleState::Open);
    assert_eq!(overflow().as_deref(), Some("hidden"));

    assert!(page.drive(page.widget(outer).unwrap().close()));
    assert_eq!(overflow(), None);
}

#[test]
fn breakpoint_bound_widgets_follow_the_viewport() {
    let mut doc = Document::new();
    let root = doc.root();
    let menu = doc.insert(
        Some(root),
        toggle("mobile-menu")
            .attr("until-breakpoint", "medium")
            .attr("set-tabindex", ""),
    );
    let page = page_at(doc, 1024.0);
    page.connect_all().unwrap();
    let widget = page.widget(menu).unwrap();
    assert_eq!(widget.state(), ToggleState::Unmounted);
    assert!(!page.document().has_attribute(menu, "aria-hidden"));

    // Unmounted widgets ignore commands.
    page.channel()
        .publish(&Message::Open(ToggleTarget::new("mobile-menu")));
    page.settle();
    assert_eq!(widget.state(), ToggleState::Unmounted);

    page.resize(767.5);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Closed);
    assert_eq!(page.document().attribute(menu, "aria-hidden"), Some("true"));

    assert!(page.drive(widget.open()));
    page.resize(700.0);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Open);

    page.resize(768.0);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Unmounted);
    assert!(!page.document().has_class(menu, OPEN_CLASS));
    assert!(!page.document().has_attribute(menu, "aria-hidden"));
    assert!(!page.document().has_attribute(menu, "tabindex"));
}

#[test]
fn mounting_cancels_a_pending_destroy() {
    let mut doc = Document::new();
    let root = doc.root();
    let drawer = doc.insert(
        Some(root),
        toggle("drawer")
            .attr("until-breakpoint", "large")
            .transition(Transition::duration(300.0)),
    );
    let page = page_at(doc, 800.0);
    page.connect_all().unwrap();
    let widget = page.widget(drawer).unwrap();

    page.spawn(widget.open());
    page.settle();
    page.end_transition(drawer);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Open);

    // Growing past the breakpoint starts a destroy, which has to close first.
    page.resize(1200.0);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Closing);

    // Shrinking back before the close finishes keeps the widget mounted.
    page.resize(800.0);
    page.end_transition(drawer);
    page.settle();
    assert_eq!(widget.state(), ToggleState::Closed);
    assert!(widget.is_mounted());
}

#[test]
fn destroying_a_closed_widget_is_immediate() {
    let mut doc = Document::new();
    let root = doc.root();
    let drawer = doc.insert(Some(root), toggle("drawer"));
    let page = page(doc);
    page.connect_all().unwrap();
    let widget = page.widget(drawer).unwrap();

    let done = widget.destroy();
    assert_eq!(widget.state(), ToggleState::Unmounted);
    assert!(page.drive(done));
    widget.mount();
    widget.mount();
    assert_eq!(widget.state(), ToggleState::Closed);
}

#[test]
fn nested_close_finishes_inner_before_outer_leaves_closing() {
    let mut doc = Document::new();
    let root = doc.root();
    let outer = doc.insert(Some(root), toggle("outer"));
    let panel = doc.insert(
        Some(outer),
        with_ref(Element::new("div"), "toggle-element", "dialog")
            .transition(Transition::duration(400.0)),
    );
    let inner = doc.insert(
        Some(panel),
        toggle("inner").transition(Transition::duration(200.0)),
    );
    let page = page(doc);
    page.connect_all().unwrap();
    let outer_w = page.widget(outer).unwrap();
    let inner_w = page.widget(inner).unwrap();
    assert_eq!(outer_w.surface(), panel);
    assert_eq!(inner_w.surface(), inner);

    page.spawn(inner_w.open());
    page.settle();
    assert_eq!(outer_w.state(), ToggleState::Opening);
    assert_eq!(inner_w.state(), ToggleState::Opening);
    page.end_transition(panel);
    page.settle();
    assert_eq!(outer_w.state(), ToggleState::Open);
    page.end_transition(inner);
    page.settle();
    assert_eq!(inner_w.state(), ToggleState::Open);

    let closed = record_event(&page, EventKind::Close, &[(outer, "outer"), (inner, "inner")]);
    page.channel()
        .publish(&Message::Close(ToggleTarget::new("outer")));
    page.settle();
    assert_eq!(outer_w.state(), ToggleState::Closing);
    assert_eq!(inner_w.state(), ToggleState::Closing);
    // The outer surface has not started its own transition yet.
    assert!(page.document().has_class(outer, OPEN_CLASS));
    assert!(!page.document().has_class(outer, TRANSITIONING_CLASS));

    page.end_transition(inner);
    page.settle();
    assert_eq!(inner_w.state(), ToggleState::Closed);
    assert_eq!(outer_w.state(), ToggleState::Closing);
    assert!(page.document().has_class(outer, TRANSITIONING_CLASS));

    page.end_transition(panel);
    page.settle();
    assert_eq!(outer_w.state(), ToggleState::Closed);
    assert_eq!(*closed.borrow(), ["inner", "outer"]);
}

#[test]
fn removing_an_open_widget_releases_the_page() {
    let mut doc = Document::new();
    let root = doc.root();
    let drawer = doc.insert(Some(root), toggle("drawer").attr("preset", "dialog"));
    let page = page(doc);
    page.connect_all().unwrap();
    let widget = page.widget(drawer).unwrap();
    assert!(page.drive(widget.open()));
    assert_eq!(
        page.document().style_property(root, "overflow"),
        Some("hidden")
    );

    page.remove(drawer);
    page.settle();
    assert!(page.widget(drawer).is_none());
    assert_eq!(widget.state(), ToggleState::Unmounted);
    assert_eq!(page.document().style_property(root, "overflow"), None);
    assert_eq!(page.channel().subscriber_count(Topic::ToggleElementOpen), 0);
    assert!(!widget.has_outside_click_listener());
    assert!(!widget.has_focus_trap());
}
