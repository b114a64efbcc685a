// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The toggle widget state machine.
//!
//! ```text
//! Unmounted --mount--> Closed --open--> Opening --transitionend--> Open
//!     ^                  ^                                          |
//!     |                  +------ transitionend <-- Closing <--close-+
//!     +--------------------------- destroy (closes first) ----------+
//! ```
//!
//! `Opening` and `Closing` gate every side effect until the dialog surface reports the end of
//! its transition. Calls that arrive in the wrong state are ignored, so the state field is the
//! only lock anything needs. The one exception is a close during the opening transition,
//! which runs once the widget is open.
//!
//! Widgets nest by tree position. Opening a widget first opens the nearest enclosing widget;
//! closing a widget first closes every open widget inside its dialog surface. Neither
//! relationship implies ownership: the parent is looked up live on every use.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use tracing::{debug, trace};
use vitrine_channel::{Message, Subscription, ToggleTarget, Topic};
use vitrine_dom::{Document, NodeId};
use vitrine_responder::listeners::ListenerId;
use vitrine_responder::types::{ListenerOptions, Outcome};

use crate::breakpoints::Breakpoint;
use crate::error::Error;
use crate::event::{DomEvent, EditorEvent, EventKind};
use crate::focus_trap::FocusTrap;
use crate::options::ToggleOptions;
use crate::page::Page;

/// Tag name of toggle widgets.
pub const TAG: &str = "toggle-element";

/// Class present from the start of opening until the start of closing.
pub const OPEN_CLASS: &str = "is-open";

/// Class present while a transition is awaited.
pub const TRANSITIONING_CLASS: &str = "is-transitioning";

/// Class of the section container editor notifications are raised on.
pub const SECTION_CLASS: &str = "shopify-section";

/// Attribute binding the widget to viewports below a breakpoint.
pub const UNTIL_ATTRIBUTE: &str = "until-breakpoint";

/// Ref naming the dialog surface inside the widget.
pub const DIALOG_REF: &str = "dialog";

/// Ref naming the widget's close buttons.
pub const CLOSE_REF: &str = "close";

const SCROLL_PROPERTY: &str = "overflow";

/// Lifecycle state of a toggle widget.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToggleState {
    /// Not active at this viewport; ignores commands.
    Unmounted,
    /// Mounted and closed.
    Closed,
    /// Opening; waiting for the parent or the transition.
    Opening,
    /// Open.
    Open,
    /// Closing; waiting for descendants or the transition.
    Closing,
}

impl ToggleState {
    /// Whether no transition is in flight.
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Opening | Self::Closing)
    }
}

type EditorHandler = fn(&Rc<ToggleElement>);

/// Editor notifications a toggle widget reacts to. Other kinds are ignored.
const EDITOR_HANDLERS: &[(EditorEvent, EditorHandler)] = &[
    (EditorEvent::SectionSelect, ToggleElement::on_section_select),
    (EditorEvent::SectionDeselect, ToggleElement::on_section_deselect),
];

/// A connected toggle widget.
pub struct ToggleElement {
    page: Weak<Page>,
    node: NodeId,
    id: String,
    options: ToggleOptions,
    until: Option<Breakpoint>,
    state: Cell<ToggleState>,
    destroying: Cell<bool>,
    hoisted: Cell<bool>,
    outside_click: Cell<Option<ListenerId>>,
    focus_trap: RefCell<Option<FocusTrap>>,
    settle_waiters: RefCell<Vec<oneshot::Sender<()>>>,
    subscriptions: RefCell<Vec<Subscription>>,
    listeners: RefCell<Vec<ListenerId>>,
}

impl fmt::Debug for ToggleElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleElement")
            .field("node", &self.node)
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("options", &self.options)
            .field("until", &self.until)
            .field("outside_click", &self.outside_click.get())
            .field("focus_trap", &self.focus_trap.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl ToggleElement {
    /// Connect the `toggle-element` on `node`.
    ///
    /// Resolves the configuration, subscribes to the channel, evaluates the default state
    /// (mounting or destroying per `until-breakpoint`), and hoists the element when asked.
    /// Connecting an already connected element returns the existing widget.
    pub fn connect(page: &Rc<Page>, node: NodeId) -> Result<Rc<Self>, Error> {
        if let Some(existing) = page.widget(node) {
            return Ok(existing);
        }
        let (id, options, until) = {
            let doc = page.document();
            if !doc.is_connected(node) {
                return Err(Error::Detached(node));
            }
            let Some(id) = doc.attribute(node, "id") else {
                return Err(Error::MissingAttribute {
                    attribute: "id",
                    tag: doc.tag(node).unwrap_or(TAG).to_owned(),
                });
            };
            let options = ToggleOptions::from_element(&doc, node)?;
            let until = doc
                .attribute(node, UNTIL_ATTRIBUTE)
                .map(str::parse::<Breakpoint>)
                .transpose()?;
            (id.to_owned(), options, until)
        };
        let widget = Rc::new(Self {
            page: Rc::downgrade(page),
            node,
            id,
            options,
            until,
            state: Cell::new(ToggleState::Unmounted),
            destroying: Cell::new(false),
            hoisted: Cell::new(false),
            outside_click: Cell::new(None),
            focus_trap: RefCell::new(None),
            settle_waiters: RefCell::new(Vec::new()),
            subscriptions: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        });
        page.register_widget(widget.clone());
        widget.bind(page);
        widget.set_default_state();
        if widget.options.hoist && !widget.hoisted.replace(true) {
            let mut doc = page.document_mut();
            let root = doc.root();
            doc.append_child(root, node);
        }
        debug!(id = %widget.id, options = ?widget.options, until = ?widget.until, "toggle element connected");
        Ok(widget)
    }

    fn bind(self: &Rc<Self>, page: &Rc<Page>) {
        let weak = Rc::downgrade(self);
        let channel = page.channel();
        let mut subs = Vec::new();

        let command = |topic: Topic, action: fn(&Rc<Self>)| {
            let weak = weak.clone();
            channel.subscribe(topic, move |msg| {
                if let Some(w) = weak.upgrade()
                    && msg.target().is_some_and(|t| t.id == w.id)
                {
                    action(&w);
                }
            })
        };
        subs.push(command(Topic::ToggleElementOpen, Self::request_open));
        subs.push(command(Topic::ToggleElementClose, Self::request_close));
        subs.push(command(Topic::ToggleElementToggle, Self::request_toggle));

        // Another widget opening dismisses this one, unless it is (or contains) the opener.
        subs.push(channel.subscribe(Topic::ToggleElementOpening, {
            let weak = weak.clone();
            move |msg| {
                let (Some(w), Some(opener)) = (weak.upgrade(), msg.target()) else {
                    return;
                };
                if !w.is_or_contains(&opener.id) {
                    w.request_close();
                }
            }
        }));
        if let Some(topic) = self.options.open_event {
            let weak = weak.clone();
            subs.push(channel.subscribe(topic, move |_| {
                if let Some(w) = weak.upgrade() {
                    w.request_open();
                }
            }));
        }
        if self.options.close_on_escape {
            let weak = weak.clone();
            subs.push(channel.subscribe(Topic::EscapeKey, move |_| {
                if let Some(w) = weak.upgrade() {
                    w.request_close();
                }
            }));
        }
        self.subscriptions.borrow_mut().extend(subs);

        let (root, close_refs, section) = {
            let doc = page.document();
            let section = doc.closest(self.node, |_, e| e.classes.contains(SECTION_CLASS));
            (doc.root(), doc.refs(self.node).all(CLOSE_REF).to_vec(), section)
        };
        let mut ids = page.on(EventKind::Click, &close_refs, ListenerOptions::BUBBLE, {
            let weak = weak.clone();
            move |_| {
                if let Some(w) = weak.upgrade() {
                    w.request_close();
                }
                Outcome::Continue
            }
        });
        ids.push(page.listen(EventKind::Resize, root, ListenerOptions::BUBBLE, {
            let weak = weak.clone();
            move |_| {
                if let Some(w) = weak.upgrade() {
                    w.set_default_state();
                }
                Outcome::Continue
            }
        }));
        if let Some(section) = section {
            for &(kind, handler) in EDITOR_HANDLERS {
                let weak = weak.clone();
                ids.push(page.listen(
                    EventKind::Editor(kind),
                    section,
                    ListenerOptions::BUBBLE,
                    move |_| {
                        if let Some(w) = weak.upgrade() {
                            handler(&w);
                        }
                        Outcome::Continue
                    },
                ));
            }
        }
        self.listeners.borrow_mut().extend(ids);
    }

    /// Tear down every subscription and listener, unregister, and destroy.
    pub fn disconnect(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        for sub in self.subscriptions.borrow_mut().drain(..) {
            sub.unsubscribe();
        }
        if let Some(page) = self.page() {
            for id in self.listeners.borrow_mut().drain(..) {
                page.off(id);
            }
            page.unregister_widget(self.node);
        }
        debug!(id = %self.id, "toggle element disconnected");
        self.destroy()
    }

    // --- accessors ---

    /// Identity (the `id` attribute).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Backing element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Resolved configuration.
    pub fn options(&self) -> &ToggleOptions {
        &self.options
    }

    /// Breakpoint below which the widget is active, if bound.
    pub fn until(&self) -> Option<Breakpoint> {
        self.until
    }

    /// Current state.
    pub fn state(&self) -> ToggleState {
        self.state.get()
    }

    /// Whether the widget is mounted.
    pub fn is_mounted(&self) -> bool {
        self.state() != ToggleState::Unmounted
    }

    /// Whether the outside-click listener is attached.
    pub fn has_outside_click_listener(&self) -> bool {
        self.outside_click.get().is_some()
    }

    /// Whether focus is trapped inside the widget.
    pub fn has_focus_trap(&self) -> bool {
        self.focus_trap
            .borrow()
            .as_ref()
            .is_some_and(FocusTrap::is_active)
    }

    /// Element whose transition gates state changes: the `dialog` ref, or the widget itself.
    pub fn surface(&self) -> NodeId {
        self.page()
            .map_or(self.node, |page| self.surface_in(&page.document()))
    }

    /// Nearest enclosing connected widget, looked up live.
    pub fn parent(&self) -> Option<Rc<Self>> {
        let page = self.page()?;
        let ancestor = {
            let doc = page.document();
            doc.ancestors(self.node).find(|&a| doc.tag(a) == Some(TAG))
        }?;
        page.widget(ancestor)
    }

    /// A future resolving when no transition is in flight.
    pub fn wait_settled(&self) -> LocalBoxFuture<'static, ()> {
        if self.state().is_settled() {
            return future::ready(()).boxed_local();
        }
        let (tx, rx) = oneshot::channel();
        self.settle_waiters.borrow_mut().push(tx);
        async move {
            let _ = rx.await;
        }
        .boxed_local()
    }

    // --- lifecycle ---

    /// Mount (or stay mounted) when active at the current viewport; destroy otherwise.
    pub fn set_default_state(self: &Rc<Self>) {
        let Some(page) = self.page() else {
            return;
        };
        match self.until {
            Some(bp) if !page.viewport().is_below(bp) => page.spawn(self.destroy()),
            _ => self.mount(),
        }
    }

    /// Enter `Closed` from `Unmounted`, applying accessibility attributes if configured.
    ///
    /// Cancels the final step of a destroy that is still in flight.
    pub fn mount(&self) {
        if self.destroying.replace(false) {
            trace!(id = %self.id, "pending destroy cancelled");
        }
        if self.is_mounted() {
            return;
        }
        self.set_state(ToggleState::Closed);
        if self.options.set_a11y_attributes {
            self.apply_a11y(false);
        }
    }

    /// Close (after any in-flight transition) and return to `Unmounted`.
    ///
    /// A closed widget with nothing in flight unmounts before this returns.
    pub fn destroy(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        if !self.is_mounted() || self.destroying.get() {
            return future::ready(()).boxed_local();
        }
        if self.state() == ToggleState::Closed {
            self.unmount();
            return future::ready(()).boxed_local();
        }
        self.destroying.set(true);
        let this = self.clone();
        async move {
            this.wait_settled().await;
            this.close().await;
            if this.destroying.replace(false) {
                this.unmount();
            }
        }
        .boxed_local()
    }

    fn unmount(&self) {
        if self.options.set_a11y_attributes {
            self.apply_a11y(true);
        }
        self.set_state(ToggleState::Unmounted);
    }

    // --- open / close ---

    /// Open: `Closed → Opening → Open`. Ignored in any other state.
    ///
    /// The state is claimed before this returns, so a second call in the same tick is a no-op.
    /// The future resolves one frame after the widget is open.
    pub fn open(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        if !self.can_open() {
            trace!(id = %self.id, state = ?self.state(), "open ignored");
            return future::ready(()).boxed_local();
        }
        self.set_state(ToggleState::Opening);
        self.clone().run_open().boxed_local()
    }

    /// Open in response to `trigger`, suppressing its default action when the open proceeds.
    pub fn open_from(self: &Rc<Self>, trigger: &mut DomEvent) -> LocalBoxFuture<'static, ()> {
        if self.can_open() {
            trigger.prevent_default();
        }
        self.open()
    }

    fn can_open(&self) -> bool {
        self.state() == ToggleState::Closed
            && !self.destroying.get()
            && self
                .page()
                .is_some_and(|page| page.document().is_connected(self.node))
    }

    async fn run_open(self: Rc<Self>) {
        if let Some(parent) = self.parent() {
            if !parent.state().is_settled() {
                parent.wait_settled().await;
            }
            if parent.state() == ToggleState::Closed {
                parent.open().await;
            }
        }

        let transition = {
            let Some(page) = self.page() else {
                return;
            };
            let surface = {
                let mut doc = page.document_mut();
                doc.add_class(self.node, OPEN_CLASS);
                doc.add_class(self.node, TRANSITIONING_CLASS);
                if self.options.body_scroll_lock {
                    let root = doc.root();
                    doc.set_style_property(root, SCROLL_PROPERTY, "hidden");
                }
                self.surface_in(&doc)
            };
            page.transition_end(surface)
        };
        transition.await;

        let frame = {
            let Some(page) = self.page() else {
                return;
            };
            page.document_mut()
                .remove_class(self.node, TRANSITIONING_CLASS);
            self.set_state(ToggleState::Open);
            if self.options.close_on_outside_click && self.outside_click.get().is_none() {
                let weak = Rc::downgrade(&self);
                page.scheduler().defer_to_next_frame(move || {
                    if let Some(w) = weak.upgrade() {
                        w.attach_outside_click();
                    }
                });
            }
            if self.options.trap_focus && self.focus_trap.borrow().is_none() {
                let weak = Rc::downgrade(&self);
                page.scheduler().defer_to_next_frame(move || {
                    if let Some(w) = weak.upgrade() {
                        w.activate_focus_trap();
                    }
                });
            }
            if self.options.set_a11y_attributes {
                self.apply_a11y(false);
            }
            page.channel()
                .publish(&Message::Opening(ToggleTarget::new(self.id.clone())));
            page.dispatch(DomEvent::new(EventKind::Open, self.node));
            page.scheduler().next_frame()
        };
        frame.await;
    }

    /// Close: `Open → Closing → Closed`.
    ///
    /// A widget already carrying [`OPEN_CLASS`] while `Opening` closes once its transition
    /// ends. Ignored in any other state.
    ///
    /// Open widgets inside the dialog surface close first, one after another in document
    /// order. The future resolves one frame after the widget is closed.
    pub fn close(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        match self.state() {
            ToggleState::Open => {}
            ToggleState::Opening if self.is_open_class() => {
                let this = self.clone();
                return async move {
                    this.wait_settled().await;
                    this.close().await;
                }
                .boxed_local();
            }
            state => {
                trace!(id = %self.id, ?state, "close ignored");
                return future::ready(()).boxed_local();
            }
        }
        self.set_state(ToggleState::Closing);
        self.clone().run_close().boxed_local()
    }

    async fn run_close(self: Rc<Self>) {
        // Children still waiting on this widget to open hold no OPEN_CLASS and are left alone.
        let nested: Vec<Rc<Self>> = {
            let Some(page) = self.page() else {
                return;
            };
            let nodes = {
                let doc = page.document();
                doc.query_tag(self.surface_in(&doc), TAG)
            };
            nodes
                .into_iter()
                .filter_map(|n| page.widget(n))
                .filter(|w| w.state() == ToggleState::Closing || w.is_open_class())
                .collect()
        };
        for child in nested {
            if !child.state().is_settled() {
                child.wait_settled().await;
            }
            if child.state() == ToggleState::Open {
                child.close().await;
            }
        }

        let transition = {
            let Some(page) = self.page() else {
                return;
            };
            let surface = {
                let mut doc = page.document_mut();
                doc.add_class(self.node, TRANSITIONING_CLASS);
                doc.remove_class(self.node, OPEN_CLASS);
                self.surface_in(&doc)
            };
            page.transition_end(surface)
        };
        transition.await;

        let frame = {
            let Some(page) = self.page() else {
                return;
            };
            page.document_mut()
                .remove_class(self.node, TRANSITIONING_CLASS);
            self.set_state(ToggleState::Closed);
            if self.options.body_scroll_lock && !self.scroll_lock_shared(&page) {
                let mut doc = page.document_mut();
                let root = doc.root();
                doc.remove_style_property(root, SCROLL_PROPERTY);
            }
            if let Some(id) = self.outside_click.take() {
                page.off(id);
            }
            let trap = self.focus_trap.borrow_mut().take();
            if let Some(mut trap) = trap {
                trap.release();
            }
            if self.options.set_a11y_attributes {
                self.apply_a11y(false);
            }
            page.dispatch(DomEvent::new(EventKind::Close, self.node));
            page.scheduler().next_frame()
        };
        frame.await;
    }

    /// Close when the element carries [`OPEN_CLASS`], open otherwise.
    pub fn toggle(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        if self.is_open_class() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Like [`toggle`](Self::toggle), suppressing `trigger`'s default action when opening.
    pub fn toggle_from(self: &Rc<Self>, trigger: &mut DomEvent) -> LocalBoxFuture<'static, ()> {
        if self.is_open_class() {
            self.close()
        } else {
            self.open_from(trigger)
        }
    }

    // --- editor ---

    /// Editor selected the enclosing section.
    pub fn on_section_select(self: &Rc<Self>) {
        if self.options.open_on_section_select {
            self.request_open();
        }
    }

    /// Editor deselected the enclosing section.
    pub fn on_section_deselect(self: &Rc<Self>) {
        if self.options.open_on_section_select {
            self.request_close();
        }
    }

    // --- internals ---

    fn page(&self) -> Option<Rc<Page>> {
        self.page.upgrade()
    }

    fn set_state(&self, next: ToggleState) {
        let prev = self.state.replace(next);
        if prev != next {
            debug!(id = %self.id, from = ?prev, to = ?next, "toggle state");
        }
        if next.is_settled() {
            for tx in self.settle_waiters.borrow_mut().drain(..) {
                let _ = tx.send(());
            }
        }
    }

    fn request_open(self: &Rc<Self>) {
        if let Some(page) = self.page() {
            page.spawn(self.open());
        }
    }

    fn request_close(self: &Rc<Self>) {
        if let Some(page) = self.page() {
            page.spawn(self.close());
        }
    }

    fn request_toggle(self: &Rc<Self>) {
        if let Some(page) = self.page() {
            page.spawn(self.toggle());
        }
    }

    fn is_open_class(&self) -> bool {
        self.page()
            .is_some_and(|page| page.document().has_class(self.node, OPEN_CLASS))
    }

    fn surface_in(&self, doc: &Document) -> NodeId {
        doc.refs(self.node).first(DIALOG_REF).unwrap_or(self.node)
    }

    fn is_or_contains(&self, id: &str) -> bool {
        if id == self.id {
            return true;
        }
        let Some(page) = self.page() else {
            return false;
        };
        let doc = page.document();
        doc.element_by_id(id)
            .is_some_and(|el| doc.contains(self.node, el))
    }

    fn scroll_lock_shared(&self, page: &Page) -> bool {
        page.widgets().iter().any(|w| {
            w.node != self.node
                && w.options.body_scroll_lock
                && matches!(w.state(), ToggleState::Open | ToggleState::Opening)
        })
    }

    fn attach_outside_click(self: &Rc<Self>) {
        if self.state() != ToggleState::Open || self.outside_click.get().is_some() {
            return;
        }
        let Some(page) = self.page() else {
            return;
        };
        let weak = Rc::downgrade(self);
        let root = page.root();
        let id = page.listen(EventKind::Click, root, ListenerOptions::BUBBLE, move |ev| {
            if let Some(w) = weak.upgrade() {
                w.handle_outside_click(ev.target);
            }
            Outcome::Continue
        });
        self.outside_click.set(Some(id));
    }

    fn handle_outside_click(self: &Rc<Self>, target: NodeId) {
        let Some(page) = self.page() else {
            return;
        };
        let ignored = {
            let doc = page.document();
            doc.contains(self.surface_in(&doc), target)
                || doc
                    .query_tag(self.node, TAG)
                    .into_iter()
                    .any(|n| doc.has_class(n, OPEN_CLASS))
                || page.reserved_regions().iter().any(|region| {
                    doc.closest(target, |_, e| {
                        e.attributes.get("id").is_some_and(|v| v == region)
                    })
                    .is_some()
                })
        };
        if ignored {
            trace!(id = %self.id, ?target, "outside click ignored");
            return;
        }
        page.spawn(self.close());
    }

    fn activate_focus_trap(self: &Rc<Self>) {
        if self.state() != ToggleState::Open || self.focus_trap.borrow().is_some() {
            return;
        }
        let Some(page) = self.page() else {
            return;
        };
        let trap = FocusTrap::activate(&page, self.node, false);
        *self.focus_trap.borrow_mut() = Some(trap);
    }

    /// Elements whose `tabindex` follows the open state: this widget's own rendered, visible,
    /// focusable descendants (not those of nested widgets), then the widget itself.
    fn a11y_scope(&self, doc: &Document) -> Vec<NodeId> {
        doc.focusable_descendants(self.node, true)
            .into_iter()
            .filter(|&n| doc.closest_tag(n, TAG) == Some(self.node))
            .chain(std::iter::once(self.node))
            .collect()
    }

    fn apply_a11y(&self, strip: bool) {
        let Some(page) = self.page() else {
            return;
        };
        let blurred = {
            let mut doc = page.document_mut();
            let open = doc.has_class(self.node, OPEN_CLASS);
            let scope = self.a11y_scope(&doc);
            let mut blurred = None;
            for n in scope {
                if strip {
                    doc.remove_attribute(n, "tabindex");
                    continue;
                }
                doc.set_attribute(n, "tabindex", if open { "0" } else { "-1" });
                if !open && doc.active_element() == Some(n) {
                    blurred = Some(n);
                }
            }
            if strip {
                doc.remove_attribute(self.node, "aria-hidden");
            } else {
                doc.set_attribute(self.node, "aria-hidden", if open { "false" } else { "true" });
            }
            blurred
        };
        if let Some(n) = blurred {
            page.blur(n);
        }
    }
}
