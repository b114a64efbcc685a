// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page: one logical event loop.
//!
//! A [`Page`] owns the document, the listener registry, the frame scheduler, the channel, the
//! viewport, and the registries of connected widgets and controls. Input is fed in through the
//! simulation methods ([`click`](Page::click), [`key_down`](Page::key_down),
//! [`resize`](Page::resize), ...), each of which routes one event synchronously. Widget
//! lifecycles run as futures on a single-threaded executor; [`settle`](Page::settle) drives them,
//! ticking frames, until nothing more can make progress.
//!
//! ## Borrowing
//!
//! The document lives in a `RefCell`. Listeners run with no document borrow outstanding, so
//! they are free to read or mutate it, but callers must release any
//! [`document`](Page::document) guard before routing events or publishing messages.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use kurbo::Point;
use tracing::{trace, warn};
use vitrine_channel::{Channel, Message};
use vitrine_dom::{Document, NodeId};
use vitrine_responder::adapters::dom::route_to;
use vitrine_responder::dispatcher;
use vitrine_responder::listeners::{ListenerId, Listeners};
use vitrine_responder::types::{ListenerOptions, Outcome};

use crate::breakpoints::{Breakpoints, Viewport};
use crate::control::{self, ToggleControl};
use crate::error::Error;
use crate::event::{DomEvent, EditorEvent, EventKind, Key};
use crate::scheduler::Scheduler;
use crate::widget::{self, ToggleElement};

/// Upper bound on executor/frame alternations in one [`Page::settle`].
const MAX_SETTLE_ROUNDS: usize = 1024;

/// Page construction settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageConfig {
    /// Initial viewport width in px.
    pub viewport_width: f64,
    /// Breakpoint thresholds.
    pub breakpoints: Breakpoints,
    /// Element ids whose subtrees never count as an outside click.
    pub reserved_regions: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            breakpoints: Breakpoints::default(),
            reserved_regions: vec!["shopify-pc__banner".into(), "shopify-pc__prefs".into()],
        }
    }
}

/// Widgets and controls connected by [`Page::connect_all`].
#[derive(Debug, Default)]
pub struct Connected {
    /// Toggle widgets, in document order.
    pub widgets: Vec<Rc<ToggleElement>>,
    /// Toggle controls, in document order.
    pub controls: Vec<Rc<ToggleControl>>,
}

/// One logical page: document, listeners, scheduler, channel, viewport, and executor.
pub struct Page {
    document: RefCell<Document>,
    listeners: RefCell<Listeners<NodeId, EventKind, DomEvent>>,
    scheduler: Scheduler,
    channel: Channel,
    viewport: Viewport,
    reserved_regions: Vec<String>,
    widgets: RefCell<BTreeMap<NodeId, Rc<ToggleElement>>>,
    controls: RefCell<BTreeMap<NodeId, Rc<ToggleControl>>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    escape: Cell<Option<ListenerId>>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("document", &self.document)
            .field("listeners", &self.listeners.borrow().len())
            .field("scheduler", &self.scheduler)
            .field("channel", &self.channel)
            .field("viewport", &self.viewport)
            .field("widgets", &self.widgets.borrow().len())
            .field("controls", &self.controls.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// A page over `document` with the given settings and a fresh channel.
    pub fn new(document: Document, config: PageConfig) -> Rc<Self> {
        Self::with_channel(document, config, Channel::new())
    }

    /// A page sharing an existing channel.
    pub fn with_channel(document: Document, config: PageConfig, channel: Channel) -> Rc<Self> {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let page = Rc::new(Self {
            document: RefCell::new(document),
            listeners: RefCell::new(Listeners::new()),
            scheduler: Scheduler::new(),
            channel,
            viewport: Viewport::new(config.viewport_width, config.breakpoints),
            reserved_regions: config.reserved_regions,
            widgets: RefCell::new(BTreeMap::new()),
            controls: RefCell::new(BTreeMap::new()),
            pool: RefCell::new(pool),
            spawner,
            escape: Cell::new(None),
        });
        // Releasing Escape anywhere announces it to every widget.
        let channel = page.channel.clone();
        let root = page.root();
        let id = page.listen(EventKind::KeyUp, root, ListenerOptions::BUBBLE, move |ev| {
            if ev.key == Some(Key::Escape) {
                channel.publish(&Message::EscapeKey);
            }
            Outcome::Continue
        });
        page.escape.set(Some(id));
        page
    }

    // --- collaborators ---

    /// Borrow the document.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Borrow the document mutably.
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    /// Root element of the document.
    pub fn root(&self) -> NodeId {
        self.document.borrow().root()
    }

    /// Currently focused element.
    pub fn active_element(&self) -> Option<NodeId> {
        self.document.borrow().active_element()
    }

    /// The page's channel.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// The viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The frame scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Ids whose subtrees are exempt from outside-click dismissal.
    pub fn reserved_regions(&self) -> &[String] {
        &self.reserved_regions
    }

    // --- listeners ---

    /// Attach `handler` to each of `targets`. Returns one id per target.
    pub fn on(
        &self,
        kind: EventKind,
        targets: &[NodeId],
        options: ListenerOptions,
        handler: impl Fn(&mut DomEvent) -> Outcome + 'static,
    ) -> Vec<ListenerId> {
        let handler: Rc<dyn Fn(&mut DomEvent) -> Outcome> = Rc::new(handler);
        let mut listeners = self.listeners.borrow_mut();
        targets
            .iter()
            .map(|&node| listeners.add_shared(node, kind, options, handler.clone()))
            .collect()
    }

    /// Attach `handler` to `target`.
    pub fn listen(
        &self,
        kind: EventKind,
        target: NodeId,
        options: ListenerOptions,
        handler: impl Fn(&mut DomEvent) -> Outcome + 'static,
    ) -> ListenerId {
        self.listeners
            .borrow_mut()
            .add(target, kind, options, handler)
    }

    /// Detach a listener. Returns `false` if it was already detached.
    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Whether a listener is attached.
    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains(id)
    }

    /// Number of listeners for `kind` on `node`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.listeners.borrow().count(node, kind)
    }

    /// Route `event` from the root to its target and back, returning it after delivery.
    ///
    /// Events aimed at removed elements are dropped undelivered.
    pub fn dispatch(&self, mut event: DomEvent) -> DomEvent {
        let seq = {
            let doc = self.document.borrow();
            if !doc.is_alive(event.target) {
                return event;
            }
            route_to(&doc, event.target, event.kind.bubbles())
        };
        let plan = self.listeners.borrow().plan(&seq, event.kind);
        trace!(kind = ?event.kind, target = ?event.target, handlers = plan.len(), "dispatch");
        dispatcher::run::<NodeId, _, _>(&plan, &mut event, |p, ev| {
            // Listeners detached earlier in this dispatch do not run.
            if !self.listeners.borrow().contains(p.id) {
                return Outcome::Continue;
            }
            if p.once {
                self.listeners.borrow_mut().remove(p.id);
            }
            ev.current = p.dispatch.node;
            ev.phase = p.dispatch.phase;
            (p.handler)(ev)
        });
        event
    }

    /// A future resolving once `surface` reports `transitionend`.
    ///
    /// Resolves immediately when the surface has no timed transition. The listener stops the
    /// event from propagating further. A signal that never arrives leaves the future pending.
    pub fn transition_end(&self, surface: NodeId) -> LocalBoxFuture<'static, ()> {
        if !self.document.borrow().has_transition(surface) {
            return future::ready(()).boxed_local();
        }
        let (tx, rx) = oneshot::channel::<()>();
        let tx = RefCell::new(Some(tx));
        let options = ListenerOptions {
            capture: false,
            once: true,
        };
        self.listen(EventKind::TransitionEnd, surface, options, move |_| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
            Outcome::Stop
        });
        async move {
            // A dropped sender means the surface went away; nothing is left to wait for.
            let _ = rx.await;
        }
        .boxed_local()
    }

    // --- input ---

    /// Click `target`.
    pub fn click(&self, target: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::Click, target))
    }

    /// Click the topmost element under `pt`.
    pub fn click_at(&self, pt: Point) -> DomEvent {
        let target = self.document.borrow().hit_test_point(pt).node;
        self.click(target)
    }

    /// Press `key` on the focused element (or the root).
    ///
    /// An unprevented Tab moves focus to the next (Shift: previous) sequentially focusable
    /// element.
    pub fn key_down(&self, key: Key, shift: bool) -> DomEvent {
        let target = self.active_element().unwrap_or_else(|| self.root());
        let event = self.dispatch(DomEvent::keyboard(EventKind::KeyDown, target, key, shift));
        if key == Key::Tab && !event.default_prevented() {
            self.move_focus(shift);
        }
        event
    }

    /// Release `key` on the focused element (or the root).
    pub fn key_up(&self, key: Key) -> DomEvent {
        let target = self.active_element().unwrap_or_else(|| self.root());
        self.dispatch(DomEvent::keyboard(EventKind::KeyUp, target, key, false))
    }

    /// Move focus to `target`, raising `blur` on the previous element and `focus` on the new one.
    pub fn focus(&self, target: NodeId) {
        let previous = {
            let mut doc = self.document.borrow_mut();
            if !doc.is_alive(target) {
                return;
            }
            let previous = doc.active_element();
            if previous == Some(target) {
                return;
            }
            doc.set_active(Some(target));
            previous
        };
        if let Some(previous) = previous {
            self.dispatch(DomEvent::new(EventKind::Blur, previous));
        }
        self.dispatch(DomEvent::new(EventKind::Focus, target));
    }

    /// Drop focus from `target` if it holds it.
    pub fn blur(&self, target: NodeId) {
        if self.document.borrow_mut().blur(target) {
            self.dispatch(DomEvent::new(EventKind::Blur, target));
        }
    }

    /// Set the viewport width and notify resize listeners.
    pub fn resize(&self, width: f64) {
        self.viewport.set_width(width);
        let root = self.root();
        self.dispatch(DomEvent::new(EventKind::Resize, root));
    }

    /// Report that the transition on `target` finished.
    pub fn end_transition(&self, target: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::TransitionEnd, target))
    }

    /// Raise a theme editor notification on `target`.
    pub fn editor_event(&self, target: NodeId, event: EditorEvent) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::Editor(event), target))
    }

    fn move_focus(&self, backwards: bool) {
        let next = {
            let doc = self.document.borrow();
            let order: Vec<NodeId> = doc
                .focusable_descendants(doc.root(), true)
                .into_iter()
                .filter(|&n| doc.tab_index(n).is_none_or(|t| t >= 0))
                .collect();
            if order.is_empty() {
                return;
            }
            let at = doc
                .active_element()
                .and_then(|a| order.iter().position(|&n| n == a));
            let idx = match (at, backwards) {
                (None, false) => 0,
                (None, true) => order.len() - 1,
                (Some(i), false) => (i + 1) % order.len(),
                (Some(i), true) => (i + order.len() - 1) % order.len(),
            };
            order[idx]
        };
        self.focus(next);
    }

    // --- elements ---

    /// Connect every `toggle-element` and `toggle-element-button` in document order.
    ///
    /// Stops at the first configuration error.
    pub fn connect_all(self: &Rc<Self>) -> Result<Connected, Error> {
        let (elements, buttons) = {
            let doc = self.document.borrow();
            let root = doc.root();
            (
                doc.query_tag(root, widget::TAG),
                doc.query_tag(root, control::TAG),
            )
        };
        let mut connected = Connected::default();
        for node in elements {
            connected.widgets.push(ToggleElement::connect(self, node)?);
        }
        for node in buttons {
            connected.controls.push(ToggleControl::connect(self, node)?);
        }
        Ok(connected)
    }

    /// Remove `node` and its subtree, disconnecting any widget or control inside it.
    pub fn remove(&self, node: NodeId) {
        let subtree: Vec<NodeId> = {
            let doc = self.document.borrow();
            if !doc.is_alive(node) || node == doc.root() {
                return;
            }
            std::iter::once(node).chain(doc.descendants(node)).collect()
        };
        for &n in &subtree {
            if let Some(w) = self.widget(n) {
                self.spawn(w.disconnect());
            }
            if let Some(c) = self.control(n) {
                c.disconnect();
            }
        }
        self.document.borrow_mut().remove(node);
        let mut listeners = self.listeners.borrow_mut();
        for n in subtree {
            listeners.remove_node(n);
        }
    }

    /// The widget connected on `node`.
    pub fn widget(&self, node: NodeId) -> Option<Rc<ToggleElement>> {
        self.widgets.borrow().get(&node).cloned()
    }

    /// The widget whose identity is `id`.
    pub fn widget_by_id(&self, id: &str) -> Option<Rc<ToggleElement>> {
        self.widgets
            .borrow()
            .values()
            .find(|w| w.id() == id)
            .cloned()
    }

    /// Every connected widget.
    pub fn widgets(&self) -> Vec<Rc<ToggleElement>> {
        self.widgets.borrow().values().cloned().collect()
    }

    /// The control connected on `node`.
    pub fn control(&self, node: NodeId) -> Option<Rc<ToggleControl>> {
        self.controls.borrow().get(&node).cloned()
    }

    pub(crate) fn register_widget(&self, widget: Rc<ToggleElement>) {
        self.widgets.borrow_mut().insert(widget.node(), widget);
    }

    pub(crate) fn unregister_widget(&self, node: NodeId) {
        self.widgets.borrow_mut().remove(&node);
    }

    pub(crate) fn register_control(&self, control: Rc<ToggleControl>) {
        self.controls.borrow_mut().insert(control.node(), control);
    }

    pub(crate) fn unregister_control(&self, node: NodeId) {
        self.controls.borrow_mut().remove(&node);
    }

    // --- executor ---

    /// Run `future` on the page's executor.
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.spawner.spawn_local(future) {
            warn!(%err, "could not spawn page task");
        }
    }

    /// Poll spawned tasks until none can make progress without a frame or a transition.
    pub fn run_until_stalled(&self) {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            warn!("page executor re-entered; ignoring");
            return;
        };
        pool.run_until_stalled();
    }

    /// Run one frame.
    pub fn run_frame(&self) -> usize {
        self.scheduler.run_frame()
    }

    /// Alternate between polling tasks and running frames until both are idle.
    ///
    /// Tasks waiting on a `transitionend` that was never reported stay pending.
    pub fn settle(&self) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            self.run_until_stalled();
            if !self.scheduler.has_pending_frames() {
                return;
            }
            self.scheduler.run_frame();
        }
        warn!(rounds = MAX_SETTLE_ROUNDS, "page did not settle");
    }

    /// Spawn `future`, settle, and report whether it completed.
    pub fn drive(&self, future: impl Future<Output = ()> + 'static) -> bool {
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        self.spawn(async move {
            future.await;
            flag.set(true);
        });
        self.settle();
        done.get()
    }
}
