// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, queries, focus, and hit testing.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::attr::AttrValue;
use crate::types::{Element, ElementFlags, Hit, NodeId, Refs};

/// Tag name of the root element.
pub const ROOT_TAG: &str = "body";

/// Attribute that names refs, as `data-ref="<tag>.<name>"`.
pub const REF_ATTRIBUTE: &str = "data-ref";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A headless element tree.
///
/// The document always owns a root element (tag [`ROOT_TAG`]) created by [`Document::new`].
/// Elements inserted without a parent are alive but detached until appended somewhere
/// under the root.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    active: Option<NodeId>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create a document holding only the root element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            active: None,
        };
        doc.root = doc.insert(
            None,
            Element::new(ROOT_TAG).bounds(Rect::new(0.0, 0.0, f64::MAX, f64::MAX)),
        );
        doc
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a new element as the last child of `parent` (or detached if `None`).
    ///
    /// A stale `parent` also yields a detached element.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element (and its subtree) from the document.
    ///
    /// The root cannot be removed. Focus is dropped if it was inside the subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(active) = self.active
            && self.contains(id, active)
        {
            self.active = None;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Move `id` to be the last child of `parent`.
    ///
    /// Returns `false` (and changes nothing) when either id is stale, `id` is the root,
    /// or `parent` lies inside `id`'s subtree.
    pub fn append_child(&mut self, parent: NodeId, id: NodeId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(id) || id == self.root {
            return false;
        }
        if self.contains(id, parent) {
            return false;
        }
        if let Some(old) = self.node(id).and_then(|n| n.parent) {
            self.unlink_parent(id, old);
        }
        self.link_parent(id, parent);
        true
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether `id` is alive and reachable from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.closest(id, |n, _| n == self.root).is_some()
    }

    /// Element data for `id`.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    /// Mutable element data for `id`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// Tag name of `id`.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    // --- attributes, classes, style ---

    /// Raw attribute text.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Coerced attribute value, or `None` when absent.
    pub fn attribute_value(&self, id: NodeId, name: &str) -> Option<AttrValue> {
        self.attribute(id, name).map(AttrValue::parse)
    }

    /// Coerced attribute truthiness, or `fallback` when absent.
    pub fn attribute_flag(&self, id: NodeId, name: &str, fallback: bool) -> bool {
        self.attribute_value(id, name)
            .map_or(fallback, |v| v.truthy())
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.attributes.insert(name.into(), value.into());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.attributes.remove(name);
        }
    }

    /// Whether the class is present.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    /// Add a class.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.classes.insert(class.into());
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.classes.remove(class);
        }
    }

    /// Inline style property.
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.style.get(name).map(String::as_str)
    }

    /// Set an inline style property.
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.style.insert(name.into(), value.into());
        }
    }

    /// Remove an inline style property.
    pub fn remove_style_property(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.style.remove(name);
        }
    }

    /// Whether waiting for `transitionend` on `id` is required.
    pub fn has_transition(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.transition.is_timed())
    }

    // --- structure queries ---

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First child of `id`.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Ancestors of `id`, nearest first (excluding `id`).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.parent(id);
        core::iter::from_fn(move || {
            let here = cur?;
            cur = self.parent(here);
            Some(here)
        })
    }

    /// Descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Nearest inclusive ancestor of `id` matching `pred`.
    pub fn closest(
        &self,
        id: NodeId,
        mut pred: impl FnMut(NodeId, &Element) -> bool,
    ) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n)?;
            if pred(n, &node.element) {
                return Some(n);
            }
            cur = node.parent;
        }
        None
    }

    /// Nearest inclusive ancestor with the given tag.
    pub fn closest_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.closest(id, |_, e| e.tag == tag)
    }

    /// First connected element whose `id` attribute equals `id_value`, in document order.
    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        core::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attribute(n, "id") == Some(id_value))
    }

    /// Descendants of `scope` with the given tag, in document order.
    pub fn query_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.tag(n) == Some(tag))
            .collect()
    }

    /// Path from the root of `id`'s tree to `id` (inclusive).
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let mut out: Vec<NodeId> = core::iter::once(id).chain(self.ancestors(id)).collect();
        out.reverse();
        out
    }

    /// Resolve `data-ref="<tag>.<name>"` descendants of `id`, where `<tag>` is `id`'s tag.
    ///
    /// Refs that belong to a nested element with the same tag are left to that element.
    pub fn refs(&self, id: NodeId) -> Refs {
        let mut refs = Refs::default();
        let Some(tag) = self.tag(id) else {
            return refs;
        };
        for n in self.descendants(id) {
            let Some(value) = self.attribute(n, REF_ATTRIBUTE) else {
                continue;
            };
            let Some(name) = value
                .strip_prefix(tag)
                .and_then(|rest| rest.strip_prefix('.'))
            else {
                continue;
            };
            if self.closest_tag(n, tag) != Some(id) {
                continue;
            }
            refs.entries.entry(name.into()).or_default().push(n);
        }
        refs
    }

    // --- focus ---

    /// Whether the element is focusable by tag/attribute rules.
    ///
    /// Matches `a[href]`; `button`, `input` (not `type=hidden`), `select`, and `textarea` when
    /// not disabled; `iframe`, `details`, `summary`; anything with `tabindex`; and
    /// `contenteditable="true"`.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(e) = self.element(id) else {
            return false;
        };
        let has = |name: &str| e.attributes.contains_key(name);
        if has("tabindex") {
            return true;
        }
        if e.attributes.get("contenteditable").map(String::as_str) == Some("true") {
            return true;
        }
        match e.tag.as_str() {
            "a" => has("href"),
            "button" | "select" | "textarea" => !has("disabled"),
            "input" => {
                !has("disabled") && e.attributes.get("type").map(String::as_str) != Some("hidden")
            }
            "iframe" | "details" | "summary" => true,
            _ => false,
        }
    }

    /// Whether the element is rendered and visible.
    pub fn is_shown(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            e.flags
                .contains(ElementFlags::RENDERED | ElementFlags::VISIBLE)
        })
    }

    /// Parsed `tabindex`, if present and numeric.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.attribute(id, "tabindex")?.trim().parse().ok()
    }

    /// Focusable descendants of `container` in document order.
    ///
    /// With `exclude_hidden`, elements that are not rendered or not visible are skipped.
    pub fn focusable_descendants(&self, container: NodeId, exclude_hidden: bool) -> Vec<NodeId> {
        self.descendants(container)
            .into_iter()
            .filter(|&n| self.is_focusable(n))
            .filter(|&n| !exclude_hidden || self.is_shown(n))
            .collect()
    }

    /// Currently focused element.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&n| self.is_alive(n))
    }

    /// Record `id` as the focused element. Stale ids clear focus.
    ///
    /// This only updates bookkeeping; event delivery is the caller's concern.
    pub fn set_active(&mut self, id: Option<NodeId>) {
        self.active = id.filter(|&n| self.is_alive(n));
    }

    /// Drop focus if `id` holds it. Returns whether focus was dropped.
    pub fn blur(&mut self, id: NodeId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            return true;
        }
        false
    }

    // --- hit testing ---

    /// Topmost rendered, pickable element of the connected tree containing `pt`.
    ///
    /// Higher `z_index` wins; ties go to the element painted later (deeper or later in
    /// document order). Falls back to the root.
    pub fn hit_test_point(&self, pt: Point) -> Hit {
        let mut best: Option<(NodeId, i32)> = None;
        for id in self.descendants(self.root) {
            let Some(e) = self.element(id) else {
                continue;
            };
            if !e
                .flags
                .contains(ElementFlags::RENDERED | ElementFlags::PICKABLE)
            {
                continue;
            }
            if !e.bounds.contains(pt) {
                continue;
            }
            match best {
                Some((_, z_best)) if e.z_index < z_best => {}
                _ => best = Some((id, e.z_index)),
            }
        }
        let node = best.map_or(self.root, |(n, _)| n);
        Hit {
            node,
            path: self.path_to_root(node),
        }
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn drawer_doc() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let drawer = doc.insert(
            Some(root),
            Element::new("toggle-element")
                .id("drawer")
                .bounds(Rect::new(0.0, 0.0, 100.0, 400.0))
                .z_index(10),
        );
        let panel = doc.insert(
            Some(drawer),
            Element::new("div")
                .attr("data-ref", "toggle-element.dialog")
                .bounds(Rect::new(0.0, 0.0, 100.0, 400.0))
                .z_index(10),
        );
        let close = doc.insert(
            Some(panel),
            Element::new("button")
                .attr("data-ref", "toggle-element.close")
                .bounds(Rect::new(80.0, 0.0, 100.0, 20.0))
                .z_index(10),
        );
        (doc, drawer, panel, close)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), Element::new("div"));
        assert!(doc.is_alive(a));

        doc.remove(a);
        assert!(!doc.is_alive(a));

        let b = doc.insert(Some(root), Element::new("div"));
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a), "stale id must not alias the reused slot");
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn root_cannot_be_removed_or_moved() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), Element::new("div"));
        doc.remove(root);
        assert!(doc.is_alive(root));
        assert!(!doc.append_child(a, root));
    }

    #[test]
    fn append_child_moves_to_end_and_rejects_cycles() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), Element::new("div"));
        let b = doc.insert(Some(root), Element::new("div"));
        let a_child = doc.insert(Some(a), Element::new("span"));

        assert!(doc.append_child(root, a));
        assert_eq!(doc.children(root), &[b, a]);
        assert!(!doc.append_child(a_child, a), "cannot move into own subtree");
        assert_eq!(doc.parent(a_child), Some(a));
    }

    #[test]
    fn detached_elements_are_alive_but_not_connected() {
        let mut doc = Document::new();
        let loose = doc.insert(None, Element::new("div").id("loose"));
        assert!(doc.is_alive(loose));
        assert!(!doc.is_connected(loose));
        assert_eq!(doc.element_by_id("loose"), None);
        assert!(doc.append_child(doc.root(), loose));
        assert!(doc.is_connected(loose));
        assert_eq!(doc.element_by_id("loose"), Some(loose));
    }

    #[test]
    fn contains_and_closest_are_inclusive() {
        let (doc, drawer, panel, close) = drawer_doc();
        assert!(doc.contains(drawer, drawer));
        assert!(doc.contains(drawer, close));
        assert!(!doc.contains(panel, drawer));
        assert_eq!(doc.closest_tag(close, "toggle-element"), Some(drawer));
        assert_eq!(doc.closest_tag(drawer, "toggle-element"), Some(drawer));
        assert_eq!(
            doc.path_to_root(close),
            vec![doc.root(), drawer, panel, close]
        );
    }

    #[test]
    fn refs_are_scoped_to_the_owning_element() {
        let (mut doc, drawer, panel, close) = drawer_doc();
        let nested = doc.insert(Some(panel), Element::new("toggle-element").id("nested"));
        let nested_close = doc.insert(
            Some(nested),
            Element::new("button").attr("data-ref", "toggle-element.close"),
        );

        let refs = doc.refs(drawer);
        assert_eq!(refs.first("dialog"), Some(panel));
        assert_eq!(refs.all("close"), &[close]);

        let nested_refs = doc.refs(nested);
        assert_eq!(nested_refs.all("close"), &[nested_close]);
        assert!(!nested_refs.contains("dialog"));
    }

    #[test]
    fn focusable_rules() {
        let mut doc = Document::new();
        let root = doc.root();
        let link = doc.insert(Some(root), Element::new("a").attr("href", "/cart"));
        let bare_link = doc.insert(Some(root), Element::new("a"));
        let disabled = doc.insert(Some(root), Element::new("button").attr("disabled", ""));
        let hidden_input = doc.insert(Some(root), Element::new("input").attr("type", "hidden"));
        let text = doc.insert(Some(root), Element::new("input").attr("type", "text"));
        let tabbable = doc.insert(Some(root), Element::new("div").attr("tabindex", "-1"));
        let editable = doc.insert(
            Some(root),
            Element::new("div").attr("contenteditable", "true"),
        );
        let invisible = doc.insert(
            Some(root),
            Element::new("button").flags(ElementFlags::RENDERED | ElementFlags::PICKABLE),
        );

        assert!(doc.is_focusable(link));
        assert!(!doc.is_focusable(bare_link));
        assert!(!doc.is_focusable(disabled));
        assert!(!doc.is_focusable(hidden_input));
        assert!(doc.is_focusable(text));
        assert!(doc.is_focusable(tabbable));
        assert_eq!(doc.tab_index(tabbable), Some(-1));
        assert!(doc.is_focusable(editable));

        assert_eq!(
            doc.focusable_descendants(root, false),
            vec![link, text, tabbable, editable, invisible]
        );
        assert_eq!(
            doc.focusable_descendants(root, true),
            vec![link, text, tabbable, editable]
        );
    }

    #[test]
    fn removing_focused_subtree_clears_focus() {
        let (mut doc, drawer, _, close) = drawer_doc();
        doc.set_active(Some(close));
        assert_eq!(doc.active_element(), Some(close));
        doc.remove(drawer);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn hit_test_prefers_higher_z_then_paint_order() {
        let (mut doc, drawer, panel, close) = drawer_doc();
        assert_eq!(doc.hit_test_point(Point::new(90.0, 10.0)).node, close);
        assert_eq!(doc.hit_test_point(Point::new(50.0, 200.0)).node, panel);

        let overlay = doc.insert(
            Some(doc.root()),
            Element::new("div")
                .bounds(Rect::new(0.0, 0.0, 500.0, 500.0))
                .z_index(5),
        );
        // Lower z never wins over the drawer, but covers the rest of the page.
        assert_eq!(doc.hit_test_point(Point::new(50.0, 200.0)).node, panel);
        assert_eq!(doc.hit_test_point(Point::new(300.0, 300.0)).node, overlay);

        if let Some(e) = doc.element_mut(drawer) {
            e.flags.remove(ElementFlags::PICKABLE);
        }
        let hit = doc.hit_test_point(Point::new(600.0, 600.0));
        assert_eq!(hit.node, doc.root());
        assert_eq!(hit.path, vec![doc.root()]);
    }

    #[test]
    fn attribute_flags_and_styles() {
        let (mut doc, drawer, _, _) = drawer_doc();
        doc.set_attribute(drawer, "trap-focus", "");
        doc.set_attribute(drawer, "close-on-escape", "false");
        assert!(doc.attribute_flag(drawer, "trap-focus", false));
        assert!(!doc.attribute_flag(drawer, "close-on-escape", true));
        assert!(doc.attribute_flag(drawer, "hoist", true));

        let root = doc.root();
        doc.set_style_property(root, "overflow", "hidden");
        assert_eq!(doc.style_property(root, "overflow"), Some("hidden"));
        doc.remove_style_property(root, "overflow");
        assert_eq!(doc.style_property(root, "overflow"), None);
    }
}
