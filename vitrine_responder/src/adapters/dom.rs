// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Vitrine DOM.
//!
//! ## Feature
//!
//! Enable with `dom_adapter`.
//!
//! ## Notes
//!
//! [`Document`] implements [`ParentLookup`], so a router built with
//! [`Router::with_parent`] walks live document ancestry. Detached elements route as their
//! own root, which matches how events on a removed subtree never reach the page.

use alloc::vec::Vec;

use kurbo::Point;
use vitrine_dom::{Document, NodeId};

use crate::router::Router;
use crate::types::{Dispatch, ParentLookup};

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

/// Propagation sequence for an event targeted at `target`.
pub fn route_to(doc: &Document, target: NodeId, bubbles: bool) -> Vec<Dispatch<NodeId>> {
    Router::with_parent(doc).route(target, bubbles)
}

/// Propagation sequence for a pointer event at `pt`.
///
/// Uses the hit test path, so the target is the topmost pickable element under the point
/// (or the root when nothing else is hit).
pub fn route_point(doc: &Document, pt: Point, bubbles: bool) -> (NodeId, Vec<Dispatch<NodeId>>) {
    let hit = doc.hit_test_point(pt);
    let seq = Router::with_parent(doc).route_path(&hit.path, bubbles);
    (hit.node, seq)
}
