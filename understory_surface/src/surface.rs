// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Surface`] trait: the rendering and query primitives widgets build on.

use kurbo::{Affine, Size};

use crate::tree::Tree;
use crate::types::{ElementId, EventKind, ListenerId};

/// Rendering and query primitives a widget needs from its host.
///
/// Widgets are generic over this trait so they can run against a real toolkit
/// backend or the headless [`Tree`]. Operations on stale identifiers must be
/// no-ops (or return `None`/`false`), never panic.
pub trait Surface {
    /// Create a detached element from a descriptor such as `a.pop-link`.
    fn create(&mut self, descriptor: &str) -> ElementId;
    /// Append `child` under `parent`.
    fn append(&mut self, parent: ElementId, child: ElementId);
    /// Detach and discard an element and its subtree, with its listeners.
    fn remove(&mut self, element: ElementId);
    /// Whether `element` is still alive.
    fn is_alive(&self, element: ElementId) -> bool;
    /// Parent of `element`.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Add a class.
    fn add_class(&mut self, element: ElementId, class: &str);
    /// Remove a class.
    fn remove_class(&mut self, element: ElementId, class: &str);
    /// Whether `element` carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;
    /// First class of `element`.
    fn first_class(&self, element: ElementId) -> Option<&str>;

    /// Set an attribute.
    fn set_attr(&mut self, element: ElementId, name: &str, value: &str);
    /// Read an attribute.
    fn attr(&self, element: ElementId, name: &str) -> Option<&str>;
    /// Replace text content.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Nearest ancestor-or-self of `element` with `tag`, strictly inside `within`.
    fn closest(&self, element: ElementId, tag: &str, within: ElementId) -> Option<ElementId>;
    /// First element under `root` (inclusive) whose attribute `name` equals `value`.
    fn find_by_attr(&self, root: ElementId, name: &str, value: &str) -> Option<ElementId>;

    /// Untransformed layout size of `element`.
    fn layout_size(&self, element: ElementId) -> Size;
    /// Set the transform of `element` relative to its parent.
    fn set_transform(&mut self, element: ElementId, transform: Affine);

    /// Attach a listener, optionally delegated to descendants with tag `delegate`.
    fn on(&mut self, element: ElementId, kind: EventKind, delegate: Option<&str>) -> ListenerId;
    /// Detach a listener. Returns `false` if it was not attached.
    fn off(&mut self, listener: ListenerId) -> bool;
}

impl Surface for Tree {
    fn create(&mut self, descriptor: &str) -> ElementId {
        Self::create(self, descriptor)
    }

    fn append(&mut self, parent: ElementId, child: ElementId) {
        Self::append(self, parent, child);
    }

    fn remove(&mut self, element: ElementId) {
        Self::remove(self, element);
    }

    fn is_alive(&self, element: ElementId) -> bool {
        Self::is_alive(self, element)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        Self::parent(self, element)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        Self::add_class(self, element, class);
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        Self::remove_class(self, element, class);
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        Self::has_class(self, element, class)
    }

    fn first_class(&self, element: ElementId) -> Option<&str> {
        Self::first_class(self, element)
    }

    fn set_attr(&mut self, element: ElementId, name: &str, value: &str) {
        Self::set_attr(self, element, name, value);
    }

    fn attr(&self, element: ElementId, name: &str) -> Option<&str> {
        Self::attr(self, element, name)
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        Self::set_text(self, element, text);
    }

    fn closest(&self, element: ElementId, tag: &str, within: ElementId) -> Option<ElementId> {
        Self::closest(self, element, tag, within)
    }

    fn find_by_attr(&self, root: ElementId, name: &str, value: &str) -> Option<ElementId> {
        Self::find_by_attr(self, root, name, value)
    }

    fn layout_size(&self, element: ElementId) -> Size {
        self.bounds(element).size()
    }

    fn set_transform(&mut self, element: ElementId, transform: Affine) {
        Self::set_transform(self, element, transform);
    }

    fn on(&mut self, element: ElementId, kind: EventKind, delegate: Option<&str>) -> ListenerId {
        Self::on(self, element, kind, delegate)
    }

    fn off(&mut self, listener: ListenerId) -> bool {
        Self::off(self, listener)
    }
}
