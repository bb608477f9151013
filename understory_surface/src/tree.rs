// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, styling state, geometry, listeners, queries.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect};

use crate::types::{ElementFlags, ElementId, EventKind, ListenerId, Selector};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level element tree.
///
/// Elements are created detached and become part of a hierarchy through
/// [`Tree::append`]. Any element without a parent is a root; roots are ordered by
/// slot index for hit testing.
pub struct Tree {
    elements: Vec<Option<Element>>, // slots
    generations: Vec<u32>,          // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    listeners: Vec<Listener>, // attachment order
    next_listener: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.elements.len();
        let alive = self.elements.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Tree")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Element {
    generation: u32,
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    bounds: Rect,
    transform: Affine,
    flags: ElementFlags,
}

impl Element {
    fn new(generation: u32, selector: Selector) -> Self {
        let mut attrs = Vec::new();
        if let Some(id) = selector.id {
            attrs.push(("id".to_string(), id));
        }
        Self {
            generation,
            tag: selector.tag,
            classes: selector.classes,
            attrs,
            text: String::new(),
            parent: None,
            children: Vec::new(),
            bounds: Rect::ZERO,
            transform: Affine::IDENTITY,
            flags: ElementFlags::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) element: ElementId,
    pub(crate) kind: EventKind,
    pub(crate) delegate: Option<String>,
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Create a detached element from a descriptor such as `div.pop.pop-small`.
    ///
    /// See [`Selector`] for the accepted grammar.
    pub fn create(&mut self, descriptor: &str) -> ElementId {
        let selector = Selector::parse(descriptor);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, selector));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, selector)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.elements.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Appending an element under itself or one of its descendants is ignored.
    pub fn append(&mut self, parent: ElementId, child: ElementId) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        if self.path_to_root(parent).contains(&child) {
            return;
        }
        if let Some(old) = self.element(child).and_then(|e| e.parent) {
            self.unlink_parent(child, old);
        }
        if let Some(p) = self.element_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Remove an element and its subtree. Listeners attached inside the subtree are dropped.
    pub fn remove(&mut self, id: ElementId) {
        let Some(parent) = self.element(id).map(|e| e.parent) else {
            return;
        };
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Parent of a live element, or `None` for roots and stale ids.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent)
    }

    /// Children of a live element in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    // --- classes ---

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.element_mut(id)
            && !e.classes.iter().any(|c| c == class)
        {
            e.classes.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.classes.retain(|c| c != class);
        }
    }

    /// Whether a live element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// The element's classes in the order they were added.
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.element(id)
            .map(|e| e.classes.as_slice())
            .unwrap_or_default()
    }

    /// The element's first class, used by callers as a type discriminator.
    pub fn first_class(&self, id: ElementId) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.classes.first())
            .map(String::as_str)
    }

    // --- attributes and text ---

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(e) = self.element_mut(id) else {
            return;
        };
        match e.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => e.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Read an attribute.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the element's text content.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(e) = self.element_mut(id) {
            e.text.clear();
            e.text.push_str(text);
        }
    }

    /// The element's own text content (children are not included).
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    // --- geometry ---

    /// Set the element's layout box in its parent's space.
    ///
    /// The tree does not perform layout; the host writes the boxes it computed.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(e) = self.element_mut(id) {
            e.bounds = bounds;
        }
    }

    /// The element's layout box, or [`Rect::ZERO`] for stale ids.
    pub fn bounds(&self, id: ElementId) -> Rect {
        self.element(id).map_or(Rect::ZERO, |e| e.bounds)
    }

    /// Set the element's transform relative to its parent.
    pub fn set_transform(&mut self, id: ElementId, transform: Affine) {
        if let Some(e) = self.element_mut(id) {
            e.transform = transform;
        }
    }

    /// The element's transform relative to its parent.
    pub fn transform(&self, id: ElementId) -> Affine {
        self.element(id).map_or(Affine::IDENTITY, |e| e.transform)
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(e) = self.element_mut(id) {
            e.flags = flags;
        }
    }

    /// Composition of all transforms from the root down to and including `id`.
    pub fn world_transform(&self, id: ElementId) -> Affine {
        self.path_to_root(id)
            .iter()
            .fold(Affine::IDENTITY, |acc, &n| acc * self.transform(n))
    }

    /// World-space AABB of the element's layout box.
    pub fn world_bounds(&self, id: ElementId) -> Rect {
        self.world_transform(id).transform_rect_bbox(self.bounds(id))
    }

    // --- queries ---

    /// Path from the root down to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = id;
        loop {
            out.push(cur);
            match self.parent(cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Nearest element with `tag`, starting at `id` and walking up, that lies strictly
    /// inside `within`. Returns `None` if `id` is not a descendant of `within`.
    pub fn closest(&self, id: ElementId, tag: &str, within: ElementId) -> Option<ElementId> {
        let mut found = None;
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == within {
                return found;
            }
            if found.is_none() && self.tag(c) == Some(tag) {
                found = Some(c);
            }
            cur = self.parent(c);
        }
        None
    }

    /// First element in document order under `root` (inclusive) whose attribute
    /// `name` equals `value`.
    pub fn find_by_attr(&self, root: ElementId, name: &str, value: &str) -> Option<ElementId> {
        if self.attr(root, name) == Some(value) {
            return Some(root);
        }
        self.children(root)
            .iter()
            .find_map(|&c| self.find_by_attr(c, name, value))
    }

    /// Hit test a world-space point. Returns the topmost element.
    ///
    /// Elements later in document order are on top. Invisible elements hide their
    /// whole subtree; non-pickable elements are skipped but their children are not.
    pub fn hit_test_point(&self, pt: Point) -> Option<ElementId> {
        let mut best = None;
        for root in self.roots() {
            self.hit_recursive(root, Affine::IDENTITY, pt, &mut best);
        }
        best
    }

    // --- listeners ---

    /// Attach a listener. When `delegate` names a tag, the listener only fires for
    /// events whose target has an ancestor-or-self with that tag strictly inside
    /// the listening element.
    pub fn on(&mut self, id: ElementId, kind: EventKind, delegate: Option<&str>) -> ListenerId {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        if self.is_alive(id) {
            self.listeners.push(Listener {
                id: listener,
                element: id,
                kind,
                delegate: delegate.map(ToString::to_string),
            });
        }
        listener
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != listener);
        before != self.listeners.len()
    }

    /// Whether a listener is still attached.
    pub fn is_listening(&self, listener: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == listener)
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn listeners_on(
        &self,
        id: ElementId,
        kind: EventKind,
    ) -> impl Iterator<Item = &Listener> + '_ {
        self.listeners
            .iter()
            .filter(move |l| l.element == id && l.kind == kind)
    }

    // --- internals ---

    fn element(&self, id: ElementId) -> Option<&Element> {
        let e = self.elements.get(id.idx())?.as_ref()?;
        (e.generation == id.generation()).then_some(e)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let e = self.elements.get_mut(id.idx())?.as_mut()?;
        (e.generation == id.generation()).then_some(e)
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.element_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(e) = self.element_mut(id) {
            e.parent = None;
        }
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        self.listeners.retain(|l| l.element != id);
        self.elements[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn roots(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Some(e) if e.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ElementId uses 32-bit indices by design."
                    )]
                    Some(ElementId::new(i as u32, e.generation))
                }
                _ => None,
            })
            .collect()
    }

    fn hit_recursive(
        &self,
        id: ElementId,
        parent_tf: Affine,
        pt: Point,
        best: &mut Option<ElementId>,
    ) {
        let Some(e) = self.element(id) else {
            return;
        };
        if !e.flags.contains(ElementFlags::VISIBLE) {
            return;
        }
        let world = parent_tf * e.transform;
        if e.flags.contains(ElementFlags::PICKABLE)
            && world.transform_rect_bbox(e.bounds).contains(pt)
        {
            *best = Some(id);
        }
        for &c in &e.children {
            self.hit_recursive(c, world, pt, best);
        }
    }
}
