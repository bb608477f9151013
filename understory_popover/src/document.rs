// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host that owns a [`Tree`] and feeds pointer input to its popovers.
//!
//! ## Clicks
//!
//! [`Document::click`] computes the propagation sequence for the target and
//! hands every step to the popover owning the listener. If no listener stopped
//! propagation the click counts as a click on the document itself, which closes
//! the open popover.
//!
//! ## Pointer movement
//!
//! [`Document::pointer_move`] diffs the hovered path with a
//! [`PointerTracker`] and delivers pointer-out to every element the pointer
//! left. Armed buttons use this to disarm.
//!
//! ## Frames and timers
//!
//! Nothing runs on its own. Call [`Document::frame`] after geometry changed to
//! run requested layouts, and [`Document::tick`] when the clock reaches
//! [`Document::next_deadline`].
//!
//! Clicks and frames also [`sync`](Document::sync) open state: a popover the
//! registry closed, possibly from another document sharing it, loses its
//! `active` class there.

use alloc::vec::Vec;

use kurbo::Point;
use understory_surface::{
    Dispatch, ElementId, EventKind, Outcome, PointerTracker, PointerTransition, Tree, deliver,
};

use crate::callbacks::Callbacks;
use crate::config::PopoverConfig;
use crate::error::{PopoverError, Result};
use crate::popover::Popover;
use crate::registry::{ActiveRegistry, PopoverId};
use crate::timer;

/// Popovers living in one [`Tree`], sharing one [`ActiveRegistry`].
#[derive(Debug)]
pub struct Document {
    tree: Tree,
    body: ElementId,
    registry: ActiveRegistry,
    popovers: Vec<Popover<Tree>>,
    pointer: PointerTracker,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with a `body` element and a fresh registry.
    pub fn new() -> Self {
        Self::with_registry(ActiveRegistry::new())
    }

    /// An empty document sharing `registry` with other hosts.
    pub fn with_registry(registry: ActiveRegistry) -> Self {
        let mut tree = Tree::new();
        let body = tree.create("body");
        Self {
            tree,
            body,
            registry,
            popovers: Vec::new(),
            pointer: PointerTracker::new(),
        }
    }

    /// The `body` element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// The element tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable element tree, e.g. to write layout boxes.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The shared registry.
    pub fn registry(&self) -> &ActiveRegistry {
        &self.registry
    }

    /// Build a popover and append its root under `parent`.
    pub fn insert(
        &mut self,
        parent: ElementId,
        config: PopoverConfig<Tree>,
        callbacks: Callbacks,
    ) -> Result<PopoverId> {
        let popover = Popover::new(&mut self.tree, &self.registry, config, callbacks)?;
        self.tree.append(parent, popover.root());
        let id = popover.id();
        self.popovers.push(popover);
        Ok(id)
    }

    /// Popover `id`.
    pub fn popover(&self, id: PopoverId) -> Option<&Popover<Tree>> {
        self.popovers.iter().find(|p| p.id() == id)
    }

    /// Popover `id` together with the tree it renders into.
    pub fn popover_mut(&mut self, id: PopoverId) -> Option<(&mut Popover<Tree>, &mut Tree)> {
        let popover = self.popovers.iter_mut().find(|p| p.id() == id)?;
        Some((popover, &mut self.tree))
    }

    /// Ids of all live popovers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PopoverId> + '_ {
        self.popovers.iter().map(Popover::id)
    }

    /// Deliver a click aimed at `target`. Returns whether a popover stopped it.
    pub fn click(&mut self, target: ElementId, now: u64) -> Result<bool> {
        let seq = self.tree.propagation(target, EventKind::Click);
        let Self { tree, popovers, .. } = self;
        let delivered = deliver(&seq, |d| dispatch(popovers, tree, d, now));
        let stopped = match delivered {
            Ok(stopped) => stopped,
            Err(err) => {
                self.sync();
                return Err(err);
            }
        };
        if !stopped {
            self.registry.dismiss();
        }
        self.sync();
        Ok(stopped)
    }

    /// Hit test `point` and click the element found there (or the body).
    pub fn click_at(&mut self, point: Point, now: u64) -> Result<bool> {
        let target = self.tree.hit_test_point(point).unwrap_or(self.body);
        self.click(target, now)
    }

    /// The pointer moved onto `target` (`None`: off every element).
    pub fn pointer_move(&mut self, target: Option<ElementId>, now: u64) -> Result<()> {
        let path = target
            .map(|t| self.tree.path_to_root(t))
            .unwrap_or_default();
        let transitions = self.pointer.update(&path);
        self.pointer_transitions(&transitions, now)
    }

    /// Hit test `point` and move the pointer there.
    pub fn pointer_move_to(&mut self, point: Point, now: u64) -> Result<()> {
        let target = self.tree.hit_test_point(point);
        self.pointer_move(target, now)
    }

    /// The pointer left the surface.
    pub fn pointer_leave(&mut self, now: u64) -> Result<()> {
        let transitions = self.pointer.leave();
        self.pointer_transitions(&transitions, now)
    }

    fn pointer_transitions(&mut self, transitions: &[PointerTransition], now: u64) -> Result<()> {
        for t in transitions {
            let PointerTransition::Out(el) = *t else {
                continue;
            };
            let seq = self.tree.propagation(el, EventKind::PointerOut);
            let Self { tree, popovers, .. } = self;
            deliver(&seq, |d| dispatch(popovers, tree, d, now))?;
        }
        Ok(())
    }

    /// Drop the `active` class from popovers the registry closed.
    ///
    /// Runs after every click and every frame. With a registry shared across
    /// documents, a popover closed from another document updates here.
    pub fn sync(&mut self) -> usize {
        let mut changed = 0;
        for p in &mut self.popovers {
            if p.sync(&mut self.tree) {
                changed += 1;
            }
        }
        changed
    }

    /// Sync open state and run the layouts popovers requested. Returns how
    /// many layouts ran.
    pub fn frame(&mut self) -> usize {
        self.sync();
        let mut ran = 0;
        for p in &mut self.popovers {
            if p.needs_layout() {
                p.layout(&mut self.tree);
                ran += 1;
            }
        }
        ran
    }

    /// Advance every popover's timers to `now`.
    pub fn tick(&mut self, now: u64) -> Result<()> {
        for p in &mut self.popovers {
            p.tick(&mut self.tree, now)?;
        }
        Ok(())
    }

    /// Earliest pending deadline across all popovers.
    pub fn next_deadline(&self) -> Option<u64> {
        self.popovers
            .iter()
            .map(Popover::next_deadline)
            .fold(None, timer::earliest)
    }

    /// Remove popover `id` and everything it owns.
    pub fn remove(&mut self, id: PopoverId) -> Result<()> {
        let index = self
            .popovers
            .iter()
            .position(|p| p.id() == id)
            .ok_or(PopoverError::StalePopover)?;
        let popover = self.popovers.remove(index);
        popover.remove(&mut self.tree);
        Ok(())
    }
}

fn dispatch(
    popovers: &mut [Popover<Tree>],
    tree: &mut Tree,
    d: &Dispatch,
    now: u64,
) -> Result<Outcome> {
    for p in popovers.iter_mut() {
        if let Some(outcome) = p.handle(tree, d, now)? {
            return Ok(outcome);
        }
    }
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{ButtonGroupOptions, ButtonOptions, CONFIRM_CLASS};
    use crate::path;
    use crate::selection::ACTIVE_CLASS;
    use crate::timer::CONFIRM_DELAY_MS;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::RefCell;
    use kurbo::Rect;

    type Log = Rc<RefCell<Vec<String>>>;

    fn callbacks(log: &Log) -> Callbacks {
        let mut cbs = Callbacks::new();
        for name in ["delete", "trash", "tool", "node"] {
            let sink = log.clone();
            cbs.insert(name, move |args| {
                sink.borrow_mut().push(format!("{name}{args:?}"));
            });
        }
        cbs
    }

    fn config() -> PopoverConfig<Tree> {
        PopoverConfig::new()
            .with_item(
                "tools",
                ButtonGroupOptions::new()
                    .with("delete", ButtonOptions::new("delete").with_confirm(true))
                    .with("trash", ButtonOptions::new("trash").with_confirm(true))
                    .with("tool", ButtonOptions::new("tool")),
            )
            .with_link("node/p", "Paragraph")
    }

    fn href(doc: &Document, id: PopoverId, href: &str) -> ElementId {
        let root = doc.popover(id).unwrap().root();
        doc.tree().find_by_attr(root, "href", href).unwrap()
    }

    fn trigger(doc: &Document, id: PopoverId) -> ElementId {
        doc.popover(id).unwrap().trigger()
    }

    #[test]
    fn opening_one_closes_the_other() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let p1 = doc.insert(body, config(), callbacks(&log)).unwrap();
        let p2 = doc.insert(body, config(), callbacks(&log)).unwrap();

        assert_eq!(doc.click(trigger(&doc, p2), 0), Ok(true));
        assert_eq!(doc.registry().active(), Some(p2));
        assert_eq!(doc.click(trigger(&doc, p1), 10), Ok(true));
        assert_eq!(doc.registry().active(), Some(p1));
        assert!(doc.popover(p1).unwrap().is_open());
        assert!(!doc.popover(p2).unwrap().is_open());
        let roots = [p1, p2].map(|id| doc.popover(id).unwrap().root());
        assert!(doc.tree().has_class(roots[0], ACTIVE_CLASS));
        assert!(!doc.tree().has_class(roots[1], ACTIVE_CLASS));
    }

    #[test]
    fn document_click_dismisses() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let outside = doc.tree_mut().create("div.editor");
        doc.tree_mut().append(body, outside);
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();

        doc.click(trigger(&doc, id), 0).unwrap();
        assert_eq!(doc.click(outside, 10), Ok(false));
        assert_eq!(doc.registry().active(), None);
        assert!(!doc.popover(id).unwrap().is_open());

        // Nothing open: still fine.
        assert_eq!(doc.click(outside, 20), Ok(false));
    }

    #[test]
    fn clicks_inside_do_not_dismiss() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        doc.click(trigger(&doc, id), 0).unwrap();

        let panel = doc.popover(id).unwrap().panel();
        assert_eq!(doc.click(panel, 10), Ok(true));
        assert!(doc.popover(id).unwrap().is_open());
    }

    #[test]
    fn link_path_round_trip() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();

        let link = href(&doc, id, &path::encode("node", Some("p"), None));
        doc.click(link, 0).unwrap();
        assert_eq!(*log.borrow(), ["node[\"p\"]"]);
        assert_eq!(doc.popover(id).unwrap().value(), Some("node/p"));
    }

    #[test]
    fn confirm_button_path_round_trip() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();

        let delete = href(&doc, id, &path::encode("tools", Some("delete"), None));
        doc.click(delete, 0).unwrap();
        assert_eq!(doc.next_deadline(), Some(CONFIRM_DELAY_MS));
        doc.tick(CONFIRM_DELAY_MS).unwrap();
        assert_eq!(doc.next_deadline(), None);
        doc.click(delete, CONFIRM_DELAY_MS + 1).unwrap();
        assert_eq!(*log.borrow(), ["delete[]"]);
    }

    #[test]
    fn arming_b_disarms_a() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        let delete = href(&doc, id, "#/tools/delete");
        let trash = href(&doc, id, "#/tools/trash");

        doc.click(delete, 0).unwrap();
        doc.click(trash, 100).unwrap();
        assert!(!doc.tree().has_class(delete, CONFIRM_CLASS));
        assert!(doc.tree().has_class(trash, CONFIRM_CLASS));

        // The old window is gone with the old arm.
        assert_eq!(doc.next_deadline(), Some(100 + CONFIRM_DELAY_MS));
        doc.click(delete, 700).unwrap();
        assert!(log.borrow().is_empty());
        assert!(doc.tree().has_class(delete, CONFIRM_CLASS));
    }

    #[test]
    fn pointer_leaving_the_button_disarms() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        let delete = href(&doc, id, "#/tools/delete");
        let icon = doc.tree().children(delete)[0];
        let tool = href(&doc, id, "#/tools/tool");

        doc.pointer_move(Some(icon), 0).unwrap();
        doc.click(icon, 0).unwrap();
        assert!(doc.tree().has_class(delete, CONFIRM_CLASS));

        // Moving within the button keeps it armed.
        doc.pointer_move(Some(delete), 50).unwrap();
        assert!(doc.tree().has_class(delete, CONFIRM_CLASS));

        doc.pointer_move(Some(tool), 100).unwrap();
        assert!(!doc.tree().has_class(delete, CONFIRM_CLASS));
        let (pop, _) = doc.popover_mut(id).unwrap();
        assert_eq!(pop.buttons("tools").unwrap().armed(), None);

        // Re-arm, then leave the surface entirely.
        doc.pointer_move(Some(delete), 200).unwrap();
        doc.click(delete, 200).unwrap();
        doc.pointer_leave(300).unwrap();
        assert!(!doc.tree().has_class(delete, CONFIRM_CLASS));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn remove_leaves_no_timer_behind() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        let delete = href(&doc, id, "#/tools/delete");
        doc.click(trigger(&doc, id), 0).unwrap();
        doc.click(delete, 10).unwrap();
        assert!(doc.next_deadline().is_some());

        doc.remove(id).unwrap();
        assert_eq!(doc.next_deadline(), None);
        assert_eq!(doc.registry().active(), None);
        assert_eq!(doc.tree().listener_count(), 0);

        doc.tick(10_000).unwrap();
        assert_eq!(doc.click(delete, 10_000), Ok(false));
        assert!(log.borrow().is_empty());
        assert_eq!(doc.remove(id), Err(PopoverError::StalePopover));
        assert!(doc.popover(id).is_none());
    }

    #[test]
    fn click_at_hit_tests() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        let trigger = trigger(&doc, id);
        let tree = doc.tree_mut();
        tree.set_bounds(body, Rect::new(0., 0., 800., 600.));
        tree.set_bounds(trigger, Rect::new(10., 10., 50., 50.));

        assert_eq!(doc.click_at(Point::new(20., 20.), 0), Ok(true));
        assert!(doc.popover(id).unwrap().is_open());
        assert_eq!(doc.click_at(Point::new(400., 300.), 10), Ok(false));
        assert!(!doc.popover(id).unwrap().is_open());
    }

    #[test]
    fn frame_runs_requested_layouts() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(body, config(), callbacks(&log)).unwrap();
        let (pop, tree) = doc.popover_mut(id).unwrap();
        let tools = pop.item_root("tools").unwrap();
        tree.set_bounds(pop.trigger(), Rect::new(0., 0., 40., 40.));
        tree.set_bounds(tools, Rect::new(0., 0., 60., 20.));
        tree.set_bounds(pop.panel(), Rect::new(0., 0., 60., 40.));

        assert_eq!(doc.frame(), 1);
        assert_eq!(doc.frame(), 0);
        let (pop, tree) = doc.popover_mut(id).unwrap();
        let panel = pop.panel();
        pop.set_direction(tree, Some(crate::Direction::S));
        assert_eq!(doc.frame(), 1);
        let expected = kurbo::Affine::translate((-30., 0.))
            * kurbo::Affine::scale_non_uniform(40. / 4. / 60., 40. / 4. / (20. * 2.));
        assert_eq!(doc.tree().transform(panel), expected);
    }

    #[test]
    fn ids_follow_insertion() {
        let log = Log::default();
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(body, config(), callbacks(&log)).unwrap();
        let b = doc.insert(body, config(), callbacks(&log)).unwrap();
        assert_eq!(doc.ids().collect::<Vec<_>>(), [a, b]);
        doc.remove(a).unwrap();
        assert_eq!(doc.ids().collect::<Vec<_>>(), [b]);
    }

    #[test]
    fn shared_registry_spans_documents() {
        let registry = ActiveRegistry::new();
        let mut left = Document::with_registry(registry.clone());
        let mut right = Document::with_registry(registry.clone());
        let log = Log::default();
        let (lb, rb) = (left.body(), right.body());
        let l = left.insert(lb, config(), callbacks(&log)).unwrap();
        let r = right.insert(rb, config(), callbacks(&log)).unwrap();

        let (left_root, right_root) = (
            left.popover(l).unwrap().root(),
            right.popover(r).unwrap().root(),
        );
        // Both trees were built the same way, so their ids coincide.
        assert_eq!(left_root, right_root);

        left.click(trigger(&left, l), 0).unwrap();
        right.click(trigger(&right, r), 10).unwrap();
        assert_eq!(registry.active(), Some(r));
        assert!(!left.popover(l).unwrap().is_open());
        assert!(right.tree().has_class(right_root, ACTIVE_CLASS));

        // The left document catches up on its next frame.
        assert!(left.tree().has_class(left_root, ACTIVE_CLASS));
        left.frame();
        assert!(!left.tree().has_class(left_root, ACTIVE_CLASS));
        assert!(right.tree().has_class(right_root, ACTIVE_CLASS));

        // A click on the left body dismisses the right popover.
        assert_eq!(left.click(lb, 20), Ok(false));
        assert_eq!(registry.active(), None);
        assert_eq!(right.sync(), 1);
        assert!(!right.tree().has_class(right_root, ACTIVE_CLASS));
    }
}
