// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking: derive pointer-out/over transitions from the hovered path.
//!
//! Feed [`PointerTracker::update`] the root→target path under the pointer after
//! every move (for example `tree.path_to_root(hit)`), and deliver
//! [`EventKind::PointerOut`](crate::EventKind::PointerOut) to every element in
//! the returned [`PointerTransition::Out`] entries.
//!
//! ```
//! use understory_surface::{PointerTracker, PointerTransition, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.create("div");
//! let a = tree.create("a");
//! let b = tree.create("a");
//! tree.append(root, a);
//! tree.append(root, b);
//!
//! let mut pointer = PointerTracker::new();
//! pointer.update(&tree.path_to_root(a));
//! let moved = pointer.update(&tree.path_to_root(b));
//! assert_eq!(moved, vec![PointerTransition::Out(a), PointerTransition::Over(b)]);
//! ```

use alloc::vec::Vec;

use crate::types::ElementId;

/// A pointer transition produced by [`PointerTracker::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerTransition {
    /// The pointer left the element (emitted inner→outer).
    Out(ElementId),
    /// The pointer entered the element (emitted outer→inner).
    Over(ElementId),
}

/// Tracks the element path currently under the pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerTracker {
    path: Vec<ElementId>,
}

impl PointerTracker {
    /// Create a tracker with nothing under the pointer.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// The root→target path currently under the pointer.
    pub fn path(&self) -> &[ElementId] {
        &self.path
    }

    /// Replace the hovered path and return the minimal set of transitions.
    ///
    /// Elements shared by both paths (the common prefix) see nothing.
    pub fn update(&mut self, path: &[ElementId]) -> Vec<PointerTransition> {
        let shared = self
            .path
            .iter()
            .zip(path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<PointerTransition> = self.path[shared..]
            .iter()
            .rev()
            .map(|&e| PointerTransition::Out(e))
            .collect();
        out.extend(path[shared..].iter().map(|&e| PointerTransition::Over(e)));

        self.path.clear();
        self.path.extend_from_slice(path);
        out
    }

    /// The pointer left the surface entirely.
    pub fn leave(&mut self) -> Vec<PointerTransition> {
        self.update(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use alloc::vec;

    #[test]
    fn entering_from_nothing_reports_overs_only() {
        let mut tree = Tree::new();
        let root = tree.create("div");
        let a = tree.create("a");
        tree.append(root, a);
        let mut p = PointerTracker::new();
        assert_eq!(
            p.update(&[root, a]),
            vec![PointerTransition::Over(root), PointerTransition::Over(a)]
        );
        assert_eq!(p.path(), &[root, a]);
    }

    #[test]
    fn moving_to_parent_leaves_child_only() {
        let mut tree = Tree::new();
        let root = tree.create("div");
        let a = tree.create("a");
        let icon = tree.create("i");
        let mut p = PointerTracker::new();
        let _ = p.update(&[root, a, icon]);
        assert_eq!(
            p.update(&[root]),
            vec![PointerTransition::Out(icon), PointerTransition::Out(a)]
        );
    }

    #[test]
    fn leave_reports_everything_inner_first() {
        let mut tree = Tree::new();
        let root = tree.create("div");
        let a = tree.create("a");
        let mut p = PointerTracker::new();
        let _ = p.update(&[root, a]);
        assert_eq!(
            p.leave(),
            vec![PointerTransition::Out(a), PointerTransition::Out(root)]
        );
        assert!(p.path().is_empty());
    }

    #[test]
    fn same_path_is_quiet() {
        let mut tree = Tree::new();
        let root = tree.create("div");
        let mut p = PointerTracker::new();
        let _ = p.update(&[root]);
        assert!(p.update(&[root]).is_empty());
    }
}
