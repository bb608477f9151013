// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Current-selection state of a popover.

use alloc::string::{String, ToString};

use understory_surface::{ElementId, Surface};

use crate::error::{PopoverError, Result};
use crate::path;

/// Class marking the item wrapper of the current selection.
pub const ACTIVE_CLASS: &str = "active";

/// The popover's current value and, outside menu mode, which item shows it.
#[derive(Clone, Debug)]
pub struct Selection {
    menu: bool,
    panel: ElementId,
    value: Option<String>,
    marked: Option<ElementId>,
}

impl Selection {
    pub(crate) fn new(menu: bool, panel: ElementId) -> Self {
        Self {
            menu,
            panel,
            value: None,
            marked: None,
        }
    }

    /// Menu mode: no persistent selection is marked.
    pub fn is_menu(&self) -> bool {
        self.menu
    }

    /// Current value (an action key such as `node/p`).
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Item wrapper currently carrying [`ACTIVE_CLASS`].
    pub fn marked(&self) -> Option<ElementId> {
        self.marked
    }

    /// Set the value. Returns `Ok(false)` if it was already current.
    ///
    /// Outside menu mode the [`ACTIVE_CLASS`] moves to the wrapper of the item whose
    /// `href` is `#/<value>`; if there is none the call fails and nothing changes.
    pub fn select<S: Surface>(&mut self, surface: &mut S, value: &str) -> Result<bool> {
        if self.value.as_deref() == Some(value) {
            return Ok(false);
        }

        if !self.menu {
            let href = path::encode(value, None, None);
            let anchor = surface
                .find_by_attr(self.panel, "href", &href)
                .ok_or_else(|| PopoverError::UnknownItem(value.to_string()))?;
            let wrapper = surface.parent(anchor).unwrap_or(anchor);
            if let Some(prev) = self.marked.take() {
                surface.remove_class(prev, ACTIVE_CLASS);
            }
            surface.add_class(wrapper, ACTIVE_CLASS);
            self.marked = Some(wrapper);
        }

        self.value = Some(value.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_surface::Tree;

    fn panel_with_links(tree: &mut Tree) -> (ElementId, ElementId, ElementId) {
        let panel = tree.create("div.pop-items");
        let mut wrappers = [panel; 2];
        for (i, key) in ["node/p", "node/image"].into_iter().enumerate() {
            let wrapper = tree.create("div.pop-item.pop-item-link");
            let a = tree.create("a.pop-link");
            tree.set_attr(a, "href", &path::encode(key, None, None));
            tree.append(wrapper, a);
            tree.append(panel, wrapper);
            wrappers[i] = wrapper;
        }
        (panel, wrappers[0], wrappers[1])
    }

    #[test]
    fn select_moves_active_marker() {
        let mut tree = Tree::new();
        let (panel, p, image) = panel_with_links(&mut tree);
        let mut sel = Selection::new(false, panel);

        assert_eq!(sel.select(&mut tree, "node/p"), Ok(true));
        assert!(tree.has_class(p, ACTIVE_CLASS));
        assert_eq!(sel.marked(), Some(p));

        assert_eq!(sel.select(&mut tree, "node/image"), Ok(true));
        assert!(!tree.has_class(p, ACTIVE_CLASS));
        assert!(tree.has_class(image, ACTIVE_CLASS));
        assert_eq!(sel.value(), Some("node/image"));
    }

    #[test]
    fn unchanged_value_is_a_no_op() {
        let mut tree = Tree::new();
        let (panel, p, _) = panel_with_links(&mut tree);
        let mut sel = Selection::new(false, panel);
        sel.select(&mut tree, "node/p").unwrap();
        tree.remove_class(p, ACTIVE_CLASS);
        assert_eq!(sel.select(&mut tree, "node/p"), Ok(false));
        assert!(!tree.has_class(p, ACTIVE_CLASS));
    }

    #[test]
    fn menu_mode_tracks_value_without_marking() {
        let mut tree = Tree::new();
        let (panel, p, _) = panel_with_links(&mut tree);
        let mut sel = Selection::new(true, panel);
        assert_eq!(sel.select(&mut tree, "anything"), Ok(true));
        assert_eq!(sel.value(), Some("anything"));
        assert!(!tree.has_class(p, ACTIVE_CLASS));
        assert_eq!(sel.marked(), None);
    }

    #[test]
    fn unknown_value_fails_without_changes() {
        let mut tree = Tree::new();
        let (panel, p, _) = panel_with_links(&mut tree);
        let mut sel = Selection::new(false, panel);
        sel.select(&mut tree, "node/p").unwrap();
        assert_eq!(
            sel.select(&mut tree, "node/nope"),
            Err(PopoverError::UnknownItem("node/nope".to_string()))
        );
        assert_eq!(sel.value(), Some("node/p"));
        assert!(tree.has_class(p, ACTIVE_CLASS));
    }
}
