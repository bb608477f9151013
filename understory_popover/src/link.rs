// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link items: a titled anchor that selects itself and reports to its bucket.

use alloc::string::String;

use understory_surface::{ElementId, Surface};

use crate::error::{PopoverError, Result};
use crate::item::{HandlerTable, Item, ItemContext};
use crate::path;

/// Options of a link item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkOptions {
    /// Text shown in the anchor.
    pub title: String,
}

impl LinkOptions {
    /// Options for a link titled `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LinkHandler {
    Click,
}

/// A link item.
///
/// Its `href` is `#/<action>`. Clicking it marks it as the current selection
/// (outside menu mode) and calls the callback named by the first segment of
/// `action`, so `node/p` and `node/image` both report to `node`.
#[derive(Clone, Debug)]
pub struct Link {
    action: String,
    el: ElementId,
    handlers: HandlerTable<LinkHandler>,
}

impl Link {
    /// Class carried by every link anchor. The router uses it to pick the link decoding.
    pub const CLASS: &'static str = "pop-link";

    /// Render a link for `action` into `surface`.
    pub fn render<S: Surface>(surface: &mut S, action: &str, opts: &LinkOptions) -> Self {
        let el = surface.create("a.pop-link");
        surface.set_attr(el, "href", &path::encode(action, None, None));
        surface.set_text(el, &opts.title);
        let mut handlers = HandlerTable::new();
        handlers.insert(path::DEFAULT_HANDLER, LinkHandler::Click);
        Self {
            action: action.into(),
            el,
            handlers,
        }
    }

    /// The link's full action key, e.g. `node/p`.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Anchor element.
    pub fn element(&self) -> ElementId {
        self.el
    }

    /// Replace the anchor text.
    pub fn set_title<S: Surface>(&self, surface: &mut S, title: &str) {
        surface.set_text(self.el, title);
    }

    fn click<S: Surface>(&self, args: &[&str], cx: &mut ItemContext<'_, S>) -> Result<()> {
        let bucket = path::bucket(&self.action);
        if !cx.callbacks.contains(bucket) {
            return Err(PopoverError::MissingCallback(bucket.into()));
        }
        if !cx.selection.is_menu() {
            cx.selection.select(cx.surface, &self.action)?;
        }
        cx.callbacks.invoke(bucket, args)
    }
}

impl<S: Surface> Item<S> for Link {
    fn root(&self) -> ElementId {
        self.el
    }

    fn has_handler(&self, action: &str) -> bool {
        self.handlers.contains(action)
    }

    fn invoke(&mut self, action: &str, args: &[&str], cx: &mut ItemContext<'_, S>) -> Result<()> {
        match self.handlers.get(action) {
            Some(LinkHandler::Click) => self.click(args, cx),
            None => Err(PopoverError::UnknownHandler {
                item: self.action.clone(),
                action: action.into(),
            }),
        }
    }

    fn remove(&mut self, surface: &mut S) {
        surface.remove(self.el);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::Callbacks;
    use crate::selection::{ACTIVE_CLASS, Selection};
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use understory_surface::Tree;

    fn recording(name: &str) -> (Callbacks, Rc<RefCell<Vec<Vec<String>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let cbs = Callbacks::new().with(name, move |args| {
            sink.borrow_mut()
                .push(args.iter().map(ToString::to_string).collect());
        });
        (cbs, log)
    }

    fn wrapped(tree: &mut Tree, panel: ElementId, action: &str) -> (Link, ElementId) {
        let link = Link::render(tree, action, &LinkOptions::new("Paragraph"));
        let wrapper = tree.create("div.pop-item.pop-item-link");
        tree.append(wrapper, link.element());
        tree.append(panel, wrapper);
        (link, wrapper)
    }

    #[test]
    fn renders_anchor() {
        let mut tree = Tree::new();
        let link = Link::render(&mut tree, "node/p", &LinkOptions::new("Paragraph"));
        let el = link.element();
        assert_eq!(tree.tag(el), Some("a"));
        assert!(tree.has_class(el, Link::CLASS));
        assert_eq!(tree.attr(el, "href"), Some("#/node/p"));
        assert_eq!(tree.text(el), Some("Paragraph"));

        link.set_title(&mut tree, "Text");
        assert_eq!(tree.text(el), Some("Text"));
    }

    #[test]
    fn click_selects_and_reports_to_bucket() {
        let mut tree = Tree::new();
        let panel = tree.create("div.pop-items");
        let (mut link, wrapper) = wrapped(&mut tree, panel, "node/p");
        let (mut cbs, log) = recording("node");
        let mut selection = Selection::new(false, panel);
        let mut cx = ItemContext {
            surface: &mut tree,
            callbacks: &mut cbs,
            selection: &mut selection,
            now: 0,
        };

        link.invoke("click", &["p"], &mut cx).unwrap();
        assert_eq!(*log.borrow(), [["p".to_string()]]);
        assert_eq!(selection.value(), Some("node/p"));
        assert!(tree.has_class(wrapper, ACTIVE_CLASS));
    }

    #[test]
    fn menu_link_does_not_mark() {
        let mut tree = Tree::new();
        let panel = tree.create("div.pop-items");
        let (mut link, wrapper) = wrapped(&mut tree, panel, "node/p");
        let (mut cbs, log) = recording("node");
        let mut selection = Selection::new(true, panel);
        let mut cx = ItemContext {
            surface: &mut tree,
            callbacks: &mut cbs,
            selection: &mut selection,
            now: 0,
        };

        link.invoke("click", &["p"], &mut cx).unwrap();
        assert_eq!(log.borrow().len(), 1);
        assert!(!tree.has_class(wrapper, ACTIVE_CLASS));
        assert_eq!(selection.value(), None);
    }

    #[test]
    fn missing_bucket_leaves_selection_alone() {
        let mut tree = Tree::new();
        let panel = tree.create("div.pop-items");
        let (mut link, wrapper) = wrapped(&mut tree, panel, "node/p");
        let mut cbs = Callbacks::new();
        let mut selection = Selection::new(false, panel);
        let mut cx = ItemContext {
            surface: &mut tree,
            callbacks: &mut cbs,
            selection: &mut selection,
            now: 0,
        };

        assert_eq!(
            link.invoke("click", &[], &mut cx),
            Err(PopoverError::MissingCallback("node".into()))
        );
        assert_eq!(selection.value(), None);
        assert!(!tree.has_class(wrapper, ACTIVE_CLASS));
    }

    #[test]
    fn only_click_is_routed() {
        let mut tree = Tree::new();
        let panel = tree.create("div.pop-items");
        let (mut link, _) = wrapped(&mut tree, panel, "title");
        assert!(Item::<Tree>::has_handler(&link, "click"));
        let (mut cbs, _) = recording("title");
        let mut selection = Selection::new(false, panel);
        let mut cx = ItemContext {
            surface: &mut tree,
            callbacks: &mut cbs,
            selection: &mut selection,
            now: 0,
        };
        assert_eq!(
            link.invoke("open", &[], &mut cx),
            Err(PopoverError::UnknownHandler {
                item: "title".into(),
                action: "open".into(),
            })
        );
    }
}
