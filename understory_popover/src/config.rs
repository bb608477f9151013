// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover configuration.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_surface::Surface;

use crate::direction::Direction;
use crate::item::ItemKind;

/// Size used when none is configured; the root gets class `pop-small`.
pub const DEFAULT_SIZE: &str = "small";

type WillOpen = Box<dyn FnMut() -> bool>;

/// Everything needed to build a [`Popover`](crate::Popover).
///
/// Items appear in the panel in insertion order.
///
/// ```
/// use understory_popover::{ButtonGroupOptions, ButtonOptions, Direction, PopoverConfig};
/// use understory_surface::Tree;
///
/// let config = PopoverConfig::<Tree>::new()
///     .with_direction(Direction::Ne)
///     .with_icon("add")
///     .with_item(
///         "tools",
///         ButtonGroupOptions::new()
///             .with("delete", ButtonOptions::new("delete").with_confirm(true)),
///     )
///     .with_link("node/p", "Paragraph");
/// assert_eq!(config.items().len(), 2);
/// assert_eq!(config.size, "small");
/// ```
pub struct PopoverConfig<S: Surface> {
    /// Clicking the trigger of an open popover closes it.
    pub auto_hide: bool,
    /// Menu mode: the current value is tracked but never marked.
    pub menu: bool,
    /// Consulted before opening; `false` keeps the popover closed.
    pub will_open: Option<WillOpen>,
    /// Panel direction.
    pub pop: Direction,
    /// Size suffix of the root class.
    pub size: String,
    /// Icon shown in the trigger.
    pub icon: Option<String>,
    items: Vec<(String, ItemKind<S>)>,
}

impl<S: Surface> Default for PopoverConfig<S> {
    fn default() -> Self {
        Self {
            auto_hide: false,
            menu: false,
            will_open: None,
            pop: Direction::default(),
            size: DEFAULT_SIZE.into(),
            icon: None,
            items: Vec::new(),
        }
    }
}

impl<S: Surface> fmt::Debug for PopoverConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoverConfig")
            .field("auto_hide", &self.auto_hide)
            .field("menu", &self.menu)
            .field("will_open", &self.will_open.is_some())
            .field("pop", &self.pop)
            .field("size", &self.size)
            .field("icon", &self.icon)
            .field("items", &self.items)
            .finish()
    }
}

impl<S: Surface> PopoverConfig<S> {
    /// Defaults: centered, `small`, no icon, no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`PopoverConfig::auto_hide`].
    #[must_use]
    pub fn with_auto_hide(mut self, auto_hide: bool) -> Self {
        self.auto_hide = auto_hide;
        self
    }

    /// Set [`PopoverConfig::menu`].
    #[must_use]
    pub fn with_menu(mut self, menu: bool) -> Self {
        self.menu = menu;
        self
    }

    /// Set the open predicate.
    #[must_use]
    pub fn with_will_open(mut self, will_open: impl FnMut() -> bool + 'static) -> Self {
        self.will_open = Some(Box::new(will_open));
        self
    }

    /// Set the panel direction.
    #[must_use]
    pub fn with_direction(mut self, pop: Direction) -> Self {
        self.pop = pop;
        self
    }

    /// Set the size suffix.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the trigger icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Append an item under `key`.
    ///
    /// Keys must be unique; duplicates are rejected when the popover is built.
    #[must_use]
    pub fn with_item(mut self, key: impl Into<String>, kind: impl Into<ItemKind<S>>) -> Self {
        self.push_item(key, kind);
        self
    }

    /// Append a link item titled `title`.
    #[must_use]
    pub fn with_link(self, key: impl Into<String>, title: impl Into<String>) -> Self {
        self.with_item(key, ItemKind::link(title))
    }

    /// Append an item under `key`.
    pub fn push_item(&mut self, key: impl Into<String>, kind: impl Into<ItemKind<S>>) {
        self.items.push((key.into(), kind.into()));
    }

    /// Configured items in display order.
    pub fn items(&self) -> &[(String, ItemKind<S>)] {
        &self.items
    }

    pub(crate) fn into_parts(self) -> (ConfigFlags, Vec<(String, ItemKind<S>)>) {
        let Self {
            auto_hide,
            menu,
            will_open,
            pop,
            size,
            icon,
            items,
        } = self;
        (
            ConfigFlags {
                auto_hide,
                menu,
                will_open,
                pop,
                size,
                icon,
            },
            items,
        )
    }
}

pub(crate) struct ConfigFlags {
    pub(crate) auto_hide: bool,
    pub(crate) menu: bool,
    pub(crate) will_open: Option<WillOpen>,
    pub(crate) pop: Direction,
    pub(crate) size: String,
    pub(crate) icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_surface::Tree;

    #[test]
    fn defaults() {
        let config = PopoverConfig::<Tree>::default();
        assert!(!config.auto_hide);
        assert!(!config.menu);
        assert!(config.will_open.is_none());
        assert_eq!(config.pop, Direction::C);
        assert_eq!(config.size, DEFAULT_SIZE);
        assert!(config.items().is_empty());
    }

    #[test]
    fn items_keep_insertion_order() {
        let config = PopoverConfig::<Tree>::new()
            .with_link("node/p", "Paragraph")
            .with_link("node/image", "Image")
            .with_link("title", "Title");
        let keys: Vec<&str> = config.items().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["node/p", "node/image", "title"]);
    }

    #[test]
    fn will_open_is_stored() {
        let mut config = PopoverConfig::<Tree>::new().with_will_open(|| false);
        let will_open = config.will_open.as_mut().unwrap();
        assert!(!will_open());
    }
}
