// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item capability shared by links, button groups and custom items.
//!
//! A popover owns its items as `Box<dyn Item<S>>`-like values and talks to them
//! only through this trait: it reads their root element to wrap and measure it,
//! routes decoded clicks to a named handler, forwards listener notifications
//! and timer ticks, and finally removes them.
//!
//! Handlers are looked up by name in a table built when the item is created.
//! Nothing is synthesized from the item's data at click time.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use understory_surface::{ElementId, ListenerId, Surface};

use crate::buttons::ButtonGroupOptions;
use crate::callbacks::{Callbacks, ChangeSink};
use crate::error::Result;
use crate::link::LinkOptions;
use crate::selection::Selection;

/// Everything an item may touch while handling an event.
pub struct ItemContext<'a, S: Surface> {
    /// The surface the popover renders into.
    pub surface: &'a mut S,
    /// Application callbacks of the owning popover.
    pub callbacks: &'a mut Callbacks,
    /// Selection state of the owning popover.
    pub selection: &'a mut Selection,
    /// Host time in milliseconds.
    pub now: u64,
}

impl<S: Surface> fmt::Debug for ItemContext<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemContext")
            .field("callbacks", &self.callbacks)
            .field("selection", &self.selection)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// An entry in a popover's panel.
pub trait Item<S: Surface> {
    /// Root element of the item. Its first class names custom item types.
    fn root(&self) -> ElementId;

    /// Whether a handler named `action` exists.
    fn has_handler(&self, action: &str) -> bool;

    /// Run the handler named `action` with positional arguments.
    ///
    /// Unknown names fail with
    /// [`PopoverError::UnknownHandler`](crate::PopoverError::UnknownHandler).
    fn invoke(&mut self, action: &str, args: &[&str], cx: &mut ItemContext<'_, S>) -> Result<()>;

    /// A listener on the surface fired. Returns `Ok(false)` if it is not this item's.
    fn listener_fired(
        &mut self,
        _listener: ListenerId,
        _cx: &mut ItemContext<'_, S>,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Advance timers to `cx.now`.
    fn tick(&mut self, _cx: &mut ItemContext<'_, S>) -> Result<()> {
        Ok(())
    }

    /// Earliest pending deadline, if any timer is running.
    fn next_deadline(&self) -> Option<u64> {
        None
    }

    /// Cancel timers, detach listeners and remove the root element.
    fn remove(&mut self, surface: &mut S);
}

/// Handlers of one item, looked up by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerTable<H> {
    entries: Vec<(String, H)>,
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> HandlerTable<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing an earlier entry of that name.
    pub fn insert(&mut self, name: &str, handler: H) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, h)) => *h = handler,
            None => self.entries.push((name.to_string(), handler)),
        }
    }

    /// Handler registered under `name`.
    pub fn get(&self, name: &str) -> Option<&H> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Builds a custom item.
///
/// `key` is the item's key in the popover; `change` reports value changes to
/// the callback registered under that key.
pub trait ItemFactory<S: Surface> {
    /// Render the item into `surface` and return it.
    fn build(&self, surface: &mut S, key: &str, change: ChangeSink) -> Result<Box<dyn Item<S>>>;
}

impl<S, F> ItemFactory<S> for F
where
    S: Surface,
    F: Fn(&mut S, &str, ChangeSink) -> Result<Box<dyn Item<S>>>,
{
    fn build(&self, surface: &mut S, key: &str, change: ChangeSink) -> Result<Box<dyn Item<S>>> {
        self(surface, key, change)
    }
}

/// How to construct one item of a popover.
pub enum ItemKind<S: Surface> {
    /// A [`Link`](crate::Link); the default kind.
    Link(LinkOptions),
    /// A [`ButtonGroup`](crate::ButtonGroup).
    Buttons(ButtonGroupOptions),
    /// A caller-supplied item.
    Custom(Box<dyn ItemFactory<S>>),
}

impl<S: Surface> ItemKind<S> {
    /// A link titled `title`.
    pub fn link(title: impl Into<String>) -> Self {
        Self::Link(LinkOptions::new(title))
    }

    /// A custom item built by `factory`.
    pub fn custom(factory: impl ItemFactory<S> + 'static) -> Self {
        Self::Custom(Box::new(factory))
    }

    /// Wrapper class suffix for built-in kinds; custom kinds use their root's first class.
    pub fn builtin_type(&self) -> Option<&'static str> {
        match self {
            Self::Link(_) => Some("link"),
            Self::Buttons(_) => Some("button"),
            Self::Custom(_) => None,
        }
    }
}

impl<S: Surface> From<LinkOptions> for ItemKind<S> {
    fn from(opts: LinkOptions) -> Self {
        Self::Link(opts)
    }
}

impl<S: Surface> From<ButtonGroupOptions> for ItemKind<S> {
    fn from(opts: ButtonGroupOptions) -> Self {
        Self::Buttons(opts)
    }
}

impl<S: Surface> fmt::Debug for ItemKind<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(opts) => f.debug_tuple("Link").field(opts).finish(),
            Self::Buttons(opts) => f.debug_tuple("Buttons").field(opts).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_table_replaces_by_name() {
        let mut table = HandlerTable::new();
        table.insert("delete", 0_usize);
        table.insert("tool", 1);
        table.insert("delete", 2);
        assert_eq!(table.get("delete"), Some(&2));
        assert_eq!(table.get("tool"), Some(&1));
        assert!(table.contains("tool"));
        assert!(!table.contains("click"));
    }

    #[test]
    fn builtin_types() {
        use understory_surface::Tree;

        let link: ItemKind<Tree> = ItemKind::link("Paragraph");
        assert_eq!(link.builtin_type(), Some("link"));
        let buttons: ItemKind<Tree> = ButtonGroupOptions::new().into();
        assert_eq!(buttons.builtin_type(), Some("button"));
    }
}
