// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button groups and the confirm guard.
//!
//! ## Confirm guard
//!
//! A button configured with `confirm` does not fire on its first click. It is
//! *armed* instead: it gains the `pop-confirm` class, a window of
//! [`CONFIRM_DELAY_MS`] starts, and a pointer-out listener is attached to it.
//!
//! - Clicking the armed button while the window is pending is ignored.
//! - Clicking it after the window elapsed disarms it and fires its callback.
//! - Moving the pointer off the armed button disarms it.
//! - Clicking any other button of the group disarms the armed one first, then
//!   handles that click as if the group were idle.
//!
//! At most one button per group is armed. Callbacks are looked up by button
//! name, not by the group's key.

use alloc::string::String;
use alloc::vec::Vec;

use understory_surface::{ElementId, EventKind, ListenerId, Surface};

use crate::error::{PopoverError, Result};
use crate::item::{HandlerTable, Item, ItemContext};
use crate::path;
use crate::timer::{CONFIRM_DELAY_MS, Timer};

/// Class marking the armed button.
pub const CONFIRM_CLASS: &str = "pop-confirm";

/// Options of one button.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ButtonOptions {
    /// Icon name; rendered as `i.icon.icon-<icon>`.
    pub icon: String,
    /// Tooltip.
    pub title: Option<String>,
    /// Require a second click before firing.
    pub confirm: bool,
    /// Extra path segment passed to the callback as its first argument.
    pub value: Option<String>,
}

impl ButtonOptions {
    /// A button showing `icon`.
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            ..Default::default()
        }
    }

    /// Set the tooltip.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Require confirmation.
    #[must_use]
    pub fn with_confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Append `value` to the button's path.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Ordered buttons of a group.
///
/// The name `type` is reserved for the item discriminator and never rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonGroupOptions {
    buttons: Vec<(String, ButtonOptions)>,
}

impl ButtonGroupOptions {
    /// Reserved button name.
    pub const RESERVED: &'static str = "type";

    /// No buttons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the button `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, button: ButtonOptions) -> Self {
        self.insert(name, button);
        self
    }

    /// Add (or replace) the button `name`, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, button: ButtonOptions) {
        let name = name.into();
        match self.buttons.iter_mut().find(|(n, _)| *n == name) {
            Some((_, b)) => *b = button,
            None => self.buttons.push((name, button)),
        }
    }

    /// Buttons in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ButtonOptions)> + '_ {
        self.buttons.iter().map(|(n, b)| (n.as_str(), b))
    }
}

/// What a click on a button did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Press {
    /// The callback ran.
    Fired,
    /// The button was armed and waits for confirmation.
    Armed,
    /// The button is armed and its window has not elapsed yet.
    Ignored,
}

#[derive(Clone, Debug)]
struct Button {
    name: String,
    el: ElementId,
    confirm: bool,
}

#[derive(Copy, Clone, Debug)]
struct Armed {
    button: usize,
    window: Timer,
    pointer_out: ListenerId,
}

/// A row of icon buttons sharing one item key.
///
/// Buttons created with [`ButtonOptions::with_confirm`] fire on the first
/// click made at least [`CONFIRM_DELAY_MS`] after the click that armed them.
/// Leaving the button with the pointer or clicking another button of the
/// group disarms it.
#[derive(Clone, Debug)]
pub struct ButtonGroup {
    action: String,
    el: ElementId,
    buttons: Vec<Button>,
    handlers: HandlerTable<usize>,
    armed: Option<Armed>,
}

impl ButtonGroup {
    /// Render the group for item key `action` into `surface`.
    pub fn render<S: Surface>(surface: &mut S, action: &str, opts: &ButtonGroupOptions) -> Self {
        let el = surface.create("div.pop-buttons");
        let mut buttons = Vec::new();
        let mut handlers = HandlerTable::new();

        for (name, button) in opts.iter() {
            if name == ButtonGroupOptions::RESERVED {
                continue;
            }
            let a = surface.create("a");
            surface.set_attr(
                a,
                "href",
                &path::encode(action, Some(name), button.value.as_deref()),
            );
            if let Some(title) = &button.title {
                surface.set_attr(a, "title", title);
            }
            let mut icon = String::from("i.icon.icon-");
            icon.push_str(&button.icon);
            let i = surface.create(&icon);
            surface.append(a, i);
            surface.append(el, a);

            handlers.insert(name, buttons.len());
            buttons.push(Button {
                name: name.into(),
                el: a,
                confirm: button.confirm,
            });
        }

        Self {
            action: action.into(),
            el,
            buttons,
            handlers,
            armed: None,
        }
    }

    /// Item key of the group.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Anchor element of button `name`.
    pub fn button_element(&self, name: &str) -> Option<ElementId> {
        self.index_of(name).map(|i| self.buttons[i].el)
    }

    /// Name of the armed button, if any.
    pub fn armed(&self) -> Option<&str> {
        self.armed.map(|a| self.buttons[a.button].name.as_str())
    }

    /// Replace the tooltip of button `name`.
    pub fn set_title<S: Surface>(&self, surface: &mut S, name: &str, title: &str) -> Result<()> {
        let i = self
            .index_of(name)
            .ok_or_else(|| PopoverError::UnknownButton(name.into()))?;
        surface.set_attr(self.buttons[i].el, "title", title);
        Ok(())
    }

    /// Click button `name`, running the confirm guard.
    pub fn press<S: Surface>(
        &mut self,
        name: &str,
        args: &[&str],
        cx: &mut ItemContext<'_, S>,
    ) -> Result<Press> {
        let index = self
            .index_of(name)
            .ok_or_else(|| PopoverError::UnknownButton(name.into()))?;

        if let Some(armed) = self.armed {
            if armed.button == index {
                if armed.window.is_pending(cx.now) {
                    log::trace!("`{name}` clicked inside its confirm window");
                    return Ok(Press::Ignored);
                }
                self.disarm(cx.surface);
                self.fire(index, args, cx)?;
                return Ok(Press::Fired);
            }
            self.disarm(cx.surface);
        }

        if self.buttons[index].confirm {
            self.arm(cx.surface, index, cx.now);
            Ok(Press::Armed)
        } else {
            self.fire(index, args, cx)?;
            Ok(Press::Fired)
        }
    }

    /// Return the armed button, if any, to idle.
    pub fn disarm<S: Surface>(&mut self, surface: &mut S) {
        let Some(armed) = self.armed.take() else {
            return;
        };
        let button = &self.buttons[armed.button];
        surface.remove_class(button.el, CONFIRM_CLASS);
        surface.off(armed.pointer_out);
        log::debug!("disarmed `{}`", button.name);
    }

    fn arm<S: Surface>(&mut self, surface: &mut S, index: usize, now: u64) {
        let button = &self.buttons[index];
        surface.add_class(button.el, CONFIRM_CLASS);
        let pointer_out = surface.on(button.el, EventKind::PointerOut, None);
        log::debug!("armed `{}` until {}", button.name, now.saturating_add(CONFIRM_DELAY_MS));
        self.armed = Some(Armed {
            button: index,
            window: Timer::started(now, CONFIRM_DELAY_MS),
            pointer_out,
        });
    }

    fn fire<S: Surface>(
        &self,
        index: usize,
        args: &[&str],
        cx: &mut ItemContext<'_, S>,
    ) -> Result<()> {
        let name = &self.buttons[index].name;
        log::debug!("fire `{name}`");
        cx.callbacks.invoke(name, args)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.handlers.get(name).copied()
    }
}

impl<S: Surface> Item<S> for ButtonGroup {
    fn root(&self) -> ElementId {
        self.el
    }

    fn has_handler(&self, action: &str) -> bool {
        self.handlers.contains(action)
    }

    fn invoke(&mut self, action: &str, args: &[&str], cx: &mut ItemContext<'_, S>) -> Result<()> {
        if !self.handlers.contains(action) {
            return Err(PopoverError::UnknownHandler {
                item: self.action.clone(),
                action: action.into(),
            });
        }
        self.press(action, args, cx).map(|_| ())
    }

    fn listener_fired(
        &mut self,
        listener: ListenerId,
        cx: &mut ItemContext<'_, S>,
    ) -> Result<bool> {
        match self.armed {
            Some(armed) if armed.pointer_out == listener => {
                self.disarm(cx.surface);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn tick(&mut self, cx: &mut ItemContext<'_, S>) -> Result<()> {
        if let Some(armed) = &mut self.armed
            && armed.window.fire_if_due(cx.now)
        {
            log::trace!("confirm window elapsed");
        }
        Ok(())
    }

    fn next_deadline(&self) -> Option<u64> {
        self.armed.and_then(|a| a.window.due())
    }

    fn remove(&mut self, surface: &mut S) {
        self.disarm(surface);
        surface.remove(self.el);
    }
}
