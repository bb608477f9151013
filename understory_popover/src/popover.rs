// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popover container.
//!
//! ## Structure
//!
//! ```text
//! div.pop.pop-<size>            root; carries `active` while open, `error` while pulsing
//! ├── div.pop-button            trigger (with `i.icon.icon-<icon>` when configured)
//! └── div.pop-items.pop-<dir>   panel
//!     └── div.pop-item.pop-item-<type>
//!         └── <item root>
//! ```
//!
//! ## Listeners
//!
//! Two click listeners sit on the root, attached in this order:
//!
//! 1. The toggle listener. It always stops propagation, so clicks inside a
//!    popover never reach the document. When open it hides the popover if
//!    `auto_hide` is set; when closed it consults `will_open` and shows it.
//! 2. A listener delegated to `a` descendants. It decodes the anchor's `href`,
//!    finds the owning item and invokes the named handler.
//!
//! Stopping propagation does not skip the second listener because both sit on
//! the same element.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use understory_surface::{Dispatch, ElementId, EventKind, ListenerId, Outcome, Surface};

use crate::buttons::ButtonGroup;
use crate::callbacks::{Callbacks, ChangeSink};
use crate::config::PopoverConfig;
use crate::direction::{Direction, PanelTransform};
use crate::error::{PopoverError, Result};
use crate::item::{Item, ItemContext, ItemKind};
use crate::link::Link;
use crate::path;
use crate::registry::{ActiveRegistry, PopoverId};
use crate::selection::{ACTIVE_CLASS, Selection};
use crate::timer::{self, ERROR_PULSE_MS, Timer};

/// Class pulsed on the root by [`Popover::error`].
pub const ERROR_CLASS: &str = "error";

enum Entry<S: Surface> {
    Link(Link),
    Buttons(ButtonGroup),
    Custom(Box<dyn Item<S>>),
}

impl<S: Surface> Entry<S> {
    fn item(&self) -> &dyn Item<S> {
        match self {
            Self::Link(link) => link,
            Self::Buttons(group) => group,
            Self::Custom(item) => item.as_ref(),
        }
    }

    fn item_mut(&mut self) -> &mut dyn Item<S> {
        match self {
            Self::Link(link) => link,
            Self::Buttons(group) => group,
            Self::Custom(item) => item.as_mut(),
        }
    }
}

struct Slot<S: Surface> {
    key: String,
    wrapper: ElementId,
    entry: Entry<S>,
}

/// An expandable trigger with a panel of items.
pub struct Popover<S: Surface> {
    id: PopoverId,
    registry: ActiveRegistry,
    root: ElementId,
    trigger: ElementId,
    panel: ElementId,
    direction: Direction,
    auto_hide: bool,
    will_open: Option<Box<dyn FnMut() -> bool>>,
    items: Vec<Slot<S>>,
    callbacks: Callbacks,
    selection: Selection,
    toggle_listener: ListenerId,
    item_listener: ListenerId,
    layout_pending: bool,
    error_pulse: Timer,
    shown: bool,
}

impl<S: Surface> fmt::Debug for Popover<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.items.iter().map(|s| s.key.as_str()).collect();
        f.debug_struct("Popover")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("direction", &self.direction)
            .field("open", &self.is_open())
            .field("items", &keys)
            .field("value", &self.selection.value())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Popover<S> {
    /// Build a popover into `surface`.
    ///
    /// The root is left detached; append it where it belongs. Duplicate item
    /// keys and failing custom factories abort construction without leaving
    /// anything behind on the surface.
    pub fn new(
        surface: &mut S,
        registry: &ActiveRegistry,
        config: PopoverConfig<S>,
        callbacks: Callbacks,
    ) -> Result<Self> {
        let (flags, kinds) = config.into_parts();
        for (i, (key, _)) in kinds.iter().enumerate() {
            if kinds[..i].iter().any(|(k, _)| k == key) {
                return Err(PopoverError::DuplicateItem(key.clone()));
            }
        }

        let mut root_desc = String::from("div.pop.pop-");
        root_desc.push_str(&flags.size);
        let root = surface.create(&root_desc);
        let trigger = surface.create("div.pop-button");
        if let Some(icon) = &flags.icon {
            let mut icon_desc = String::from("i.icon.icon-");
            icon_desc.push_str(icon);
            let i = surface.create(&icon_desc);
            surface.append(trigger, i);
        }
        surface.append(root, trigger);
        let panel = surface.create("div.pop-items");
        surface.append(root, panel);

        let items = match Self::render_items(surface, panel, kinds) {
            Ok(items) => items,
            Err(err) => {
                surface.remove(root);
                return Err(err);
            }
        };

        let toggle_listener = surface.on(root, EventKind::Click, None);
        let item_listener = surface.on(root, EventKind::Click, Some("a"));

        let mut popover = Self {
            id: registry.allocate(),
            registry: registry.clone(),
            root,
            trigger,
            panel,
            direction: flags.pop,
            auto_hide: flags.auto_hide,
            will_open: flags.will_open,
            items,
            callbacks,
            selection: Selection::new(flags.menu, panel),
            toggle_listener,
            item_listener,
            layout_pending: false,
            error_pulse: Timer::idle(),
            shown: false,
        };
        surface.add_class(panel, &popover.direction.class());
        popover.size();
        log::debug!(
            "built popover {} with {} items",
            popover.id.get(),
            popover.items.len()
        );
        Ok(popover)
    }

    fn render_items(
        surface: &mut S,
        panel: ElementId,
        kinds: Vec<(String, ItemKind<S>)>,
    ) -> Result<Vec<Slot<S>>> {
        let mut items = Vec::with_capacity(kinds.len());
        for (key, kind) in kinds {
            let builtin = kind.builtin_type();
            let entry = match kind {
                ItemKind::Link(opts) => Entry::Link(Link::render(surface, &key, &opts)),
                ItemKind::Buttons(opts) => {
                    Entry::Buttons(ButtonGroup::render(surface, &key, &opts))
                }
                ItemKind::Custom(factory) => {
                    Entry::Custom(factory.build(surface, &key, ChangeSink::new(&key))?)
                }
            };
            let item_root = entry.item().root();
            let ty = builtin
                .map(ToString::to_string)
                .or_else(|| surface.first_class(item_root).map(ToString::to_string));

            let mut wrapper_desc = String::from("div.pop-item");
            if let Some(ty) = ty {
                wrapper_desc.push_str(".pop-item-");
                wrapper_desc.push_str(&ty);
            }
            let wrapper = surface.create(&wrapper_desc);
            surface.append(wrapper, item_root);
            surface.append(panel, wrapper);
            items.push(Slot {
                key,
                wrapper,
                entry,
            });
        }
        Ok(items)
    }

    /// Identity within the registry.
    pub fn id(&self) -> PopoverId {
        self.id
    }

    /// Root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Trigger element.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// Panel element holding the item wrappers.
    pub fn panel(&self) -> ElementId {
        self.panel
    }

    /// Item keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|s| s.key.as_str())
    }

    /// Root element of item `key`.
    pub fn item_root(&self, key: &str) -> Option<ElementId> {
        self.slot(key).map(|s| s.entry.item().root())
    }

    /// Wrapper element (`div.pop-item`) of item `key`.
    pub fn item_wrapper(&self, key: &str) -> Option<ElementId> {
        self.slot(key).map(|s| s.wrapper)
    }

    /// The link item `key`, if it is one.
    pub fn link(&self, key: &str) -> Option<&Link> {
        match &self.slot(key)?.entry {
            Entry::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Mutable access to the link item `key`, if it is one.
    pub fn link_mut(&mut self, key: &str) -> Option<&mut Link> {
        match &mut self.slot_mut(key)?.entry {
            Entry::Link(link) => Some(link),
            _ => None,
        }
    }

    /// The button group `key`, if it is one.
    pub fn buttons(&self, key: &str) -> Option<&ButtonGroup> {
        match &self.slot(key)?.entry {
            Entry::Buttons(group) => Some(group),
            _ => None,
        }
    }

    /// Mutable access to the button group `key`, if it is one.
    pub fn buttons_mut(&mut self, key: &str) -> Option<&mut ButtonGroup> {
        match &mut self.slot_mut(key)?.entry {
            Entry::Buttons(group) => Some(group),
            _ => None,
        }
    }

    /// Application callbacks.
    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Whether this popover is the registry's open popover.
    pub fn is_open(&self) -> bool {
        self.registry.is_active(self.id)
    }

    /// Open, closing whichever popover of the registry was open.
    ///
    /// The popover closed this way keeps its [`ACTIVE_CLASS`] until its own
    /// [`Popover::sync`] runs.
    pub fn show(&mut self, surface: &mut S) {
        self.registry.activate(self.id);
        surface.add_class(self.root, ACTIVE_CLASS);
        self.shown = true;
        log::debug!("open popover {}", self.id.get());
    }

    /// Close. The registry is only cleared if it points at this popover.
    pub fn hide(&mut self, surface: &mut S) {
        self.registry.release(self.id);
        surface.remove_class(self.root, ACTIVE_CLASS);
        self.shown = false;
        log::debug!("close popover {}", self.id.get());
    }

    /// Drop the [`ACTIVE_CLASS`] if another popover or a dismiss closed this
    /// one. Returns whether anything changed.
    pub fn sync(&mut self, surface: &mut S) -> bool {
        if !self.shown || self.is_open() {
            return false;
        }
        surface.remove_class(self.root, ACTIVE_CLASS);
        self.shown = false;
        log::debug!("popover {} closed elsewhere", self.id.get());
        true
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self, surface: &mut S) {
        if self.is_open() {
            self.hide(surface);
        } else {
            self.show(surface);
        }
    }

    /// Current panel direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change the panel direction. `None` leaves everything as is.
    pub fn set_direction(&mut self, surface: &mut S, direction: Option<Direction>) {
        let Some(direction) = direction else {
            return;
        };
        surface.remove_class(self.panel, &self.direction.class());
        surface.add_class(self.panel, &direction.class());
        self.direction = direction;
        self.size();
    }

    /// Request a layout pass; see [`Popover::layout`].
    pub fn size(&mut self) {
        self.layout_pending = true;
    }

    /// Whether a layout pass was requested and has not run yet.
    pub fn needs_layout(&self) -> bool {
        self.layout_pending
    }

    /// Measure trigger and items and transform the collapsed panel.
    ///
    /// Call once the layout boxes are final. Skipped (and logged) when there
    /// are no items or the first item has no area.
    pub fn layout(&mut self, surface: &mut S) -> Option<PanelTransform> {
        self.layout_pending = false;
        let Some(first) = self.items.first() else {
            log::warn!("popover {}: no items to lay out", self.id.get());
            return None;
        };
        let trigger = surface.layout_size(self.trigger);
        let item = surface.layout_size(first.entry.item().root());
        let panel = surface.layout_size(self.panel);
        let Some(fit) =
            PanelTransform::fit(self.direction, trigger, item, self.items.len(), panel)
        else {
            log::warn!(
                "popover {}: item `{}` has no area, layout skipped",
                self.id.get(),
                first.key
            );
            return None;
        };
        surface.set_transform(self.panel, fit.to_affine());
        log::debug!(
            "popover {} layout {}: translate {:?} scale {:?}",
            self.id.get(),
            self.direction,
            fit.translate,
            fit.scale
        );
        Some(fit)
    }

    /// Current value.
    pub fn value(&self) -> Option<&str> {
        self.selection.value()
    }

    /// Set the current value. Returns `Ok(false)` if it was already current.
    ///
    /// Outside menu mode this also moves the `active` marker to the item whose
    /// `href` is `#/<value>`.
    pub fn set_value(&mut self, surface: &mut S, value: &str) -> Result<bool> {
        self.selection.select(surface, value)
    }

    /// Pulse the error class on the root. A new pulse restarts the timer.
    pub fn error(&mut self, surface: &mut S, now: u64) {
        surface.add_class(self.root, ERROR_CLASS);
        self.error_pulse.start(now, ERROR_PULSE_MS);
    }

    /// Advance timers to `now`.
    pub fn tick(&mut self, surface: &mut S, now: u64) -> Result<()> {
        if self.error_pulse.fire_if_due(now) {
            surface.remove_class(self.root, ERROR_CLASS);
        }
        let mut cx = ItemContext {
            surface,
            callbacks: &mut self.callbacks,
            selection: &mut self.selection,
            now,
        };
        for slot in &mut self.items {
            slot.entry.item_mut().tick(&mut cx)?;
        }
        Ok(())
    }

    /// Earliest pending deadline across the error pulse and every item.
    pub fn next_deadline(&self) -> Option<u64> {
        self.items
            .iter()
            .map(|s| s.entry.item().next_deadline())
            .fold(self.error_pulse.due(), timer::earliest)
    }

    /// Whether `listener` is one of the root listeners.
    pub fn owns_listener(&self, listener: ListenerId) -> bool {
        listener == self.toggle_listener || listener == self.item_listener
    }

    /// Handle one dispatch step.
    ///
    /// Returns `Ok(None)` when neither the popover nor any of its items owns
    /// `dispatch.listener`.
    pub fn handle(
        &mut self,
        surface: &mut S,
        dispatch: &Dispatch,
        now: u64,
    ) -> Result<Option<Outcome>> {
        if dispatch.listener == self.toggle_listener {
            self.trigger_clicked(surface);
            return Ok(Some(Outcome::Stop));
        }
        if dispatch.listener == self.item_listener {
            let anchor = dispatch.delegate_target.unwrap_or(dispatch.target);
            self.route(surface, anchor, now)?;
            return Ok(Some(Outcome::Continue));
        }

        let mut cx = ItemContext {
            surface,
            callbacks: &mut self.callbacks,
            selection: &mut self.selection,
            now,
        };
        for slot in &mut self.items {
            if slot.entry.item_mut().listener_fired(dispatch.listener, &mut cx)? {
                return Ok(Some(Outcome::Continue));
            }
        }
        Ok(None)
    }

    fn trigger_clicked(&mut self, surface: &mut S) {
        if self.is_open() {
            if self.auto_hide {
                self.hide(surface);
            } else {
                log::trace!("popover {} already open", self.id.get());
            }
            return;
        }
        let allowed = self.will_open.as_mut().is_none_or(|will_open| will_open());
        if allowed {
            self.show(surface);
        } else {
            log::debug!("popover {}: will_open refused", self.id.get());
        }
    }

    /// Route a click on `anchor` to its item.
    fn route(&mut self, surface: &mut S, anchor: ElementId, now: u64) -> Result<()> {
        let href = surface.attr(anchor, "href").unwrap_or_default().to_string();
        let link = surface.has_class(anchor, Link::CLASS);
        let route = path::decode(&href, link)?;
        let key = route.lookup_key();
        log::trace!("popover {} route {route:?}", self.id.get());

        let slot = self
            .items
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| PopoverError::UnknownItem(key.to_string()))?;
        let args = route.handler_args();
        let mut cx = ItemContext {
            surface,
            callbacks: &mut self.callbacks,
            selection: &mut self.selection,
            now,
        };
        slot.entry.item_mut().invoke(route.handler(), &args, &mut cx)
    }

    /// Tear down: cancel timers, release the registry, remove every item,
    /// detach both root listeners and remove the root.
    pub fn remove(mut self, surface: &mut S) {
        self.error_pulse.cancel();
        self.registry.release(self.id);
        for slot in &mut self.items {
            slot.entry.item_mut().remove(surface);
        }
        surface.off(self.toggle_listener);
        surface.off(self.item_listener);
        surface.remove(self.root);
        log::debug!("removed popover {}", self.id.get());
    }

    fn slot(&self, key: &str) -> Option<&Slot<S>> {
        self.items.iter().find(|s| s.key == key)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Slot<S>> {
        self.items.iter_mut().find(|s| s.key == key)
    }
}
