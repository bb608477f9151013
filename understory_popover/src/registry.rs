// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active-popover registry.
//!
//! At most one popover is open per registry. Popovers that should close each
//! other share a registry (clone it; clones share state). A popover's open flag
//! is derived from the registry, so opening one popover closes the previous one
//! without either holding a reference to the other.
//!
//! The registry never touches a surface. Each popover owns its `active` class
//! and drops it in [`Popover::sync`](crate::Popover::sync) once the registry
//! no longer points at it, so popovers in different surfaces can share one
//! registry.

use alloc::rc::Rc;
use core::cell::Cell;

/// Identity of a popover within its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopoverId(u64);

impl PopoverId {
    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Shared {
    active: Cell<Option<PopoverId>>,
    next_id: Cell<u64>,
}

/// Shared record of which popover is open.
///
/// ```
/// use understory_popover::ActiveRegistry;
///
/// let registry = ActiveRegistry::new();
/// let (a, b) = (registry.allocate(), registry.allocate());
///
/// assert_eq!(registry.activate(a), None);
/// assert_eq!(registry.activate(b), Some(a));
/// assert!(registry.is_active(b));
///
/// // Releasing someone else's slot does nothing.
/// assert!(!registry.release(a));
/// assert_eq!(registry.dismiss(), Some(b));
/// assert_eq!(registry.active(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActiveRegistry {
    shared: Rc<Shared>,
}

impl ActiveRegistry {
    /// Create a registry with nothing open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh popover id.
    pub fn allocate(&self) -> PopoverId {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        PopoverId(id)
    }

    /// The open popover, if any.
    pub fn active(&self) -> Option<PopoverId> {
        self.shared.active.get()
    }

    /// Whether `id` is the open popover.
    pub fn is_active(&self, id: PopoverId) -> bool {
        self.active() == Some(id)
    }

    /// Record `id` as open. Returns the popover this closed, if any.
    pub fn activate(&self, id: PopoverId) -> Option<PopoverId> {
        let prev = self.shared.active.replace(Some(id)).filter(|&prev| prev != id)?;
        log::debug!("closing popover {} for {}", prev.0, id.0);
        Some(prev)
    }

    /// Clear the record if it points at `id`. Returns whether it did.
    pub fn release(&self, id: PopoverId) -> bool {
        if self.is_active(id) {
            self.shared.active.set(None);
            true
        } else {
            false
        }
    }

    /// Close whatever is open, as a click outside every popover does.
    pub fn dismiss(&self) -> Option<PopoverId> {
        let prev = self.shared.active.take()?;
        log::debug!("dismissed popover {}", prev.0);
        Some(prev)
    }

    /// Whether `self` and `other` share state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}
