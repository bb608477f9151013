// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the surface: element identifiers, flags, listeners, and selectors.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Identifier for an element in the tree.
///
/// This is a small, copyable handle that stays stable while the element is alive
/// and becomes invalid when the element is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Stale identifiers never alias a different live element because the generation must match.
/// Every [`Tree`](crate::Tree) operation given a stale identifier is a no-op (or returns `None`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is visible (its subtree participates in hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Element is pickable (can be the target of a hit test).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Identifier for an attached event listener.
///
/// Listener identifiers are never reused within a tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Kinds of pointer events an element can listen for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// A completed click. Bubbles from the target to the root.
    Click,
    /// The pointer left the element. Delivered to the element only.
    PointerOut,
}

impl EventKind {
    /// Whether listeners on ancestors of the target see this event.
    pub const fn bubbles(self) -> bool {
        match self {
            Self::Click => true,
            Self::PointerOut => false,
        }
    }
}

/// A parsed element descriptor such as `div.pop-items.pop-c` or `a#close.pop-link`.
///
/// The grammar is `tag[#id][.class]*`. A descriptor that starts with `.` or `#`
/// names no tag and defaults to `div`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    /// Element tag name.
    pub tag: String,
    /// Optional `id` attribute.
    pub id: Option<String>,
    /// Classes in declaration order.
    pub classes: Vec<String>,
}

impl Selector {
    /// Parse a descriptor. Empty segments (for example `div..a`) are dropped.
    pub fn parse(descriptor: &str) -> Self {
        let descriptor = descriptor.trim();
        let tag_end = descriptor.find(['#', '.']).unwrap_or(descriptor.len());
        let tag = match &descriptor[..tag_end] {
            "" => "div".to_string(),
            t => t.to_string(),
        };

        let mut rest = &descriptor[tag_end..];
        let mut id = None;
        if let Some(after_hash) = rest.strip_prefix('#') {
            let end = after_hash.find('.').unwrap_or(after_hash.len());
            if end > 0 {
                id = Some(after_hash[..end].to_string());
            }
            rest = &after_hash[end..];
        }

        let classes = rest
            .split('.')
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect();

        Self { tag, id, classes }
    }
}
