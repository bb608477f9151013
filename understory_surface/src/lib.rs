// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_surface --heading-base-level=0

//! Understory Surface: a headless, retained element tree for widget logic.
//!
//! Widgets such as popovers and menus need a small set of primitives from whatever draws them:
//! create an element from a descriptor, toggle classes, read and write attributes, attach and
//! detach listeners, measure boxes, and apply transforms. This crate names that contract as the
//! [`Surface`] trait and ships [`Tree`], an in-memory implementation suitable for tests, demos,
//! and hosts that mirror their own scene into it.
//!
//! - Elements carry a tag, ordered classes, attributes, text, a layout box and a transform.
//! - [`ElementId`] is generational; stale ids are tolerated everywhere.
//! - Listeners are attached per element and [`EventKind`], optionally delegated to a tag.
//! - [`Tree::propagation`] computes target → bubble dispatch order; [`deliver`] walks it.
//! - [`PointerTracker`] turns hovered-path changes into pointer-out/over transitions.
//! - [`Tree::hit_test_point`] maps a world-space point to the topmost element.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything. Hosts write the layout
//! boxes they computed with [`Tree::set_bounds`]; widgets read them back through
//! [`Surface::layout_size`].
//!
//! ## Minimal usage
//!
//! ```
//! use understory_surface::{EventKind, Outcome, Tree, deliver};
//!
//! let mut tree = Tree::new();
//! let root = tree.create("div.pop.pop-small");
//! let link = tree.create("a.pop-link");
//! tree.append(root, link);
//! tree.set_attr(link, "href", "#/node/p");
//!
//! let delegated = tree.on(root, EventKind::Click, Some("a"));
//! let seq = tree.propagation(link, EventKind::Click);
//! assert_eq!(seq[0].listener, delegated);
//! assert_eq!(seq[0].delegate_target, Some(link));
//!
//! let stopped = deliver::<()>(&seq, |_| Ok(Outcome::Stop)).unwrap();
//! assert!(stopped);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod events;
mod pointer;
mod surface;
mod tree;
mod types;

pub use events::{Dispatch, Outcome, Phase, deliver};
pub use pointer::{PointerTracker, PointerTransition};
pub use surface::Surface;
pub use tree::Tree;
pub use types::{ElementFlags, ElementId, EventKind, ListenerId, Selector};
