// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popover --heading-base-level=0

//! Understory Popover: expandable trigger-and-panel menus.
//!
//! ## Overview
//!
//! A [`Popover`] is a trigger that opens a panel of items. Items are links,
//! rows of icon buttons, or custom items supplied by the application. Every
//! clickable anchor carries an *action path* in its `href`
//! (`#/<action>[/<item>[/<sub_action>[/<args>...]]]`, see [`path`]) and a single
//! delegated listener on the popover routes clicks to the owning item.
//!
//! ## Items
//!
//! - [`Link`]: a titled anchor. Clicking it makes it the current value (unless
//!   the popover is a menu) and calls the callback named by the first segment
//!   of its key, so `node/p` and `node/image` both report to `node`.
//! - [`ButtonGroup`]: icon buttons sharing one key. Callbacks are keyed by
//!   button name. A button may require a second click before it fires.
//! - Custom items implement [`Item`] and are built by an [`ItemFactory`], which
//!   receives a [`ChangeSink`] reporting to the callback under the item's key.
//!
//! ## One open popover
//!
//! Popovers sharing an [`ActiveRegistry`] close each other: opening one closes
//! the previous one, and a click that no popover stops (a click on the
//! document) closes whichever is open.
//!
//! ## Time and layout
//!
//! Nothing here sleeps or schedules. The host passes its clock (`now`, in
//! milliseconds) to clicks and [`Popover::tick`], asks [`Popover::next_deadline`]
//! when to tick next, and calls [`Popover::layout`] once geometry is final.
//! [`Document`] bundles all of this for a [`Tree`](understory_surface::Tree).
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use understory_popover::{
//!     ButtonGroupOptions, ButtonOptions, Callbacks, Document, PopoverConfig,
//! };
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let (node, delete) = (log.clone(), log.clone());
//! let callbacks = Callbacks::new()
//!     .with("node", move |args| node.borrow_mut().push(format!("node {args:?}")))
//!     .with("delete", move |_| delete.borrow_mut().push("delete".to_string()));
//!
//! let config = PopoverConfig::new()
//!     .with_item(
//!         "tools",
//!         ButtonGroupOptions::new()
//!             .with("delete", ButtonOptions::new("delete").with_confirm(true)),
//!     )
//!     .with_link("node/p", "Paragraph");
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let id = doc.insert(body, config, callbacks).unwrap();
//!
//! // Open it by clicking the trigger.
//! let trigger = doc.popover(id).unwrap().trigger();
//! doc.click(trigger, 0).unwrap();
//! assert!(doc.popover(id).unwrap().is_open());
//!
//! // Pick the paragraph link.
//! let link = doc.popover(id).unwrap().item_root("node/p").unwrap();
//! doc.click(link, 10).unwrap();
//! assert_eq!(doc.popover(id).unwrap().value(), Some("node/p"));
//!
//! // Delete needs two clicks, at least 500 ms apart.
//! let tools = doc.popover(id).unwrap().buttons("tools").unwrap();
//! let delete = tools.button_element("delete").unwrap();
//! doc.click(delete, 100).unwrap();
//! doc.click(delete, 200).unwrap();
//! doc.click(delete, 700).unwrap();
//!
//! // A click outside closes it.
//! doc.click(body, 800).unwrap();
//! assert!(!doc.popover(id).unwrap().is_open());
//! assert_eq!(*log.borrow(), ["node [\"p\"]", "delete"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod buttons;
mod callbacks;
mod config;
mod direction;
mod document;
mod error;
mod item;
mod link;
pub mod path;
mod popover;
mod registry;
mod selection;
mod timer;

pub use buttons::{ButtonGroup, ButtonGroupOptions, ButtonOptions, CONFIRM_CLASS, Press};
pub use callbacks::{Callbacks, ChangeSink};
pub use config::{DEFAULT_SIZE, PopoverConfig};
pub use direction::{Direction, PanelTransform};
pub use document::Document;
pub use error::{PopoverError, Result};
pub use item::{HandlerTable, Item, ItemContext, ItemFactory, ItemKind};
pub use link::{Link, LinkOptions};
pub use popover::{ERROR_CLASS, Popover};
pub use registry::{ActiveRegistry, PopoverId};
pub use selection::{ACTIVE_CLASS, Selection};
pub use timer::{CONFIRM_DELAY_MS, ERROR_PULSE_MS, Timer};
