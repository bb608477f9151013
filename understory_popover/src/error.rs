// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the popover crate.

use alloc::string::String;

use thiserror::Error;

/// Errors raised while building popovers or routing clicks to their items.
///
/// Visual failure modes (a rejected `will_open`, the error pulse) are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PopoverError {
    /// An anchor's `href` is not a valid action path.
    #[error("malformed action path `{0}`")]
    MalformedPath(String),

    /// A routed path or selection names an item the popover does not own.
    #[error("no item named `{0}`")]
    UnknownItem(String),

    /// An item has no handler registered under the routed action.
    #[error("item `{item}` has no handler for `{action}`")]
    UnknownHandler {
        /// Item key.
        item: String,
        /// Requested action.
        action: String,
    },

    /// No callback is registered for an action bucket.
    #[error("no callback registered for `{0}`")]
    MissingCallback(String),

    /// A button group has no button with this name.
    #[error("no button named `{0}`")]
    UnknownButton(String),

    /// A direction string is not one of `c`, `n`, `ne`, `e`, `se`, `s`, `sw`, `w`, `nw`.
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),

    /// The popover handle no longer refers to a live popover.
    #[error("stale popover handle")]
    StalePopover,

    /// Two items were configured under the same key.
    #[error("duplicate item `{0}`")]
    DuplicateItem(String),
}

/// Result alias for popover operations.
pub type Result<T> = core::result::Result<T, PopoverError>;
