// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback table keyed by action bucket.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::{PopoverError, Result};

type Callback = Box<dyn FnMut(&[&str])>;

/// Application callbacks, keyed by top-level action name.
///
/// Links call the bucket of their key (`node` for `node/p`), buttons call their
/// button name, and custom items call their item key through a [`ChangeSink`].
///
/// ```
/// use understory_popover::Callbacks;
///
/// let mut cbs = Callbacks::new().with("delete", |args| assert!(args.is_empty()));
/// cbs.invoke("delete", &[]).unwrap();
/// assert!(cbs.invoke("missing", &[]).is_err());
/// ```
#[derive(Default)]
pub struct Callbacks {
    table: BTreeMap<String, Callback>,
}

impl core::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        f.debug_struct("Callbacks").field("names", &names).finish()
    }
}

impl Callbacks {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Callbacks::insert`].
    #[must_use]
    pub fn with(mut self, name: &str, callback: impl FnMut(&[&str]) + 'static) -> Self {
        self.insert(name, callback);
        self
    }

    /// Register `callback` under `name`, returning `true` if it replaced one.
    pub fn insert(&mut self, name: &str, callback: impl FnMut(&[&str]) + 'static) -> bool {
        self.table
            .insert(name.to_string(), Box::new(callback))
            .is_some()
    }

    /// Whether a callback is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Invoke the callback registered under `name` with positional arguments.
    pub fn invoke(&mut self, name: &str, args: &[&str]) -> Result<()> {
        let cb = self
            .table
            .get_mut(name)
            .ok_or_else(|| PopoverError::MissingCallback(name.to_string()))?;
        log::trace!("callback `{name}` {args:?}");
        cb(args);
        Ok(())
    }
}

/// Value-change hook injected into custom items.
///
/// Emitting a value invokes the callback registered under the item's key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSink {
    key: String,
}

impl ChangeSink {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    /// Item key this sink reports under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Report a new value.
    pub fn emit(&self, callbacks: &mut Callbacks, value: &str) -> Result<()> {
        callbacks.invoke(&self.key, &[value])
    }
}
