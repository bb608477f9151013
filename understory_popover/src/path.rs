// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action paths: encode click targets as `href`s and decode them back into routes.
//!
//! ## Grammar
//!
//! `#/<action>[/<item>[/<sub_action>[/<args>...]]]`
//!
//! ## Two decodings
//!
//! Link items are addressed by their full key, which may itself contain slashes
//! (`node/p`). Everything after the first segment is the item key and there is no
//! sub-action.
//!
//! Every other item uses a fixed prefix: the first segment is the item key, the
//! second (optional) picks the handler, and the rest are positional arguments.
//!
//! ```
//! use understory_popover::path::{decode, encode};
//!
//! let href = encode("tools", Some("tool"), Some("5"));
//! assert_eq!(href, "#/tools/tool/5");
//!
//! let route = decode(&href, false).unwrap();
//! assert_eq!(route.lookup_key(), "tools");
//! assert_eq!(route.handler(), "tool");
//! assert_eq!(route.args, ["5"]);
//!
//! let route = decode("#/node/p", true).unwrap();
//! assert_eq!(route.item_key, Some("p"));
//! assert_eq!(route.lookup_key(), "node/p");
//! assert_eq!(route.handler(), "click");
//! assert!(route.args.is_empty());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::{PopoverError, Result};

/// Prefix shared by every action path.
pub const PREFIX: &str = "#/";

/// Handler invoked when a path carries no sub-action.
pub const DEFAULT_HANDLER: &str = "click";

/// Build the path for an item's child, e.g. `#/tools/delete` or `#/tools/tool/5`.
pub fn encode(action: &str, child: Option<&str>, value: Option<&str>) -> String {
    let mut href = String::from(PREFIX);
    href.push_str(action);
    for segment in [child, value].into_iter().flatten() {
        href.push('/');
        href.push_str(segment);
    }
    href
}

/// A decoded click target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route<'a> {
    /// First path segment. For links this is the callback bucket.
    pub action: &'a str,
    /// For links, the remainder after `action`; otherwise `action` itself.
    pub item_key: Option<&'a str>,
    /// Handler selector; `None` means [`DEFAULT_HANDLER`].
    pub sub_action: Option<&'a str>,
    /// Positional arguments following the sub-action.
    pub args: Vec<&'a str>,
    lookup: &'a str,
    link: bool,
}

impl<'a> Route<'a> {
    /// Key of the owning item in the popover's item map.
    pub fn lookup_key(&self) -> &'a str {
        self.lookup
    }

    /// Handler name to invoke on the item.
    pub fn handler(&self) -> &'a str {
        self.sub_action.unwrap_or(DEFAULT_HANDLER)
    }

    /// Arguments handed to the handler.
    ///
    /// Links receive the segments of their item key, so one bucket callback can
    /// tell `node/p` from `node/image`. Other items receive [`Route::args`].
    pub fn handler_args(&self) -> Vec<&'a str> {
        if self.link {
            self.item_key
                .map(|k| k.split('/').collect())
                .unwrap_or_default()
        } else {
            self.args.clone()
        }
    }
}

/// Decode an `href`. `link` states whether the clicked anchor is a link item.
pub fn decode(href: &str, link: bool) -> Result<Route<'_>> {
    let malformed = || PopoverError::MalformedPath(href.to_string());
    let body = href.strip_prefix(PREFIX).ok_or_else(malformed)?;

    if link {
        let (action, item_key) = match body.split_once('/') {
            Some((action, rest)) => (action, Some(rest).filter(|r| !r.is_empty())),
            None => (body, None),
        };
        if action.is_empty() {
            return Err(malformed());
        }
        return Ok(Route {
            action,
            item_key,
            sub_action: None,
            args: Vec::new(),
            lookup: body.trim_end_matches('/'),
            link,
        });
    }

    let mut segments = body.split('/');
    let action = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(malformed)?;
    let sub_action = segments.next().filter(|s| !s.is_empty());
    Ok(Route {
        action,
        item_key: Some(action),
        sub_action,
        args: segments.collect(),
        lookup: action,
        link,
    })
}

/// First segment of a link's action key: the callback bucket.
pub fn bucket(action: &str) -> &str {
    action.split_once('/').map_or(action, |(b, _)| b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_variants() {
        assert_eq!(encode("title", None, None), "#/title");
        assert_eq!(encode("node/p", None, None), "#/node/p");
        assert_eq!(encode("tools", Some("delete"), None), "#/tools/delete");
        assert_eq!(encode("tools", Some("tool"), Some("5")), "#/tools/tool/5");
    }

    #[test]
    fn link_round_trip() {
        let href = encode("node", Some("p"), None);
        let route = decode(&href, true).unwrap();
        assert_eq!(route.action, "node");
        assert_eq!(route.item_key, Some("p"));
        assert_eq!(route.sub_action, None);
        assert_eq!(route.handler(), "click");
        assert!(route.args.is_empty());
        assert_eq!(route.lookup_key(), "node/p");
        assert_eq!(route.handler_args(), ["p"]);
    }

    #[test]
    fn link_key_may_contain_slashes() {
        let route = decode("#/node/embed/vimeo", true).unwrap();
        assert_eq!(route.item_key, Some("embed/vimeo"));
        assert_eq!(route.lookup_key(), "node/embed/vimeo");
        assert_eq!(route.sub_action, None);
        assert_eq!(route.handler_args(), ["embed", "vimeo"]);
    }

    #[test]
    fn top_level_link_has_no_args() {
        let route = decode("#/title", true).unwrap();
        assert_eq!(route.item_key, None);
        assert_eq!(route.lookup_key(), "title");
        assert!(route.handler_args().is_empty());
    }

    #[test]
    fn button_path_without_value() {
        let href = encode("tools", Some("delete"), None);
        let route = decode(&href, false).unwrap();
        assert_eq!(route.lookup_key(), "tools");
        assert_eq!(route.handler(), "delete");
        assert!(route.handler_args().is_empty());
    }

    #[test]
    fn trailing_segments_are_args() {
        let route = decode("#/title/set/a/b", false).unwrap();
        assert_eq!(route.lookup_key(), "title");
        assert_eq!(route.sub_action, Some("set"));
        assert_eq!(route.args, ["a", "b"]);
    }

    #[test]
    fn item_without_sub_action_defaults_to_click() {
        let route = decode("#/title", false).unwrap();
        assert_eq!(route.handler(), DEFAULT_HANDLER);
        assert!(route.args.is_empty());
    }

    #[test]
    fn malformed_paths() {
        for href in ["", "node/p", "#node", "#/", "#//p"] {
            assert_eq!(
                decode(href, false),
                Err(PopoverError::MalformedPath(href.to_string())),
                "{href}"
            );
        }
        assert!(decode("#/", true).is_err());
        assert!(decode("#//p", true).is_err());
    }

    #[test]
    fn bucket_is_first_segment() {
        assert_eq!(bucket("node/p"), "node");
        assert_eq!(bucket("title"), "title");
    }
}
