// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event propagation: which listeners see an event, and in what order.
//!
//! ## Overview
//!
//! [`Tree::propagation`] turns a target element and an [`EventKind`] into a flat
//! sequence of [`Dispatch`] steps: first the target's own listeners
//! ([`Phase::Target`]), then, for bubbling events, each ancestor's listeners
//! from the parent up to the root ([`Phase::Bubble`]). Listeners on one element
//! appear in attachment order.
//!
//! Delegated listeners (attached with a tag filter) are only included when the
//! target sits inside a matching element below the listening one. The matching
//! element is reported as [`Dispatch::delegate_target`].
//!
//! ## Stopping
//!
//! The tree computes the order; the host runs it. [`deliver`] walks a sequence
//! and honours [`Outcome::Stop`]: the remaining listeners on the same element
//! still run, then propagation ends.

use alloc::vec::Vec;

use crate::tree::Tree;
use crate::types::{ElementId, EventKind, ListenerId};

/// Phases of event propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Listener attached to the target element itself.
    Target,
    /// Listener attached to an ancestor of the target.
    Bubble,
}

/// Listener outcome controlling propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Keep propagating.
    Continue,
    /// Stop propagating once the current element's listeners have run.
    Stop,
}

/// A single dispatch step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Dispatch {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Kind of event being delivered.
    pub kind: EventKind,
    /// Element the event was aimed at.
    pub target: ElementId,
    /// Element the listener is attached to.
    pub current: ElementId,
    /// Listener to invoke.
    pub listener: ListenerId,
    /// For delegated listeners, the matching element between target and `current`.
    pub delegate_target: Option<ElementId>,
}

impl Tree {
    /// Build the dispatch sequence for an event aimed at `target`.
    ///
    /// Returns an empty sequence for stale targets.
    pub fn propagation(&self, target: ElementId, kind: EventKind) -> Vec<Dispatch> {
        let mut out = Vec::new();
        let path = self.path_to_root(target);
        for (depth, &current) in path.iter().rev().enumerate() {
            if depth > 0 && !kind.bubbles() {
                break;
            }
            let phase = if depth == 0 {
                Phase::Target
            } else {
                Phase::Bubble
            };
            for l in self.listeners_on(current, kind) {
                let delegate_target = match &l.delegate {
                    Some(tag) => match self.closest(target, tag, current) {
                        Some(found) => Some(found),
                        None => continue,
                    },
                    None => None,
                };
                out.push(Dispatch {
                    phase,
                    kind,
                    target,
                    current,
                    listener: l.id,
                    delegate_target,
                });
            }
        }
        out
    }
}

/// Walk a dispatch sequence, calling `deliver_one` for each step.
///
/// Returns `Ok(true)` if a listener stopped propagation. The first error aborts
/// the walk and is returned as-is.
pub fn deliver<E>(
    seq: &[Dispatch],
    mut deliver_one: impl FnMut(&Dispatch) -> Result<Outcome, E>,
) -> Result<bool, E> {
    let mut stopped_at: Option<ElementId> = None;
    for d in seq {
        if let Some(el) = stopped_at
            && el != d.current
        {
            break;
        }
        if deliver_one(d)? == Outcome::Stop {
            stopped_at = Some(d.current);
        }
    }
    Ok(stopped_at.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn nested() -> (Tree, ElementId, ElementId, ElementId, ElementId) {
        let mut tree = Tree::new();
        let root = tree.create("div.pop");
        let panel = tree.create("div.pop-items");
        let link = tree.create("a.pop-link");
        let icon = tree.create("i.icon");
        tree.append(root, panel);
        tree.append(panel, link);
        tree.append(link, icon);
        (tree, root, panel, link, icon)
    }

    #[test]
    fn click_bubbles_in_attachment_order() {
        let (mut tree, root, _, link, _) = nested();
        let on_link = tree.on(link, EventKind::Click, None);
        let root_a = tree.on(root, EventKind::Click, None);
        let root_b = tree.on(root, EventKind::Click, None);
        let seq = tree.propagation(link, EventKind::Click);
        let order: Vec<(Phase, ListenerId)> = seq.iter().map(|d| (d.phase, d.listener)).collect();
        assert_eq!(
            order,
            vec![
                (Phase::Target, on_link),
                (Phase::Bubble, root_a),
                (Phase::Bubble, root_b),
            ]
        );
    }

    #[test]
    fn delegated_listener_reports_matching_element() {
        let (mut tree, root, panel, link, icon) = nested();
        let delegated = tree.on(root, EventKind::Click, Some("a"));
        let seq = tree.propagation(icon, EventKind::Click);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].listener, delegated);
        assert_eq!(seq[0].delegate_target, Some(link));

        // Clicking outside any anchor skips the delegated listener.
        assert!(tree.propagation(panel, EventKind::Click).is_empty());
    }

    #[test]
    fn pointer_out_does_not_bubble() {
        let (mut tree, root, _, link, _) = nested();
        let _on_root = tree.on(root, EventKind::PointerOut, None);
        let on_link = tree.on(link, EventKind::PointerOut, None);
        let seq = tree.propagation(link, EventKind::PointerOut);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].listener, on_link);
        assert_eq!(seq[0].phase, Phase::Target);
    }

    #[test]
    fn stop_finishes_current_element_then_halts() {
        let (mut tree, root, panel, link, _) = nested();
        let on_link = tree.on(link, EventKind::Click, None);
        let on_panel_a = tree.on(panel, EventKind::Click, None);
        let on_panel_b = tree.on(panel, EventKind::Click, None);
        let _on_root = tree.on(root, EventKind::Click, None);
        let seq = tree.propagation(link, EventKind::Click);

        let mut seen = Vec::new();
        let stopped = deliver::<()>(&seq, |d| {
            seen.push(d.listener);
            Ok(if d.listener == on_panel_a {
                Outcome::Stop
            } else {
                Outcome::Continue
            })
        })
        .unwrap();
        assert!(stopped);
        assert_eq!(seen, vec![on_link, on_panel_a, on_panel_b]);
    }

    #[test]
    fn errors_abort_the_walk() {
        let (mut tree, root, _, link, _) = nested();
        let on_link = tree.on(link, EventKind::Click, None);
        let _on_root = tree.on(root, EventKind::Click, None);
        let seq = tree.propagation(link, EventKind::Click);
        let mut calls = 0;
        let res = deliver(&seq, |d| {
            calls += 1;
            if d.listener == on_link {
                Err("boom")
            } else {
                Ok(Outcome::Continue)
            }
        });
        assert_eq!(res, Err("boom"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn stale_target_yields_nothing() {
        let (mut tree, root, _, link, _) = nested();
        let _ = tree.on(root, EventKind::Click, None);
        tree.remove(link);
        assert!(tree.propagation(link, EventKind::Click).is_empty());
    }
}
