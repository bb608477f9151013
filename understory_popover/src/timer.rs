// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-clocked one-shot timers.
//!
//! Nothing here sleeps or schedules. Callers pass the current time in
//! milliseconds (the same clock the host uses for pointer events) and ask
//! whether a deadline has passed. Cancelling is dropping the deadline.

/// Delay before a second click on an armed button fires it.
pub const CONFIRM_DELAY_MS: u64 = 500;

/// How long the error pulse class stays on the popover root.
pub const ERROR_PULSE_MS: u64 = 600;

/// A one-shot deadline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    due: Option<u64>,
}

impl Timer {
    /// A timer that is not running.
    pub const fn idle() -> Self {
        Self { due: None }
    }

    /// A timer started at `now`.
    pub const fn started(now: u64, delay: u64) -> Self {
        Self {
            due: Some(now.saturating_add(delay)),
        }
    }

    /// (Re)start the timer at `now`.
    pub fn start(&mut self, now: u64, delay: u64) {
        *self = Self::started(now, delay);
    }

    /// Stop the timer without firing.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Deadline, if running.
    pub fn due(&self) -> Option<u64> {
        self.due
    }

    /// Running and not yet due at `now`.
    pub fn is_pending(&self, now: u64) -> bool {
        self.due.is_some_and(|due| now < due)
    }

    /// If the deadline has passed at `now`, stop the timer and return `true`.
    pub fn fire_if_due(&mut self, now: u64) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of two optional deadlines.
pub(crate) fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
