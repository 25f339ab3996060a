//! # Press State
//!
//! The only mutable state in the resolver: when the back button was last
//! pressed on a terminal page, for the "press back again to exit" gesture.
//!
//! ```text
//! PressState
//! └── last_press_ms: Option<u64>   // None = no pending press
//! ```
//!
//! Lives as long as the resolver and is never persisted. Time comes from a
//! `Clock` so the double-tap window can be tested without sleeping.

use std::time::Duration;

/// Source of "now" in milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Outcome of registering a press on a terminal page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// First press (or the previous one expired): warn the user.
    Armed,
    /// Second press inside the window: exit.
    Confirmed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PressState {
    pub last_press_ms: Option<u64>,
}

impl PressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a terminal press at `now_ms`.
    ///
    /// A press strictly inside `window` of the previous one confirms and
    /// clears the state; anything else arms it with the new timestamp.
    pub fn register(&mut self, now_ms: u64, window: Duration) -> PressOutcome {
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        match self.last_press_ms {
            Some(last) if now_ms.saturating_sub(last) < window_ms => {
                self.last_press_ms = None;
                PressOutcome::Confirmed
            }
            _ => {
                self.last_press_ms = Some(now_ms);
                PressOutcome::Armed
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_press_ms = None;
    }
}
