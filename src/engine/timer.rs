//! Countdown timer.
//!
//! Counts down from the level's time budget in whole-second ticks on
//! the engine's millisecond timeline. Armed by the first flip, disarmed
//! by a terminal outcome or a reset. Disarmed means no next tick is
//! scheduled at all, so a stale timer cannot fire into a later session.

use serde::{Deserialize, Serialize};

/// Whole-second countdown driven by the engine's timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    next_tick_ms: Option<u64>,
}

impl Countdown {
    /// Create a disarmed countdown with a full budget.
    #[must_use]
    pub fn new(limit_secs: u32) -> Self {
        Self {
            remaining: limit_secs,
            next_tick_ms: None,
        }
    }

    /// Seconds remaining.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Is a tick currently scheduled?
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.next_tick_ms.is_some()
    }

    /// Arm the countdown: first tick one second from `now_ms`.
    ///
    /// A no-op when already armed or already expired.
    pub fn arm(&mut self, now_ms: u64) {
        if self.next_tick_ms.is_none() && self.remaining > 0 {
            self.next_tick_ms = Some(now_ms + 1000);
        }
    }

    /// Disarm the countdown, dropping the scheduled tick.
    pub fn disarm(&mut self) {
        self.next_tick_ms = None;
    }

    /// Absolute time of the next tick, if armed.
    #[must_use]
    pub fn next_tick_ms(&self) -> Option<u64> {
        self.next_tick_ms
    }

    /// Consume the tick at `tick_ms`, returning the new remaining count.
    ///
    /// Schedules the following tick one second later, or disarms when
    /// the budget is exhausted. Callers only invoke this for the
    /// instant reported by `next_tick_ms`.
    pub fn tick(&mut self, tick_ms: u64) -> u32 {
        debug_assert_eq!(self.next_tick_ms, Some(tick_ms));

        self.remaining = self.remaining.saturating_sub(1);
        self.next_tick_ms = if self.remaining > 0 {
            Some(tick_ms + 1000)
        } else {
            None
        };
        self.remaining
    }
}
