//! Cancellable scheduled tasks.
//!
//! Resolution delays (settle, flip-back, clear-flipped) are modelled as
//! data: a task is queued with an absolute due time on the engine's
//! millisecond timeline and delivered when the timeline advances past
//! it. Everything runs on one thread; there is no preemption and no
//! locking.
//!
//! ## Cancellation discipline
//!
//! Every task carries the `SessionId` it was issued for. On reset the
//! engine cancels the whole session's tasks; should a stale task
//! survive anyway, the engine drops it when the tag no longer matches
//! the live session. A pre-reset delay must never touch a post-reset
//! board.

use serde::{Deserialize, Serialize};

use super::session::SessionId;

/// What a scheduled task does when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Permanently mark a matched pair.
    SettleMatch { first: usize, second: usize },
    /// Turn an unmatched pair face-down again.
    FlipBack { first: usize, second: usize },
    /// Clear the flipped-index set, unblocking new flips.
    ClearFlipped,
}

/// A scheduled task: what to do, when, and for which session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// The session this task was issued for.
    pub session: SessionId,

    /// Absolute due time on the scheduler's timeline.
    pub due_ms: u64,

    /// The effect to apply.
    pub kind: TaskKind,
}

/// Single-threaded task timeline.
///
/// Tasks come due in `due_ms` order; ties deliver in scheduling order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskScheduler {
    tasks: Vec<ScheduledTask>,
    now_ms: u64,
}

impl TaskScheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the timeline.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queue a task `delay_ms` from now for the given session.
    pub fn schedule_in(&mut self, session: SessionId, delay_ms: u64, kind: TaskKind) {
        self.tasks.push(ScheduledTask {
            session,
            due_ms: self.now_ms + delay_ms,
            kind,
        });
    }

    /// Due time of the next pending task, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.due_ms).min()
    }

    /// Advance the timeline to `now_ms` and take every task now due.
    ///
    /// Returned tasks are ordered by due time, scheduling order for
    /// ties. Does not move the timeline backwards.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<ScheduledTask> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }

        let mut due: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|task| {
            if task.due_ms <= self.now_ms {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| t.due_ms); // stable: ties keep scheduling order

        due
    }

    /// Cancel every task belonging to a session.
    ///
    /// Returns how many tasks were dropped.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.session != session);
        let dropped = before - self.tasks.len();
        if dropped > 0 {
            log::trace!("cancelled {dropped} task(s) for {session}");
        }
        dropped
    }

    /// Number of pending tasks for a session.
    #[must_use]
    pub fn pending(&self, session: SessionId) -> usize {
        self.tasks.iter().filter(|t| t.session == session).count()
    }

    /// Are there no pending tasks at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
