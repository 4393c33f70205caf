//! The match engine: the session state machine.
//!
//! Consumes player flip events and elapsed time, resolves pairs,
//! updates score/moves/matched count, and detects terminal outcomes.
//!
//! ## Event model
//!
//! Two inputs drive the machine:
//! - `flip(index)`: a player action
//! - `advance(elapsed_ms)`: the passage of time, delivering due
//!   scheduled tasks and countdown ticks in chronological order
//!
//! Scheduled work (settle, flip-back, clear) and the countdown both
//! live on one millisecond timeline, so interleavings are serialized
//! and deterministic. All work is tagged with the session it was
//! issued for and dropped if that session is no longer live.
//!
//! ## No-op policy
//!
//! Invalid flips (matched, face-up, out-of-range, mid-evaluation, or
//! after a terminal outcome) are reported as `FlipOutcome::Ignored`,
//! never as errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{DeckRng, GiftId, LevelId, LevelTable};
use crate::deck::{self, DeckError};
use crate::providers::GiftItem;

use super::scheduler::{TaskKind, TaskScheduler};
use super::session::{EventRecord, GameSession, Outcome, Phase, SessionId};
use super::timer::Countdown;

/// Resolution delays, in milliseconds. Tunable per embedder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wait before a matched pair is marked permanently revealed.
    pub settle_delay_ms: u64,

    /// Wait before an unmatched pair returns face-down.
    pub flip_back_delay_ms: u64,

    /// Wait before the flipped set clears, unblocking new flips.
    /// Independent of match outcome.
    pub clear_flipped_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            flip_back_delay_ms: 1000,
            clear_flipped_delay_ms: 1000,
        }
    }
}

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipRejection {
    /// Index past the end of the board.
    OutOfRange,
    /// Card already face-up.
    AlreadyFaceUp,
    /// Card's pair already found.
    AlreadyMatched,
    /// Two cards pending evaluation; flips blocked until the clear.
    EvaluationPending,
    /// Session already won or lost.
    SessionOver,
}

/// Result of a flip event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair turned face-up.
    Flipped,
    /// Second card completed a matching pair.
    MatchFound,
    /// Second card did not match; penalty applied.
    Mismatch,
    /// The flip was a silent no-op.
    Ignored(FlipRejection),
}

/// Engine construction or reset failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The level table has no entry for this level.
    #[error("unknown level: {0}")]
    UnknownLevel(LevelId),

    /// Deck generation failed.
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// The session state machine.
///
/// Owns the live session, its countdown, and the task timeline. The
/// level table and (optionally) an external inventory are injected at
/// construction and reused across resets.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    levels: LevelTable,
    timing: TimingConfig,
    rng: DeckRng,
    inventory: Option<Vec<GiftId>>,
    session: GameSession,
    timer: Countdown,
    scheduler: TaskScheduler,
    next_session: u64,
}

impl MatchEngine {
    /// Create an engine playing `level`, dealing from the level's own
    /// gift set.
    pub fn new(levels: LevelTable, level: LevelId, rng: DeckRng) -> Result<Self, EngineError> {
        Self::build(levels, level, rng, None)
    }

    /// Create an engine dealing from externally fetched inventory
    /// items instead of the level's gift set. The inventory is kept
    /// and reused on every reset.
    pub fn with_inventory(
        levels: LevelTable,
        level: LevelId,
        rng: DeckRng,
        items: &[GiftItem],
    ) -> Result<Self, EngineError> {
        let gifts = items.iter().map(|item| item.id.clone()).collect();
        Self::build(levels, level, rng, Some(gifts))
    }

    fn build(
        levels: LevelTable,
        level: LevelId,
        mut rng: DeckRng,
        inventory: Option<Vec<GiftId>>,
    ) -> Result<Self, EngineError> {
        let config = levels
            .get(level)
            .cloned()
            .ok_or(EngineError::UnknownLevel(level))?;
        let gifts = inventory.as_deref().unwrap_or(&config.gift_set);
        let cards = deck::build_deck(&mut rng, config.pair_count, gifts)?;

        let timer = Countdown::new(config.time_limit_secs);
        let session = GameSession::new(SessionId::new(1), level, config, cards);
        log::debug!("engine started: {} on {}", session.id, level);

        Ok(Self {
            levels,
            timing: TimingConfig::default(),
            rng,
            inventory,
            session,
            timer,
            scheduler: TaskScheduler::new(),
            next_session: 2,
        })
    }

    /// Override the resolution delays.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    // === Observation ===

    /// The live session.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// The machine's current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// The injected level table.
    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// The resolution delays in effect.
    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Current time on the engine's timeline, in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Number of scheduled tasks still pending for the live session.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending(self.session.id)
    }

    // === Player input ===

    /// Flip the card at `index`.
    ///
    /// The first flip of a session starts it and arms the countdown.
    /// The second flip of a pair resolves immediately (move counted,
    /// score adjusted); the visual settle and flip-back are scheduled.
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if let Some(rejection) = self.check_flip(index) {
            log::trace!("flip({index}) ignored: {rejection:?}");
            return FlipOutcome::Ignored(rejection);
        }

        if !self.session.started {
            self.session.started = true;
            self.timer.arm(self.scheduler.now_ms());
            log::debug!("{} started, countdown armed", self.session.id);
        }

        self.session.cards[index].is_flipped = true;
        self.session.flipped.push(index);
        self.session.record(EventRecord::Flip { index });

        if self.session.flipped.len() == 2 {
            self.resolve()
        } else {
            FlipOutcome::Flipped
        }
    }

    fn check_flip(&self, index: usize) -> Option<FlipRejection> {
        if self.session.is_terminal() {
            return Some(FlipRejection::SessionOver);
        }
        if self.session.flipped.len() == 2 {
            return Some(FlipRejection::EvaluationPending);
        }
        match self.session.cards.get(index) {
            None => Some(FlipRejection::OutOfRange),
            Some(card) if card.is_matched => Some(FlipRejection::AlreadyMatched),
            Some(card) if card.is_flipped => Some(FlipRejection::AlreadyFaceUp),
            Some(_) => None,
        }
    }

    /// Resolve the two flipped cards. Runs when the second flip lands.
    fn resolve(&mut self) -> FlipOutcome {
        let (first, second) = (self.session.flipped[0], self.session.flipped[1]);
        let id = self.session.id;

        // One evaluation = one move, counted when evaluation begins.
        self.session.moves += 1;

        let is_match = self.session.cards[first].gift == self.session.cards[second].gift;
        if is_match {
            self.session.matched_pairs += 1;
            let points = self.session.config.match_score;
            self.session.add_score(points);
            self.session.record(EventRecord::MatchResolved { first, second });
            self.scheduler.schedule_in(
                id,
                self.timing.settle_delay_ms,
                TaskKind::SettleMatch { first, second },
            );
            self.scheduler
                .schedule_in(id, self.timing.clear_flipped_delay_ms, TaskKind::ClearFlipped);
            log::debug!(
                "{id}: match ({first}, {second}), pairs {}/{}, score {}",
                self.session.matched_pairs,
                self.session.config.pair_count,
                self.session.score
            );

            if self.session.is_complete() {
                self.win();
            }
            FlipOutcome::MatchFound
        } else {
            let penalty = self.session.config.mismatch_penalty;
            self.session.penalize(penalty);
            self.session.record(EventRecord::MismatchResolved { first, second });
            self.scheduler.schedule_in(
                id,
                self.timing.flip_back_delay_ms,
                TaskKind::FlipBack { first, second },
            );
            self.scheduler
                .schedule_in(id, self.timing.clear_flipped_delay_ms, TaskKind::ClearFlipped);
            log::debug!("{id}: mismatch ({first}, {second}), score {}", self.session.score);
            FlipOutcome::Mismatch
        }
    }

    // === Time ===

    /// Advance the timeline by `elapsed_ms`, delivering due scheduled
    /// tasks and countdown ticks in chronological order (tasks first on
    /// an exact tie).
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now_ms() + elapsed_ms;

        loop {
            let next_task = self.scheduler.next_due().filter(|&t| t <= target);
            let next_tick = self.timer.next_tick_ms().filter(|&t| t <= target);

            match (next_task, next_tick) {
                (None, None) => break,
                (Some(t), None) => self.run_tasks_at(t),
                (None, Some(k)) => self.run_tick(k),
                (Some(t), Some(k)) => {
                    if t <= k {
                        self.run_tasks_at(t);
                    } else {
                        self.run_tick(k);
                    }
                }
            }
        }

        self.scheduler.advance_to(target);
    }

    fn run_tasks_at(&mut self, at_ms: u64) {
        for task in self.scheduler.advance_to(at_ms) {
            // Liveness check: work issued for a dead session must not
            // touch the live board.
            if task.session != self.session.id {
                log::trace!("dropping stale task from {}", task.session);
                continue;
            }
            self.apply_task(task.kind);
        }
    }

    fn apply_task(&mut self, kind: TaskKind) {
        match kind {
            TaskKind::SettleMatch { first, second } => {
                self.session.cards[first].is_matched = true;
                self.session.cards[second].is_matched = true;
            }
            TaskKind::FlipBack { first, second } => {
                for index in [first, second] {
                    let card = &mut self.session.cards[index];
                    if !card.is_matched {
                        card.is_flipped = false;
                    }
                }
            }
            TaskKind::ClearFlipped => {
                self.session.flipped.clear();
            }
        }
    }

    fn run_tick(&mut self, tick_ms: u64) {
        let remaining = self.timer.tick(tick_ms);
        self.session.time_left = remaining;
        self.session.record(EventRecord::TimerTick { remaining });

        if remaining == 0 {
            self.lose();
        }
    }

    // === Terminal transitions ===

    /// Victory: all pairs found.
    ///
    /// Settles every card inline instead of waiting out the pending
    /// delays, then cancels the session's outstanding work - nothing
    /// mutates a terminal session afterwards.
    fn win(&mut self) {
        for card in &mut self.session.cards {
            card.is_matched = true;
        }
        self.session.flipped.clear();
        self.finish(Outcome::Won);
    }

    /// Defeat: the countdown reached zero with pairs remaining.
    ///
    /// Score, moves, and matched count freeze as they stand; pending
    /// work is cancelled, leaving the board exactly as time caught it.
    fn lose(&mut self) {
        self.finish(Outcome::Lost);
    }

    fn finish(&mut self, outcome: Outcome) {
        debug_assert_eq!(self.session.outcome, Outcome::Pending);

        self.session.outcome = outcome;
        self.session.record(EventRecord::Ended { outcome });
        self.timer.disarm();
        self.scheduler.cancel_session(self.session.id);
        log::debug!(
            "{} finished: {outcome:?}, score {}, moves {}, time left {}",
            self.session.id,
            self.session.score,
            self.session.moves,
            self.session.time_left
        );
    }

    // === Reset / level change ===

    /// Replace the session with a fresh one on the same level.
    ///
    /// Regenerates the deck, clears all counters, and cancels every
    /// pending scheduled task and tick from the prior session.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.start_session(self.session.level)
    }

    /// Switch levels, resetting as for `reset`.
    pub fn select_level(&mut self, level: LevelId) -> Result<(), EngineError> {
        self.start_session(level)
    }

    /// Move to the next level in the table, if one exists.
    ///
    /// Returns `Ok(false)` when the current level is the last.
    pub fn advance_level(&mut self) -> Result<bool, EngineError> {
        match self.levels.next_level(self.session.level) {
            Some(next) => {
                self.select_level(next)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn start_session(&mut self, level: LevelId) -> Result<(), EngineError> {
        let config = self
            .levels
            .get(level)
            .cloned()
            .ok_or(EngineError::UnknownLevel(level))?;
        let gifts = match &self.inventory {
            Some(inventory) => inventory.clone(),
            None => config.gift_set.clone(),
        };
        // Build the new deck before touching the old session, so a
        // failed reset leaves the current game playable.
        let cards = deck::build_deck(&mut self.rng, config.pair_count, &gifts)?;

        let prior = self.session.id;
        self.scheduler.cancel_session(prior);

        let id = SessionId::new(self.next_session);
        self.next_session += 1;
        self.timer = Countdown::new(config.time_limit_secs);
        self.session = GameSession::new(id, level, config, cards);
        log::debug!("reset: {prior} replaced by {id} on {level}");

        Ok(())
    }
}
