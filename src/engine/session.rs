//! Session state.
//!
//! A `GameSession` is one run of the game: one deck, one time budget,
//! one outcome. Sessions are mutated only by the match engine and the
//! timer; once the outcome leaves `Pending` the session is frozen and
//! can only be replaced by a fresh one.
//!
//! Every session carries a `SessionId`. Scheduled work is tagged with
//! the ID it was issued for, so work outliving a reset can be detected
//! and dropped instead of corrupting the replacement session.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, LevelConfig, LevelId};

/// Session identity, allocated monotonically by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Create a new session ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Terminal result of a session.
///
/// Transitions at most once, from `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Still in play.
    #[default]
    Pending,
    /// All pairs matched before time ran out.
    Won,
    /// Time ran out with pairs remaining.
    Lost,
}

/// Observable state of the flip machine.
///
/// Derived from the session rather than stored, so it can never drift
/// from the fields it summarizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No cards pending.
    Idle,
    /// One card face-up, awaiting its candidate pair.
    OneFlipped,
    /// Two cards face-up, resolution scheduled; flips are blocked.
    Evaluating,
    /// Terminal: victory.
    Won,
    /// Terminal: time expired.
    Lost,
}

/// One entry in the session's append-only event history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRecord {
    /// A card was turned face-up.
    Flip { index: usize },
    /// Two cards matched.
    MatchResolved { first: usize, second: usize },
    /// Two cards did not match.
    MismatchResolved { first: usize, second: usize },
    /// One second elapsed.
    TimerTick { remaining: u32 },
    /// The session reached a terminal outcome.
    Ended { outcome: Outcome },
}

/// One run of the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    /// Identity of this session; tags all scheduled work.
    pub id: SessionId,

    /// The level being played.
    pub level: LevelId,

    /// The level's configuration, captured at session start.
    pub config: LevelConfig,

    /// The board. Replaced wholesale on reset, never partially.
    pub cards: Vec<Card>,

    /// Indices of cards currently face-up and unresolved (at most 2).
    pub flipped: SmallVec<[usize; 2]>,

    /// Pairs found so far. Monotonically non-decreasing.
    pub matched_pairs: usize,

    /// Evaluations performed (each second flip counts one move).
    pub moves: u32,

    /// Current score. Penalties floor at zero.
    pub score: u32,

    /// Whole seconds remaining.
    pub time_left: u32,

    /// Has the first flip happened? Arms the countdown.
    pub started: bool,

    /// Terminal result, `Pending` while in play.
    pub outcome: Outcome,

    /// Append-only event history (flips, resolutions, ticks, ending).
    pub history: Vector<EventRecord>,
}

impl GameSession {
    /// Create a fresh session over a generated deck.
    #[must_use]
    pub fn new(id: SessionId, level: LevelId, config: LevelConfig, cards: Vec<Card>) -> Self {
        let time_left = config.time_limit_secs;
        Self {
            id,
            level,
            config,
            cards,
            flipped: SmallVec::new(),
            matched_pairs: 0,
            moves: 0,
            score: 0,
            time_left,
            started: false,
            outcome: Outcome::Pending,
            history: Vector::new(),
        }
    }

    /// The current phase, derived from outcome and flipped count.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.outcome {
            Outcome::Won => Phase::Won,
            Outcome::Lost => Phase::Lost,
            Outcome::Pending => match self.flipped.len() {
                0 => Phase::Idle,
                1 => Phase::OneFlipped,
                _ => Phase::Evaluating,
            },
        }
    }

    /// Has the session reached a terminal outcome?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Pending
    }

    /// Have all pairs been found?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.config.pair_count
    }

    /// Add points for a matched pair.
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Deduct points for a mismatch, flooring at zero.
    pub fn penalize(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    /// Record an event in history.
    pub fn record(&mut self, event: EventRecord) {
        self.history.push_back(event);
    }
}
