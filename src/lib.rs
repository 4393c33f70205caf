//! # memory-match
//!
//! Session state machine for a timed memory-matching (concentration)
//! card game: a player flips paired cards, accrues score, and records
//! results on a leaderboard.
//!
//! ## Design Principles
//!
//! 1. **Explicit state machine**: flips and elapsed time are events fed
//!    to `MatchEngine`; there is no rendering context and no implicit
//!    re-render-driven behavior.
//!
//! 2. **Configuration over convention**: levels come from an injected
//!    `LevelTable`, never a module-level constant. Tests run synthetic
//!    levels.
//!
//! 3. **Cancellation discipline**: every scheduled delay and countdown
//!    tick is tagged with the `SessionId` it was issued for. Reset
//!    cancels the lot; anything stale that survives is dropped before
//!    it can touch the new board.
//!
//! 4. **Boundaries as traits**: inventory, player directory, score
//!    sink, persistence, and the clock are trait objects the embedder
//!    supplies. The core never does I/O of its own.
//!
//! ## Modules
//!
//! - `core`: cards, gifts, level configuration, deterministic RNG
//! - `deck`: randomized paired-deck generation
//! - `engine`: the session state machine, scheduler, and countdown
//! - `ledger`: leaderboard ranking/filtering, local and directory modes
//! - `providers`: external collaborator contracts and in-memory stand-ins

pub mod core;
pub mod deck;
pub mod engine;
pub mod ledger;
pub mod providers;

// Re-export commonly used types
pub use crate::core::{Card, DeckRng, GiftId, LevelConfig, LevelId, LevelTable};

pub use crate::deck::{build_deck, deck_for_level, deck_from_items, DeckError};

pub use crate::engine::{
    Countdown, EngineError, EventRecord, FlipOutcome, FlipRejection, GameSession, MatchEngine,
    Outcome, Phase, SessionId, TaskScheduler, TimingConfig,
};

pub use crate::ledger::{
    format_time, DirectoryLedger, LeaderboardRow, LocalLedger, RunDetail, ScoreQuery, ScoreRecord,
    ScoreStore, StoreError, TimeWindow,
};

pub use crate::providers::{
    Clock, FixedClock, GiftItem, InventoryProvider, KeyValueStore, MemoryDirectory, MemoryStore,
    PlayerDirectory, PlayerEntry, ProviderError, ScoreSink, StaticInventory, SystemClock,
};
