//! Level configuration.
//!
//! Levels configure the engine at startup by providing:
//! - `LevelConfig`: board size, time budget, and scoring for one level
//! - `LevelTable`: lookup from `LevelId` to `LevelConfig`
//!
//! The table is injected into the engine rather than read from a
//! module-level constant, so tests can run against synthetic levels.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::GiftId;

/// Level identifier. Tables define what levels exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub u8);

impl LevelId {
    /// Create a new level ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level({})", self.0)
    }
}

/// Configuration for a single level.
///
/// Immutable once built. `gift_set` must hold at least `pair_count`
/// distinct gifts for deck generation to succeed; the set may be larger,
/// in which case the generator picks `pair_count` gifts at random.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Number of pairs on the board (`2 * pair_count` cards).
    pub pair_count: usize,

    /// Gifts available to this level.
    pub gift_set: Vec<GiftId>,

    /// Time budget in whole seconds.
    pub time_limit_secs: u32,

    /// Points awarded for a matched pair.
    pub match_score: u32,

    /// Points deducted for a mismatch (score floors at zero).
    pub mismatch_penalty: u32,
}

impl LevelConfig {
    /// Create a new level configuration with no gifts and no scoring.
    #[must_use]
    pub fn new(pair_count: usize, time_limit_secs: u32) -> Self {
        Self {
            pair_count,
            gift_set: Vec::new(),
            time_limit_secs,
            match_score: 0,
            mismatch_penalty: 0,
        }
    }

    /// Set the match score and mismatch penalty.
    #[must_use]
    pub fn with_scoring(mut self, match_score: u32, mismatch_penalty: u32) -> Self {
        self.match_score = match_score;
        self.mismatch_penalty = mismatch_penalty;
        self
    }

    /// Set the gift set.
    #[must_use]
    pub fn with_gifts<I>(mut self, gifts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<GiftId>,
    {
        self.gift_set = gifts.into_iter().map(Into::into).collect();
        self
    }

    /// Number of cards this level's board holds.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }
}

/// Lookup table from level ID to configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LevelTable {
    levels: FxHashMap<LevelId, LevelConfig>,
}

impl LevelTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level configuration.
    #[must_use]
    pub fn with_level(mut self, id: LevelId, config: LevelConfig) -> Self {
        self.levels.insert(id, config);
        self
    }

    /// Get a level config by ID.
    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&LevelConfig> {
        self.levels.get(&id)
    }

    /// Number of levels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// All level IDs, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<LevelId> {
        let mut ids: Vec<_> = self.levels.keys().copied().collect();
        ids.sort();
        ids
    }

    /// The level after `id`, if the table defines one.
    ///
    /// Supports the "next level" progression after a win.
    #[must_use]
    pub fn next_level(&self, id: LevelId) -> Option<LevelId> {
        let next = LevelId::new(id.raw().checked_add(1)?);
        self.levels.contains_key(&next).then_some(next)
    }

    /// The standard three-level table: Easy, Medium, Hard.
    ///
    /// All levels share one twelve-gift set, sized for the hardest board.
    #[must_use]
    pub fn standard() -> Self {
        let gifts = [
            "teddy-bear", "sled", "drum", "rocking-horse", "train", "doll",
            "kite", "spinning-top", "toy-soldier", "puzzle", "yo-yo", "blocks",
        ];

        Self::new()
            .with_level(
                LevelId::new(1),
                LevelConfig::new(6, 60).with_scoring(100, 10).with_gifts(gifts),
            )
            .with_level(
                LevelId::new(2),
                LevelConfig::new(8, 90).with_scoring(150, 15).with_gifts(gifts),
            )
            .with_level(
                LevelId::new(3),
                LevelConfig::new(12, 120).with_scoring(200, 20).with_gifts(gifts),
            )
    }
}
