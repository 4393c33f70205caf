//! Score ledger: ranking and filtering of completed runs.
//!
//! One contract, two interchangeable backing modes:
//!
//! - `LocalLedger`: append-only run log in a key-value store; queries
//!   filter by level and age, rank descending, and keep the top 10
//! - `DirectoryLedger`: one overwritable score per externally-owned
//!   player; queries return every scoring player, untruncated
//!
//! The modes' semantics (accumulating log vs. last-write-wins field)
//! differ by design and are not merged. Both rank equal scores stably
//! and answer "no data" with an empty list, never an error.

pub mod directory;
pub mod local;
pub mod record;

use thiserror::Error;

use crate::providers::ProviderError;

pub use directory::DirectoryLedger;
pub use local::LocalLedger;
pub use record::{
    format_time, LeaderboardRow, RunDetail, ScoreQuery, ScoreRecord, TimeWindow,
};

/// Local-ledger queries return at most this many rows.
pub const MAX_ROWS: usize = 10;

/// A score store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing collaborator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Records could not be encoded for persistence.
    #[error("failed to encode score records: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The score store contract shared by both backing modes.
pub trait ScoreStore {
    /// Persist a completed run.
    ///
    /// Local mode appends an immutable record; directory mode
    /// overwrites the player's single score field. Failures surface to
    /// the caller; the store never retries.
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), StoreError>;

    /// Rank records matching `query`, best first.
    ///
    /// Never fails: an unavailable or empty backing source yields an
    /// empty list.
    fn query(&self, query: &ScoreQuery) -> Vec<LeaderboardRow>;
}
