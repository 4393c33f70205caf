//! External collaborator contracts.
//!
//! The engine core never talks to a network or a disk. Everything it
//! needs from the outside world comes through the traits in this
//! module:
//!
//! - `InventoryProvider`: source of gift items for deck generation
//! - `PlayerDirectory` / `ScoreSink`: directory-mode leaderboard backing
//! - `KeyValueStore`: local-ledger persistence (string keyed, like the
//!   browser storage it replaces)
//! - `Clock`: injected "now" for time-window filtering
//!
//! In-memory implementations ship alongside the traits; tests and
//! embedders without a real backend use those.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::GiftId;

/// A collaborator failed or refused an operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backing service could not be reached.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The backing service rejected the request.
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

/// A gift item from the inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftItem {
    /// Identifier, unique within the inventory.
    pub id: GiftId,

    /// Reference to the item's image. Opaque to the engine.
    pub image_ref: String,
}

impl GiftItem {
    /// Create a new gift item.
    pub fn new(id: impl Into<GiftId>, image_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A player entry from the directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Directory-assigned identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Role label (directory metadata, untouched by the engine).
    pub role: String,

    /// The player's single mutable score.
    pub score: u32,
}

/// Source of gift items for deck generation.
pub trait InventoryProvider {
    /// Fetch all available items.
    fn fetch_items(&self) -> Result<Vec<GiftItem>, ProviderError>;
}

/// Directory of externally-owned player records.
pub trait PlayerDirectory {
    /// Fetch all players with their current scores.
    fn fetch_players(&self) -> Result<Vec<PlayerEntry>, ProviderError>;
}

/// Write endpoint for directory-mode scores (last-write-wins).
pub trait ScoreSink {
    /// Overwrite a player's score.
    fn submit_score(&mut self, player_id: &str, score: u32) -> Result<(), ProviderError>;
}

/// String-keyed persistent storage for the local ledger.
pub trait KeyValueStore {
    /// Read a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, ProviderError>;

    /// Write a value.
    fn put(&mut self, key: &str, value: &str) -> Result<(), ProviderError>;
}

/// Source of "now" for leaderboard time windows.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory inventory with a fixed item list.
#[derive(Clone, Debug, Default)]
pub struct StaticInventory {
    items: Vec<GiftItem>,
}

impl StaticInventory {
    /// Create an inventory from a list of items.
    #[must_use]
    pub fn new(items: Vec<GiftItem>) -> Self {
        Self { items }
    }
}

impl InventoryProvider for StaticInventory {
    fn fetch_items(&self) -> Result<Vec<GiftItem>, ProviderError> {
        Ok(self.items.clone())
    }
}

/// In-memory player directory that accepts score writes.
///
/// Implements both `PlayerDirectory` and `ScoreSink`, so a single value
/// can back a directory-mode leaderboard end to end.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    players: Vec<PlayerEntry>,
}

impl MemoryDirectory {
    /// Create a directory from an initial player list.
    #[must_use]
    pub fn new(players: Vec<PlayerEntry>) -> Self {
        Self { players }
    }
}

impl PlayerDirectory for MemoryDirectory {
    fn fetch_players(&self) -> Result<Vec<PlayerEntry>, ProviderError> {
        Ok(self.players.clone())
    }
}

impl ScoreSink for MemoryDirectory {
    fn submit_score(&mut self, player_id: &str, score: u32) -> Result<(), ProviderError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| ProviderError::Rejected(format!("unknown player {player_id}")))?;
        player.score = score;
        Ok(())
    }
}

/// In-memory key-value store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly (for tests exercising pre-existing data).
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
