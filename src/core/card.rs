//! Cards and gift identifiers.
//!
//! A `Card` is one face of a pair on the board. Two cards sharing the
//! same `GiftId` form a pair. The board owns its cards exclusively and
//! replaces them wholesale on reset.

use serde::{Deserialize, Serialize};

/// Gift (item) identifier.
///
/// Opaque to the engine - gift IDs come from a level's gift set or an
/// external inventory. Two cards match when their gift IDs are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GiftId(String);

impl GiftId {
    /// Create a new gift ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GiftId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GiftId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A card on the board.
///
/// `id` is the card's identity within its deck (assigned `0..2n` at
/// generation). `is_flipped` and `is_matched` are the only mutable
/// fields; both start false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID within the deck.
    pub id: u32,

    /// The gift this card shows when face-up.
    pub gift: GiftId,

    /// Is this card currently face-up?
    pub is_flipped: bool,

    /// Has this card's pair been found? Matched cards stay revealed.
    pub is_matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn face_down(id: u32, gift: GiftId) -> Self {
        Self {
            id,
            gift,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Can this card still be flipped by the player?
    #[must_use]
    pub fn is_flippable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}
