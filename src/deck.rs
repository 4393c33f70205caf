//! Deck generation.
//!
//! Builds the randomized, paired card sequence a session starts from:
//! pick `pair_count` distinct gifts (at random when more are offered),
//! lay each down twice, and shuffle the result uniformly.
//!
//! Deck composition is deterministic given the gift selection; only the
//! ordering and the selection itself are random.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::{Card, DeckRng, GiftId, LevelConfig};
use crate::providers::GiftItem;

/// Deck generation failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Fewer distinct gifts than the board needs.
    #[error("only {available} distinct gifts available, need {needed}")]
    InsufficientItems { available: usize, needed: usize },
}

/// Build a shuffled deck of `2 * pair_count` cards from a gift list.
///
/// Duplicate gift IDs in the input are collapsed (first occurrence
/// wins) before selection, so a pair can never be formed from two
/// copies of the same inventory entry.
///
/// ## Errors
///
/// `DeckError::InsufficientItems` when fewer than `pair_count` distinct
/// gifts remain after deduplication.
pub fn build_deck(
    rng: &mut DeckRng,
    pair_count: usize,
    gifts: &[GiftId],
) -> Result<Vec<Card>, DeckError> {
    let mut seen = FxHashSet::default();
    let mut distinct: Vec<GiftId> = gifts
        .iter()
        .filter(|g| seen.insert((*g).clone()))
        .cloned()
        .collect();

    if distinct.len() < pair_count {
        return Err(DeckError::InsufficientItems {
            available: distinct.len(),
            needed: pair_count,
        });
    }

    // Random selection of which gifts participate, then a uniform
    // shuffle of the doubled-up board.
    rng.shuffle(&mut distinct);
    distinct.truncate(pair_count);

    let mut cards: Vec<Card> = distinct
        .into_iter()
        .flat_map(|gift| [gift.clone(), gift])
        .enumerate()
        .map(|(id, gift)| Card::face_down(id as u32, gift))
        .collect();
    rng.shuffle(&mut cards);

    log::debug!(
        "generated deck: {} cards, {} pairs (seed {})",
        cards.len(),
        pair_count,
        rng.seed()
    );

    Ok(cards)
}

/// Build a deck for a level from its own gift set.
pub fn deck_for_level(rng: &mut DeckRng, config: &LevelConfig) -> Result<Vec<Card>, DeckError> {
    build_deck(rng, config.pair_count, &config.gift_set)
}

/// Build a deck from externally fetched inventory items.
pub fn deck_from_items(
    rng: &mut DeckRng,
    pair_count: usize,
    items: &[GiftItem],
) -> Result<Vec<Card>, DeckError> {
    let gifts: Vec<GiftId> = items.iter().map(|item| item.id.clone()).collect();
    build_deck(rng, pair_count, &gifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn gifts(n: usize) -> Vec<GiftId> {
        (0..n).map(|i| GiftId::new(format!("gift-{i}"))).collect()
    }

    #[test]
    fn test_deck_composition() {
        let mut rng = DeckRng::new(42);
        let deck = build_deck(&mut rng, 6, &gifts(6)).unwrap();

        assert_eq!(deck.len(), 12);

        let mut counts: FxHashMap<&GiftId, usize> = FxHashMap::default();
        for card in &deck {
            *counts.entry(&card.gift).or_default() += 1;
            assert!(!card.is_flipped);
            assert!(!card.is_matched);
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&c| c == 2));
    }

    #[test]
    fn test_deck_ids_unique() {
        let mut rng = DeckRng::new(42);
        let deck = build_deck(&mut rng, 4, &gifts(4)).unwrap();

        let mut ids: Vec<u32> = deck.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_oversized_gift_set_truncated() {
        let mut rng = DeckRng::new(42);
        let deck = build_deck(&mut rng, 3, &gifts(10)).unwrap();

        assert_eq!(deck.len(), 6);
        let distinct: FxHashSet<&GiftId> = deck.iter().map(|c| &c.gift).collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_insufficient_items() {
        let mut rng = DeckRng::new(42);
        let err = build_deck(&mut rng, 6, &gifts(5)).unwrap_err();

        assert_eq!(
            err,
            DeckError::InsufficientItems {
                available: 5,
                needed: 6
            }
        );
    }

    #[test]
    fn test_duplicate_inventory_entries_collapsed() {
        let mut rng = DeckRng::new(42);
        let mut list = gifts(3);
        list.extend(gifts(3)); // every gift listed twice

        let err = build_deck(&mut rng, 4, &list).unwrap_err();
        assert_eq!(
            err,
            DeckError::InsufficientItems {
                available: 3,
                needed: 4
            }
        );
    }

    #[test]
    fn test_orderings_differ_between_calls() {
        let mut rng = DeckRng::new(42);
        let set = gifts(8);

        let first = build_deck(&mut rng, 8, &set).unwrap();
        let second = build_deck(&mut rng, 8, &set).unwrap();

        let order = |deck: &[Card]| deck.iter().map(|c| c.gift.clone()).collect::<Vec<_>>();
        assert_ne!(order(&first), order(&second));
    }

    #[test]
    fn test_deck_from_items() {
        let mut rng = DeckRng::new(42);
        let items: Vec<GiftItem> = (0..6)
            .map(|i| GiftItem::new(format!("toy-{i}"), format!("img/{i}.png")))
            .collect();

        let deck = deck_from_items(&mut rng, 6, &items).unwrap();
        assert_eq!(deck.len(), 12);
    }
}
