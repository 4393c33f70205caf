//! Deck generator property tests.
//!
//! The deck invariants must hold for every level shape, not just the
//! shipped three, so they are checked property-style across pair
//! counts, surplus gift pools, and seeds.

use std::collections::HashMap;

use proptest::prelude::*;

use memory_match::{build_deck, DeckError, DeckRng, GiftId};

fn gift_pool(n: usize) -> Vec<GiftId> {
    (0..n).map(|i| GiftId::new(format!("gift-{i}"))).collect()
}

proptest! {
    /// Deck length is `2 * pair_count` and every selected gift appears
    /// exactly twice, regardless of pool surplus or seed.
    #[test]
    fn deck_composition_invariant(
        pair_count in 1usize..=12,
        surplus in 0usize..=6,
        seed in any::<u64>(),
    ) {
        let mut rng = DeckRng::new(seed);
        let pool = gift_pool(pair_count + surplus);

        let deck = build_deck(&mut rng, pair_count, &pool).unwrap();

        prop_assert_eq!(deck.len(), 2 * pair_count);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for card in &deck {
            *counts.entry(card.gift.as_str()).or_default() += 1;
            prop_assert!(!card.is_flipped);
            prop_assert!(!card.is_matched);
        }
        prop_assert_eq!(counts.len(), pair_count);
        prop_assert!(counts.values().all(|&c| c == 2));
    }

    /// Card IDs are a permutation of `0..2n`.
    #[test]
    fn deck_ids_are_a_permutation(
        pair_count in 1usize..=12,
        seed in any::<u64>(),
    ) {
        let mut rng = DeckRng::new(seed);
        let deck = build_deck(&mut rng, pair_count, &gift_pool(pair_count)).unwrap();

        let mut ids: Vec<u32> = deck.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (0..2 * pair_count as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Short pools always fail with the precise shortfall.
    #[test]
    fn short_pool_fails(
        pair_count in 2usize..=12,
        missing in 1usize..=2,
        seed in any::<u64>(),
    ) {
        prop_assume!(missing < pair_count);
        let mut rng = DeckRng::new(seed);
        let available = pair_count - missing;

        let err = build_deck(&mut rng, pair_count, &gift_pool(available)).unwrap_err();

        prop_assert_eq!(
            err,
            DeckError::InsufficientItems { available, needed: pair_count }
        );
    }

    /// The same seed deals the same deck.
    #[test]
    fn same_seed_same_deck(
        pair_count in 1usize..=12,
        seed in any::<u64>(),
    ) {
        let pool = gift_pool(pair_count + 3);
        let deck_a = build_deck(&mut DeckRng::new(seed), pair_count, &pool).unwrap();
        let deck_b = build_deck(&mut DeckRng::new(seed), pair_count, &pool).unwrap();

        prop_assert_eq!(deck_a, deck_b);
    }
}
