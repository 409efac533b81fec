//! Property-based invariant tests for the efficiency engine.
//!
//! Hands are dealt from a seeded, shuffled 136-tile wall so every case is a
//! physically possible hand, and the tiles after the deal serve as other
//! players' discards.

use kouritsu_core::{
    calculate_shanten, is_agari, shanten_breakdown, EngineConfig, ExposedMeld, HandCounts,
    PlayerHand, RevealedCounts, TileEfficiencyEngine, TileType, AGARI,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fisher-Yates over the full set, driven by a seeded ChaCha8Rng.
fn shuffled_wall(seed: u64) -> Vec<TileType> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut wall: Vec<TileType> = TileType::all()
        .flat_map(|t| std::iter::repeat(t).take(4))
        .collect();
    for i in (1..wall.len()).rev() {
        let j = rng.random_range(0..=i);
        wall.swap(i, j);
    }
    wall
}

/// A closed hand of `size` tiles, plus `discards` further wall tiles made
/// visible on top of the player's own hand.
fn deal(seed: u64, size: usize, discards: usize) -> (PlayerHand, RevealedCounts) {
    let wall = shuffled_wall(seed);
    let hand = PlayerHand::closed(HandCounts::from_tiles(&wall[..size]).unwrap());
    let mut seen = RevealedCounts::new();
    seen.observe_hand(&hand).unwrap();
    for &t in &wall[size..size + discards] {
        seen.on_discard(t).unwrap();
    }
    (hand, seen)
}

/// A hand with one pon of the first wall tile and `closed` other tiles.
fn deal_with_pon(seed: u64, closed: usize) -> PlayerHand {
    let wall = shuffled_wall(seed);
    let called = wall[0];
    let rest: Vec<TileType> = wall
        .iter()
        .copied()
        .filter(|&t| t != called)
        .take(closed)
        .collect();
    PlayerHand::new(
        HandCounts::from_tiles(&rest).unwrap(),
        &[ExposedMeld::pon(called)],
    )
    .unwrap()
}

/// Like [`deal_with_pon`], but the fourth copy of the called type is also
/// in hand, so that type is dead.
fn deal_with_dead_pon(seed: u64, closed: usize) -> PlayerHand {
    let wall = shuffled_wall(seed);
    let called = wall[0];
    let mut tiles = vec![called];
    tiles.extend(wall.iter().copied().filter(|&t| t != called).take(closed - 1));
    PlayerHand::new(
        HandCounts::from_tiles(&tiles).unwrap(),
        &[ExposedMeld::pon(called)],
    )
    .unwrap()
}

fn shanten_of(hand: &PlayerHand) -> i8 {
    calculate_shanten(hand.closed_counts(), hand.melds()).unwrap()
}

/// Checks that `waits` holds exactly the types that lower a 3n+1 hand's
/// shanten by one.
fn check_waits(hand: &PlayerHand) -> Result<(), TestCaseError> {
    let mut engine = TileEfficiencyEngine::new();
    let (base, waits) = engine.find_waits(hand).unwrap();
    prop_assert_eq!(base, shanten_of(hand));
    for tile in TileType::all() {
        if hand.held(tile) == 4 {
            prop_assert!(!waits.contains(tile));
            continue;
        }
        let mut closed = *hand.closed_counts();
        closed.add(tile).unwrap();
        let next = calculate_shanten(&closed, hand.melds()).unwrap();
        if waits.contains(tile) {
            prop_assert_eq!(next, base - 1, "wait {}", tile);
        } else {
            prop_assert!(next >= base, "non-wait {} improves {} to {}", tile, base, next);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn shanten_within_bounds(
        seed in any::<u64>(),
        size in prop::sample::select(vec![13usize, 14]),
    ) {
        let (hand, _) = deal(seed, size, 0);
        let b = shanten_breakdown(hand.closed_counts(), hand.melds()).unwrap();
        let s = b.min();
        prop_assert!((AGARI..=8).contains(&b.standard));
        prop_assert!(s <= b.standard);
        prop_assert_eq!(s == AGARI, is_agari(hand.closed_counts(), hand.melds()).unwrap());
        if size == 13 {
            prop_assert!(s >= 0, "13 tiles can never be complete");
        }
    }

    #[test]
    fn adding_a_tile_never_increases_shanten(seed in any::<u64>()) {
        let (hand, _) = deal(seed, 13, 0);
        let base = shanten_of(&hand);
        for tile in TileType::all() {
            if hand.held(tile) == 4 {
                continue;
            }
            let mut closed = *hand.closed_counts();
            closed.add(tile).unwrap();
            let next = calculate_shanten(&closed, &[]).unwrap();
            prop_assert!(next <= base, "adding {} raised {} to {}", tile, base, next);
        }
    }

    #[test]
    fn waits_are_exactly_the_improving_tiles(seed in any::<u64>()) {
        let (hand, _) = deal(seed, 13, 0);
        check_waits(&hand)?;
    }

    #[test]
    fn melded_waits_are_exactly_the_improving_tiles(seed in any::<u64>()) {
        check_waits(&deal_with_pon(seed, 10))?;
    }

    #[test]
    fn dead_called_type_leaves_waits(seed in any::<u64>()) {
        let hand = deal_with_dead_pon(seed, 10);
        check_waits(&hand)?;
        let mut engine = TileEfficiencyEngine::new();
        let (base, waits) = engine.find_waits(&hand).unwrap();
        prop_assert!(base >= 0);
        prop_assert!(!waits.is_empty(), "no waits at shanten {}", base);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ukeire_counts_live_copies_of_waits(seed in any::<u64>(), discards in 0usize..40) {
        let (hand, seen) = deal(seed, 14, discards);
        let mut engine = TileEfficiencyEngine::new();
        let base = engine.shanten(&hand);
        let cands = engine.evaluate_discards(&hand, &seen).unwrap();
        if base == AGARI {
            prop_assert!(cands.is_empty());
        }
        for c in &cands {
            prop_assert!(c.ukeire <= 4 * c.waits.len() as u32);
            let live: u32 = c.waits.iter().map(|w| seen.live(w) as u32).sum();
            prop_assert_eq!(c.ukeire, live);
            prop_assert_eq!(c.shanten_down, c.shanten > base);
            prop_assert!(c.shanten >= base);
            prop_assert_eq!(c.ukeire2.is_some(), (1..=3).contains(&c.shanten));
        }
        for pair in cands.windows(2) {
            prop_assert!(pair[0].cmp_efficiency(&pair[1]).is_le());
        }
    }

    #[test]
    fn melded_discards_stay_consistent(seed in any::<u64>()) {
        let hand = deal_with_pon(seed, 11);
        let mut seen = RevealedCounts::new();
        seen.observe_hand(&hand).unwrap();
        let mut engine = TileEfficiencyEngine::new();
        let base = engine.shanten(&hand);
        let cands = engine.evaluate_discards(&hand, &seen).unwrap();
        let expected = match base {
            AGARI => 0,
            _ => hand.closed_counts().present().count(),
        };
        prop_assert_eq!(cands.len(), expected);
        for c in &cands {
            prop_assert!(hand.closed_counts().count(c.tile) > 0);
            prop_assert!(c.shanten >= base);
        }
    }
}

// The uncached engine redoes every lookahead search; keep this one small.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn evaluation_is_idempotent_and_cache_transparent(seed in any::<u64>()) {
        let (hand, seen) = deal(seed, 14, 8);
        let before = (hand.clone(), seen);

        let mut cached = TileEfficiencyEngine::new();
        let first = cached.evaluate_discards(&hand, &seen).unwrap();
        let second = cached.evaluate_discards(&hand, &seen).unwrap();
        prop_assert_eq!(&first, &second);

        let mut plain = TileEfficiencyEngine::with_config(EngineConfig {
            cache_enabled: false,
            ..EngineConfig::default()
        })
        .unwrap();
        prop_assert_eq!(&first, &plain.evaluate_discards(&hand, &seen).unwrap());
        prop_assert_eq!(before, (hand, seen));
    }
}
