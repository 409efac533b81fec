//! Shanten calculation over the three winning shapes.
//!
//! - [`standard`]: four groups and a pair, by depth-first search.
//! - [`special`]: seven pairs and thirteen orphans, closed form.
//!
//! [`ShantenCalculator`] combines them and memoizes results for the current
//! hand; the free functions compute without a cache.

pub mod special;
pub mod standard;

use crate::cache::{ShantenCache, ShantenKey};
use crate::errors::EfficiencyResult;
use crate::hand::{held_counts, ExposedMeld, HandCounts, PlayerHand};

pub use special::{seven_pairs_shanten, thirteen_orphans_shanten};
pub use standard::{standard_shanten, standard_shanten_held};

/// Shanten of a complete hand.
pub const AGARI: i8 = -1;
/// Shanten of a hand one tile from completion.
pub const TENPAI: i8 = 0;

/// Shanten per winning shape. The irregular shapes are `None` once a meld
/// is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShantenBreakdown {
    pub standard: i8,
    pub seven_pairs: Option<i8>,
    pub thirteen_orphans: Option<i8>,
}

impl ShantenBreakdown {
    /// Overall shanten: the best of the applicable shapes.
    pub fn min(&self) -> i8 {
        [self.seven_pairs, self.thirteen_orphans]
            .into_iter()
            .flatten()
            .fold(self.standard, i8::min)
    }
}

/// Rejects hands larger than 14 tiles (melds counted as three) or holding a
/// fifth physical copy of a type.
fn validate(closed: &HandCounts, melds: &[ExposedMeld]) -> EfficiencyResult<()> {
    PlayerHand::new(*closed, melds).map(|_| ())
}

fn breakdown_unchecked(closed: &HandCounts, melds: &[ExposedMeld]) -> ShantenBreakdown {
    let tiles = closed.as_array();
    let closed_hand = melds.is_empty();
    let standard = if closed_hand {
        standard_shanten(tiles)
    } else {
        standard_shanten_held(tiles, &held_counts(closed, melds))
    };
    ShantenBreakdown {
        standard,
        seven_pairs: closed_hand.then(|| seven_pairs_shanten(tiles)),
        thirteen_orphans: closed_hand.then(|| thirteen_orphans_shanten(tiles)),
    }
}

/// Per-shape shanten without caching.
pub fn shanten_breakdown(
    closed: &HandCounts,
    melds: &[ExposedMeld],
) -> EfficiencyResult<ShantenBreakdown> {
    validate(closed, melds)?;
    Ok(breakdown_unchecked(closed, melds))
}

/// Overall shanten without caching.
pub fn calculate_shanten(closed: &HandCounts, melds: &[ExposedMeld]) -> EfficiencyResult<i8> {
    shanten_breakdown(closed, melds).map(|b| b.min())
}

/// True when the hand is complete under any applicable shape.
pub fn is_agari(closed: &HandCounts, melds: &[ExposedMeld]) -> EfficiencyResult<bool> {
    calculate_shanten(closed, melds).map(|s| s == AGARI)
}

/// Shanten calculator owning the memo table for one player's current hand.
///
/// Not shared between players; call [`ShantenCalculator::clear_cache`] when
/// a new hand is dealt.
#[derive(Debug, Clone)]
pub struct ShantenCalculator {
    cache: ShantenCache,
    cache_enabled: bool,
}

impl ShantenCalculator {
    /// Calculator with caching enabled.
    pub fn new() -> Self {
        Self::with_cache(true, 0)
    }

    pub fn with_cache(enabled: bool, capacity: usize) -> Self {
        Self {
            cache: ShantenCache::with_capacity(if enabled { capacity } else { 0 }),
            cache_enabled: enabled,
        }
    }

    /// Overall shanten of `closed` with `melds` exposed.
    pub fn calculate(
        &mut self,
        closed: &HandCounts,
        melds: &[ExposedMeld],
    ) -> EfficiencyResult<i8> {
        validate(closed, melds)?;
        Ok(self.calculate_valid(closed, melds))
    }

    /// Per-shape values. Not cached: only the overall minimum is stored.
    pub fn breakdown(
        &self,
        closed: &HandCounts,
        melds: &[ExposedMeld],
    ) -> EfficiencyResult<ShantenBreakdown> {
        shanten_breakdown(closed, melds)
    }

    /// Hot path for hands derived from an already validated [`PlayerHand`].
    pub(crate) fn calculate_valid(&mut self, closed: &HandCounts, melds: &[ExposedMeld]) -> i8 {
        if !self.cache_enabled {
            return breakdown_unchecked(closed, melds).min();
        }
        let key = ShantenKey::new(closed, melds);
        self.cache
            .get_or_compute(key, || breakdown_unchecked(closed, melds).min())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &ShantenCache {
        &self.cache
    }
}

impl Default for ShantenCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EfficiencyError;
    use crate::tile::parse_tile;

    fn hand(text: &str) -> HandCounts {
        HandCounts::parse(text).unwrap()
    }

    #[test]
    fn seven_pairs_win_beats_standard() {
        let h = hand("113355s113355m11p");
        let b = shanten_breakdown(&h, &[]).unwrap();
        assert_eq!(b.seven_pairs, Some(AGARI));
        assert!(b.standard > AGARI);
        assert_eq!(b.min(), AGARI);
        assert!(is_agari(&h, &[]).unwrap());
    }

    #[test]
    fn thirteen_orphans_win() {
        let h = hand("119s19m19p1234567z");
        assert_eq!(calculate_shanten(&h, &[]).unwrap(), AGARI);
    }

    #[test]
    fn melds_disable_special_shapes() {
        let pon = ExposedMeld::pon(parse_tile("7z").unwrap());
        let h = hand("1133m5577p99s");
        let b = shanten_breakdown(&h, &[pon]).unwrap();
        assert_eq!(b.seven_pairs, None);
        assert_eq!(b.thirteen_orphans, None);
        assert_eq!(b.min(), b.standard);
    }

    #[test]
    fn melded_hand_counts_meld_as_group() {
        // 123m 456p 789s 11z + pon: complete.
        let pon = ExposedMeld::pon(parse_tile("5z").unwrap());
        assert!(is_agari(&hand("123m456p789s11z"), &[pon]).unwrap());
    }

    #[test]
    fn oversized_hand_is_rejected() {
        let pon = ExposedMeld::pon(parse_tile("5z").unwrap());
        let err = calculate_shanten(&hand("123m456p789s1234z"), &[pon]).unwrap_err();
        assert!(matches!(err, EfficiencyError::TooManyTiles { total: 16 }));
    }

    #[test]
    fn fifth_copy_across_melds_is_rejected() {
        let pon = ExposedMeld::pon(parse_tile("5z").unwrap());
        let err = calculate_shanten(&hand("55z123m"), &[pon]).unwrap_err();
        assert!(matches!(err, EfficiencyError::TooManyCopies { .. }));
    }

    #[test]
    fn calculator_caches_and_clears() {
        let mut calc = ShantenCalculator::new();
        let h = hand("123456789m167s77z");
        let first = calc.calculate(&h, &[]).unwrap();
        let second = calc.calculate(&h, &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(calc.cache().hits(), 1);
        assert_eq!(calc.cache().len(), 1);
        calc.clear_cache();
        assert!(calc.cache().is_empty());
    }

    #[test]
    fn uncached_calculator_agrees() {
        let mut cached = ShantenCalculator::new();
        let mut plain = ShantenCalculator::with_cache(false, 0);
        for text in ["123456789m167s77z", "1133m5577p99s112z", "147m258p369s1234z"] {
            let h = hand(text);
            assert_eq!(
                cached.calculate(&h, &[]).unwrap(),
                plain.calculate(&h, &[]).unwrap()
            );
        }
        assert!(plain.cache().is_empty());
    }
}
