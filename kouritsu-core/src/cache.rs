//! Per-hand memoization of shanten values.
//!
//! The waiting-tile search and the second-level lookahead revisit the same
//! neighbouring hands many times per decision, so results are stored under
//! a fixed-shape key. The cache lives as long as one dealt hand and is
//! cleared when the next hand starts.

use ahash::AHashMap;

use crate::hand::{ExposedMeld, HandCounts, MAX_MELDS};

/// Bits used per tile type in the packed counts (values 0-4).
const BITS_PER_TYPE: u32 = 3;

/// Canonical hand-state key: closed counts packed 3 bits per type, the
/// exposed-meld shapes in order, and whether the irregular shapes were
/// included in the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShantenKey {
    packed: u128,
    melds: [u16; MAX_MELDS],
    special: bool,
}

impl ShantenKey {
    pub fn new(closed: &HandCounts, melds: &[ExposedMeld]) -> Self {
        let mut packed = 0u128;
        for (idx, &c) in closed.as_array().iter().enumerate() {
            packed |= (c as u128) << (idx as u32 * BITS_PER_TYPE);
        }
        let mut shapes = [0u16; MAX_MELDS];
        for (slot, meld) in shapes.iter_mut().zip(melds) {
            *slot = meld.signature();
        }
        Self {
            packed,
            melds: shapes,
            special: melds.is_empty(),
        }
    }
}

/// Shanten memo table with hit/miss counters.
#[derive(Debug, Clone, Default)]
pub struct ShantenCache {
    map: AHashMap<ShantenKey, i8>,
    hits: u64,
    misses: u64,
}

impl ShantenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: AHashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the stored value for `key`, computing and storing it on a miss.
    pub fn get_or_compute(&mut self, key: ShantenKey, compute: impl FnOnce() -> i8) -> i8 {
        if let Some(&value) = self.map.get(&key) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;
        let value = compute();
        self.map.insert(key, value);
        value
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing shanten cache: {} entries, {} hits, {} misses",
            self.map.len(),
            self.hits,
            self.misses
        );
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::parse_tile;

    #[test]
    fn second_lookup_hits() {
        let hand = HandCounts::parse("123456789m167s77z").unwrap();
        let key = ShantenKey::new(&hand, &[]);
        let mut cache = ShantenCache::new();
        let mut calls = 0;
        assert_eq!(
            cache.get_or_compute(key, || {
                calls += 1;
                1
            }),
            1
        );
        assert_eq!(cache.get_or_compute(key, || 99), 1);
        assert_eq!(calls, 1);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn keys_distinguish_counts_and_melds() {
        let a = HandCounts::parse("1112m").unwrap();
        let b = HandCounts::parse("1122m").unwrap();
        assert_ne!(ShantenKey::new(&a, &[]), ShantenKey::new(&b, &[]));

        let pon = ExposedMeld::pon(parse_tile("5z").unwrap());
        let chi = ExposedMeld::chi(parse_tile("1p").unwrap()).unwrap();
        assert_ne!(ShantenKey::new(&a, &[]), ShantenKey::new(&a, &[pon]));
        assert_ne!(ShantenKey::new(&a, &[pon]), ShantenKey::new(&a, &[chi]));
    }

    #[test]
    fn full_count_on_last_type_fits() {
        let hand = HandCounts::parse("7777z").unwrap();
        let key = ShantenKey::new(&hand, &[]);
        assert_eq!(key.packed >> (33 * BITS_PER_TYPE), 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = ShantenCache::with_capacity(16);
        let key = ShantenKey::new(&HandCounts::empty(), &[]);
        cache.get_or_compute(key, || 0);
        cache.get_or_compute(key, || 0);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }
}
