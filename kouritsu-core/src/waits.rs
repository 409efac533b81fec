//! Waiting tiles: the types that move a 3n+1 hand one step closer to a win.

use std::fmt;

use crate::errors::{EfficiencyError, EfficiencyResult};
use crate::hand::PlayerHand;
use crate::shanten::{ShantenCalculator, AGARI};
use crate::tile::{TileType, MAX_COPIES, NUM_TILE_TYPES};

/// Set of tile types, one bit per type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WaitingSet(u64);

impl WaitingSet {
    pub const fn empty() -> Self {
        WaitingSet(0)
    }

    #[inline]
    pub fn insert(&mut self, tile: TileType) {
        self.0 |= 1u64 << tile.id();
    }

    #[inline]
    pub fn contains(&self, tile: TileType) -> bool {
        self.0 & (1u64 << tile.id()) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in index order.
    pub fn iter(&self) -> impl Iterator<Item = TileType> {
        let bits = self.0;
        TileType::all().filter(move |t| bits & (1u64 << t.id()) != 0)
    }
}

impl FromIterator<TileType> for WaitingSet {
    fn from_iter<I: IntoIterator<Item = TileType>>(iter: I) -> Self {
        let mut set = WaitingSet::empty();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

impl fmt::Debug for WaitingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|t| t.to_string())).finish()
    }
}

/// Base shanten of a 3n+1 hand and the types that lower it by exactly one.
///
/// Only types the player holds fewer than four copies of (closed and
/// melded) are tried. Other hand sizes are rejected.
pub fn find_waits(
    calc: &mut ShantenCalculator,
    hand: &PlayerHand,
) -> EfficiencyResult<(i8, WaitingSet)> {
    let size = hand.size();
    if size % 3 != 1 {
        return Err(EfficiencyError::UnexpectedHandSize {
            total: size,
            expected: "3n+1",
        });
    }
    Ok(find_waits_valid(calc, hand))
}

pub(crate) fn find_waits_valid(
    calc: &mut ShantenCalculator,
    hand: &PlayerHand,
) -> (i8, WaitingSet) {
    let closed = hand.closed_counts();
    let melds = hand.melds();
    let base = calc.calculate_valid(closed, melds);
    let mut waits = WaitingSet::empty();
    if base == AGARI {
        return (base, waits);
    }

    let held = hand.full_counts();
    for idx in 0..NUM_TILE_TYPES {
        if held[idx] >= MAX_COPIES {
            continue;
        }
        let tile = TileType::from_index(idx);
        let next = calc.calculate_valid(&closed.with_added(tile), melds);
        if next == base - 1 {
            waits.insert(tile);
        }
    }
    (base, waits)
}
