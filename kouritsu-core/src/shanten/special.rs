//! Closed-form shanten for the two irregular winning shapes.
//!
//! Both shapes need all fourteen tiles in the closed hand, so callers only
//! consult them while no meld is exposed.

use crate::tile::{NUM_TILE_TYPES, TERMINALS_AND_HONORS};

/// Seven pairs: `6 - pairs + max(0, 7 - kinds)`.
///
/// A type held four times is one pair, not two.
pub fn seven_pairs_shanten(tiles: &[u8; NUM_TILE_TYPES]) -> i8 {
    let mut pairs = 0u8;
    let mut kinds = 0u8;
    for &c in tiles.iter() {
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }
    let missing_kinds = 7u8.saturating_sub(kinds) as i8;
    6 - pairs as i8 + missing_kinds
}

/// Thirteen orphans: `13 - distinct terminal/honor types - (any of them paired)`.
pub fn thirteen_orphans_shanten(tiles: &[u8; NUM_TILE_TYPES]) -> i8 {
    let mut kinds = 0i8;
    let mut has_pair = false;
    for &idx in &TERMINALS_AND_HONORS {
        let c = tiles[idx as usize];
        if c > 0 {
            kinds += 1;
            has_pair |= c >= 2;
        }
    }
    13 - kinds - has_pair as i8
}
