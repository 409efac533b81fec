//! Visible-tile bookkeeping for the table layer.
//!
//! Counts every copy a player can see: their own hand, all discard piles,
//! tiles exposed by calls, and dora indicators. Updated incrementally on
//! each table event and handed to the efficiency engine read-only.

use crate::errors::{EfficiencyError, EfficiencyResult};
use crate::hand::PlayerHand;
use crate::tile::{TileType, MAX_COPIES, NUM_TILE_TYPES};

/// Per-type count of visible copies (0-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedCounts {
    counts: [u8; NUM_TILE_TYPES],
}

impl RevealedCounts {
    pub fn new() -> Self {
        Self {
            counts: [0; NUM_TILE_TYPES],
        }
    }

    /// Validates raw counts produced by another bookkeeping layer.
    pub fn from_counts(counts: [u8; NUM_TILE_TYPES]) -> EfficiencyResult<Self> {
        match counts.iter().position(|&c| c > MAX_COPIES) {
            Some(idx) => Err(EfficiencyError::RevealedOverflow {
                tile: TileType::from_index(idx),
            }),
            None => Ok(Self { counts }),
        }
    }

    /// Records one more visible copy of `tile`.
    pub fn observe(&mut self, tile: TileType) -> EfficiencyResult<()> {
        let slot = &mut self.counts[tile.index()];
        if *slot >= MAX_COPIES {
            return Err(EfficiencyError::RevealedOverflow { tile });
        }
        *slot += 1;
        Ok(())
    }

    /// Records every tile the player holds, closed and melded.
    pub fn observe_hand(&mut self, hand: &PlayerHand) -> EfficiencyResult<()> {
        for (idx, &held) in hand.full_counts().iter().enumerate() {
            let tile = TileType::from_index(idx);
            for _ in 0..held {
                self.observe(tile)?;
            }
        }
        Ok(())
    }

    /// A tile hits a discard pile.
    pub fn on_discard(&mut self, tile: TileType) -> EfficiencyResult<()> {
        self.observe(tile)
    }

    /// Tiles newly exposed from another player's hand by a call. The claimed
    /// discard was already counted by [`RevealedCounts::on_discard`].
    pub fn on_call(&mut self, tiles: &[TileType]) -> EfficiencyResult<()> {
        tiles.iter().try_for_each(|&t| self.observe(t))
    }

    /// A dora indicator is flipped.
    pub fn on_dora_revealed(&mut self, indicator: TileType) -> EfficiencyResult<()> {
        self.observe(indicator)
    }

    #[inline]
    pub fn count(&self, tile: TileType) -> u8 {
        self.counts[tile.index()]
    }

    /// Copies of `tile` that are still unseen.
    #[inline]
    pub fn live(&self, tile: TileType) -> u8 {
        MAX_COPIES - self.counts[tile.index()]
    }

    #[inline]
    pub fn as_array(&self) -> &[u8; NUM_TILE_TYPES] {
        &self.counts
    }

    /// Copy with one more visible `tile`, for a hypothetical draw of a live copy.
    #[inline]
    pub(crate) fn with_drawn(&self, tile: TileType) -> Self {
        let mut next = *self;
        debug_assert!(next.counts[tile.index()] < MAX_COPIES);
        next.counts[tile.index()] += 1;
        next
    }

    /// Starts a new hand.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RevealedCounts {
    fn default() -> Self {
        Self::new()
    }
}
