//! Hand representation: 34-type counts, exposed melds, and the player view
//! that ties them together.

use std::fmt;

use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

use crate::errors::{EfficiencyError, EfficiencyResult};
use crate::tile::{parse_tiles, TileType, MAX_COPIES, NUM_TILE_TYPES};

/// Largest hand the engine accepts: 14 tiles, counting each meld as three.
pub const MAX_HAND_TILES: u8 = 14;

/// At most four groups can be exposed.
pub const MAX_MELDS: usize = 4;

// ---------------------------------------------------------------------------
// HandCounts
// ---------------------------------------------------------------------------

/// Fixed-size counter view of a closed hand: copies held per tile type.
///
/// Invariant: every count is at most 4 and the total is at most 14.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandCounts([u8; NUM_TILE_TYPES]);

impl HandCounts {
    /// An empty hand.
    pub const fn empty() -> Self {
        HandCounts([0; NUM_TILE_TYPES])
    }

    /// Validates raw counts.
    pub fn from_counts(counts: [u8; NUM_TILE_TYPES]) -> EfficiencyResult<Self> {
        let mut total: u16 = 0;
        for (idx, &c) in counts.iter().enumerate() {
            if c > MAX_COPIES {
                return Err(EfficiencyError::TooManyCopies {
                    tile: TileType::from_index(idx),
                    count: c,
                });
            }
            total += c as u16;
        }
        if total > MAX_HAND_TILES as u16 {
            return Err(EfficiencyError::TooManyTiles {
                total: total.min(u8::MAX as u16) as u8,
            });
        }
        Ok(HandCounts(counts))
    }

    /// Builds counts from a tile list.
    pub fn from_tiles(tiles: &[TileType]) -> EfficiencyResult<Self> {
        if tiles.len() > MAX_HAND_TILES as usize {
            return Err(EfficiencyError::TooManyTiles {
                total: tiles.len().min(u8::MAX as usize) as u8,
            });
        }
        let mut counts = [0u8; NUM_TILE_TYPES];
        for t in tiles {
            counts[t.index()] += 1;
        }
        Self::from_counts(counts)
    }

    /// Builds counts from compact notation, e.g. `"123456789m167s77z"`.
    pub fn parse(text: &str) -> EfficiencyResult<Self> {
        Self::from_tiles(&parse_tiles(text)?)
    }

    #[inline]
    pub fn count(&self, tile: TileType) -> u8 {
        self.0[tile.index()]
    }

    #[inline]
    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }

    #[inline]
    pub fn as_array(&self) -> &[u8; NUM_TILE_TYPES] {
        &self.0
    }

    /// Tile types with at least one copy, in index order.
    pub fn present(&self) -> impl Iterator<Item = TileType> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(idx, _)| TileType::from_index(idx))
    }

    /// Adds one copy of `tile`.
    pub fn add(&mut self, tile: TileType) -> EfficiencyResult<()> {
        let count = self.count(tile);
        if count >= MAX_COPIES {
            return Err(EfficiencyError::TooManyCopies {
                tile,
                count: count + 1,
            });
        }
        let total = self.total();
        if total >= MAX_HAND_TILES {
            return Err(EfficiencyError::TooManyTiles { total: total + 1 });
        }
        self.0[tile.index()] += 1;
        Ok(())
    }

    /// Removes one copy of `tile`.
    pub fn remove(&mut self, tile: TileType) -> EfficiencyResult<()> {
        match self.0[tile.index()] {
            0 => Err(EfficiencyError::TileNotInHand { tile }),
            _ => {
                self.0[tile.index()] -= 1;
                Ok(())
            }
        }
    }

    /// Copy with one more `tile`; the caller has already checked availability.
    #[inline]
    pub(crate) fn with_added(&self, tile: TileType) -> Self {
        let mut next = *self;
        debug_assert!(next.0[tile.index()] < MAX_COPIES);
        next.0[tile.index()] += 1;
        next
    }

    /// Copy with one `tile` removed; the caller has already checked presence.
    #[inline]
    pub(crate) fn with_removed(&self, tile: TileType) -> Self {
        let mut next = *self;
        debug_assert!(next.0[tile.index()] > 0);
        next.0[tile.index()] -= 1;
        next
    }
}

impl Default for HandCounts {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for HandCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandCounts({self})")
    }
}

impl fmt::Display for HandCounts {
    /// Compact notation, suit by suit: `123m456p789s11z`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (start, end, letter) in [(0, 9, 'm'), (9, 18, 'p'), (18, 27, 's'), (27, 34, 'z')] {
            let mut any = false;
            for idx in start..end {
                for _ in 0..self.0[idx] {
                    write!(f, "{}", idx - start + 1)?;
                    any = true;
                }
            }
            if any {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Melds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeldKind {
    Chi = 0,
    #[default]
    Pon = 1,
    Daiminkan = 2,
    Ankan = 3,
    Kakan = 4,
}

impl MeldKind {
    #[inline]
    pub const fn is_quad(self) -> bool {
        matches!(self, MeldKind::Daiminkan | MeldKind::Ankan | MeldKind::Kakan)
    }
}

/// A called group owned by the player. Read-only to the engine.
///
/// A chi is identified by its lowest tile; triplets and quads by their tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExposedMeld {
    kind: MeldKind,
    tile: TileType,
}

impl ExposedMeld {
    /// A run starting at `lowest`; must be a suited tile of rank 1-7.
    pub fn chi(lowest: TileType) -> EfficiencyResult<Self> {
        if lowest.offset_in_suit(2).is_none() {
            return Err(EfficiencyError::InvalidMeld {
                message: format!("no run starts at {lowest}"),
            });
        }
        Ok(Self {
            kind: MeldKind::Chi,
            tile: lowest,
        })
    }

    pub fn pon(tile: TileType) -> Self {
        Self {
            kind: MeldKind::Pon,
            tile,
        }
    }

    /// A quad of the given kan kind.
    pub fn kan(kind: MeldKind, tile: TileType) -> EfficiencyResult<Self> {
        if !kind.is_quad() {
            return Err(EfficiencyError::InvalidMeld {
                message: format!("{kind:?} is not a kan"),
            });
        }
        Ok(Self { kind, tile })
    }

    #[inline]
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    /// Lowest tile of the group.
    #[inline]
    pub fn tile(&self) -> TileType {
        self.tile
    }

    /// Closed quads stay concealed; every other meld was called.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.kind != MeldKind::Ankan
    }

    /// Physical tiles making up the meld.
    pub fn tiles(&self) -> ArrayVec<[TileType; 4]> {
        let mut out = ArrayVec::new();
        match self.kind {
            MeldKind::Chi => {
                for offset in 0..3u8 {
                    if let Some(t) = self.tile.offset_in_suit(offset) {
                        out.push(t);
                    }
                }
            }
            MeldKind::Pon => (0..3).for_each(|_| out.push(self.tile)),
            _ => (0..4).for_each(|_| out.push(self.tile)),
        }
        out
    }

    /// Compact shape code used by cache keys: kind in the high byte, tile in
    /// the low byte. Never zero, so an unused slot stays distinguishable.
    #[inline]
    pub(crate) fn signature(&self) -> u16 {
        (((self.kind as u16) + 1) << 8) | self.tile.id() as u16
    }
}

// ---------------------------------------------------------------------------
// PlayerHand
// ---------------------------------------------------------------------------

/// One player's hand: closed counts plus the melds already exposed.
///
/// Construction enforces that no tile type appears more than four times
/// across closed tiles and melds, and that the hand holds at most 14 tiles
/// with every meld counted as three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHand {
    closed: HandCounts,
    melds: ArrayVec<[ExposedMeld; MAX_MELDS]>,
}

impl PlayerHand {
    pub fn new(closed: HandCounts, melds: &[ExposedMeld]) -> EfficiencyResult<Self> {
        if melds.len() > MAX_MELDS {
            return Err(EfficiencyError::InvalidMeld {
                message: format!("{} melds exposed (at most {MAX_MELDS})", melds.len()),
            });
        }
        let size = closed.total() as usize + 3 * melds.len();
        if size > MAX_HAND_TILES as usize {
            return Err(EfficiencyError::TooManyTiles { total: size as u8 });
        }
        check_physical_copies(&closed, melds)?;

        let mut stored = ArrayVec::new();
        stored.extend_from_slice(melds);
        Ok(Self {
            closed,
            melds: stored,
        })
    }

    /// A hand with no melds.
    pub fn closed(closed: HandCounts) -> Self {
        Self {
            closed,
            melds: ArrayVec::new(),
        }
    }

    /// Parses the closed part from compact notation.
    pub fn parse(text: &str, melds: &[ExposedMeld]) -> EfficiencyResult<Self> {
        Self::new(HandCounts::parse(text)?, melds)
    }

    #[inline]
    pub fn closed_counts(&self) -> &HandCounts {
        &self.closed
    }

    #[inline]
    pub fn melds(&self) -> &[ExposedMeld] {
        &self.melds
    }

    /// Hand size with each meld counted as three tiles (13 or 14 in play).
    #[inline]
    pub fn size(&self) -> u8 {
        self.closed.total() + 3 * self.melds.len() as u8
    }

    /// Copies of `tile` the player physically owns, closed and melded.
    pub fn held(&self, tile: TileType) -> u8 {
        self.full_counts()[tile.index()]
    }

    /// Full per-type view including every meld tile (quads count four).
    pub fn full_counts(&self) -> [u8; NUM_TILE_TYPES] {
        held_counts(&self.closed, &self.melds)
    }

    /// Same melds, different closed part. The caller keeps the copy limits.
    #[inline]
    pub(crate) fn with_closed(&self, closed: HandCounts) -> Self {
        Self {
            closed,
            melds: self.melds.clone(),
        }
    }
}

/// Copies per type across the closed part and every meld.
pub(crate) fn held_counts(closed: &HandCounts, melds: &[ExposedMeld]) -> [u8; NUM_TILE_TYPES] {
    let mut counts = *closed.as_array();
    for meld in melds {
        for t in meld.tiles() {
            counts[t.index()] += 1;
        }
    }
    counts
}

fn check_physical_copies(closed: &HandCounts, melds: &[ExposedMeld]) -> EfficiencyResult<()> {
    let mut counts = *closed.as_array();
    for meld in melds {
        for t in meld.tiles() {
            counts[t.index()] += 1;
            if counts[t.index()] > MAX_COPIES {
                return Err(EfficiencyError::TooManyCopies {
                    tile: t,
                    count: counts[t.index()],
                });
            }
        }
    }
    Ok(())
}
