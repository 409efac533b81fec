//! Tile representation for the 34-type counting model.
//!
//! Provides the `TileType` newtype, suit classification, MJAI-style names,
//! and the compact hand notation (`"123m456p789s11z"`) used by tests and
//! callers that build hands by hand.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EfficiencyError, EfficiencyResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile types (0-33).
pub const NUM_TILE_TYPES: usize = 34;

/// Number of tiles per suited category (1-9).
pub const NUM_SUIT_TILES: usize = 9;

/// Physical copies of every tile type in the set.
pub const MAX_COPIES: u8 = 4;

// Suit range starts (tile type indices).
pub const MANZU_START: u8 = 0;
pub const PINZU_START: u8 = 9;
pub const SOUZU_START: u8 = 18;
pub const JIHAI_START: u8 = 27;

// Named honor tile indices for readability.
pub const EAST: u8 = 27;
pub const SOUTH: u8 = 28;
pub const WEST: u8 = 29;
pub const NORTH: u8 = 30;
pub const HAKU: u8 = 31;
pub const HATSU: u8 = 32;
pub const CHUN: u8 = 33;

/// The 13 terminal and honor types (1m 9m 1p 9p 1s 9s E S W N P F C).
pub const TERMINALS_AND_HONORS: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// The four tile categories in Riichi Mahjong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Manzu = 0,
    Pinzu = 1,
    Souzu = 2,
    Jihai = 3,
}

impl Suit {
    /// Returns the starting tile type index for this suit.
    #[inline]
    pub const fn start(self) -> u8 {
        match self {
            Suit::Manzu => MANZU_START,
            Suit::Pinzu => PINZU_START,
            Suit::Souzu => SOUZU_START,
            Suit::Jihai => JIHAI_START,
        }
    }

    /// Suit for a notation letter (`m`, `p`, `s`, `z`).
    #[inline]
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'm' => Some(Suit::Manzu),
            'p' => Some(Suit::Pinzu),
            's' => Some(Suit::Souzu),
            'z' => Some(Suit::Jihai),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TileType newtype
// ---------------------------------------------------------------------------

/// A tile type in the range 0-33. Wraps a `u8` for type safety.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TileType(u8);

impl TileType {
    /// Creates a `TileType` if `id` is in range 0..34.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILE_TYPES as u8 {
            Some(TileType(id))
        } else {
            None
        }
    }

    /// Caller guarantees `id < 34`.
    #[inline]
    pub(crate) const fn from_index(id: usize) -> Self {
        debug_assert!(id < NUM_TILE_TYPES);
        TileType(id as u8)
    }

    /// Iterates over all 34 tile types in index order.
    pub fn all() -> impl Iterator<Item = TileType> {
        (0..NUM_TILE_TYPES as u8).map(TileType)
    }

    /// Raw numeric id (0-33).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Id as an array index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Which suit this tile belongs to.
    #[inline]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..9 => Suit::Manzu,
            9..18 => Suit::Pinzu,
            18..27 => Suit::Souzu,
            _ => Suit::Jihai,
        }
    }

    /// 1-based number within the suit (1-9), or `None` for honor tiles.
    #[inline]
    pub const fn number(self) -> Option<u8> {
        if self.0 < JIHAI_START {
            Some((self.0 % NUM_SUIT_TILES as u8) + 1)
        } else {
            None
        }
    }

    /// True for 1 or 9 of any suit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        if self.0 >= JIHAI_START {
            return false;
        }
        let num = self.0 % NUM_SUIT_TILES as u8;
        num == 0 || num == 8
    }

    /// True for wind or dragon tiles (indices 27-33).
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.0 >= JIHAI_START
    }

    /// True for terminals or honors (yaochuuhai).
    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_terminal() || self.is_honor()
    }

    /// True for manzu, pinzu, or souzu (not jihai).
    #[inline]
    pub const fn is_suited(self) -> bool {
        self.0 < JIHAI_START
    }

    /// The tile `offset` ranks higher in the same suit, if one exists.
    /// Honors have no neighbours.
    #[inline]
    pub const fn offset_in_suit(self, offset: u8) -> Option<Self> {
        match self.number() {
            Some(n) if n + offset <= NUM_SUIT_TILES as u8 => Some(TileType(self.0 + offset)),
            _ => None,
        }
    }
}

impl TryFrom<u8> for TileType {
    type Error = EfficiencyError;

    fn try_from(id: u8) -> EfficiencyResult<Self> {
        TileType::new(id).ok_or(EfficiencyError::InvalidTile(id))
    }
}

impl From<TileType> for u8 {
    fn from(tile: TileType) -> u8 {
        tile.0
    }
}

impl fmt::Debug for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileType({}={})", self.0, tile_type_to_mjai(self.0))
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(tile_type_to_mjai(self.0))
    }
}

// ---------------------------------------------------------------------------
// Names and notation
// ---------------------------------------------------------------------------

/// MJAI-style string names for tile types.
const TILE_NAMES: [&str; NUM_TILE_TYPES] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1p", "2p", "3p", "4p", "5p", "6p", "7p",
    "8p", "9p", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", "E", "S", "W", "N", "P", "F",
    "C",
];

/// Returns the MJAI-style name for a tile type (0-33).
/// Out-of-range values return "??".
#[inline]
pub fn tile_type_to_mjai(tile_type: u8) -> &'static str {
    TILE_NAMES.get(tile_type as usize).copied().unwrap_or("??")
}

/// Parses compact hand notation into tile types.
///
/// Digits accumulate until a suit letter (`m`, `p`, `s`, `z`) closes them:
/// `"123m456p789s11z"`. `0` is a red five and maps to the plain five; honors
/// are `1z`-`7z` (E S W N P F C). Whitespace is ignored.
pub fn parse_tiles(text: &str) -> EfficiencyResult<Vec<TileType>> {
    let parse_err = |message: String| EfficiencyError::Parse {
        input: text.to_string(),
        message,
    };

    let mut tiles = Vec::new();
    let mut pending: Vec<u8> = Vec::new();

    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        if let Some(d) = c.to_digit(10) {
            pending.push(d as u8);
            continue;
        }
        let suit = Suit::from_letter(c).ok_or_else(|| parse_err(format!("unexpected '{c}'")))?;
        if pending.is_empty() {
            return Err(parse_err(format!("suit '{c}' without digits")));
        }
        for &d in &pending {
            let rank = match (suit, d) {
                (Suit::Jihai, 1..=7) => d - 1,
                (Suit::Jihai, _) => return Err(parse_err(format!("no honor tile {d}z"))),
                (_, 0) => 4,
                (_, _) => d - 1,
            };
            tiles.push(TileType(suit.start() + rank));
        }
        pending.clear();
    }

    if !pending.is_empty() {
        return Err(parse_err("pending digits without suit".to_string()));
    }
    Ok(tiles)
}

/// Parses a single tile such as `"5s"` or `"7z"`.
pub fn parse_tile(text: &str) -> EfficiencyResult<TileType> {
    match parse_tiles(text)?.as_slice() {
        [tile] => Ok(*tile),
        other => Err(EfficiencyError::Parse {
            input: text.to_string(),
            message: format!("expected exactly one tile, found {}", other.len()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_type_new_valid() {
        for i in 0..34u8 {
            assert!(
                TileType::new(i).is_some(),
                "TileType::new({i}) should be Some"
            );
        }
        assert!(TileType::new(34).is_none());
        assert!(TileType::new(255).is_none());
    }

    #[test]
    fn suit_classification() {
        for i in 0..9u8 {
            let t = TileType::new(i).unwrap();
            assert_eq!(t.suit(), Suit::Manzu, "tile {i} should be Manzu");
            assert!(t.is_suited());
            assert!(!t.is_honor());
        }
        for i in 9..18u8 {
            assert_eq!(TileType::new(i).unwrap().suit(), Suit::Pinzu);
        }
        for i in 18..27u8 {
            assert_eq!(TileType::new(i).unwrap().suit(), Suit::Souzu);
        }
        for i in 27..34u8 {
            let t = TileType::new(i).unwrap();
            assert_eq!(t.suit(), Suit::Jihai, "tile {i} should be Jihai");
            assert!(t.is_honor());
            assert!(!t.is_suited());
        }
    }

    #[test]
    fn terminal_detection() {
        for &i in &TERMINALS_AND_HONORS {
            assert!(TileType::new(i).unwrap().is_terminal_or_honor());
        }
        let middles = [1, 4, 10, 14, 19, 23];
        for &i in &middles {
            let t = TileType::new(i).unwrap();
            assert!(!t.is_terminal(), "tile {i} should NOT be terminal");
            assert!(!t.is_terminal_or_honor());
        }
    }

    #[test]
    fn offset_stays_inside_suit() {
        let seven_m = TileType::new(6).unwrap();
        assert_eq!(seven_m.offset_in_suit(2), TileType::new(8));
        assert_eq!(seven_m.offset_in_suit(3), None); // would wrap into pinzu
        assert_eq!(TileType::new(EAST).unwrap().offset_in_suit(1), None);
    }

    #[test]
    fn tile_type_display() {
        assert_eq!(format!("{}", TileType::new(0).unwrap()), "1m");
        assert_eq!(format!("{}", TileType::new(8).unwrap()), "9m");
        assert_eq!(format!("{}", TileType::new(27).unwrap()), "E");
        assert_eq!(format!("{}", TileType::new(33).unwrap()), "C");
        assert_eq!(tile_type_to_mjai(99), "??");
    }

    #[test]
    fn parse_mixed_hand() {
        let tiles = parse_tiles("123m 406p 9s 17z").unwrap();
        let ids: Vec<u8> = tiles.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 12, 13, 14, 26, EAST, CHUN]);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_tiles("123").is_err()); // no suit
        assert!(parse_tiles("8z").is_err()); // no 8th honor
        assert!(parse_tiles("m").is_err()); // suit without digits
        assert!(parse_tiles("12x").is_err());
    }

    #[test]
    fn parse_single_tile() {
        assert_eq!(parse_tile("5s").unwrap().id(), 22);
        assert!(parse_tile("56s").is_err());
    }

    #[test]
    fn serde_round_trips_through_u8() {
        let t = TileType::new(HATSU).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "32");
        let back: TileType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TileType>("34").is_err());
    }
}
