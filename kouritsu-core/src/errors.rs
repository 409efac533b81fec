use thiserror::Error;

use crate::tile::TileType;

/// Contract violations detected at the engine boundary.
///
/// Every variant signals inconsistent bookkeeping in the caller (impossible
/// tile counts, a hand of the wrong size for the operation); none of them is
/// retried, since the computation is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EfficiencyError {
    /// 牌文字列・手牌文字列のパースエラー
    #[error("Parse error on '{input}': {message}")]
    Parse { input: String, message: String },
    /// 牌種番号が 0..34 の範囲外
    #[error("Invalid tile type id {0}")]
    InvalidTile(u8),
    /// 手牌 + 副露 (3枚換算) が 14 枚を超える
    #[error("Too many tiles: {total} (at most 14 including melds)")]
    TooManyTiles { total: u8 },
    /// 同一牌種が 5 枚以上
    #[error("Tile {tile} appears {count} times (at most 4)")]
    TooManyCopies { tile: TileType, count: u8 },
    /// 操作に対して手牌枚数が不正 (3n+1 / 3n+2)
    #[error("Unexpected hand size {total}: expected {expected}")]
    UnexpectedHandSize { total: u8, expected: &'static str },
    /// 打牌候補が手牌に存在しない
    #[error("Tile {tile} is not in the closed hand")]
    TileNotInHand { tile: TileType },
    /// 副露の形が不正
    #[error("Invalid meld: {message}")]
    InvalidMeld { message: String },
    /// 見えている枚数が 4 枚を超える (上流の集計不整合)
    #[error("Revealed count for {tile} exceeds 4")]
    RevealedOverflow { tile: TileType },
    /// 見えている枚数が自分の手牌 (副露含む) の枚数より少ない
    #[error("Revealed count {revealed} for {tile} is below the {held} copies held")]
    RevealedBelowHeld { tile: TileType, held: u8, revealed: u8 },
    /// 設定値の不整合
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type EfficiencyResult<T> = Result<T, EfficiencyError>;
