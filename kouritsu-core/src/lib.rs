//! Kouritsu tile-efficiency engine
//!
//! Shanten, waiting tiles, and ukeire for Riichi Mahjong hands, sized for
//! self-play volumes. Computes standard, seven-pairs and thirteen-orphans
//! shanten, ranks the discards of a 14-tile hand by tile acceptance with a
//! one-ply lookahead, and evaluates many players' decisions in parallel.

pub mod batch;
pub mod cache;
pub mod config;
pub mod efficiency;
pub mod errors;
pub mod hand;
pub mod revealed;
pub mod shanten;
pub mod tile;
pub mod waits;

pub use batch::{evaluate_batch_simple, BatchEvaluator, DecisionRequest, DecisionResult};
pub use config::{BatchConfig, EngineConfig};
pub use efficiency::{rank_candidates, DiscardCandidate, DiscardShantenTable, TileEfficiencyEngine};
pub use errors::{EfficiencyError, EfficiencyResult};
pub use hand::{ExposedMeld, HandCounts, MeldKind, PlayerHand};
pub use revealed::RevealedCounts;
pub use shanten::{
    calculate_shanten, is_agari, shanten_breakdown, ShantenBreakdown, ShantenCalculator, AGARI,
    TENPAI,
};
pub use tile::{parse_tile, parse_tiles, TileType};
pub use waits::{find_waits, WaitingSet};
