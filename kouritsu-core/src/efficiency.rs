//! Discard evaluation for a 3n+2 hand.
//!
//! For every tile type in the closed hand the engine removes one copy,
//! finds the waiting tiles of what is left, and counts the unseen copies of
//! those tiles (ukeire). Candidates in a configurable shanten band also get
//! a one-ply lookahead (second-level ukeire): each wait is drawn in turn,
//! the best follow-up discard that advances the hand is found, and its
//! ukeire is weighted by the live copies of the drawn tile.

use std::cmp::Ordering;

use crate::config::EngineConfig;
use crate::errors::{EfficiencyError, EfficiencyResult};
use crate::hand::PlayerHand;
use crate::revealed::RevealedCounts;
use crate::shanten::{ShantenBreakdown, ShantenCalculator, AGARI};
use crate::tile::{TileType, NUM_TILE_TYPES};
use crate::waits::{find_waits_valid, WaitingSet};

/// One legal discard and what it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardCandidate {
    /// 打牌
    pub tile: TileType,
    /// 打牌後の向聴数
    pub shanten: i8,
    /// 有効牌
    pub waits: WaitingSet,
    /// 有効牌の残り枚数
    pub ukeire: u32,
    /// 一手先まで見た受け入れ (順位付け用のスカラー)
    pub ukeire2: Option<u32>,
    /// 向聴戻しになるかどうか
    pub shanten_down: bool,
}

impl DiscardCandidate {
    /// Efficiency order: lower shanten, then more ukeire, then more
    /// second-level ukeire, then lower tile index. `Less` ranks first.
    pub fn cmp_efficiency(&self, other: &Self) -> Ordering {
        self.shanten
            .cmp(&other.shanten)
            .then_with(|| other.ukeire.cmp(&self.ukeire))
            .then_with(|| other.ukeire2.cmp(&self.ukeire2))
            .then_with(|| self.tile.cmp(&other.tile))
    }
}

/// Sorts candidates best first.
pub fn rank_candidates(candidates: &mut [DiscardCandidate]) {
    candidates.sort_by(DiscardCandidate::cmp_efficiency);
}

/// Shanten of a 3n+2 hand and after each possible discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardShantenTable {
    /// Shanten of the hand as held.
    pub base: i8,
    /// Shanten after discarding each tile. `None` if the tile is not in the
    /// closed hand.
    pub discard: [Option<i8>; NUM_TILE_TYPES],
}

impl DiscardShantenTable {
    /// Discards that do not move the hand further from completion.
    pub fn keeping(&self) -> impl Iterator<Item = TileType> + '_ {
        self.discard
            .iter()
            .enumerate()
            .filter(|(_, sh)| matches!(sh, Some(s) if *s <= self.base))
            .map(|(idx, _)| TileType::from_index(idx))
    }
}

/// The revealed counts must already include every tile the player holds.
fn expect_own_tiles_revealed(hand: &PlayerHand, revealed: &RevealedCounts) -> EfficiencyResult<()> {
    for (idx, &held) in hand.full_counts().iter().enumerate() {
        let tile = TileType::from_index(idx);
        let seen = revealed.count(tile);
        if seen < held {
            return Err(EfficiencyError::RevealedBelowHeld {
                tile,
                held,
                revealed: seen,
            });
        }
    }
    Ok(())
}

fn expect_size(hand: &PlayerHand, remainder: u8, expected: &'static str) -> EfficiencyResult<()> {
    let total = hand.size();
    if total % 3 != remainder {
        return Err(EfficiencyError::UnexpectedHandSize { total, expected });
    }
    Ok(())
}

/// Tile-efficiency engine for one player.
///
/// Owns the shanten cache for that player's current hand; call
/// [`TileEfficiencyEngine::new_hand`] when a new hand is dealt.
#[derive(Debug, Clone)]
pub struct TileEfficiencyEngine {
    calc: ShantenCalculator,
    config: EngineConfig,
}

impl Default for TileEfficiencyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TileEfficiencyEngine {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            calc: ShantenCalculator::with_cache(config.cache_enabled, config.cache_capacity),
            config,
        }
    }

    pub fn with_config(config: EngineConfig) -> EfficiencyResult<Self> {
        config.validate()?;
        Ok(Self {
            calc: ShantenCalculator::with_cache(config.cache_enabled, config.cache_capacity),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn calculator(&self) -> &ShantenCalculator {
        &self.calc
    }

    /// Forgets everything cached for the previous hand.
    pub fn new_hand(&mut self) {
        self.calc.clear_cache();
    }

    /// Overall shanten of any hand the engine accepts.
    pub fn shanten(&mut self, hand: &PlayerHand) -> i8 {
        self.calc.calculate_valid(hand.closed_counts(), hand.melds())
    }

    pub fn breakdown(&self, hand: &PlayerHand) -> EfficiencyResult<ShantenBreakdown> {
        self.calc.breakdown(hand.closed_counts(), hand.melds())
    }

    /// Waiting tiles of a 3n+1 hand.
    pub fn find_waits(&mut self, hand: &PlayerHand) -> EfficiencyResult<(i8, WaitingSet)> {
        expect_size(hand, 1, "3n+1")?;
        Ok(find_waits_valid(&mut self.calc, hand))
    }

    /// Shanten of a 3n+2 hand and after each possible discard.
    pub fn discard_shanten(
        &mut self,
        hand: &PlayerHand,
    ) -> EfficiencyResult<DiscardShantenTable> {
        expect_size(hand, 2, "3n+2")?;
        Ok(self.discard_table(hand))
    }

    fn discard_table(&mut self, hand: &PlayerHand) -> DiscardShantenTable {
        let closed = hand.closed_counts();
        let melds = hand.melds();
        let mut table = DiscardShantenTable {
            base: self.calc.calculate_valid(closed, melds),
            discard: [None; NUM_TILE_TYPES],
        };
        for tile in closed.present() {
            let sh = self.calc.calculate_valid(&closed.with_removed(tile), melds);
            table.discard[tile.index()] = Some(sh);
        }
        table
    }

    /// Evaluates every legal discard of a 3n+2 hand, best first.
    ///
    /// `revealed` must count every copy the player can see, their own hand
    /// included; counts below the player's own holdings are rejected. An
    /// already complete hand yields an empty list.
    pub fn evaluate_discards(
        &mut self,
        hand: &PlayerHand,
        revealed: &RevealedCounts,
    ) -> EfficiencyResult<Vec<DiscardCandidate>> {
        expect_size(hand, 2, "3n+2")?;
        expect_own_tiles_revealed(hand, revealed)?;

        let table = self.discard_table(hand);
        if table.base == AGARI {
            log::debug!("hand {} is already complete", hand.closed_counts());
            return Ok(Vec::new());
        }

        let mut candidates = Vec::with_capacity(NUM_TILE_TYPES);
        for tile in hand.closed_counts().present() {
            let after = hand.with_closed(hand.closed_counts().with_removed(tile));
            let (shanten, waits) = find_waits_valid(&mut self.calc, &after);
            let ukeire = count_ukeire(&waits, revealed);
            let ukeire2 = self
                .config
                .wants_second_level(shanten)
                .then(|| self.second_level_ukeire(&after, shanten, &waits, revealed));
            log::trace!(
                "discard {tile}: shanten {shanten}, waits {waits:?}, ukeire {ukeire}/{ukeire2:?}"
            );
            candidates.push(DiscardCandidate {
                tile,
                shanten,
                waits,
                ukeire,
                ukeire2,
                shanten_down: shanten > table.base,
            });
        }

        rank_candidates(&mut candidates);
        log::debug!(
            "evaluated {} discards of {} (shanten {}, size {}, cache {} entries)",
            candidates.len(),
            hand.closed_counts(),
            table.base,
            hand.size(),
            self.calc.cache().len()
        );
        Ok(candidates)
    }

    /// The most efficient discard, or `None` for a complete hand.
    pub fn best_discard(
        &mut self,
        hand: &PlayerHand,
        revealed: &RevealedCounts,
    ) -> EfficiencyResult<Option<DiscardCandidate>> {
        Ok(self.evaluate_discards(hand, revealed)?.into_iter().next())
    }

    /// Sum over the waits of `after` of live copies times the best ukeire
    /// reachable after drawing that wait and discarding once more.
    fn second_level_ukeire(
        &mut self,
        after: &PlayerHand,
        shanten: i8,
        waits: &WaitingSet,
        revealed: &RevealedCounts,
    ) -> u32 {
        let mut total = 0;
        for drawn in waits.iter() {
            let live = revealed.live(drawn) as u32;
            if live == 0 {
                continue;
            }
            let hand = after.with_closed(after.closed_counts().with_added(drawn));
            let seen = revealed.with_drawn(drawn);
            total += live * self.best_ukeire(&hand, shanten - 1, &seen);
        }
        total
    }

    /// Largest ukeire among discards of `hand` that reach `target` shanten.
    fn best_ukeire(&mut self, hand: &PlayerHand, target: i8, revealed: &RevealedCounts) -> u32 {
        let closed = hand.closed_counts();
        let mut best = 0;
        for tile in closed.present() {
            if self.calc.calculate_valid(&closed.with_removed(tile), hand.melds()) != target {
                continue;
            }
            let after = hand.with_closed(closed.with_removed(tile));
            let (_, waits) = find_waits_valid(&mut self.calc, &after);
            best = best.max(count_ukeire(&waits, revealed));
        }
        best
    }
}

/// Unseen copies of every waiting tile.
fn count_ukeire(waits: &WaitingSet, revealed: &RevealedCounts) -> u32 {
    waits.iter().map(|t| revealed.live(t) as u32).sum()
}
