//! Standard-shape (four groups + pair) shanten by undo-based depth-first search.
//!
//! The search walks the 27 suited positions left to right. At every non-empty
//! position it branches over each legal use of the remaining copies: triplet,
//! pair, run, two-tile run fragment (taatsu), or isolated leftover. Every
//! branch mutates one [`SearchContext`] and undoes the mutation before the
//! next branch runs, so no branch sees another branch's partial state.
//! Honors are counted up front because they can never join a run.
//!
//! A type is dead when the player holds all four copies, closed or called.
//! Fragments that only a dead type completes are never scored, a dead pair
//! only counts as the head, and a hand whose leftovers are all dead cannot
//! pick up a pair from them. An empty group slot must be filled around a
//! leftover that can still become a group: one the player holds at most two
//! copies of, or a suited tile with some run whose other two types are live.

use crate::tile::{JIHAI_START, MAX_COPIES, NUM_SUIT_TILES, NUM_TILE_TYPES};

use super::AGARI;

/// Upper bound for any standard-shape result; the search starts here.
const WORST_SHANTEN: i8 = 8;

/// Slots available for groups and partial groups, the pair slot included.
const BLOCK_SLOTS: i8 = 5;

const SUITED: usize = JIHAI_START as usize;

/// Running totals for one search, threaded by `&mut` through the recursion.
///
/// Every `push_*` has a matching `pop_*` that restores exactly the state it
/// changed; call sites always pair them around a single recursive call.
#[derive(Debug, Clone)]
pub(crate) struct SearchContext {
    tiles: [u8; NUM_TILE_TYPES],
    /// Complete groups, exposed melds included.
    groups: i8,
    taatsu: i8,
    pairs: i8,
    /// Pairs of a dead type; usable as the head and nothing else.
    dead_pairs: i8,
    /// Types whose four copies are all held (bit per type). A closed honor
    /// quad is left out: the honor floor already charges for it.
    dead: u64,
    /// Types currently left isolated.
    isolated: u64,
    /// Types a lone copy of which can still grow into a group.
    seedable: u64,
    /// Honor quads: each one leaves a copy that can never be paired.
    honor_quad_floor: i8,
    best: i8,
}

impl SearchContext {
    /// Prepares a search over the closed `tiles`. `held` counts every copy
    /// the player owns, called tiles included.
    ///
    /// Groups already called are implied by the tiles missing from a 14-tile
    /// hand, so a 10-tile closed hand starts with one complete group.
    pub(crate) fn new(tiles: &[u8; NUM_TILE_TYPES], held: &[u8; NUM_TILE_TYPES]) -> Self {
        let total: u8 = tiles.iter().sum();
        let implied_groups = (14u8.saturating_sub(total) / 3) as i8;

        let mut ctx = Self {
            tiles: *tiles,
            groups: implied_groups,
            taatsu: 0,
            pairs: 0,
            dead_pairs: 0,
            dead: 0,
            isolated: 0,
            seedable: 0,
            honor_quad_floor: 0,
            best: WORST_SHANTEN,
        };
        ctx.dead = (0..NUM_TILE_TYPES)
            .filter(|&idx| held[idx] >= MAX_COPIES)
            .filter(|&idx| idx < SUITED || tiles[idx] < MAX_COPIES)
            .fold(0, |mask, idx| mask | (1 << idx));
        ctx.seedable = (0..NUM_TILE_TYPES)
            .filter(|&idx| can_grow(held, idx))
            .fold(0, |mask, idx| mask | (1 << idx));
        ctx.count_honors(total);
        ctx
    }

    /// Runs the search and returns the minimal standard-shape shanten.
    pub(crate) fn solve(mut self) -> i8 {
        self.run(0);
        self.best
    }

    fn count_honors(&mut self, total: u8) {
        for idx in SUITED..NUM_TILE_TYPES {
            match self.tiles[idx] {
                4 => {
                    self.groups += 1;
                    self.honor_quad_floor += 1;
                    self.isolated |= 1 << idx;
                }
                3 => self.groups += 1,
                2 => self.pairs += 1,
                1 => self.isolated |= 1 << idx,
                _ => {}
            }
        }
        // Right after a draw the extra copy can simply be discarded.
        if self.honor_quad_floor > 0 && total % 3 == 2 {
            self.honor_quad_floor -= 1;
        }
    }

    #[inline]
    fn is_dead(&self, idx: usize) -> bool {
        self.dead & (1 << idx) != 0
    }

    /// Whether a run fragment at `pos`, `pos + 1` can still be completed.
    #[inline]
    fn side_is_live(&self, pos: usize, rank: usize) -> bool {
        (rank > 0 && !self.is_dead(pos - 1)) || (rank < 7 && !self.is_dead(pos + 2))
    }

    /// Whether the hole of a fragment at `pos`, `pos + 2` can still be drawn.
    #[inline]
    fn gap_is_live(&self, pos: usize) -> bool {
        !self.is_dead(pos + 1)
    }

    fn run(&mut self, mut pos: usize) {
        if self.best == AGARI {
            return;
        }
        while pos < SUITED && self.tiles[pos] == 0 {
            pos += 1;
        }
        if pos >= SUITED {
            self.settle();
            return;
        }

        let rank = pos % NUM_SUIT_TILES;
        match self.tiles[pos] {
            4 => self.branch_four(pos, rank),
            3 => self.branch_three(pos, rank),
            2 => self.branch_two(pos, rank),
            _ => self.branch_one(pos, rank),
        }
    }

    fn branch_four(&mut self, pos: usize, rank: usize) {
        self.push_triplet(pos);
        if rank < 7 && self.tiles[pos + 2] > 0 {
            if self.tiles[pos + 1] > 0 {
                self.push_run(pos);
                self.run(pos + 1);
                self.pop_run(pos);
            }
            if self.gap_is_live(pos) {
                self.push_gap_taatsu(pos);
                self.run(pos + 1);
                self.pop_gap_taatsu(pos);
            }
        }
        if rank < 8 && self.tiles[pos + 1] > 0 && self.side_is_live(pos, rank) {
            self.push_side_taatsu(pos);
            self.run(pos + 1);
            self.pop_side_taatsu(pos);
        }
        self.push_isolated(pos);
        self.run(pos + 1);
        self.pop_isolated(pos);
        self.pop_triplet(pos);

        self.push_pair(pos);
        if rank < 7 && self.tiles[pos + 2] > 0 {
            if self.tiles[pos + 1] > 0 {
                self.push_run(pos);
                self.run(pos);
                self.pop_run(pos);
            }
            if self.gap_is_live(pos) {
                self.push_gap_taatsu(pos);
                self.run(pos + 1);
                self.pop_gap_taatsu(pos);
            }
        }
        if rank < 8 && self.tiles[pos + 1] > 0 && self.side_is_live(pos, rank) {
            self.push_side_taatsu(pos);
            self.run(pos + 1);
            self.pop_side_taatsu(pos);
        }
        self.pop_pair(pos);
    }

    fn branch_three(&mut self, pos: usize, rank: usize) {
        self.push_triplet(pos);
        self.run(pos + 1);
        self.pop_triplet(pos);

        self.push_pair(pos);
        if rank < 7 && self.tiles[pos + 1] > 0 && self.tiles[pos + 2] > 0 {
            self.push_run(pos);
            self.run(pos + 1);
            self.pop_run(pos);
        } else {
            if rank < 7 && self.tiles[pos + 2] > 0 && self.gap_is_live(pos) {
                self.push_gap_taatsu(pos);
                self.run(pos + 1);
                self.pop_gap_taatsu(pos);
            }
            if rank < 8 && self.tiles[pos + 1] > 0 && self.side_is_live(pos, rank) {
                self.push_side_taatsu(pos);
                self.run(pos + 1);
                self.pop_side_taatsu(pos);
            }
        }
        self.pop_pair(pos);

        if rank < 7 && self.tiles[pos + 1] >= 2 && self.tiles[pos + 2] >= 2 {
            self.push_run(pos);
            self.push_run(pos);
            self.run(pos);
            self.pop_run(pos);
            self.pop_run(pos);
        }
    }

    fn branch_two(&mut self, pos: usize, rank: usize) {
        self.push_pair(pos);
        self.run(pos + 1);
        self.pop_pair(pos);

        if rank < 7 && self.tiles[pos + 1] > 0 && self.tiles[pos + 2] > 0 {
            self.push_run(pos);
            self.run(pos);
            self.pop_run(pos);
        }

        // A dead pair is only worth keeping as the head; otherwise the two
        // copies may do more as run fragments.
        if self.is_dead(pos) {
            if rank < 7 && self.tiles[pos + 2] > 0 && self.gap_is_live(pos) {
                self.push_gap_taatsu(pos);
                self.run(pos);
                self.pop_gap_taatsu(pos);
            }
            if rank < 8 && self.tiles[pos + 1] > 0 && self.side_is_live(pos, rank) {
                self.push_side_taatsu(pos);
                self.run(pos);
                self.pop_side_taatsu(pos);
            }
        }
    }

    fn branch_one(&mut self, pos: usize, rank: usize) {
        // A lone tile followed by a lone neighbour and anything after it is
        // always best spent as a run, as long as none of the four types from
        // here on is dead.
        if rank < 6
            && self.tiles[pos + 1] == 1
            && self.tiles[pos + 2] > 0
            && self.dead & (0b1111 << pos) == 0
        {
            self.push_run(pos);
            self.run(pos + 2);
            self.pop_run(pos);
            return;
        }

        self.push_isolated(pos);
        self.run(pos + 1);
        self.pop_isolated(pos);

        if rank < 7 && self.tiles[pos + 2] > 0 {
            if self.tiles[pos + 1] > 0 {
                self.push_run(pos);
                self.run(pos + 1);
                self.pop_run(pos);
            }
            if self.gap_is_live(pos) {
                self.push_gap_taatsu(pos);
                self.run(pos + 1);
                self.pop_gap_taatsu(pos);
            }
        }
        if rank < 8 && self.tiles[pos + 1] > 0 && self.side_is_live(pos, rank) {
            self.push_side_taatsu(pos);
            self.run(pos + 1);
            self.pop_side_taatsu(pos);
        }
    }

    /// Scores the current leaf and keeps the minimum.
    fn settle(&mut self) {
        let mut seeds = self.isolated & self.seedable;
        let mut shanten;
        let blocks;
        if self.pairs > 0 {
            // One pair is the head, a dead one if there is any; only live
            // pairs beyond it can still grow into triplets.
            let live_pairs = self.pairs - self.dead_pairs;
            let extra = if self.dead_pairs > 0 { live_pairs } else { live_pairs - 1 };
            shanten = WORST_SHANTEN - 2 * self.groups - self.taatsu - 1 - extra;
            blocks = self.groups + self.taatsu + extra;
        } else {
            shanten = WORST_SHANTEN - 2 * self.groups - self.taatsu;
            blocks = self.groups + self.taatsu;
            let pairable = self.isolated & !self.dead;
            if self.isolated != 0 && pairable == 0 {
                // Every isolated tile is dead: nothing left can be paired.
                shanten += 1;
            } else if pairable != 0 && pairable & !seeds == 0 {
                // The head has to be built on one of the seeds.
                seeds &= !(pairable & pairable.wrapping_neg());
            }
        }
        let open_slots = BLOCK_SLOTS - 1 - blocks;
        let seed_count = seeds.count_ones() as i8;
        if open_slots > seed_count {
            shanten += open_slots - seed_count;
        }
        if blocks > BLOCK_SLOTS - 1 {
            shanten += blocks - (BLOCK_SLOTS - 1);
        }
        if shanten != AGARI && shanten < self.honor_quad_floor {
            shanten = self.honor_quad_floor;
        }

        if shanten < self.best {
            self.best = shanten;
        }
    }

    // -- push / pop pairs -------------------------------------------------

    #[inline]
    fn push_triplet(&mut self, pos: usize) {
        self.tiles[pos] -= 3;
        self.groups += 1;
    }

    #[inline]
    fn pop_triplet(&mut self, pos: usize) {
        self.tiles[pos] += 3;
        self.groups -= 1;
    }

    #[inline]
    fn push_run(&mut self, pos: usize) {
        self.tiles[pos] -= 1;
        self.tiles[pos + 1] -= 1;
        self.tiles[pos + 2] -= 1;
        self.groups += 1;
    }

    #[inline]
    fn pop_run(&mut self, pos: usize) {
        self.tiles[pos] += 1;
        self.tiles[pos + 1] += 1;
        self.tiles[pos + 2] += 1;
        self.groups -= 1;
    }

    #[inline]
    fn push_pair(&mut self, pos: usize) {
        self.tiles[pos] -= 2;
        self.pairs += 1;
        if self.is_dead(pos) {
            self.dead_pairs += 1;
        }
    }

    #[inline]
    fn pop_pair(&mut self, pos: usize) {
        self.tiles[pos] += 2;
        self.pairs -= 1;
        if self.is_dead(pos) {
            self.dead_pairs -= 1;
        }
    }

    /// Adjacent fragment, e.g. 34m.
    #[inline]
    fn push_side_taatsu(&mut self, pos: usize) {
        self.tiles[pos] -= 1;
        self.tiles[pos + 1] -= 1;
        self.taatsu += 1;
    }

    #[inline]
    fn pop_side_taatsu(&mut self, pos: usize) {
        self.tiles[pos] += 1;
        self.tiles[pos + 1] += 1;
        self.taatsu -= 1;
    }

    /// Fragment with a hole, e.g. 35m.
    #[inline]
    fn push_gap_taatsu(&mut self, pos: usize) {
        self.tiles[pos] -= 1;
        self.tiles[pos + 2] -= 1;
        self.taatsu += 1;
    }

    #[inline]
    fn pop_gap_taatsu(&mut self, pos: usize) {
        self.tiles[pos] += 1;
        self.tiles[pos + 2] += 1;
        self.taatsu -= 1;
    }

    /// A position is left isolated at most once per path, so clearing the
    /// bit restores the previous mask.
    #[inline]
    fn push_isolated(&mut self, pos: usize) {
        self.tiles[pos] -= 1;
        self.isolated |= 1 << pos;
    }

    #[inline]
    fn pop_isolated(&mut self, pos: usize) {
        self.tiles[pos] += 1;
        self.isolated &= !(1 << pos);
    }
}

/// Whether a lone copy of `idx` can still end up in a group, given every
/// copy the player holds.
fn can_grow(held: &[u8; NUM_TILE_TYPES], idx: usize) -> bool {
    if held[idx] <= 2 {
        return true;
    }
    if idx >= SUITED {
        return false;
    }
    let rank = idx % NUM_SUIT_TILES;
    let suit_start = idx - rank;
    (rank.saturating_sub(2)..=rank.min(6)).any(|start| {
        (suit_start + start..suit_start + start + 3)
            .filter(|&other| other != idx)
            .all(|other| held[other] < MAX_COPIES)
    })
}

/// Minimal standard-shape shanten for a closed hand.
///
/// `tiles` is the closed part only; called groups are inferred from the
/// missing tile count.
pub fn standard_shanten(tiles: &[u8; NUM_TILE_TYPES]) -> i8 {
    SearchContext::new(tiles, tiles).solve()
}

/// Like [`standard_shanten`], with `held` counting every copy the player
/// owns (closed plus called), so that tiles locked in melds are not
/// treated as drawable.
pub fn standard_shanten_held(tiles: &[u8; NUM_TILE_TYPES], held: &[u8; NUM_TILE_TYPES]) -> i8 {
    SearchContext::new(tiles, held).solve()
}
