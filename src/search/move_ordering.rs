//! Move-ordering heuristics: killer moves, history scores and MVV-LVA.
//!
//! Ordering never changes search results, only how early cutoffs happen.
//! Keys are `(tier, score)` pairs so a TT move always sorts before killers
//! and killers before everything else, however large history scores grow.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{hand_piece_value, piece_value};

pub const MAX_KILLER_DEPTH: usize = 64;
pub const KILLERS_PER_DEPTH: usize = 2;

const PROMOTION_BONUS: i64 = 900;
const NEAR_ENEMY_KING_BONUS: i64 = 500;
const CENTER_LANDING_BONUS: i64 = 30;
const DEVELOPMENT_BONUS: i64 = 20;
const DROP_CENTER_BONUS: i64 = 50;
const DROP_NEAR_KING_BONUS: i64 = 100;

/// Sort key; compares by tier first, then score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub tier: u8,
    pub score: i64,
}

impl OrderKey {
    const TT_MOVE: u8 = 3;
    const KILLER: u8 = 2;
    const HEURISTIC: u8 = 1;
}

/// Moves that caused a cutoff, per remaining depth, most recent first.
#[derive(Debug, Clone)]
pub struct KillerTable {
    killers: [[Option<Move>; KILLERS_PER_DEPTH]; MAX_KILLER_DEPTH],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self {
            killers: [[None; KILLERS_PER_DEPTH]; MAX_KILLER_DEPTH],
        }
    }
}

impl KillerTable {
    #[inline]
    pub fn killers_at(&self, depth: u8) -> [Option<Move>; KILLERS_PER_DEPTH] {
        self.killers
            .get(depth as usize)
            .copied()
            .unwrap_or([None; KILLERS_PER_DEPTH])
    }

    pub fn record(&mut self, depth: u8, mv: Move) {
        let Some(slot) = self.killers.get_mut(depth as usize) else {
            return;
        };
        if slot.contains(&Some(mv)) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some(mv);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Accumulated cutoff credit per move. Never evicted.
#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    scores: HashMap<Move, i64>,
}

impl HistoryTable {
    #[inline]
    pub fn score(&self, mv: &Move) -> i64 {
        self.scores.get(mv).copied().unwrap_or(0)
    }

    pub fn record(&mut self, mv: Move, depth: u8) {
        let bonus = i64::from(depth) * i64::from(depth);
        *self.scores.entry(mv).or_insert(0) += bonus;
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

/// Static capture/threat score of a move, including its history credit.
pub fn heuristic_score(game_state: &GameState, mv: &Move, history: &HistoryTable) -> i64 {
    match *mv {
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let Some(aggressor) = game_state.piece_at(from) else {
                return 0;
            };
            let mut score = 0;

            if let Some(victim) = game_state.piece_at(to) {
                score += 10 * piece_value(victim.kind) - piece_value(aggressor.kind);
            }
            if promotion.is_some() {
                score += PROMOTION_BONUS;
            }
            if near_enemy_king(game_state, aggressor.color, to) {
                score += NEAR_ENEMY_KING_BONUS;
            }
            if is_center_square(to) {
                score += CENTER_LANDING_BONUS;
            }
            let home = aggressor.color.back_rank();
            if rank_of(from) == home && rank_of(to) != home {
                score += DEVELOPMENT_BONUS;
            }

            score + history.score(mv)
        }
        Move::Drop { color, piece, to } => {
            let mut score = hand_piece_value(piece) / 10;
            if is_center_square(to) {
                score += DROP_CENTER_BONUS;
            }
            if near_enemy_king(game_state, color, to) {
                score += DROP_NEAR_KING_BONUS;
            }
            score + history.score(mv)
        }
    }
}

#[inline]
fn near_enemy_king(game_state: &GameState, mover: Color, to: Square) -> bool {
    game_state
        .king_square(mover.opposite())
        .is_some_and(|king| chebyshev_distance(to, king) <= 2)
}

pub fn order_key(
    game_state: &GameState,
    mv: &Move,
    tt_move: Option<Move>,
    killers: &[Option<Move>],
    history: &HistoryTable,
) -> OrderKey {
    if tt_move == Some(*mv) {
        return OrderKey {
            tier: OrderKey::TT_MOVE,
            score: 0,
        };
    }
    if let Some(index) = killers.iter().position(|k| *k == Some(*mv)) {
        return OrderKey {
            tier: OrderKey::KILLER,
            score: 100 - index as i64,
        };
    }
    OrderKey {
        tier: OrderKey::HEURISTIC,
        score: heuristic_score(game_state, mv, history),
    }
}

/// Sorts `moves` best-first. The sort is stable, so equal keys keep
/// generation order and the search stays reproducible.
pub fn order_moves(
    game_state: &GameState,
    moves: &mut [Move],
    tt_move: Option<Move>,
    killers: &[Option<Move>],
    history: &HistoryTable,
) {
    moves.sort_by_cached_key(|mv| Reverse(order_key(game_state, mv, tt_move, killers, history)));
}

/// Captures and promotions; drops never capture.
pub fn is_noisy(game_state: &GameState, mv: &Move) -> bool {
    match *mv {
        Move::Normal { to, promotion, .. } => {
            promotion.is_some() || game_state.piece_at(to).is_some()
        }
        Move::Drop { .. } => false,
    }
}
