//! Legal move-tree counting used to validate rules engines.

use crate::errors::RulesResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::rules_engine::RulesEngine;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub promotions: u64,
    pub drops: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.promotions += rhs.promotions;
        self.drops += rhs.drops;
    }
}

pub fn perft<R: RulesEngine>(rules: &R, game_state: &GameState, depth: u8) -> RulesResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in rules.legal_moves(game_state)? {
        let mut child = game_state.clone();
        if !rules.apply_move(&mut child, &mv) {
            continue;
        }
        if depth == 1 {
            total.merge(leaf_counts(game_state, &mv));
        } else {
            total.merge(perft(rules, &child, depth - 1)?);
        }
    }
    Ok(total)
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide<R: RulesEngine>(
    rules: &R,
    game_state: &GameState,
    depth: u8,
) -> RulesResult<Vec<(Move, u64)>> {
    let mut out = Vec::new();
    for mv in rules.legal_moves(game_state)? {
        let mut child = game_state.clone();
        if !rules.apply_move(&mut child, &mv) {
            continue;
        }
        let nodes = perft(rules, &child, depth.saturating_sub(1))?.nodes;
        out.push((mv, nodes));
    }
    Ok(out)
}

fn leaf_counts(before: &GameState, mv: &Move) -> PerftCounts {
    PerftCounts {
        nodes: 1,
        captures: u64::from(!mv.is_drop() && before.piece_at(mv.to_square()).is_some()),
        promotions: u64::from(mv.promotion_piece().is_some()),
        drops: u64::from(mv.is_drop()),
    }
}
