//! Capture/promotion extension below the main search horizon.
//!
//! Stand-pat bounds are fail-hard: the maximizer returns `beta` and the
//! minimizer returns `alpha` on a cutoff. The ply budget strictly decreases,
//! so the extension always terminates.

use crate::errors::SearchResult;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::{GameState, GameStatus};
use crate::move_generation::rules_engine::RulesEngine;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::{is_noisy, order_moves};
use crate::search::search_context::SearchContext;

pub const MAX_QUIESCENCE_DEPTH: u8 = 4;

/// Evaluation of a position whose side to move has no legal moves.
pub fn score_without_moves<R, S>(rules: &R, scorer: &S, game_state: &GameState) -> i64
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let mut terminal = game_state.clone();
    terminal.status = if rules.is_in_check(game_state, game_state.side_to_move) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    };
    scorer.score(&terminal)
}

pub fn quiesce<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    mut alpha: i64,
    mut beta: i64,
    budget: u8,
) -> SearchResult<i64>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    ctx.stats.quiescence_nodes += 1;
    let ply = MAX_QUIESCENCE_DEPTH.saturating_sub(budget);
    ctx.stats.max_quiescence_ply = ctx.stats.max_quiescence_ply.max(ply);

    if game_state.is_terminal() {
        return Ok(scorer.score(game_state));
    }
    let moves = rules.legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok(score_without_moves(rules, scorer, game_state));
    }

    let maximizing = game_state.side_to_move == Color::White;
    let stand_pat = scorer.score(game_state);
    if maximizing {
        if stand_pat >= beta {
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);
    } else {
        if stand_pat <= alpha {
            return Ok(alpha);
        }
        beta = beta.min(stand_pat);
    }

    if budget == 0 {
        return Ok(stand_pat);
    }

    let mut noisy: Vec<_> = moves
        .into_iter()
        .filter(|mv| is_noisy(game_state, mv))
        .collect();
    order_moves(game_state, &mut noisy, None, &[], &ctx.history);

    for mv in &noisy {
        let mut child = game_state.clone();
        if !rules.apply_move_auto_promote(&mut child, mv) {
            continue;
        }
        let score = quiesce(rules, scorer, ctx, &child, alpha, beta, budget - 1)?;

        if maximizing {
            if score >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(score);
        } else {
            if score <= alpha {
                return Ok(alpha);
            }
            beta = beta.min(score);
        }
    }

    Ok(if maximizing { alpha } else { beta })
}
