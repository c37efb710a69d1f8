//! Depth-limited minimax with alpha-beta pruning and a transposition table.
//!
//! Scores are White-relative: White maximizes and Black minimizes, so child
//! scores are never negated. Mate scores propagate unchanged; there is no
//! distance-to-mate adjustment.

use crate::errors::SearchResult;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::rules_engine::RulesEngine;
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, CHECKMATE_SCORE, SCORE_INFINITY};
use crate::search::move_ordering::order_moves;
use crate::search::quiescence::{quiesce, score_without_moves, MAX_QUIESCENCE_DEPTH};
use crate::search::search_context::SearchContext;
use crate::search::state_hasher::hash_state;
use crate::search::transposition_table::{Bound, TTEntry};

/// True when `score` is the mate sentinel in favor of the maximizing flag.
#[inline]
pub fn is_winning_mate(score: i64, maximizing: bool) -> bool {
    if maximizing {
        score >= CHECKMATE_SCORE
    } else {
        score <= -CHECKMATE_SCORE
    }
}

#[allow(clippy::too_many_arguments)]
pub fn search<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    depth: u8,
    mut alpha: i64,
    mut beta: i64,
    maximizing: bool,
) -> SearchResult<(i64, Option<Move>)>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    ctx.stats.nodes += 1;

    if depth == 0 || game_state.is_terminal() {
        let score = quiesce(rules, scorer, ctx, game_state, alpha, beta, MAX_QUIESCENCE_DEPTH)?;
        return Ok((score, None));
    }

    let alpha_orig = alpha;
    let beta_orig = beta;
    let key = hash_state(game_state);

    let mut tt_move = None;
    if let Some(entry) = key.as_ref().and_then(|k| ctx.tt.probe(k)) {
        tt_move = entry.best_move;
        if entry.depth >= depth {
            ctx.stats.tt_hits += 1;
            match entry.bound {
                Bound::Exact => return Ok((entry.score, entry.best_move)),
                Bound::Lower => alpha = alpha.max(entry.score),
                Bound::Upper => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                return Ok((entry.score, entry.best_move));
            }
        }
    }

    let mut moves = rules.legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok((score_without_moves(rules, scorer, game_state), None));
    }

    let killers = ctx.killers.killers_at(depth);
    order_moves(game_state, &mut moves, tt_move, &killers, &ctx.history);

    let Some((best_score, best_move)) = search_moves(
        rules, scorer, ctx, game_state, &moves, depth, alpha, beta, maximizing,
    )?
    else {
        return Ok((scorer.score(game_state), None));
    };

    if let Some(key) = key {
        ctx.tt.store(TTEntry {
            key,
            depth,
            score: best_score,
            bound: Bound::classify(best_score, alpha_orig, beta_orig),
            best_move: Some(best_move),
        });
    }

    Ok((best_score, Some(best_move)))
}

/// Full-window search of the root with `first_move` tried first.
///
/// Returns `None` when the side to move has no legal moves.
pub fn search_root<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    depth: u8,
    first_move: Option<Move>,
) -> SearchResult<Option<(i64, Move)>>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    ctx.stats.nodes += 1;
    let depth = depth.max(1);

    let mut moves = rules.legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok(None);
    }
    let maximizing = game_state.side_to_move == Color::White;
    let killers = ctx.killers.killers_at(depth);
    order_moves(game_state, &mut moves, first_move, &killers, &ctx.history);

    let result = search_moves(
        rules,
        scorer,
        ctx,
        game_state,
        &moves,
        depth,
        -SCORE_INFINITY,
        SCORE_INFINITY,
        maximizing,
    )?;

    if let (Some((score, best_move)), Some(key)) = (result, hash_state(game_state)) {
        ctx.tt.store(TTEntry {
            key,
            depth,
            score,
            bound: Bound::classify(score, -SCORE_INFINITY, SCORE_INFINITY),
            best_move: Some(best_move),
        });
    }

    Ok(result)
}

/// Move loop shared by inner nodes and the root. `None` when no move in
/// `moves` could be applied.
#[allow(clippy::too_many_arguments)]
fn search_moves<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    moves: &[Move],
    depth: u8,
    mut alpha: i64,
    mut beta: i64,
    maximizing: bool,
) -> SearchResult<Option<(i64, Move)>>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let mut best_score = if maximizing {
        -SCORE_INFINITY
    } else {
        SCORE_INFINITY
    };
    let mut best_move = None;

    for mv in moves {
        let mut child = game_state.clone();
        if !rules.apply_move_auto_promote(&mut child, mv) {
            continue;
        }

        let (score, _) = search(rules, scorer, ctx, &child, depth - 1, alpha, beta, !maximizing)?;

        let improved = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improved || best_move.is_none() {
            best_score = score;
            best_move = Some(*mv);
        }
        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }

        if alpha >= beta {
            ctx.killers.record(depth, *mv);
            ctx.history.record(*mv, depth);
            break;
        }
        if is_winning_mate(score, maximizing) {
            break;
        }
    }

    Ok(best_move.map(|mv| (best_score, mv)))
}
