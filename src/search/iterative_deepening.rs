//! Iterative deepening driver.
//!
//! Repeats the root search at depths `1..=max_depth`, carrying the previous
//! best move forward as the first root move, consulting the move cache at the
//! target depth and stopping early once a mate score is seen. Faults inside
//! the loop are caught at this boundary and degrade to the best move found so
//! far, or to a random legal move.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{info, warn};
use rand::prelude::IndexedRandom;

use crate::errors::{SearchError, SearchResult};
use crate::game_state::game_state::GameState;
use crate::move_generation::rules_engine::RulesEngine;
use crate::moves::move_descriptions::Move;
use crate::search::alpha_beta::search_root;
use crate::search::board_scoring::{BoardScorer, CHECKMATE_SCORE};
use crate::search::search_context::SearchContext;
use crate::search::state_hasher::hash_state;
use crate::search::threading::{RootDispatcher, ThreadingConfig, DEFAULT_WORKER_HASH_MB};
use crate::utils::long_algebraic::move_to_long_algebraic;

/// Scores at or beyond this magnitude end the deepening loop.
pub const MATE_STOP_THRESHOLD: i64 = CHECKMATE_SCORE / 10 * 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub parallel_root: bool,
    pub threading: ThreadingConfig,
    pub worker_hash_mb: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            parallel_root: false,
            threading: ThreadingConfig::default(),
            worker_hash_mb: DEFAULT_WORKER_HASH_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    Search,
    MoveCache,
    SingleMove,
    /// A fault left no completed iteration.
    RandomFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub score: i64,
    pub reached_depth: u8,
    pub nodes: u64,
    pub source: OutcomeSource,
}

/// Best move for the side to move, never panicking.
///
/// Returns `None` when there is no legal move, when a promotion choice is
/// pending, or when a fault leaves nothing to fall back to.
pub fn find_best_move<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    config: &SearchConfig,
) -> Option<Move>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    find_best_outcome(rules, scorer, ctx, game_state, config).map(|o| o.best_move)
}

/// Like `find_best_move`, keeping the score and search statistics.
pub fn find_best_outcome<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    config: &SearchConfig,
) -> Option<SearchOutcome>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let mut best = None;
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        deepen(rules, scorer, ctx, game_state, config, &mut best)
    }));

    match outcome {
        Ok(Ok(())) => best,
        Ok(Err(SearchError::PendingPromotion)) => {
            warn!("no search while a promotion choice is pending");
            None
        }
        Ok(Err(err)) => {
            warn!("search failed: {err}");
            fall_back(rules, game_state, best)
        }
        Err(_) => {
            warn!("search panicked");
            fall_back(rules, game_state, best)
        }
    }
}

/// Runs the deepening loop and reports how the move was found.
pub fn search_best_move<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    config: &SearchConfig,
) -> SearchResult<Option<SearchOutcome>>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let mut best = None;
    deepen(rules, scorer, ctx, game_state, config, &mut best)?;
    Ok(best)
}

/// Writes every completed iteration into `best`, so a caller recovering
/// from a fault still sees the last finished depth.
fn deepen<R, S>(
    rules: &R,
    scorer: &S,
    ctx: &mut SearchContext,
    game_state: &GameState,
    config: &SearchConfig,
    best: &mut Option<SearchOutcome>,
) -> SearchResult<()>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    if game_state.pending_promotion.is_some() {
        return Err(SearchError::PendingPromotion);
    }
    ctx.reset_stats();

    let moves = rules.legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok(());
    }

    let target = config.max_depth.max(1);
    let key = hash_state(game_state);

    if let [only] = moves.as_slice() {
        if let Some(key) = key {
            ctx.move_cache.insert(key, target, *only);
        }
        info!("single legal move {}", move_to_long_algebraic(only));
        *best = Some(SearchOutcome {
            best_move: *only,
            score: scorer.score(game_state),
            reached_depth: 0,
            nodes: 0,
            source: OutcomeSource::SingleMove,
        });
        return Ok(());
    }

    let dispatcher = if config.parallel_root {
        Some(RootDispatcher::new(config.threading, config.worker_hash_mb)?)
    } else {
        None
    };

    for depth in 1..=target {
        if depth == target {
            let cached = key.and_then(|k| ctx.move_cache.get(&k, depth));
            if let Some(mv) = cached.filter(|mv| moves.contains(mv)) {
                info!("move cache hit at depth {depth}: {}", move_to_long_algebraic(&mv));
                *best = Some(SearchOutcome {
                    best_move: mv,
                    score: best.map_or_else(|| scorer.score(game_state), |b| b.score),
                    reached_depth: depth,
                    nodes: ctx.stats.nodes,
                    source: OutcomeSource::MoveCache,
                });
                return Ok(());
            }
        }

        ctx.tt.new_generation();
        let first_move = best.map(|b| b.best_move);
        let found = match &dispatcher {
            Some(dispatcher) => dispatcher
                .search_root(rules, scorer, game_state, depth, first_move)?
                .map(|outcome| {
                    ctx.stats.absorb(&outcome.stats);
                    (outcome.score, outcome.best_move)
                }),
            None => search_root(rules, scorer, ctx, game_state, depth, first_move)?,
        };
        let Some((score, mv)) = found else {
            break;
        };

        if let Some(key) = key {
            ctx.move_cache.insert(key, depth, mv);
        }
        info!(
            "depth {depth} best {} score {score} nodes {}",
            move_to_long_algebraic(&mv),
            ctx.stats.nodes
        );
        *best = Some(SearchOutcome {
            best_move: mv,
            score,
            reached_depth: depth,
            nodes: ctx.stats.nodes,
            source: OutcomeSource::Search,
        });

        if score.abs() >= MATE_STOP_THRESHOLD {
            break;
        }
    }

    Ok(())
}

fn fall_back<R>(
    rules: &R,
    game_state: &GameState,
    best: Option<SearchOutcome>,
) -> Option<SearchOutcome>
where
    R: RulesEngine + ?Sized,
{
    if let Some(outcome) = best {
        warn!(
            "falling back to depth {} move {}",
            outcome.reached_depth,
            move_to_long_algebraic(&outcome.best_move)
        );
        return Some(outcome);
    }

    let moves = catch_unwind(AssertUnwindSafe(|| rules.legal_moves(game_state)))
        .ok()?
        .ok()?;
    let picked = *moves.choose(&mut rand::rng())?;
    warn!("falling back to random move {}", move_to_long_algebraic(&picked));
    Some(SearchOutcome {
        best_move: picked,
        score: 0,
        reached_depth: 0,
        nodes: 0,
        source: OutcomeSource::RandomFallback,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::errors::RulesResult;
    use crate::game_state::chess_types::{square_at, Color, PieceKind};
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::move_generation::legal_move_generator::MiniCrazyhouseRules;
    use crate::search::board_scoring::HeuristicScorer;

    fn config(max_depth: u8) -> SearchConfig {
        SearchConfig {
            max_depth,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn start_position_yields_a_legal_move() {
        let state = GameState::new_game();
        let mut ctx = SearchContext::new(1);
        let mv = find_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(1))
            .expect("start position has moves");
        assert!(MiniCrazyhouseRules.is_move_legal(&state, &mv));
    }

    #[test]
    fn single_legal_move_skips_the_search() {
        // The rooks box in the white king; only the e-pawn can move.
        let state = GameState::from_fen("1r3k/6/6/4P1/2r3/K5 w -").expect("position should parse");
        let moves = MiniCrazyhouseRules.legal_moves(&state).expect("generation should succeed");
        assert_eq!(moves.len(), 1);

        let mut ctx = SearchContext::new(1);
        let outcome = search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(3))
            .expect("search should succeed")
            .expect("one move exists");
        assert_eq!(outcome.best_move, moves[0]);
        assert_eq!(outcome.nodes, 0);
        assert_eq!(ctx.stats.nodes, 0);
        assert_eq!(outcome.source, OutcomeSource::SingleMove);
        let key = hash_state(&state).expect("hashable");
        assert_eq!(ctx.move_cache.get(&key, 3), Some(moves[0]));
    }

    #[test]
    fn pending_promotion_yields_no_move() {
        let mut state = GameState::from_fen("5k/P5/6/6/6/K5 w -").expect("position should parse");
        assert!(apply_move(&mut state, &Move::normal(square_at(4, 0), square_at(5, 0))));
        let mut ctx = SearchContext::new(1);
        assert_eq!(
            find_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(2)),
            None
        );
        assert_eq!(
            search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(2)),
            Err(SearchError::PendingPromotion)
        );
    }

    #[test]
    fn mated_position_yields_no_move() {
        let state = GameState::from_fen("R4k/6/5K/6/6/6 b -").expect("position should parse");
        let mut ctx = SearchContext::new(1);
        assert_eq!(
            find_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(2)),
            None
        );
    }

    #[test]
    fn mate_score_stops_deepening() {
        let state = GameState::from_fen("5k/6/5K/6/6/R5 w -").expect("position should parse");
        let mut ctx = SearchContext::new(1);
        let outcome = search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(4))
            .expect("search should succeed")
            .expect("moves exist");
        assert_eq!(outcome.reached_depth, 1);
        assert_eq!(outcome.score, CHECKMATE_SCORE);
        assert_eq!(outcome.best_move, Move::normal(square_at(0, 0), square_at(5, 0)));
    }

    #[test]
    fn repeated_search_hits_the_move_cache() {
        let state = GameState::new_game();
        let mut ctx = SearchContext::new(1);
        let first = search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(2))
            .expect("search should succeed")
            .expect("moves exist");
        assert_eq!(first.source, OutcomeSource::Search);

        let second = search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(2))
            .expect("search should succeed")
            .expect("moves exist");
        assert_eq!(second.source, OutcomeSource::MoveCache);
        assert_eq!(second.best_move, first.best_move);
    }

    #[test]
    fn illegal_cached_move_is_ignored() {
        let state = GameState::new_game();
        let mut ctx = SearchContext::new(1);
        let key = hash_state(&state).expect("hashable");
        ctx.move_cache.insert(key, 1, Move::drop_piece(Color::White, PieceKind::Queen, square_at(2, 2)));

        let outcome = search_best_move(&MiniCrazyhouseRules, &HeuristicScorer, &mut ctx, &state, &config(1))
            .expect("search should succeed")
            .expect("moves exist");
        assert_eq!(outcome.source, OutcomeSource::Search);
        assert!(MiniCrazyhouseRules.is_move_legal(&state, &outcome.best_move));
    }

    #[test]
    fn parallel_root_matches_sequential_score() {
        let state = GameState::new_game();
        let sequential = search_best_move(
            &MiniCrazyhouseRules,
            &HeuristicScorer,
            &mut SearchContext::new(1),
            &state,
            &config(2),
        )
        .expect("search should succeed")
        .expect("moves exist");
        let parallel_config = SearchConfig {
            parallel_root: true,
            threading: ThreadingConfig {
                requested_threads: 2,
            },
            ..config(2)
        };
        let parallel = search_best_move(
            &MiniCrazyhouseRules,
            &HeuristicScorer,
            &mut SearchContext::new(1),
            &state,
            &parallel_config,
        )
        .expect("search should succeed")
        .expect("moves exist");
        assert_eq!(parallel.score, sequential.score);
        assert!(parallel.nodes > 0);
    }

    /// Delegates to the real rules but panics once `panic_after` moves have
    /// been applied.
    struct FlakyRules {
        applied: AtomicUsize,
        panic_after: usize,
    }

    impl FlakyRules {
        fn new(panic_after: usize) -> Self {
            Self {
                applied: AtomicUsize::new(0),
                panic_after,
            }
        }
    }

    impl RulesEngine for FlakyRules {
        fn legal_moves(&self, game_state: &GameState) -> RulesResult<Vec<Move>> {
            MiniCrazyhouseRules.legal_moves(game_state)
        }

        fn apply_move(&self, game_state: &mut GameState, mv: &Move) -> bool {
            if self.applied.fetch_add(1, Ordering::SeqCst) >= self.panic_after {
                panic!("injected rules fault");
            }
            MiniCrazyhouseRules.apply_move(game_state, mv)
        }

        fn resolve_pending_promotion(&self, game_state: &mut GameState, piece: PieceKind) -> bool {
            MiniCrazyhouseRules.resolve_pending_promotion(game_state, piece)
        }

        fn is_in_check(&self, game_state: &GameState, color: Color) -> bool {
            MiniCrazyhouseRules.is_in_check(game_state, color)
        }

        fn strongest_promotion(&self) -> PieceKind {
            MiniCrazyhouseRules.strongest_promotion()
        }
    }

    #[test]
    fn immediate_fault_falls_back_to_a_random_legal_move() {
        let state = GameState::new_game();
        let rules = FlakyRules::new(0);
        let mut ctx = SearchContext::new(1);
        let outcome = find_best_outcome(&rules, &HeuristicScorer, &mut ctx, &state, &config(2))
            .expect("a fallback move is chosen");
        assert_eq!(outcome.source, OutcomeSource::RandomFallback);
        assert!(MiniCrazyhouseRules.is_move_legal(&state, &outcome.best_move));
    }

    #[test]
    fn later_fault_keeps_the_last_completed_depth() {
        let state = GameState::new_game();

        let counting = FlakyRules::new(usize::MAX);
        let depth_one = search_best_move(&counting, &HeuristicScorer, &mut SearchContext::new(1), &state, &config(1))
            .expect("search should succeed")
            .expect("moves exist");
        let applies_at_depth_one = counting.applied.load(Ordering::SeqCst);

        let flaky = FlakyRules::new(applies_at_depth_one);
        let mv = find_best_move(&flaky, &HeuristicScorer, &mut SearchContext::new(1), &state, &config(2))
            .expect("a fallback move is chosen");
        assert_eq!(mv, depth_one.best_move);
    }
}
