//! Parallel root search.
//!
//! Each root move is searched by its own rayon task with its own state clone
//! and a fresh `SearchContext`, so workers share nothing mutable. Recursion
//! below the root stays single-threaded and deterministic.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::errors::{SearchError, SearchResult};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::rules_engine::RulesEngine;
use crate::moves::move_descriptions::Move;
use crate::search::alpha_beta::search;
use crate::search::board_scoring::{BoardScorer, CHECKMATE_SCORE, SCORE_INFINITY};
use crate::search::search_context::{SearchContext, SearchStats};
use crate::utils::long_algebraic::move_to_long_algebraic;

pub const DEFAULT_WORKER_HASH_MB: usize = 2;

/// Threading configuration owned by the engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadingConfig {
    /// Worker count; 0 uses the machine's available parallelism.
    pub requested_threads: usize,
}

impl ThreadingConfig {
    #[inline]
    pub fn normalized_threads(self) -> usize {
        if self.requested_threads == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.requested_threads
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMoveResult {
    pub mv: Move,
    pub score: i64,
    pub faulted: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RootOutcome {
    pub best_move: Move,
    pub score: i64,
    pub stats: SearchStats,
}

/// Score reported for a root move whose worker failed; it loses to every
/// real score for the side to move.
#[inline]
pub fn fault_sentinel(side_to_move: Color) -> i64 {
    match side_to_move {
        Color::White => -SCORE_INFINITY,
        Color::Black => SCORE_INFINITY,
    }
}

/// Picks the root move. A move scoring exactly the mate for the side to move
/// wins outright; otherwise White takes the maximum and Black the minimum,
/// with the earliest result winning ties.
pub fn reconcile_root_results(results: &[RootMoveResult], side_to_move: Color) -> Option<(Move, i64)> {
    let mate = match side_to_move {
        Color::White => CHECKMATE_SCORE,
        Color::Black => -CHECKMATE_SCORE,
    };
    if let Some(r) = results.iter().find(|r| r.score == mate) {
        return Some((r.mv, r.score));
    }

    let mut best: Option<&RootMoveResult> = None;
    for r in results {
        let better = match best {
            None => true,
            Some(b) => match side_to_move {
                Color::White => r.score > b.score,
                Color::Black => r.score < b.score,
            },
        };
        if better {
            best = Some(r);
        }
    }
    best.map(|r| (r.mv, r.score))
}

pub struct RootDispatcher {
    pool: ThreadPool,
    worker_hash_mb: usize,
}

impl RootDispatcher {
    pub fn new(config: ThreadingConfig, worker_hash_mb: usize) -> SearchResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.normalized_threads())
            .thread_name(|i| format!("root-worker-{i}"))
            .build()
            .map_err(|e| SearchError::WorkerPool(e.to_string()))?;
        Ok(Self {
            pool,
            worker_hash_mb,
        })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Searches every root move at `depth - 1` in parallel. `first_move`, if
    /// legal, is scheduled and reported first.
    pub fn search_root<R, S>(
        &self,
        rules: &R,
        scorer: &S,
        game_state: &GameState,
        depth: u8,
        first_move: Option<Move>,
    ) -> SearchResult<Option<RootOutcome>>
    where
        R: RulesEngine + ?Sized,
        S: BoardScorer + ?Sized,
    {
        let mut moves = rules.legal_moves(game_state)?;
        if moves.is_empty() {
            return Ok(None);
        }
        if let Some(pos) = first_move.and_then(|f| moves.iter().position(|m| *m == f)) {
            let mv = moves.remove(pos);
            moves.insert(0, mv);
        }

        let worker_hash_mb = self.worker_hash_mb;
        let evaluated: Vec<(RootMoveResult, SearchStats)> = self.pool.install(|| {
            moves
                .par_iter()
                .map(|mv| evaluate_root_move(rules, scorer, game_state, mv, depth, worker_hash_mb))
                .collect()
        });

        let mut stats = SearchStats {
            nodes: 1,
            ..SearchStats::default()
        };
        let mut results = Vec::with_capacity(evaluated.len());
        for (result, worker_stats) in evaluated {
            debug!(
                "root move {} score {}{}",
                move_to_long_algebraic(&result.mv),
                result.score,
                if result.faulted { " (fault)" } else { "" }
            );
            stats.absorb(&worker_stats);
            results.push(result);
        }

        Ok(reconcile_root_results(&results, game_state.side_to_move).map(
            |(best_move, score)| RootOutcome {
                best_move,
                score,
                stats,
            },
        ))
    }
}

fn evaluate_root_move<R, S>(
    rules: &R,
    scorer: &S,
    game_state: &GameState,
    mv: &Move,
    depth: u8,
    worker_hash_mb: usize,
) -> (RootMoveResult, SearchStats)
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let side = game_state.side_to_move;
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut child = game_state.clone();
        if !rules.apply_move_auto_promote(&mut child, mv) {
            return None;
        }
        let mut ctx = SearchContext::new(worker_hash_mb);
        match search(
            rules,
            scorer,
            &mut ctx,
            &child,
            depth.saturating_sub(1),
            -SCORE_INFINITY,
            SCORE_INFINITY,
            side == Color::Black,
        ) {
            Ok((score, _)) => Some((score, ctx.stats)),
            Err(err) => {
                warn!("root worker for {} failed: {err}", move_to_long_algebraic(mv));
                None
            }
        }
    }));

    let (score, stats, faulted) = match outcome {
        Ok(Some((score, stats))) => (score, stats, false),
        Ok(None) => (fault_sentinel(side), SearchStats::default(), true),
        Err(_) => {
            warn!("root worker for {} panicked", move_to_long_algebraic(mv));
            (fault_sentinel(side), SearchStats::default(), true)
        }
    };

    (
        RootMoveResult {
            mv: *mv,
            score,
            faulted,
        },
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::square_at;
    use crate::move_generation::legal_move_generator::MiniCrazyhouseRules;
    use crate::search::alpha_beta::search_root;
    use crate::search::board_scoring::HeuristicScorer;

    fn result(from: u8, to: u8, score: i64) -> RootMoveResult {
        RootMoveResult {
            mv: Move::normal(from, to),
            score,
            faulted: false,
        }
    }

    #[test]
    fn zero_threads_uses_available_parallelism() {
        let cfg = ThreadingConfig {
            requested_threads: 0,
        };
        assert!(cfg.normalized_threads() >= 1);
        let cfg = ThreadingConfig {
            requested_threads: 3,
        };
        assert_eq!(cfg.normalized_threads(), 3);
    }

    #[test]
    fn mate_for_the_mover_wins_outright() {
        let results = [
            result(0, 6, 900),
            result(1, 7, CHECKMATE_SCORE),
            result(2, 8, CHECKMATE_SCORE),
        ];
        let (mv, score) = reconcile_root_results(&results, Color::White).expect("non-empty");
        assert_eq!(mv, Move::normal(1, 7));
        assert_eq!(score, CHECKMATE_SCORE);

        let results = [result(0, 6, -900), result(2, 8, -CHECKMATE_SCORE)];
        let (mv, _) = reconcile_root_results(&results, Color::Black).expect("non-empty");
        assert_eq!(mv, Move::normal(2, 8));
    }

    #[test]
    fn extremal_choice_keeps_the_first_tie() {
        let results = [result(0, 6, 10), result(1, 7, 40), result(2, 8, 40), result(3, 9, -5)];
        assert_eq!(
            reconcile_root_results(&results, Color::White),
            Some((Move::normal(1, 7), 40))
        );
        assert_eq!(
            reconcile_root_results(&results, Color::Black),
            Some((Move::normal(3, 9), -5))
        );
        assert_eq!(reconcile_root_results(&[], Color::White), None);
    }

    #[test]
    fn faulted_moves_never_beat_real_scores() {
        let mut faulted = result(0, 6, fault_sentinel(Color::White));
        faulted.faulted = true;
        let results = [faulted, result(1, 7, -CHECKMATE_SCORE)];
        let (mv, _) = reconcile_root_results(&results, Color::White).expect("non-empty");
        assert_eq!(mv, Move::normal(1, 7));
    }

    #[test]
    fn dispatcher_finds_mate_in_one() {
        let state = GameState::from_fen("5k/6/5K/6/6/R5 w -").expect("position should parse");
        let dispatcher = RootDispatcher::new(ThreadingConfig { requested_threads: 2 }, 1)
            .expect("pool should build");
        let outcome = dispatcher
            .search_root(&MiniCrazyhouseRules, &HeuristicScorer, &state, 2, None)
            .expect("search should succeed")
            .expect("moves exist");
        assert_eq!(outcome.best_move, Move::normal(square_at(0, 0), square_at(5, 0)));
        assert_eq!(outcome.score, CHECKMATE_SCORE);
        assert!(outcome.stats.nodes > 1);
    }

    #[test]
    fn parallel_and_sequential_root_scores_agree() {
        let state = GameState::new_game();
        let dispatcher = RootDispatcher::new(ThreadingConfig { requested_threads: 2 }, 1)
            .expect("pool should build");
        let parallel = dispatcher
            .search_root(&MiniCrazyhouseRules, &HeuristicScorer, &state, 2, None)
            .expect("search should succeed")
            .expect("moves exist");
        let (sequential, _) = search_root(
            &MiniCrazyhouseRules,
            &HeuristicScorer,
            &mut SearchContext::new(1),
            &state,
            2,
            None,
        )
        .expect("search should succeed")
        .expect("moves exist");
        assert_eq!(parallel.score, sequential);
    }

    struct PanickingScorer;

    impl BoardScorer for PanickingScorer {
        fn score(&self, _game_state: &GameState) -> i64 {
            panic!("scorer failure");
        }
    }

    #[test]
    fn worker_panics_become_fault_sentinels() {
        let state = GameState::new_game();
        let first = Move::normal(square_at(1, 0), square_at(2, 0));
        let dispatcher = RootDispatcher::new(ThreadingConfig { requested_threads: 2 }, 1)
            .expect("pool should build");
        let outcome = dispatcher
            .search_root(&MiniCrazyhouseRules, &PanickingScorer, &state, 1, Some(first))
            .expect("panics must not escape")
            .expect("moves exist");
        assert_eq!(outcome.best_move, first);
        assert_eq!(outcome.score, fault_sentinel(Color::White));
    }
}
