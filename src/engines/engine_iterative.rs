//! Iterative-deepening alpha-beta engine.
//!
//! Owns the long-lived search context (TT, killers, history and the move
//! cache) so consecutive moves of a game reuse what earlier searches learned.

use std::path::PathBuf;

use log::warn;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::MiniCrazyhouseRules;
use crate::search::board_scoring::{BoardScorer, HeuristicScorer, MaterialScorer};
use crate::search::iterative_deepening::{find_best_outcome, SearchConfig};
use crate::search::move_cache::MoveCache;
use crate::search::search_context::{SearchContext, DEFAULT_HASH_MB};
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluatorKind {
    #[default]
    Heuristic,
    Material,
}

impl EvaluatorKind {
    fn scorer(self) -> &'static dyn BoardScorer {
        match self {
            EvaluatorKind::Heuristic => &HeuristicScorer,
            EvaluatorKind::Material => &MaterialScorer,
        }
    }
}

pub struct IterativeEngine {
    rules: MiniCrazyhouseRules,
    config: SearchConfig,
    evaluator: EvaluatorKind,
    hash_mb: usize,
    ctx: SearchContext,
    move_cache_path: Option<PathBuf>,
}

impl IterativeEngine {
    pub fn new(default_depth: u8) -> Self {
        Self {
            rules: MiniCrazyhouseRules,
            config: SearchConfig {
                max_depth: default_depth.max(1),
                ..SearchConfig::default()
            },
            evaluator: EvaluatorKind::default(),
            hash_mb: DEFAULT_HASH_MB,
            ctx: SearchContext::new(DEFAULT_HASH_MB),
            move_cache_path: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn evaluator(&self) -> EvaluatorKind {
        self.evaluator
    }

    #[inline]
    pub fn context(&self) -> &SearchContext {
        &self.ctx
    }

    /// Writes the move cache to the configured file, if any.
    pub fn persist_move_cache(&self) {
        let Some(path) = &self.move_cache_path else {
            return;
        };
        if let Err(err) = self.ctx.move_cache.save_to_path(path) {
            warn!("could not save move cache to {}: {err}", path.display());
        }
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default().max_depth)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "mini_crazyhouse iterative"
    }

    fn new_game(&mut self) {
        self.ctx.tt.clear();
        self.ctx.killers.clear();
        self.ctx.history.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), String> {
        if name.eq_ignore_ascii_case("Depth") {
            let parsed = value
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid Depth value '{value}'"))?;
            self.config.max_depth = parsed.max(1);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid Hash value '{value}'"))?;
            self.hash_mb = parsed.max(1);
            let move_cache = std::mem::take(&mut self.ctx.move_cache);
            self.ctx = SearchContext::new(self.hash_mb);
            self.ctx.move_cache = move_cache;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Threads") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid Threads value '{value}'"))?;
            self.config.threading.requested_threads = parsed;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("ParallelRoot") {
            self.config.parallel_root = parse_bool(value)
                .ok_or_else(|| format!("invalid ParallelRoot value '{value}'"))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Evaluator") {
            let v = value.trim().to_ascii_lowercase();
            self.evaluator = match v.as_str() {
                "heuristic" => EvaluatorKind::Heuristic,
                "material" => EvaluatorKind::Material,
                _ => return Err(format!("invalid Evaluator value '{value}'")),
            };
            return Ok(());
        }
        if name.eq_ignore_ascii_case("MoveCacheFile") {
            let v = value.trim();
            if v.is_empty() || v.eq_ignore_ascii_case("none") {
                self.move_cache_path = None;
                return Ok(());
            }
            let path = PathBuf::from(v);
            self.ctx.move_cache = MoveCache::load_or_default(&path);
            self.move_cache_path = Some(path);
            return Ok(());
        }
        Err(format!("unknown option '{name}'"))
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
    ) -> Result<EngineOutput, String> {
        let mut config = self.config;
        if let Some(depth) = params.depth {
            config.max_depth = depth.max(1);
        }

        let outcome = find_best_outcome(
            &self.rules,
            self.evaluator.scorer(),
            &mut self.ctx,
            game_state,
            &config,
        );
        self.persist_move_cache();

        let mut out = EngineOutput::default();
        if let Some(outcome) = outcome {
            out.best_move = Some(outcome.best_move);
            out.score = Some(outcome.score);
            out.info_lines.push(format!(
                "info depth {} score cp {} nodes {} pv {}",
                outcome.reached_depth,
                outcome.score,
                outcome.nodes,
                move_to_long_algebraic(&outcome.best_move)
            ));
            out.info_lines.push(format!(
                "info string iterative_engine source {:?} tt_hits {} qnodes {}",
                outcome.source, self.ctx.stats.tt_hits, self.ctx.stats.quiescence_nodes
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::square_at;
    use crate::move_generation::rules_engine::RulesEngine;
    use crate::moves::move_descriptions::Move;
    use crate::search::board_scoring::CHECKMATE_SCORE;

    #[test]
    fn options_are_case_insensitive_and_validated() {
        let mut engine = IterativeEngine::new(3);
        engine.set_option("depth", "5").expect("depth accepted");
        engine.set_option("THREADS", "0").expect("threads accepted");
        engine.set_option("ParallelRoot", "true").expect("flag accepted");
        engine.set_option("evaluator", "Material").expect("evaluator accepted");
        engine.set_option("Hash", "2").expect("hash accepted");
        assert_eq!(engine.config().max_depth, 5);
        assert_eq!(engine.config().threading.requested_threads, 0);
        assert!(engine.config().parallel_root);
        assert_eq!(engine.evaluator(), EvaluatorKind::Material);

        assert!(engine.set_option("Depth", "deep").is_err());
        assert!(engine.set_option("Evaluator", "neural").is_err());
        assert!(engine.set_option("ParallelRoot", "maybe").is_err());
        assert!(engine.set_option("Ponder", "true").is_err());
    }

    #[test]
    fn plays_the_mate_in_one() {
        let state = GameState::from_fen("5k/6/5K/6/6/R5 w -").expect("position should parse");
        let mut engine = IterativeEngine::new(3);
        let out = engine
            .choose_move(&state, &GoParams::default())
            .expect("engine should answer");
        assert_eq!(out.best_move, Some(Move::normal(square_at(0, 0), square_at(5, 0))));
        assert_eq!(out.score, Some(CHECKMATE_SCORE));
        assert!(out.info_lines[0].starts_with("info depth 1"));
    }

    #[test]
    fn go_depth_overrides_the_configured_depth() {
        let state = GameState::new_game();
        let mut engine = IterativeEngine::new(6);
        let out = engine
            .choose_move(&state, &GoParams { depth: Some(1) })
            .expect("engine should answer");
        let mv = out.best_move.expect("start position has moves");
        assert!(MiniCrazyhouseRules.is_move_legal(&state, &mv));
        assert!(out.info_lines[0].starts_with("info depth 1"));
    }

    #[test]
    fn new_game_clears_search_tables_but_keeps_the_move_cache() {
        let state = GameState::new_game();
        let mut engine = IterativeEngine::new(2);
        engine
            .choose_move(&state, &GoParams::default())
            .expect("engine should answer");
        assert!(engine.context().tt.stats().stores > 0);
        let cached = engine.context().move_cache.len();
        assert!(cached > 0);

        engine.new_game();
        assert_eq!(engine.context().tt.stats().stores, 0);
        assert!(engine.context().history.is_empty());
        assert_eq!(engine.context().move_cache.len(), cached);
    }

    #[test]
    fn move_cache_file_round_trips_through_the_engine() {
        let path = std::env::temp_dir().join(format!(
            "mini_crazyhouse_{}_engine_cache.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let path_text = path.to_string_lossy().into_owned();

        let state = GameState::new_game();
        let mut engine = IterativeEngine::new(1);
        engine.set_option("MoveCacheFile", &path_text).expect("path accepted");
        engine
            .choose_move(&state, &GoParams::default())
            .expect("engine should answer");
        assert!(path.exists());

        let mut fresh = IterativeEngine::new(1);
        fresh.set_option("MoveCacheFile", &path_text).expect("path accepted");
        assert_eq!(fresh.context().move_cache.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
