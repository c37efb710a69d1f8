//! Plays two engines against each other for self-play and regression checks.
//!
//! The game status is recomputed after every move; a match ends on mate,
//! stalemate, a missing move or the ply limit.

use std::time::Instant;

use log::{debug, info};

use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::{GameState, GameStatus};
use crate::move_generation::legal_move_generator::{update_game_status, MiniCrazyhouseRules};
use crate::move_generation::rules_engine::RulesEngine;
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    DrawStalemate,
    /// The engine to move returned no move in a position that had one.
    NoMove(Color),
    DrawMaxPlies,
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u16,
    pub go_params: GoParams,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 80,
            go_params: GoParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_state: GameState,
    pub played_moves_lan: Vec<String>,
    pub white_total_time_ns: u128,
    pub black_total_time_ns: u128,
}

/// Play a single match from the standard starting position.
pub fn play_match(
    engine_white: &mut dyn Engine,
    engine_black: &mut dyn Engine,
    config: &MatchConfig,
) -> Result<MatchResult, String> {
    play_match_from_state(GameState::new_game(), engine_white, engine_black, config)
}

pub fn play_match_from_state(
    mut state: GameState,
    engine_white: &mut dyn Engine,
    engine_black: &mut dyn Engine,
    config: &MatchConfig,
) -> Result<MatchResult, String> {
    let rules = MiniCrazyhouseRules;
    engine_white.new_game();
    engine_black.new_game();

    let mut played_moves_lan = Vec::<String>::new();
    let mut white_total_time_ns = 0u128;
    let mut black_total_time_ns = 0u128;

    update_game_status(&mut state).map_err(|e| e.to_string())?;

    loop {
        let outcome = match state.status {
            GameStatus::Checkmate => Some(match state.side_to_move {
                Color::White => MatchOutcome::BlackWinCheckmate,
                Color::Black => MatchOutcome::WhiteWinCheckmate,
            }),
            GameStatus::Stalemate => Some(MatchOutcome::DrawStalemate),
            GameStatus::Ongoing => None,
        };
        if let Some(outcome) = outcome {
            return Ok(finish(
                outcome,
                state,
                played_moves_lan,
                white_total_time_ns,
                black_total_time_ns,
            ));
        }
        if played_moves_lan.len() >= usize::from(config.max_plies) {
            return Ok(finish(
                MatchOutcome::DrawMaxPlies,
                state,
                played_moves_lan,
                white_total_time_ns,
                black_total_time_ns,
            ));
        }

        let mover = state.side_to_move;
        let started = Instant::now();
        let out = match mover {
            Color::White => engine_white.choose_move(&state, &config.go_params)?,
            Color::Black => engine_black.choose_move(&state, &config.go_params)?,
        };
        let elapsed_ns = started.elapsed().as_nanos();
        match mover {
            Color::White => white_total_time_ns = white_total_time_ns.saturating_add(elapsed_ns),
            Color::Black => black_total_time_ns = black_total_time_ns.saturating_add(elapsed_ns),
        }

        let Some(chosen) = out.best_move else {
            return Ok(finish(
                MatchOutcome::NoMove(mover),
                state,
                played_moves_lan,
                white_total_time_ns,
                black_total_time_ns,
            ));
        };
        if !rules.is_move_legal(&state, &chosen) || !rules.apply_move_auto_promote(&mut state, &chosen) {
            return Err(format!(
                "engine returned illegal move {}",
                move_to_long_algebraic(&chosen)
            ));
        }

        let lan = move_to_long_algebraic(&chosen);
        debug!("{mover:?} plays {lan}");
        played_moves_lan.push(lan);
        update_game_status(&mut state).map_err(|e| e.to_string())?;
    }
}

fn finish(
    outcome: MatchOutcome,
    final_state: GameState,
    played_moves_lan: Vec<String>,
    white_total_time_ns: u128,
    black_total_time_ns: u128,
) -> MatchResult {
    info!(
        "match finished: {outcome:?} after {} plies",
        played_moves_lan.len()
    );
    MatchResult {
        outcome,
        final_state,
        played_moves_lan,
        white_total_time_ns,
        black_total_time_ns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_iterative::IterativeEngine;
    use crate::engines::engine_random::RandomEngine;

    #[test]
    fn self_play_terminates_within_the_ply_limit() {
        let mut white = IterativeEngine::new(1);
        let mut black = RandomEngine::new();
        let config = MatchConfig {
            max_plies: 12,
            ..MatchConfig::default()
        };
        let result = play_match(&mut white, &mut black, &config).expect("match should run");
        assert!(result.played_moves_lan.len() <= 12);
        if result.outcome == MatchOutcome::DrawMaxPlies {
            assert_eq!(result.played_moves_lan.len(), 12);
        }
    }

    #[test]
    fn finished_position_is_reported_without_moves() {
        let state = GameState::from_fen("R4k/6/5K/6/6/6 b -").expect("position should parse");
        let mut white = RandomEngine::new();
        let mut black = RandomEngine::new();
        let result = play_match_from_state(state, &mut white, &mut black, &MatchConfig::default())
            .expect("match should run");
        assert_eq!(result.outcome, MatchOutcome::WhiteWinCheckmate);
        assert!(result.played_moves_lan.is_empty());
    }

    #[test]
    fn searching_engine_delivers_mate() {
        let state = GameState::from_fen("5k/6/5K/6/6/R5 w -").expect("position should parse");
        let mut white = IterativeEngine::new(2);
        let mut black = RandomEngine::new();
        let result = play_match_from_state(state, &mut white, &mut black, &MatchConfig::default())
            .expect("match should run");
        assert_eq!(result.outcome, MatchOutcome::WhiteWinCheckmate);
        assert_eq!(result.played_moves_lan, vec!["a1a6".to_owned()]);
    }
}
