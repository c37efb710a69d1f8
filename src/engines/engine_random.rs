//! Random-move engine.
//!
//! Selects uniformly from legal moves and is used as a weak self-play
//! opponent and in integration tests.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::MiniCrazyhouseRules;
use crate::move_generation::rules_engine::RulesEngine;

#[derive(Debug, Default)]
pub struct RandomEngine {
    rules: MiniCrazyhouseRules,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "mini_crazyhouse random"
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
    ) -> Result<EngineOutput, String> {
        let legal_moves = self
            .rules
            .legal_moves(game_state)
            .map_err(|e| e.to_string())?;

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        if let Some(depth) = params.depth {
            out.info_lines
                .push(format!("info string random_engine ignoring_depth {depth}"));
        }

        out.best_move = legal_moves.choose(&mut rand::rng()).copied();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_a_legal_move() {
        let state = GameState::new_game();
        let mut engine = RandomEngine::new();
        let out = engine
            .choose_move(&state, &GoParams::default())
            .expect("engine should answer");
        let mv = out.best_move.expect("start position has moves");
        assert!(MiniCrazyhouseRules.is_move_legal(&state, &mv));
    }

    #[test]
    fn mated_side_gets_no_move() {
        let state = GameState::from_fen("R4k/6/5K/6/6/6 b -").expect("position should parse");
        let out = RandomEngine::new()
            .choose_move(&state, &GoParams::default())
            .expect("engine should answer");
        assert_eq!(out.best_move, None);
    }
}
