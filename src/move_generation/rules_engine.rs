//! Narrow rules contract consumed by the search.
//!
//! The search never inspects move-generation internals; it only needs legal
//! moves, in-place application on an owned clone, promotion completion and
//! check detection. Terminal flags are read from `GameState::status`.

use crate::errors::RulesResult;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

pub trait RulesEngine: Send + Sync {
    /// Every move that does not leave the mover's king in check.
    fn legal_moves(&self, game_state: &GameState) -> RulesResult<Vec<Move>>;

    /// Applies `mv` in place. Returns false (leaving the state untouched) when
    /// the move is not applicable. A promotion move without a piece choice
    /// leaves the state waiting in `pending_promotion`.
    fn apply_move(&self, game_state: &mut GameState, mv: &Move) -> bool;

    /// Completes a pending promotion and passes the turn.
    fn resolve_pending_promotion(&self, game_state: &mut GameState, piece: PieceKind) -> bool;

    fn is_in_check(&self, game_state: &GameState, color: Color) -> bool;

    /// Piece chosen when a promotion has to be auto-resolved.
    fn strongest_promotion(&self) -> PieceKind;

    fn is_move_legal(&self, game_state: &GameState, mv: &Move) -> bool {
        self.legal_moves(game_state)
            .map(|moves| moves.contains(mv))
            .unwrap_or(false)
    }

    /// Applies `mv` and, if that leaves a promotion pending, resolves it with
    /// `strongest_promotion`. Used wherever the search simulates a branch.
    fn apply_move_auto_promote(&self, game_state: &mut GameState, mv: &Move) -> bool {
        if !self.apply_move(game_state, mv) {
            return false;
        }
        if game_state.pending_promotion.is_some() {
            return self.resolve_pending_promotion(game_state, self.strongest_promotion());
        }
        true
    }
}
