//! In-place move application for mini crazyhouse.
//!
//! Application validates the move against the current board (ownership,
//! occupancy, hand contents, promotion choices) but not king safety; legality
//! filtering lives in the generator. A rejected move leaves the state as it was.

use crate::game_state::chess_rules::PROMOTION_PIECES;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, GameStatus};
use crate::moves::move_descriptions::Move;

pub fn apply_move(game_state: &mut GameState, mv: &Move) -> bool {
    if game_state.pending_promotion.is_some() {
        return false;
    }
    let on_board = mv.from_square().map_or(true, is_on_board) && is_on_board(mv.to_square());
    if !on_board {
        return false;
    }

    match *mv {
        Move::Drop { color, piece, to } => apply_drop(game_state, color, piece, to),
        Move::Normal {
            from,
            to,
            promotion,
        } => apply_normal(game_state, from, to, promotion),
    }
}

fn apply_drop(game_state: &mut GameState, color: Color, piece: PieceKind, to: Square) -> bool {
    if color != game_state.side_to_move || game_state.piece_at(to).is_some() {
        return false;
    }
    if piece == PieceKind::Pawn && rank_of(to) == color.promotion_rank() {
        return false;
    }
    if !game_state.hand_mut(color).take(piece) {
        return false;
    }

    game_state.board[to as usize] = Some(Piece::new(color, piece));
    finish_turn(game_state);
    true
}

fn apply_normal(
    game_state: &mut GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> bool {
    let Some(moving) = game_state.piece_at(from) else {
        return false;
    };
    if moving.color != game_state.side_to_move || from == to {
        return false;
    }

    let captured = game_state.piece_at(to);
    if let Some(target) = captured {
        if target.color == moving.color || target.kind == PieceKind::King {
            return false;
        }
    }

    let promotes = moving.kind == PieceKind::Pawn && rank_of(to) == moving.color.promotion_rank();
    match promotion {
        Some(choice) if !promotes || !PROMOTION_PIECES.contains(&choice) => return false,
        _ => {}
    }

    if let Some(target) = captured {
        game_state.hand_mut(moving.color).add(target.kind);
    }
    game_state.board[from as usize] = None;

    match (promotes, promotion) {
        (true, Some(choice)) => {
            game_state.board[to as usize] = Some(Piece::new(moving.color, choice));
        }
        (true, None) => {
            // The pawn waits on the last rank; the turn passes only once resolved.
            game_state.board[to as usize] = Some(moving);
            game_state.pending_promotion = Some(to);
            game_state.status = GameStatus::Ongoing;
            return true;
        }
        (false, _) => {
            game_state.board[to as usize] = Some(moving);
        }
    }

    finish_turn(game_state);
    true
}

/// Replaces the waiting pawn with `piece` and passes the turn.
pub fn resolve_pending_promotion(game_state: &mut GameState, piece: PieceKind) -> bool {
    let Some(square) = game_state.pending_promotion else {
        return false;
    };
    if !PROMOTION_PIECES.contains(&piece) {
        return false;
    }
    let Some(pawn) = game_state.piece_at(square) else {
        return false;
    };

    game_state.board[square as usize] = Some(Piece::new(pawn.color, piece));
    game_state.pending_promotion = None;
    finish_turn(game_state);
    true
}

#[inline]
fn finish_turn(game_state: &mut GameState) {
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.status = GameStatus::Ongoing;
}
