//! Legal move generation for mini crazyhouse.
//!
//! Generation is pseudo-legal first (board moves in square order, then drops
//! in hand-kind and square order), followed by a king-safety filter that
//! applies each candidate to a scratch copy.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::chess_rules::{
    DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, PROMOTION_PIECES, STRAIGHT_DIRECTIONS,
};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, GameStatus};
use crate::move_generation::legal_move_apply::{apply_move, resolve_pending_promotion};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::rules_engine::RulesEngine;
use crate::moves::move_descriptions::Move;

/// Concrete rules engine for the 6x6 variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniCrazyhouseRules;

impl RulesEngine for MiniCrazyhouseRules {
    fn legal_moves(&self, game_state: &GameState) -> RulesResult<Vec<Move>> {
        generate_legal_moves(game_state)
    }

    fn apply_move(&self, game_state: &mut GameState, mv: &Move) -> bool {
        apply_move(game_state, mv)
    }

    fn resolve_pending_promotion(&self, game_state: &mut GameState, piece: PieceKind) -> bool {
        resolve_pending_promotion(game_state, piece)
    }

    fn is_in_check(&self, game_state: &GameState, color: Color) -> bool {
        is_king_in_check(game_state, color)
    }

    fn strongest_promotion(&self) -> PieceKind {
        PROMOTION_PIECES[0]
    }
}

pub fn generate_legal_moves(game_state: &GameState) -> RulesResult<Vec<Move>> {
    if game_state.pending_promotion.is_some() {
        return Ok(Vec::new());
    }

    let side = game_state.side_to_move;
    let own_kings = game_state
        .pieces()
        .filter(|(_, piece)| *piece == Piece::new(side, PieceKind::King))
        .count();
    match own_kings {
        0 => return Err(RulesError::MissingKing(side)),
        1 => {}
        n => return Err(RulesError::InvalidState(format!("{side:?} has {n} kings"))),
    }

    let mut pseudo = Vec::with_capacity(48);
    generate_pseudo_legal_moves(game_state, &mut pseudo);

    let legal = pseudo
        .into_iter()
        .filter(|mv| {
            let mut scratch = game_state.clone();
            apply_move(&mut scratch, mv) && !is_king_in_check(&scratch, side)
        })
        .collect();
    Ok(legal)
}

fn generate_pseudo_legal_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;

    for (square, piece) in game_state.pieces() {
        if piece.color != side {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(game_state, square, side, out),
            PieceKind::Knight => step_moves(game_state, square, side, &KNIGHT_OFFSETS, out),
            PieceKind::King => step_moves(game_state, square, side, &KING_OFFSETS, out),
            PieceKind::Bishop => slide_moves(game_state, square, side, &DIAGONAL_DIRECTIONS, out),
            PieceKind::Rook => slide_moves(game_state, square, side, &STRAIGHT_DIRECTIONS, out),
            PieceKind::Queen => {
                slide_moves(game_state, square, side, &DIAGONAL_DIRECTIONS, out);
                slide_moves(game_state, square, side, &STRAIGHT_DIRECTIONS, out);
            }
        }
    }

    drop_moves(game_state, side, out);
}

fn pawn_moves(game_state: &GameState, square: Square, side: Color, out: &mut Vec<Move>) {
    let dir = side.pawn_direction();

    if let Some(to) = offset_square(square, dir, 0) {
        if game_state.piece_at(to).is_none() {
            push_pawn_move(square, to, side, out);
        }
    }

    for df in [-1, 1] {
        if let Some(to) = offset_square(square, dir, df) {
            if let Some(target) = game_state.piece_at(to) {
                if target.color != side {
                    push_pawn_move(square, to, side, out);
                }
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, side: Color, out: &mut Vec<Move>) {
    if rank_of(to) == side.promotion_rank() {
        out.extend(PROMOTION_PIECES.iter().map(|&piece| Move::promotion(from, to, piece)));
    } else {
        out.push(Move::normal(from, to));
    }
}

fn step_moves(
    game_state: &GameState,
    square: Square,
    side: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(dr, df) in offsets {
        if let Some(to) = offset_square(square, dr, df) {
            match game_state.piece_at(to) {
                Some(target) if target.color == side => {}
                _ => out.push(Move::normal(square, to)),
            }
        }
    }
}

fn slide_moves(
    game_state: &GameState,
    square: Square,
    side: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(dr, df) in directions {
        let mut cursor = offset_square(square, dr, df);
        while let Some(to) = cursor {
            match game_state.piece_at(to) {
                None => out.push(Move::normal(square, to)),
                Some(target) => {
                    if target.color != side {
                        out.push(Move::normal(square, to));
                    }
                    break;
                }
            }
            cursor = offset_square(to, dr, df);
        }
    }
}

fn drop_moves(game_state: &GameState, side: Color, out: &mut Vec<Move>) {
    for (piece, _) in game_state.hand(side).iter() {
        for idx in 0..SQUARE_COUNT {
            let to = idx as Square;
            if game_state.piece_at(to).is_some() {
                continue;
            }
            if piece == PieceKind::Pawn && rank_of(to) == side.promotion_rank() {
                continue;
            }
            out.push(Move::drop_piece(side, piece, to));
        }
    }
}

/// Recomputes `status` for the side to move. Game drivers call this after
/// each played move; the search marks terminal nodes itself.
pub fn update_game_status(game_state: &mut GameState) -> RulesResult<GameStatus> {
    let status = if generate_legal_moves(game_state)?.is_empty() {
        if is_king_in_check(game_state, game_state.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else {
        GameStatus::Ongoing
    };
    game_state.status = status;
    Ok(status)
}
