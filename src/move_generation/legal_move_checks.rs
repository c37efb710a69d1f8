//! Attack and check detection on the square-array board.

use crate::game_state::chess_rules::{
    DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, STRAIGHT_DIRECTIONS,
};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

/// Whether any piece of `by_color` attacks `square`.
pub fn is_square_attacked(game_state: &GameState, square: Square, by_color: Color) -> bool {
    let holds = |sq: Option<Square>, kind: PieceKind| {
        sq.and_then(|s| game_state.piece_at(s)) == Some(Piece::new(by_color, kind))
    };

    let back = -by_color.pawn_direction();
    if holds(offset_square(square, back, -1), PieceKind::Pawn)
        || holds(offset_square(square, back, 1), PieceKind::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, df)| holds(offset_square(square, dr, df), PieceKind::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, df)| holds(offset_square(square, dr, df), PieceKind::King))
    {
        return true;
    }

    ray_hits(game_state, square, by_color, &DIAGONAL_DIRECTIONS, PieceKind::Bishop)
        || ray_hits(game_state, square, by_color, &STRAIGHT_DIRECTIONS, PieceKind::Rook)
}

fn ray_hits(
    game_state: &GameState,
    square: Square,
    by_color: Color,
    directions: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for &(dr, df) in directions {
        let mut cursor = offset_square(square, dr, df);
        while let Some(sq) = cursor {
            if let Some(piece) = game_state.piece_at(sq) {
                if piece.color == by_color
                    && (piece.kind == slider || piece.kind == PieceKind::Queen)
                {
                    return true;
                }
                break;
            }
            cursor = offset_square(sq, dr, df);
        }
    }
    false
}

/// Whether `color`'s king is attacked. A side without a king is never in check.
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    game_state
        .king_square(color)
        .is_some_and(|king| is_square_attacked(game_state, king, color.opposite()))
}
