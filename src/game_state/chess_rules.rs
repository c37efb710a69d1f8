//! Canonical rule constants for mini crazyhouse.

use crate::game_state::chess_types::PieceKind;

/// Starting position in the 6x6 position notation (ranks 6 down to 1, side, hands).
pub const STARTING_POSITION: &str = "2bnrk/5p/6/6/P5/KRNB2 w -";

/// Pieces a pawn may promote to, strongest first.
pub const PROMOTION_PIECES: [PieceKind; 3] = [PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const STRAIGHT_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
