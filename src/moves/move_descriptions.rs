//! Move value type.
//!
//! A move is either a board move (optionally promoting) or a drop from hand.
//! Moves are small `Copy` values; equality covers every field, including the
//! promotion piece, so two promotions to different pieces are distinct moves.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{Color, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Normal {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    Drop {
        color: Color,
        piece: PieceKind,
        to: Square,
    },
}

impl Move {
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::Normal {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        Move::Normal {
            from,
            to,
            promotion: Some(piece),
        }
    }

    #[inline]
    pub const fn drop_piece(color: Color, piece: PieceKind, to: Square) -> Self {
        Move::Drop { color, piece, to }
    }

    #[inline]
    pub const fn to_square(&self) -> Square {
        match *self {
            Move::Normal { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    #[inline]
    pub const fn from_square(&self) -> Option<Square> {
        match *self {
            Move::Normal { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    #[inline]
    pub const fn promotion_piece(&self) -> Option<PieceKind> {
        match *self {
            Move::Normal { promotion, .. } => promotion,
            Move::Drop { .. } => None,
        }
    }

    #[inline]
    pub const fn is_drop(&self) -> bool {
        matches!(self, Move::Drop { .. })
    }
}
