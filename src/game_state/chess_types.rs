//! Primitive value types for the 6x6 board: colors, piece kinds, squares and hands.

use serde::{Deserialize, Serialize};

pub use crate::game_state::game_state::GameState;

/// Board edge length.
pub const BOARD_SIZE: usize = 6;
/// Total square count (`0..36`).
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Board square index, `rank * 6 + file`, with `0 == a1` and `35 == f6`.
pub type Square = u8;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank the side's pawns promote on.
    #[inline]
    pub const fn promotion_rank(self) -> usize {
        match self {
            Color::White => BOARD_SIZE - 1,
            Color::Black => 0,
        }
    }

    /// Rank the side's pieces start on.
    #[inline]
    pub const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    /// Rank delta of a forward pawn step.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds that can sit in a hand, in canonical order.
    pub const HAND_KINDS: [PieceKind; 5] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Uppercase letter used by move and position notation.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Notation character: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };
        PieceKind::from_letter(ch).map(|kind| Self { color, kind })
    }
}

/// Reserve of captured pieces available for drops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    counts: [u8; 5],
}

impl Hand {
    #[inline]
    pub fn count(&self, kind: PieceKind) -> u8 {
        if kind == PieceKind::King {
            return 0;
        }
        self.counts[kind.index()]
    }

    /// Adds one piece. Kings are never held.
    #[inline]
    pub fn add(&mut self, kind: PieceKind) {
        if kind != PieceKind::King {
            self.counts[kind.index()] = self.counts[kind.index()].saturating_add(1);
        }
    }

    /// Removes one piece, returning false when none is held.
    #[inline]
    pub fn take(&mut self, kind: PieceKind) -> bool {
        if kind == PieceKind::King || self.counts[kind.index()] == 0 {
            return false;
        }
        self.counts[kind.index()] -= 1;
        true
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Held kinds with their counts, in canonical order, skipping empties.
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        PieceKind::HAND_KINDS
            .iter()
            .map(|&kind| (kind, self.counts[kind.index()]))
            .filter(|&(_, count)| count > 0)
    }
}

#[inline]
pub const fn square_at(rank: usize, file: usize) -> Square {
    (rank * BOARD_SIZE + file) as Square
}

#[inline]
pub const fn is_on_board(square: Square) -> bool {
    (square as usize) < SQUARE_COUNT
}

#[inline]
pub const fn rank_of(square: Square) -> usize {
    square as usize / BOARD_SIZE
}

#[inline]
pub const fn file_of(square: Square) -> usize {
    square as usize % BOARD_SIZE
}

/// Square reached by stepping `(d_rank, d_file)`, if still on the board.
#[inline]
pub fn offset_square(square: Square, d_rank: i8, d_file: i8) -> Option<Square> {
    let rank = rank_of(square) as i8 + d_rank;
    let file = file_of(square) as i8 + d_file;
    let size = BOARD_SIZE as i8;
    if (0..size).contains(&rank) && (0..size).contains(&file) {
        Some(square_at(rank as usize, file as usize))
    } else {
        None
    }
}

/// King-move distance between two squares.
#[inline]
pub fn chebyshev_distance(a: Square, b: Square) -> usize {
    rank_of(a)
        .abs_diff(rank_of(b))
        .max(file_of(a).abs_diff(file_of(b)))
}

/// The four central squares c3, d3, c4 and d4.
#[inline]
pub fn is_center_square(square: Square) -> bool {
    matches!(rank_of(square), 2 | 3) && matches!(file_of(square), 2 | 3)
}
