//! Core game state representation.
//!
//! `GameState` is a plain value: a fixed square array, both hands, the side to
//! move, status flags and an optional pending promotion. Cloning it yields a
//! fully independent copy, which the search relies on for undo-free branching.

use crate::errors::NotationResult;
use crate::game_state::chess_rules::STARTING_POSITION;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Terminal flags as last computed by the rules engine or the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    Ongoing,
    Checkmate,
    Stalemate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: [Option<Piece>; SQUARE_COUNT],
    /// Indexed by `Color::index`.
    pub hands: [Hand; 2],
    pub side_to_move: Color,
    pub status: GameStatus,
    /// Square of a pawn on its last rank still waiting for a piece choice.
    pub pending_promotion: Option<Square>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [None; SQUARE_COUNT],
            hands: [Hand::default(); 2],
            side_to_move: Color::White,
            status: GameStatus::Ongoing,
            pending_promotion: None,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard mini crazyhouse starting position.
    pub fn new_game() -> Self {
        // The constant is covered by tests; an empty board is the only fallback.
        parse_fen(STARTING_POSITION).unwrap_or_default()
    }

    #[inline]
    pub fn from_fen(fen: &str) -> NotationResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    /// `None` for empty or off-board squares.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square as usize).copied().flatten()
    }

    #[inline]
    pub fn hand(&self, color: Color) -> &Hand {
        &self.hands[color.index()]
    }

    #[inline]
    pub fn hand_mut(&mut self, color: Color) -> &mut Hand {
        &mut self.hands[color.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board
            .iter()
            .position(|p| *p == Some(Piece::new(color, PieceKind::King)))
            .map(|idx| idx as Square)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::Ongoing
    }

    /// Occupied squares with their pieces, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.map(|piece| (idx as Square, piece)))
    }
}
