//! Terminal-oriented Unicode board renderer.
//!
//! Creates a human-readable 6x6 board view, followed by both hands and any
//! pending promotion, for logs, tests and the CLI.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

/// Render the board to a Unicode string for terminal output.
///
/// Assumes square indexing where `0 == a1` and `35 == f6`.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f\n");

    for rank in (0..BOARD_SIZE).rev() {
        out.push(char::from(b'1' + rank as u8));
        out.push(' ');

        for file in 0..BOARD_SIZE {
            match game_state.piece_at(square_at(rank, file)) {
                Some(piece) => out.push(piece_to_unicode(piece)),
                None => out.push('·'),
            }

            if file < BOARD_SIZE - 1 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank as u8));
        out.push('\n');
    }

    out.push_str("  a b c d e f");

    for color in [Color::White, Color::Black] {
        out.push_str(match color {
            Color::White => "\nwhite hand:",
            Color::Black => "\nblack hand:",
        });
        let hand = game_state.hand(color);
        if hand.is_empty() {
            out.push_str(" -");
        }
        for (kind, count) in hand.iter() {
            out.push_str(&format!(" {}x{count}", piece_to_unicode(Piece::new(color, kind))));
        }
    }

    if let Some(square) = game_state.pending_promotion {
        out.push_str(&format!("\npromotion pending on {}", square_to_algebraic(square)));
    }

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}
