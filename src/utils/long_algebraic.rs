//! Text form of moves: `a2a3`, `a5a6=R` for promotions and `N@c3` for drops.

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: &Move) -> String {
    match *mv {
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let mut out = square_to_algebraic(from);
            out.push_str(&square_to_algebraic(to));
            if let Some(piece) = promotion {
                out.push('=');
                out.push(piece.letter());
            }
            out
        }
        Move::Drop { piece, to, .. } => format!("{}@{}", piece.letter(), square_to_algebraic(to)),
    }
}

/// Parses move text. Drops take their color from `side_to_move`.
pub fn long_algebraic_to_move(text: &str, side_to_move: Color) -> NotationResult<Move> {
    let text = text.trim();
    let invalid = || NotationError::InvalidMove(text.to_owned());

    if let Some((piece_part, square_part)) = text.split_once('@') {
        let mut chars = piece_part.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let piece = PieceKind::from_letter(letter).ok_or(NotationError::InvalidPiece(letter))?;
        if piece == PieceKind::King {
            return Err(invalid());
        }
        let to = algebraic_to_square(square_part)?;
        return Ok(Move::drop_piece(side_to_move, piece, to));
    }

    if !text.is_ascii() || text.len() < 4 {
        return Err(invalid());
    }
    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;

    let tail = &text[4..];
    let suffix = tail.strip_prefix('=').unwrap_or(tail);
    let promotion = match suffix.as_bytes() {
        [] if tail.is_empty() => None,
        [letter] => {
            let letter = char::from(*letter);
            Some(PieceKind::from_letter(letter).ok_or(NotationError::InvalidPiece(letter))?)
        }
        _ => return Err(invalid()),
    };

    Ok(Move::Normal {
        from,
        to,
        promotion,
    })
}
