//! Square conversions for 6x6 coordinates (`a1`..`f6`).

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::{file_of, rank_of, square_at, Square, BOARD_SIZE};

/// Convert a coordinate such as "c3" to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> NotationResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0].wrapping_sub(b'a') as usize;
    let rank = bytes[1].wrapping_sub(b'1') as usize;
    if file >= BOARD_SIZE || rank >= BOARD_SIZE {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    Ok(square_at(rank, file))
}

/// Convert a square index to a coordinate such as "c3".
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + file_of(square) as u8);
    let rank_char = char::from(b'1' + rank_of(square) as u8);
    format!("{file_char}{rank_char}")
}
