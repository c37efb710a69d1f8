//! GameState-to-position-notation generator.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

pub fn generate_fen(game_state: &GameState) -> String {
    let mut out = String::with_capacity(40);

    for rank in (0..BOARD_SIZE).rev() {
        let mut empty = 0u8;
        for file in 0..BOARD_SIZE {
            match game_state.piece_at(square_at(rank, file)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match game_state.side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    out.push(' ');
    out.push_str(&hand_field(game_state));

    out
}

fn hand_field(game_state: &GameState) -> String {
    let mut field = String::new();
    for color in [Color::White, Color::Black] {
        for (kind, count) in game_state.hand(color).iter() {
            let ch = Piece::new(color, kind).to_char();
            field.extend(std::iter::repeat(ch).take(usize::from(count)));
        }
    }
    if field.is_empty() {
        field.push('-');
    }
    field
}
