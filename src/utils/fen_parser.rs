//! Position-notation parser.
//!
//! The notation is FEN-like, reduced to what the variant needs: six ranks
//! from rank 6 down to rank 1, the side to move, and a hand field listing
//! held pieces (uppercase White, lowercase Black, `-` when both are empty).

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

pub fn parse_fen(fen: &str) -> NotationResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(NotationError::MissingField("board"))?;
    let side_part = parts.next().ok_or(NotationError::MissingField("side-to-move"))?;
    let hand_part = parts.next().ok_or(NotationError::MissingField("hand"))?;

    if parts.next().is_some() {
        return Err(NotationError::TrailingFields);
    }

    let mut game_state = GameState::new_empty();
    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    parse_hands(hand_part, &mut game_state)?;

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> NotationResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != BOARD_SIZE {
        return Err(NotationError::InvalidLayout(format!(
            "expected {BOARD_SIZE} ranks, found {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = BOARD_SIZE - 1 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                let step = empty_count as usize;
                if !(1..=BOARD_SIZE).contains(&step) {
                    return Err(NotationError::InvalidLayout(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += step;
                continue;
            }

            let piece = Piece::from_char(ch).ok_or(NotationError::InvalidPiece(ch))?;
            if file >= BOARD_SIZE {
                return Err(NotationError::InvalidLayout(format!(
                    "rank '{rank_str}' has too many files"
                )));
            }

            game_state.board[square_at(board_rank, file) as usize] = Some(piece);
            file += 1;
        }

        if file != BOARD_SIZE {
            return Err(NotationError::InvalidLayout(format!(
                "rank '{rank_str}' does not sum to {BOARD_SIZE} files"
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> NotationResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(NotationError::InvalidSide(side_part.to_owned())),
    }
}

fn parse_hands(hand_part: &str, game_state: &mut GameState) -> NotationResult<()> {
    if hand_part == "-" {
        return Ok(());
    }

    for ch in hand_part.chars() {
        let piece = Piece::from_char(ch).ok_or(NotationError::InvalidPiece(ch))?;
        if piece.kind == PieceKind::King {
            return Err(NotationError::InvalidHand(hand_part.to_owned()));
        }
        game_state.hand_mut(piece.color).add(piece.kind);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION;
    use crate::game_state::chess_types::*;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_position_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION).expect("starting position should parse");

        println!("\n{}", render_game_state(&game_state));

        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(
            game_state.piece_at(square_at(5, 2)),
            Some(Piece::new(Color::Black, PieceKind::Bishop))
        );
        assert_eq!(
            game_state.piece_at(square_at(1, 0)),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn hands_are_parsed_per_color() {
        let game_state = parse_fen("5k/6/6/6/6/K5 b NNp").expect("position should parse");
        assert_eq!(game_state.hand(Color::White).count(PieceKind::Knight), 2);
        assert_eq!(game_state.hand(Color::Black).count(PieceKind::Pawn), 1);
        assert_eq!(game_state.side_to_move, Color::Black);
    }

    #[test]
    fn malformed_positions_are_rejected() {
        assert!(parse_fen("5k/6/6/6/K5 w -").is_err());
        assert!(parse_fen("5k/6/6/6/6/K6 w -").is_err());
        assert!(parse_fen("5k/6/6/6/6/K5 x -").is_err());
        assert!(parse_fen("5k/6/6/6/6/K5 w K").is_err());
        assert!(parse_fen("5k/6/6/6/6/K5 w - extra").is_err());
    }
}
