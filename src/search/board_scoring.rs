//! Pluggable board evaluation interfaces and implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! All scores are from White's perspective: positive favors White.

use crate::game_state::chess_rules::KNIGHT_OFFSETS;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, GameStatus};

/// Score of a checkmated position, signed against the mated side.
pub const CHECKMATE_SCORE: i64 = 1_000_000;
/// Window bound strictly beyond any reachable score.
pub const SCORE_INFINITY: i64 = 10 * CHECKMATE_SCORE;

pub const CENTER_BONUS: i64 = 15;
pub const KING_SAFETY_BONUS: i64 = 8;
pub const PAWN_STRUCTURE_BONUS: i64 = 5;
pub const PASSED_PAWN_RANK_BONUS: i64 = 10;
pub const ATTACK_KING_ZONE_BONUS: i64 = 20;
pub const DROP_THREAT_BONUS: i64 = 25;
pub const TEMPO_BONUS: i64 = 10;
pub const UNDEVELOPED_PENALTY: i64 = 15;
pub const KING_CENTER_OPENING_PENALTY: i64 = 20;
pub const KING_CENTER_ENDGAME_BONUS: i64 = 10;

/// Material lead beyond which a stalemate counts as a failed win.
pub const STALEMATE_MATERIAL_THRESHOLD: i64 = 100;
pub const STALEMATE_FAILED_WIN_SCORE: i64 = 10_000;

pub trait BoardScorer: Send + Sync {
    /// Score from White's perspective.
    fn score(&self, game_state: &GameState) -> i64;
}

#[inline]
pub const fn piece_value(piece: PieceKind) -> i64 {
    match piece {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Value of a piece held in hand; higher than on the board for drop flexibility.
#[inline]
pub const fn hand_piece_value(piece: PieceKind) -> i64 {
    match piece {
        PieceKind::Pawn => 150,
        PieceKind::Knight => 400,
        PieceKind::Bishop => 410,
        PieceKind::Rook => 650,
        PieceKind::Queen => 1000,
        PieceKind::King => 0,
    }
}

#[inline]
fn signed(color: Color, value: i64) -> i64 {
    match color {
        Color::White => value,
        Color::Black => -value,
    }
}

/// Board plus hand material, White minus Black.
pub fn material_balance(game_state: &GameState) -> i64 {
    let board: i64 = game_state
        .pieces()
        .map(|(_, piece)| signed(piece.color, piece_value(piece.kind)))
        .sum();
    let hands: i64 = [Color::White, Color::Black]
        .into_iter()
        .map(|color| {
            let held: i64 = game_state
                .hand(color)
                .iter()
                .map(|(kind, count)| hand_piece_value(kind) * i64::from(count))
                .sum();
            signed(color, held)
        })
        .sum();
    board + hands
}

/// Score of a checkmate or stalemate, `None` for ongoing positions.
pub fn terminal_score(game_state: &GameState) -> Option<i64> {
    match game_state.status {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate => Some(signed(game_state.side_to_move, -CHECKMATE_SCORE)),
        GameStatus::Stalemate => {
            // Loss for the mover when the waiting side leads, otherwise a draw.
            let waiting = game_state.side_to_move.opposite();
            let lead = signed(waiting, material_balance(game_state));
            let score = if lead > STALEMATE_MATERIAL_THRESHOLD {
                signed(game_state.side_to_move, -STALEMATE_FAILED_WIN_SCORE)
            } else {
                0
            };
            Some(score)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i64 {
        terminal_score(game_state).unwrap_or_else(|| material_balance(game_state))
    }
}

/// Full positional evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl BoardScorer for HeuristicScorer {
    fn score(&self, game_state: &GameState) -> i64 {
        if let Some(score) = terminal_score(game_state) {
            return score;
        }

        let kings = [
            game_state.king_square(Color::White),
            game_state.king_square(Color::Black),
        ];
        let opening = is_opening_phase(game_state);

        let mut score = material_balance(game_state);

        for (square, piece) in game_state.pieces() {
            let mut term = 0;
            if is_center_square(square) {
                term += CENTER_BONUS;
            }
            if piece.kind != PieceKind::King {
                if let Some(king) = kings[piece.color.index()] {
                    if chebyshev_distance(square, king) <= 2 {
                        term += KING_SAFETY_BONUS;
                    }
                }
            }
            if piece.kind == PieceKind::Pawn {
                term += pawn_structure(game_state, square, piece.color);
            }
            if opening
                && matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook)
                && rank_of(square) == piece.color.back_rank()
            {
                term -= UNDEVELOPED_PENALTY;
            }
            score += signed(piece.color, term);
        }

        for color in [Color::White, Color::Black] {
            let held = i64::from(game_state.hand(color).total());
            score += signed(color, held * DROP_THREAT_BONUS);

            if let Some(king) = kings[color.index()] {
                if is_center_square(king) {
                    let term = if opening {
                        -KING_CENTER_OPENING_PENALTY
                    } else {
                        KING_CENTER_ENDGAME_BONUS
                    };
                    score += signed(color, term);
                }
            }

            if let Some(enemy_king) = kings[color.opposite().index()] {
                let half_units = king_zone_pressure(game_state, color, enemy_king);
                score += signed(color, half_units * ATTACK_KING_ZONE_BONUS / 2);
            }
        }

        score + signed(game_state.side_to_move, TEMPO_BONUS)
    }
}

/// Opening while total material (hand pieces at board value, kings
/// included) is at least two rooks plus both kings.
fn is_opening_phase(game_state: &GameState) -> bool {
    let on_board: i64 = game_state.pieces().map(|(_, p)| piece_value(p.kind)).sum();
    let in_hand: i64 = game_state
        .hands
        .iter()
        .flat_map(|hand| hand.iter())
        .map(|(kind, count)| piece_value(kind) * i64::from(count))
        .sum();
    let threshold = 2 * piece_value(PieceKind::Rook) + 2 * piece_value(PieceKind::King);
    on_board + in_hand >= threshold
}

fn pawn_structure(game_state: &GameState, square: Square, color: Color) -> i64 {
    let own_pawn = Some(Piece::new(color, PieceKind::Pawn));
    let enemy_pawn = Some(Piece::new(color.opposite(), PieceKind::Pawn));
    let mut term = 0;

    for df in [-1, 1] {
        if offset_square(square, 0, df).and_then(|s| game_state.piece_at(s)) == own_pawn {
            term += PAWN_STRUCTURE_BONUS;
        }
    }

    let rank = rank_of(square);
    let file = file_of(square) as i64;
    let ahead: Vec<usize> = match color {
        Color::White => (rank + 1..BOARD_SIZE).collect(),
        Color::Black => (0..rank).collect(),
    };
    let blocked = ahead.iter().any(|&r| {
        (file - 1..=file + 1)
            .filter(|f| (0..BOARD_SIZE as i64).contains(f))
            .any(|f| game_state.piece_at(square_at(r, f as usize)) == enemy_pawn)
    });
    if !blocked {
        let advanced = rank.abs_diff(color.back_rank()) as i64;
        term += advanced * PASSED_PAWN_RANK_BONUS;
    }

    term
}

/// Pressure on the squares around `enemy_king`, in half-attack units: a
/// knight hit counts two, a bishop/rook/queen line counts one. Lines are not
/// checked for blockers.
fn king_zone_pressure(game_state: &GameState, attacker: Color, enemy_king: Square) -> i64 {
    let mut half_units = 0;

    for dr in -1i8..=1 {
        for df in -1i8..=1 {
            if dr == 0 && df == 0 {
                continue;
            }
            let Some(zone) = offset_square(enemy_king, dr, df) else {
                continue;
            };

            for (square, piece) in game_state.pieces() {
                if piece.color != attacker || square == zone {
                    continue;
                }
                let d_rank = rank_of(zone) as i8 - rank_of(square) as i8;
                let d_file = file_of(zone) as i8 - file_of(square) as i8;
                let diagonal = d_rank.abs() == d_file.abs();
                let straight = d_rank == 0 || d_file == 0;

                half_units += match piece.kind {
                    PieceKind::Knight if KNIGHT_OFFSETS.contains(&(d_rank, d_file)) => 2,
                    PieceKind::Bishop if diagonal => 1,
                    PieceKind::Rook if straight => 1,
                    PieceKind::Queen if diagonal || straight => 1,
                    _ => 0,
                };
            }
        }
    }

    half_units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_lead_sets_the_sign() {
        let white = GameState::from_fen("5k/6/2N3/6/P5/K5 w B").expect("position should parse");
        let black = GameState::from_fen("5k/p5/6/3n2/6/K5 b b").expect("position should parse");
        assert!(HeuristicScorer.score(&white) > 0);
        assert!(HeuristicScorer.score(&black) < 0);
    }

    #[test]
    fn hand_pieces_outweigh_board_pieces() {
        let on_board = GameState::from_fen("5k/6/6/6/6/KN4 w -").expect("position should parse");
        let in_hand = GameState::from_fen("5k/6/6/6/6/K5 w N").expect("position should parse");
        assert!(material_balance(&in_hand) > material_balance(&on_board));
    }

    #[test]
    fn checkmate_is_signed_against_the_side_to_move() {
        let mut state = GameState::from_fen("R4k/6/5K/6/6/6 b -").expect("position should parse");
        state.status = GameStatus::Checkmate;
        assert_eq!(HeuristicScorer.score(&state), CHECKMATE_SCORE);
        assert_eq!(MaterialScorer.score(&state), CHECKMATE_SCORE);
    }

    #[test]
    fn stalemate_is_lost_by_the_mover_when_the_opponent_leads() {
        let mut black_stuck = GameState::from_fen("5k/6/6/6/6/KR4 b -").expect("position should parse");
        black_stuck.status = GameStatus::Stalemate;
        assert_eq!(HeuristicScorer.score(&black_stuck), STALEMATE_FAILED_WIN_SCORE);
        assert_eq!(MaterialScorer.score(&black_stuck), STALEMATE_FAILED_WIN_SCORE);

        let mut white_stuck = GameState::from_fen("kr4/6/6/6/6/5K w -").expect("position should parse");
        white_stuck.status = GameStatus::Stalemate;
        assert_eq!(HeuristicScorer.score(&white_stuck), -STALEMATE_FAILED_WIN_SCORE);
    }

    #[test]
    fn stalemate_is_a_draw_when_the_mover_leads_or_material_is_level() {
        let mut mover_ahead = GameState::from_fen("5k/6/6/6/6/KR4 w -").expect("position should parse");
        mover_ahead.status = GameStatus::Stalemate;
        assert_eq!(HeuristicScorer.score(&mover_ahead), 0);

        let mut level = GameState::from_fen("5k/6/6/6/6/K5 b -").expect("position should parse");
        level.status = GameStatus::Stalemate;
        assert_eq!(HeuristicScorer.score(&level), 0);
    }

    #[test]
    fn material_dominates_positional_terms() {
        let up_a_rook = GameState::from_fen("5k/6/6/6/6/KR4 b -").expect("position should parse");
        assert!(HeuristicScorer.score(&up_a_rook) > 300);
    }

    #[test]
    fn undeveloped_pieces_cost_in_the_opening() {
        let home = GameState::from_fen("2bnrk/5p/6/6/P5/KRNB2 w -").expect("position should parse");
        let developed = GameState::from_fen("2bnrk/5p/6/2N3/P5/KR1B2 w -").expect("position should parse");
        assert!(HeuristicScorer.score(&developed) > HeuristicScorer.score(&home));
    }
}
