//! SHA-256 position fingerprints used as TT and move-cache keys.
//!
//! The digest is computed over a canonical byte encoding, so equal positions
//! hash equally across processes and runs regardless of how they were reached.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

/// Marker for the special-rights slot. The variant has no castling or
/// en-passant, so the slot is constant.
const NO_SPECIAL_RIGHTS: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl StateHash {
    /// Low 64 bits, used for table indexing.
    #[inline]
    pub fn index_bits(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Fingerprint of board, hands, side to move and special rights.
///
/// Returns `None` for a state waiting on a promotion choice: such a state is
/// not a searchable position, and callers bypass the caches for it.
pub fn hash_state(game_state: &GameState) -> Option<StateHash> {
    if game_state.pending_promotion.is_some() {
        return None;
    }

    let mut hasher = Sha256::new();

    let mut board = [0u8; SQUARE_COUNT];
    for (slot, piece) in board.iter_mut().zip(game_state.board.iter()) {
        *slot = piece.map_or(0, piece_code);
    }
    hasher.update(board);

    for color in [Color::White, Color::Black] {
        let hand = game_state.hand(color);
        let counts = PieceKind::HAND_KINDS.map(|kind| hand.count(kind));
        hasher.update(counts);
    }

    hasher.update([game_state.side_to_move.index() as u8, NO_SPECIAL_RIGHTS]);

    Some(StateHash(hasher.finalize().into()))
}

#[inline]
fn piece_code(piece: Piece) -> u8 {
    1 + (piece.color.index() * 6 + piece.kind.index()) as u8
}
