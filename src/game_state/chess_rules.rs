//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position, the castling-rights
//! mask applied on every move, and the draw thresholds.

use crate::game_state::chess_types::{CastlingRights, Square, PADDED_BOARD_SQUARES};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_LIMIT: u16 = 100;

/// Occurrences of one position that end the game by repetition.
pub const REPETITION_LIMIT: usize = 3;

/// Rights are ANDed with the entry for both the from- and to-square of every
/// move, so moving a king or rook, or landing on a rook's home square, clears
/// the matching bits for good.
#[rustfmt::skip]
const CASTLE_PERMISSION_MASK: [CastlingRights; PADDED_BOARD_SQUARES] = [
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 13, 15, 15, 15, 12, 15, 15, 14, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15,  7, 15, 15, 15,  3, 15, 15, 11, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
];

#[inline]
pub fn castle_permission_mask(sq: Square) -> CastlingRights {
    CASTLE_PERMISSION_MASK[sq as usize]
}
