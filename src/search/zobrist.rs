//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! Keys are drawn once per process from a fixed-seed generator, so hashes are
//! deterministic across runs, which is useful for testing and debugging. The
//! piece table is indexed by piece id and padded square; the en-passant term
//! reuses the `Empty` row keyed by the target square.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;
use crate::game_state::squares::playable_squares;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; PADDED_BOARD_SQUARES]; PIECE_COUNT],
    side_to_move: u64,
    castling: [u64; 16],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[0u64; PADDED_BOARD_SQUARES]; PIECE_COUNT];
    for piece in &mut piece_square {
        for key in piece.iter_mut() {
            *key = rng.random();
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
    }
}

/// Force key generation. Safe to call repeatedly; keys never change once built.
#[inline]
pub fn initialize() {
    let _ = tables();
}

/// Key for a piece standing on a padded square.
#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.index()][square as usize]
}

/// Key for an en-passant target square.
#[inline]
pub fn en_passant_key(square: Square) -> u64 {
    piece_square_key(Piece::Empty, square)
}

/// Key contribution for castling rights mask (`0..=15`).
#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & 0x0F) as usize]
}

/// Side-to-move toggle key (xor in when light is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Compute the full position key from scratch.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for sq in playable_squares() {
        let piece = game_state.piece_at(sq);
        if piece.is_piece() {
            key ^= piece_square_key(piece, sq);
        }
    }

    if game_state.side_to_move == Color::Light {
        key ^= side_to_move_key();
    }

    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_key(ep_square);
    }

    key ^ castling_key(game_state.castling_rights)
}
