//! Padded (10x12) and dense (0..64) square numbering.
//!
//! The padded layout surrounds the 8x8 board with two guard ranks above and
//! below and one guard file on each side, so any knight/king/slider step from a
//! playable square lands inside `0..120` and reads `Piece::OffBoard` instead of
//! needing a bounds check. The dense numbering (`a1 == 0`, `h8 == 63`) indexes
//! bitboards and piece-square tables.

use crate::game_state::chess_types::{Square, BOARD_SQUARES, PADDED_BOARD_SQUARES};

/// Dense index returned for padded squares that are off the board.
pub const OFF_BOARD_INDEX: u8 = 65;

/// Padded index used as "no square" (inside the guard ring).
pub const NO_SQUARE: Square = 0;

/// File/rank value returned for off-board squares.
pub const NO_FILE_OR_RANK: u8 = 8;

pub const RANK_1: u8 = 0;
pub const RANK_2: u8 = 1;
pub const RANK_3: u8 = 2;
pub const RANK_6: u8 = 5;
pub const RANK_7: u8 = 6;
pub const RANK_8: u8 = 7;

pub const A1: Square = square_from_file_rank(0, 0);
pub const B1: Square = square_from_file_rank(1, 0);
pub const C1: Square = square_from_file_rank(2, 0);
pub const D1: Square = square_from_file_rank(3, 0);
pub const E1: Square = square_from_file_rank(4, 0);
pub const F1: Square = square_from_file_rank(5, 0);
pub const G1: Square = square_from_file_rank(6, 0);
pub const H1: Square = square_from_file_rank(7, 0);
pub const A8: Square = square_from_file_rank(0, 7);
pub const B8: Square = square_from_file_rank(1, 7);
pub const C8: Square = square_from_file_rank(2, 7);
pub const D8: Square = square_from_file_rank(3, 7);
pub const E8: Square = square_from_file_rank(4, 7);
pub const F8: Square = square_from_file_rank(5, 7);
pub const G8: Square = square_from_file_rank(6, 7);
pub const H8: Square = square_from_file_rank(7, 7);

/// Padded square for a `(file, rank)` pair, both `0..8`.
#[inline]
pub const fn square_from_file_rank(file: u8, rank: u8) -> Square {
    21 + file + rank * 10
}

const fn build_padded_to_dense() -> [u8; PADDED_BOARD_SQUARES] {
    let mut table = [OFF_BOARD_INDEX; PADDED_BOARD_SQUARES];
    let mut rank = 0u8;
    while rank < 8 {
        let mut file = 0u8;
        while file < 8 {
            table[square_from_file_rank(file, rank) as usize] = rank * 8 + file;
            file += 1;
        }
        rank += 1;
    }
    table
}

const fn build_dense_to_padded() -> [Square; BOARD_SQUARES] {
    let mut table = [0u8; BOARD_SQUARES];
    let mut index = 0usize;
    while index < BOARD_SQUARES {
        table[index] = square_from_file_rank((index % 8) as u8, (index / 8) as u8);
        index += 1;
    }
    table
}

const fn build_files_and_ranks() -> ([u8; PADDED_BOARD_SQUARES], [u8; PADDED_BOARD_SQUARES]) {
    let mut files = [NO_FILE_OR_RANK; PADDED_BOARD_SQUARES];
    let mut ranks = [NO_FILE_OR_RANK; PADDED_BOARD_SQUARES];
    let mut rank = 0u8;
    while rank < 8 {
        let mut file = 0u8;
        while file < 8 {
            let sq = square_from_file_rank(file, rank) as usize;
            files[sq] = file;
            ranks[sq] = rank;
            file += 1;
        }
        rank += 1;
    }
    (files, ranks)
}

static PADDED_TO_DENSE: [u8; PADDED_BOARD_SQUARES] = build_padded_to_dense();
static DENSE_TO_PADDED: [Square; BOARD_SQUARES] = build_dense_to_padded();
static FILES_AND_RANKS: ([u8; PADDED_BOARD_SQUARES], [u8; PADDED_BOARD_SQUARES]) =
    build_files_and_ranks();

/// Dense index of a padded square, or [`OFF_BOARD_INDEX`].
#[inline]
pub fn sq64(sq: Square) -> u8 {
    PADDED_TO_DENSE
        .get(sq as usize)
        .copied()
        .unwrap_or(OFF_BOARD_INDEX)
}

/// Padded square of a dense index (`0..64`).
#[inline]
pub fn sq120(dense: u8) -> Square {
    DENSE_TO_PADDED[dense as usize]
}

#[inline]
pub fn is_on_board(sq: Square) -> bool {
    sq64(sq) < BOARD_SQUARES as u8
}

#[inline]
pub fn file_of(sq: Square) -> u8 {
    FILES_AND_RANKS.0.get(sq as usize).copied().unwrap_or(NO_FILE_OR_RANK)
}

#[inline]
pub fn rank_of(sq: Square) -> u8 {
    FILES_AND_RANKS.1.get(sq as usize).copied().unwrap_or(NO_FILE_OR_RANK)
}

/// Apply a direction delta. Deltas never exceed 21 in magnitude, so from any
/// playable square the result stays inside the padded array.
#[inline]
pub fn offset(sq: Square, delta: i8) -> Square {
    (i16::from(sq) + i16::from(delta)) as Square
}

/// Every playable square in dense order (`a1`, `b1`, …, `h8`).
pub fn playable_squares() -> impl Iterator<Item = Square> {
    DENSE_TO_PADDED.iter().copied()
}
