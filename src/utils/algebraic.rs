//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and padded board
//! squares, reused by the notation parsers and move display.

use crate::errors::MoveParseError;
use crate::game_state::chess_types::Square;
use crate::game_state::squares::{file_of, is_on_board, rank_of, square_from_file_rank};

/// Convert algebraic notation (for example: "e4") to a padded square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, MoveParseError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(MoveParseError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(MoveParseError::InvalidSquare(square.to_owned()));
    }

    Ok(square_from_file_rank(file - b'a', rank - b'1'))
}

/// Convert a padded square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, MoveParseError> {
    if !is_on_board(square) {
        return Err(MoveParseError::InvalidSquare(square.to_string()));
    }

    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));

    Ok(format!("{file_char}{rank_char}"))
}
