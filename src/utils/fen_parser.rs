//! FEN-to-GameState parser.
//!
//! Builds a fully-populated incremental state from a Forsyth-Edwards Notation
//! string: the mailbox is filled first, then piece lists, pawn bitboards,
//! material and the position key are derived from it in one pass.

use crate::errors::FenError;
use crate::game_state::chess_types::*;
use crate::game_state::squares::{rank_of, square_from_file_rank, RANK_3, RANK_6};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next();
    let fullmove_part = parts.next();

    if let Some(extra) = parts.next() {
        return Err(FenError::TrailingFields(extra.to_owned()));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square =
        parse_en_passant_square(en_passant_part, game_state.side_to_move)?;
    game_state.fifty_move_counter = parse_counter(halfmove_part, 0)?;
    game_state.fullmove_number = parse_counter(fullmove_part, 1)?.max(1);

    for color in [Color::Light, Color::Dark] {
        let king = Piece::from_parts(color, PieceKind::King);
        let kings = game_state.squares.iter().filter(|&&p| p == king).count();
        if kings != 1 {
            return Err(FenError::KingCount(color, kings));
        }
    }

    game_state.rebuild_derived_state();

    // The side not to move must not be in check, or its king is capturable.
    let mover = game_state.side_to_move;
    if is_square_attacked(&game_state, game_state.king_square(mover.opposite()), mover) {
        return Err(FenError::OpponentInCheck(mover.opposite()));
    }

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidPieceChar(ch));
                }
                file += empty_count as usize;
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPieceChar(ch))?;

            if file >= 8 {
                return Err(FenError::FileCount {
                    rank: board_rank as usize + 1,
                    files: file + 1,
                });
            }

            let sq = square_from_file_rank(file as u8, board_rank);
            game_state.squares[sq as usize] = piece;
            file += 1;
        }

        if file != 8 {
            return Err(FenError::FileCount {
                rank: board_rank as usize + 1,
                files: file,
            });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(FenError::InvalidSide(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(castling_part.to_owned())),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))?;
    let expected_rank = match side_to_move {
        Color::Light => RANK_6,
        Color::Dark => RANK_3,
    };
    if rank_of(square) != expected_rank {
        return Err(FenError::InvalidEnPassant(en_passant_part.to_owned()));
    }

    Ok(Some(square))
}

fn parse_counter(part: Option<&str>, default: u16) -> Result<u16, FenError> {
    match part {
        None => Ok(default),
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| FenError::InvalidCounter(text.to_owned())),
    }
}
