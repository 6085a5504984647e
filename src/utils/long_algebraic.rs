//! Long algebraic move text (`e2e4`, `e1g1`, `e7e8q`) resolved against a
//! position.
//!
//! The text only names squares and an optional promotion piece; the capture,
//! en-passant, double-push and castling details come from the matching legal
//! move.

use crate::errors::MoveParseError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::legal_moves_from;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Resolve `text` to the legal move it names in `game_state`.
pub fn parse_long_algebraic(text: &str, game_state: &mut GameState) -> Result<Move, MoveParseError> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(MoveParseError::Malformed(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(&ch) => Some(char_to_promotion(char::from(ch)).ok_or_else(|| {
            MoveParseError::Malformed(text.to_owned())
        })?),
    };

    legal_moves_from(game_state, from)
        .into_iter()
        .find(|mv| mv.to() == to && mv.promoted().kind() == promotion)
        .ok_or_else(|| MoveParseError::NoSuchMove(text.to_owned()))
}

/// Long algebraic text of `mv`.
#[inline]
pub fn move_to_long_algebraic(mv: Move) -> String {
    mv.to_string()
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{move_to_long_algebraic, parse_long_algebraic};
    use crate::errors::MoveParseError;
    use crate::game_state::chess_types::*;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn long_algebraic_round_trip_simple_move() {
        let mut game_state = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mv = parse_long_algebraic("e2e4", &mut game_state).expect("move should parse");

        assert_eq!(move_to_long_algebraic(mv), "e2e4");
        assert!(mv.is_pawn_start());
    }

    #[test]
    fn long_algebraic_round_trip_promotion() {
        let mut game_state = parse_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let mv = parse_long_algebraic("a7a8q", &mut game_state).expect("move should parse");
        assert_eq!(mv.promoted(), Piece::LightQueen);
        assert_eq!(move_to_long_algebraic(mv), "a7a8q");

        let under = parse_long_algebraic("a7a8N", &mut game_state).expect("move should parse");
        assert_eq!(under.promoted(), Piece::LightKnight);

        assert_eq!(
            parse_long_algebraic("a7a8", &mut game_state),
            Err(MoveParseError::NoSuchMove("a7a8".to_owned()))
        );
    }

    #[test]
    fn long_algebraic_detects_castling_and_en_passant() {
        let mut castle_state =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle_move =
            parse_long_algebraic("e1g1", &mut castle_state).expect("castle should parse");
        assert!(castle_move.is_castling());

        let mut en_passant_state =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let ep_move = parse_long_algebraic("e5d6", &mut en_passant_state)
            .expect("en-passant should parse");
        assert!(ep_move.is_en_passant());
    }

    #[test]
    fn malformed_text_is_rejected() {
        let mut game_state = GameState::new_game();
        assert!(matches!(
            parse_long_algebraic("e2", &mut game_state),
            Err(MoveParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_long_algebraic("e2e9", &mut game_state),
            Err(MoveParseError::InvalidSquare(_))
        ));
        assert!(matches!(
            parse_long_algebraic("e2e4x", &mut game_state),
            Err(MoveParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_long_algebraic("e2e5", &mut game_state),
            Err(MoveParseError::NoSuchMove(_))
        ));
    }
}
