//! Attack detection on the padded mailbox.

use crate::game_state::chess_types::*;
use crate::game_state::squares::{is_on_board, offset};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_square(color), color.opposite())
}

/// Whether any piece of `attacker_color` attacks `square`.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    if !is_on_board(square) {
        return false;
    }

    // Pawns attack diagonally forward, so look one rank behind the target.
    let (pawn, pawn_sources) = match attacker_color {
        Color::Light => (Piece::LightPawn, [-11i8, -9]),
        Color::Dark => (Piece::DarkPawn, [11i8, 9]),
    };
    if pawn_sources
        .iter()
        .any(|&delta| game_state.piece_at(offset(square, delta)) == pawn)
    {
        return true;
    }

    let knight = Piece::from_parts(attacker_color, PieceKind::Knight);
    if KNIGHT_DIRECTIONS
        .iter()
        .any(|&delta| game_state.piece_at(offset(square, delta)) == knight)
    {
        return true;
    }

    let king = Piece::from_parts(attacker_color, PieceKind::King);
    if KING_DIRECTIONS
        .iter()
        .any(|&delta| game_state.piece_at(offset(square, delta)) == king)
    {
        return true;
    }

    let slides_to_attacker = |directions: &[i8], rook_like: bool| {
        directions.iter().any(|&delta| {
            let mut sq = offset(square, delta);
            loop {
                let piece = game_state.piece_at(sq);
                if piece == Piece::OffBoard {
                    return false;
                }
                if piece != Piece::Empty {
                    let info = piece.info();
                    let fits = if rook_like {
                        info.is_rook_or_queen
                    } else {
                        info.is_bishop_or_queen
                    };
                    return fits && info.color == Some(attacker_color);
                }
                sq = offset(sq, delta);
            }
        })
    };

    slides_to_attacker(&ROOK_DIRECTIONS, true) || slides_to_attacker(&BISHOP_DIRECTIONS, false)
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked};
    use crate::game_state::chess_types::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(text: &str) -> Square {
        algebraic_to_square(text).expect("square should parse")
    }

    #[test]
    fn starting_position_attacks() {
        let game = GameState::new_game();
        assert!(is_square_attacked(&game, sq("e3"), Color::Light));
        assert!(is_square_attacked(&game, sq("f3"), Color::Light));
        assert!(!is_square_attacked(&game, sq("e4"), Color::Light));
        assert!(is_square_attacked(&game, sq("f6"), Color::Dark));
        assert!(!is_king_in_check(&game, Color::Light));
    }

    #[test]
    fn sliders_are_blocked_by_first_piece() {
        let game = GameState::from_fen("4k3/8/8/8/1b6/8/3P4/4K2r w - - 0 1")
            .expect("FEN should parse");
        // Rook on h1 hits the king along the rank.
        assert!(is_king_in_check(&game, Color::Light));
        assert!(is_square_attacked(&game, sq("d2"), Color::Dark));
        // The king shields the rest of the rank from the rook.
        assert!(!is_square_attacked(&game, sq("c1"), Color::Dark));

        // Without the rook, the bishop on b4 stops at the pawn on d2.
        let blocked = GameState::from_fen("4k3/8/8/8/1b6/8/3P4/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert!(!is_king_in_check(&blocked, Color::Light));
    }

    #[test]
    fn pawn_attacks_are_directional() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&game, sq("c4"), Color::Dark));
        assert!(is_square_attacked(&game, sq("e4"), Color::Dark));
        assert!(!is_square_attacked(&game, sq("c6"), Color::Dark));
        assert!(!is_square_attacked(&game, sq("d4"), Color::Dark));
    }
}
