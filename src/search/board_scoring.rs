//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::chess_types::*;
use crate::game_state::squares::sq64;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[inline]
fn from_side_to_move(game_state: &GameState, light_minus_dark: i32) -> i32 {
    match game_state.side_to_move {
        Color::Light => light_minus_dark,
        Color::Dark => -light_minus_dark,
    }
}

/// Material balance only, from the incrementally maintained totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let [light, dark] = game_state.material_score;
        from_side_to_move(game_state, light - dark)
    }
}

// Piece-square tables, dense index, a1 first, from light's point of view.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    10, 10,  0,-10,-10,  0, 10, 10,
     5,  0,  0,  5,  5,  0,  0,  5,
     0,  0, 10, 20, 20, 10,  0,  0,
     5,  5,  5, 10, 10,  5,  5,  5,
    10, 10, 10, 20, 20, 10, 10, 10,
    20, 20, 20, 30, 30, 20, 20, 20,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
     0,-10,  0,  0,  0,  0,-10,  0,
     0,  0,  0,  5,  5,  0,  0,  0,
     0,  0, 10, 10, 10, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  5,  0,
     5, 10, 15, 20, 20, 15, 10,  5,
     5, 10, 10, 20, 20, 10, 10,  5,
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
     0,  0,-10,  0,  0,-10,  0,  0,
     0,  0,  0, 10, 10,  0,  0,  0,
     0,  0, 10, 15, 15, 10,  0,  0,
     0, 10, 15, 20, 20, 15, 10,  0,
     0, 10, 15, 20, 20, 15, 10,  0,
     0,  0, 10, 15, 15, 10,  0,  0,
     0,  0,  0, 10, 10,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  5, 10, 10,  5,  0,  0,
     0,  0,  5, 10, 10,  5,  0,  0,
    25, 25, 25, 25, 25, 25, 25, 25,
     0,  0,  5, 10, 10,  5,  0,  0,
];

/// Same file, opposite rank: dark pieces read the light tables through this.
#[inline]
const fn mirror(dense: u8) -> u8 {
    dense ^ 56
}

/// Material plus pawn/knight/bishop/rook placement tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    fn placement(game_state: &GameState, kind: PieceKind, table: &[i32; 64]) -> i32 {
        let light = Piece::from_parts(Color::Light, kind);
        let dark = Piece::from_parts(Color::Dark, kind);

        let light_sum: i32 = game_state.piece_locations[light.index()]
            .iter()
            .map(|&sq| table[sq64(sq) as usize])
            .sum();
        let dark_sum: i32 = game_state.piece_locations[dark.index()]
            .iter()
            .map(|&sq| table[mirror(sq64(sq)) as usize])
            .sum();

        light_sum - dark_sum
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let [light, dark] = game_state.material_score;
        let light_minus_dark = light - dark
            + Self::placement(game_state, PieceKind::Pawn, &PAWN_TABLE)
            + Self::placement(game_state, PieceKind::Knight, &KNIGHT_TABLE)
            + Self::placement(game_state, PieceKind::Bishop, &BISHOP_TABLE)
            + Self::placement(game_state, PieceKind::Rook, &ROOK_TABLE);

        from_side_to_move(game_state, light_minus_dark)
    }
}

#[cfg(test)]
mod tests {
    use super::{mirror, BoardScorer, MaterialScorer, PieceSquareScorer};
    use crate::game_state::chess_types::GameState;

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let white_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").expect("FEN should parse");
        let black_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1").expect("FEN should parse");

        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&white_to_move), 1000);
        assert_eq!(scorer.score(&black_to_move), -1000);
    }

    #[test]
    fn starting_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(PieceSquareScorer.score(&game), 0);
    }

    #[test]
    fn mirrored_positions_score_the_same_for_the_mover() {
        let light = GameState::from_fen("4k3/8/8/3N4/8/8/1P6/4K3 w - - 0 1").expect("FEN should parse");
        let dark = GameState::from_fen("4k3/1p6/8/8/3n4/8/8/4K3 b - - 0 1").expect("FEN should parse");
        assert_eq!(PieceSquareScorer.score(&light), PieceSquareScorer.score(&dark));
        assert_eq!(mirror(0), 56);
        assert_eq!(mirror(63), 7);
    }

    #[test]
    fn piece_square_scorer_rewards_central_knight() {
        let center =
            GameState::from_fen("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rim = GameState::from_fen("4k3/8/8/8/8/8/N7/4K3 w - - 0 1").expect("FEN should parse");
        let scorer = PieceSquareScorer;
        assert!(
            scorer.score(&center) > scorer.score(&rim),
            "central knight should score better"
        );
    }
}
