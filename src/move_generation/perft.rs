//! Perft: exhaustive legal-move tree walks used as a move-generator oracle.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{make_move, take_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::move_generation::move_generator::generate_pseudo_legal_moves;
use crate::moves::move_descriptions::Move;

/// Leaf statistics; every field except `nodes` classifies the move that
/// reached the leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    pub fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Count leaf nodes only.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in generate_pseudo_legal_moves(game_state) {
        if !make_move(game_state, mv) {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(game_state, depth - 1) };
        take_move(game_state);
    }
    nodes
}

/// Leaf counts with capture/en-passant/castle/promotion/check breakdown.
pub fn perft_detailed(game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate_pseudo_legal_moves(game_state) {
        if !make_move(game_state, mv) {
            continue;
        }
        if depth == 1 {
            total.merge(classify_leaf(game_state, mv));
        } else {
            total.merge(perft_detailed(game_state, depth - 1));
        }
        take_move(game_state);
    }
    total
}

fn classify_leaf(game_state: &mut GameState, mv: Move) -> PerftCounts {
    let mut counts = PerftCounts {
        nodes: 1,
        ..PerftCounts::default()
    };
    if mv.is_capture() {
        counts.captures = 1;
    }
    if mv.is_en_passant() {
        counts.en_passant = 1;
    }
    if mv.is_castling() {
        counts.castles = 1;
    }
    if mv.is_promotion() {
        counts.promotions = 1;
    }
    if is_king_in_check(game_state, game_state.side_to_move) {
        counts.checks = 1;
        if !has_legal_move(game_state) {
            counts.checkmates = 1;
        }
    }
    counts
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(Move, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }
    for mv in generate_pseudo_legal_moves(game_state) {
        if !make_move(game_state, mv) {
            continue;
        }
        out.push((mv, perft(game_state, depth - 1)));
        take_move(game_state);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn starting_position_node_counts() {
        let mut game = GameState::new_game();
        let key = game.position_key;
        for (depth, expected) in [(1, 20), (2, 400), (3, 8_902), (4, 197_281)] {
            assert_eq!(perft(&mut game, depth), expected, "depth {depth}");
        }
        assert_eq!(game.position_key, key);
        assert!(game.history.is_empty());
    }

    #[test]
    fn starting_position_leaf_breakdown() {
        let mut game = GameState::new_game();
        let d3 = perft_detailed(&mut game, 3);
        assert_eq!(d3.nodes, 8_902);
        assert_eq!(d3.captures, 34);
        assert_eq!(d3.checks, 12);
        assert_eq!(d3.checkmates, 0);

        let d4 = perft_detailed(&mut game, 4);
        assert_eq!(
            d4,
            PerftCounts {
                nodes: 197_281,
                captures: 1_576,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 469,
                checkmates: 8,
            }
        );
    }

    #[test]
    fn kiwipete_counts() {
        let mut game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let d1 = perft_detailed(&mut game, 1);
        assert_eq!(d1.nodes, 48);
        assert_eq!(d1.captures, 8);
        assert_eq!(d1.castles, 2);
        assert_eq!(d1.checks, 0);

        let d2 = perft_detailed(&mut game, 2);
        assert_eq!(
            d2,
            PerftCounts {
                nodes: 2_039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn endgame_position_counts() {
        let mut game = GameState::from_fen(POSITION_3).expect("FEN should parse");
        for (depth, expected) in [(1, 14), (2, 191), (3, 2_812)] {
            assert_eq!(perft(&mut game, depth), expected, "depth {depth}");
        }
    }

    #[test]
    fn divide_sums_to_total() {
        let mut game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let divided = perft_divide(&mut game, 2);
        assert_eq!(divided.len(), 48);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
        assert!(perft_divide(&mut game, 0).is_empty());
    }
}
