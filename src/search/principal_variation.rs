//! Principal-variation storage keyed by position hash.
//!
//! Written on alpha improvement, read back to seed move ordering and to walk
//! the best line from the root.

use std::collections::HashMap;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{make_move, take_move};
use crate::move_generation::legal_move_generator::move_exists;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Default)]
pub struct PrincipalVariationTable {
    entries: HashMap<u64, Move>,
}

impl PrincipalVariationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn store(&mut self, position_key: u64, mv: Move) {
        self.entries.insert(position_key, mv.with_score(0));
    }

    #[inline]
    pub fn probe(&self, position_key: u64) -> Option<Move> {
        self.entries.get(&position_key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follow stored moves from the current position, up to `max_len` plies.
    /// Stops at the first missing or no-longer-legal entry; the state is
    /// restored before returning.
    pub fn extract_line(&self, game_state: &mut GameState, max_len: usize) -> Vec<Move> {
        let mut line = Vec::new();

        while line.len() < max_len {
            let Some(mv) = self.probe(game_state.position_key) else {
                break;
            };
            if !move_exists(game_state, mv) || !make_move(game_state, mv) {
                break;
            }
            line.push(mv);
        }

        for _ in 0..line.len() {
            take_move(game_state);
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::long_algebraic::parse_long_algebraic;

    #[test]
    fn line_follows_stored_moves_and_restores_state() {
        let mut game = GameState::new_game();
        let fen = game.to_fen();
        let mut table = PrincipalVariationTable::new();

        let mut expected = Vec::new();
        for text in ["e2e4", "e7e5", "g1f3"] {
            let mv = parse_long_algebraic(text, &mut game).expect("move should parse");
            table.store(game.position_key, mv);
            assert!(make_move(&mut game, mv));
            expected.push(mv);
        }
        for _ in 0..expected.len() {
            take_move(&mut game);
        }

        assert_eq!(table.extract_line(&mut game, 10), expected);
        assert_eq!(table.extract_line(&mut game, 2), expected[..2].to_vec());
        assert_eq!(game.to_fen(), fen);
        assert!(game.history.is_empty());
    }

    #[test]
    fn stale_entry_ends_the_line() {
        let mut game = GameState::new_game();
        let mut table = PrincipalVariationTable::new();
        let mut other = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        let rook_move = parse_long_algebraic("a1a8", &mut other).expect("move should parse");
        table.store(game.position_key, rook_move);
        assert!(table.extract_line(&mut game, 4).is_empty());
        assert_eq!(table.len(), 1);
    }
}
