//! Full legal move generation.
//!
//! Pseudo-legal candidates are filtered through `make_move`/`take_move`; the
//! state is borrowed mutably but always handed back unchanged.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{make_move, take_move};
use crate::move_generation::move_generator::{
    generate_pseudo_legal_moves, generate_pseudo_legal_moves_from,
};
use crate::moves::move_descriptions::Move;

fn retain_legal(game_state: &mut GameState, candidates: Vec<Move>) -> Vec<Move> {
    let mut legal = Vec::with_capacity(candidates.len());
    for mv in candidates {
        if make_move(game_state, mv) {
            take_move(game_state);
            legal.push(mv);
        }
    }
    legal
}

/// Every legal move for the side to move.
pub fn legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let candidates = generate_pseudo_legal_moves(game_state);
    retain_legal(game_state, candidates)
}

/// Legal moves of the piece standing on `square`.
pub fn legal_moves_from(game_state: &mut GameState, square: Square) -> Vec<Move> {
    let candidates = generate_pseudo_legal_moves_from(game_state, square);
    retain_legal(game_state, candidates)
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(game_state: &mut GameState) -> bool {
    for mv in generate_pseudo_legal_moves(game_state) {
        if make_move(game_state, mv) {
            take_move(game_state);
            return true;
        }
    }
    false
}

/// Whether `mv` is a legal move in this position.
pub fn move_exists(game_state: &mut GameState, mv: Move) -> bool {
    if mv.is_none() {
        return false;
    }
    let found = generate_pseudo_legal_moves_from(game_state, mv.from())
        .into_iter()
        .any(|candidate| candidate == mv);
    if !found || !make_move(game_state, mv) {
        return false;
    }
    take_move(game_state);
    true
}
