//! In-place make/unmake on the incremental game state.
//!
//! `make_move` is the single legality gate: it applies a pseudo-legal move,
//! then undoes it and reports `false` if the mover's king is left attacked.
//! `take_move` restores the irreversible fields and the position key verbatim
//! from the undo record.

use crate::game_state::chess_rules::castle_permission_mask;
use crate::game_state::chess_types::*;
use crate::game_state::squares::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::move_descriptions::Move;
use crate::search::zobrist::{castling_key, en_passant_key, side_to_move_key};

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::Light => offset(to, -10),
        Color::Dark => offset(to, 10),
    }
}

/// Rook relocation `(from, to)` for a castling king landing on `king_to`.
#[inline]
fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// Apply `mv`. Returns `false`, with the state untouched, if the move would
/// leave the mover's king attacked.
pub fn make_move(game_state: &mut GameState, mv: Move) -> bool {
    debug_assert!(game_state.is_valid());

    let from = mv.from();
    let to = mv.to();
    let mover = game_state.side_to_move;

    debug_assert!(game_state.piece_at(from).color() == Some(mover));

    let prev_position_key = game_state.position_key;

    if mv.is_en_passant() {
        game_state.clear_piece(en_passant_victim_square(mover, to));
    } else if mv.is_castling() {
        if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
            game_state.move_piece(rook_from, rook_to);
        }
    }

    if let Some(ep) = game_state.en_passant_square {
        game_state.position_key ^= en_passant_key(ep);
    }
    game_state.position_key ^= castling_key(game_state.castling_rights);

    game_state.history.push(UndoState {
        mv,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_fifty_move_counter: game_state.fifty_move_counter,
        prev_position_key,
    });

    game_state.castling_rights &= castle_permission_mask(from) & castle_permission_mask(to);
    game_state.en_passant_square = None;
    game_state.position_key ^= castling_key(game_state.castling_rights);

    game_state.fifty_move_counter += 1;
    let captured = mv.captured();
    if captured.is_piece() {
        game_state.clear_piece(to);
        game_state.fifty_move_counter = 0;
    }

    game_state.ply += 1;

    if game_state.piece_at(from).info().is_pawn {
        game_state.fifty_move_counter = 0;
        if mv.is_pawn_start() {
            let ep = match mover {
                Color::Light => offset(from, 10),
                Color::Dark => offset(from, -10),
            };
            game_state.en_passant_square = Some(ep);
            game_state.position_key ^= en_passant_key(ep);
        }
    }

    game_state.move_piece(from, to);

    let promoted = mv.promoted();
    if promoted.is_piece() {
        game_state.clear_piece(to);
        game_state.add_piece(to, promoted);
    }

    if mover == Color::Dark {
        game_state.fullmove_number += 1;
    }
    game_state.side_to_move = mover.opposite();
    game_state.position_key ^= side_to_move_key();

    debug_assert!(game_state.is_valid());

    if is_square_attacked(game_state, game_state.king_square(mover), mover.opposite()) {
        take_move(game_state);
        return false;
    }

    true
}

/// Reverse the most recent `make_move`. Returns the move undone, or `None`
/// when the history is empty.
pub fn take_move(game_state: &mut GameState) -> Option<Move> {
    let undo = game_state.history.pop()?;
    let mv = undo.mv;
    if mv.is_none() {
        game_state.history.push(undo);
        take_null_move(game_state);
        return Some(Move::NONE);
    }

    game_state.ply = game_state.ply.saturating_sub(1);

    let from = mv.from();
    let to = mv.to();
    let mover = game_state.side_to_move.opposite();

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.fifty_move_counter = undo.prev_fifty_move_counter;
    game_state.side_to_move = mover;
    if mover == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_sub(1);
    }

    if mv.is_en_passant() {
        let pawn = Piece::from_parts(mover.opposite(), PieceKind::Pawn);
        game_state.add_piece(en_passant_victim_square(mover, to), pawn);
    } else if mv.is_castling() {
        if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
            game_state.move_piece(rook_to, rook_from);
        }
    }

    game_state.move_piece(to, from);

    let captured = mv.captured();
    if captured.is_piece() {
        game_state.add_piece(to, captured);
    }

    if mv.promoted().is_piece() {
        game_state.clear_piece(from);
        game_state.add_piece(from, Piece::from_parts(mover, PieceKind::Pawn));
    }

    game_state.position_key = undo.prev_position_key;

    debug_assert!(game_state.is_valid());

    Some(mv)
}

/// Pass the turn: flip side and clear en passant. Recorded in the history as
/// [`Move::NONE`].
pub fn make_null_move(game_state: &mut GameState) {
    debug_assert!(game_state.is_valid());

    game_state.history.push(UndoState {
        mv: Move::NONE,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_fifty_move_counter: game_state.fifty_move_counter,
        prev_position_key: game_state.position_key,
    });

    if let Some(ep) = game_state.en_passant_square.take() {
        game_state.position_key ^= en_passant_key(ep);
    }
    game_state.ply += 1;
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.position_key ^= side_to_move_key();

    debug_assert!(game_state.is_valid());
}

pub fn take_null_move(game_state: &mut GameState) {
    let Some(undo) = game_state.history.pop() else {
        return;
    };
    debug_assert!(undo.mv.is_none());

    game_state.ply = game_state.ply.saturating_sub(1);
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.fifty_move_counter = undo.prev_fifty_move_counter;
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.position_key = undo.prev_position_key;

    debug_assert!(game_state.is_valid());
}
