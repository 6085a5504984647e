use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// Single undo record for `make_move` / `take_move`.
///
/// The irreversible fields are restored verbatim from here rather than
/// recomputed. A null move is stored as [`Move::NONE`].
#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub mv: Move,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_fifty_move_counter: u16,

    pub prev_position_key: u64,
}
