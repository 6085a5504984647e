//! Game-over classification for the position on the board.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    FiftyMove,
    Repetition,
    InsufficientMaterial,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    Draw(DrawReason),
    Mate { winner: Color },
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Draw reason, counting stalemate as a draw.
    pub fn draw_reason(self) -> Option<DrawReason> {
        match self {
            GameStatus::Draw(reason) => Some(reason),
            GameStatus::Stalemate => Some(DrawReason::Stalemate),
            GameStatus::InProgress | GameStatus::Mate { .. } => None,
        }
    }
}

/// Classify `game_state`. Mate and stalemate take precedence over the
/// fifty-move, repetition and material draws.
pub fn classify_game_state(game_state: &mut GameState) -> GameStatus {
    let side = game_state.side_to_move;
    if !has_legal_move(game_state) {
        return if is_king_in_check(game_state, side) {
            GameStatus::Mate {
                winner: side.opposite(),
            }
        } else {
            GameStatus::Stalemate
        };
    }

    if game_state.is_fifty_move_draw() {
        GameStatus::Draw(DrawReason::FiftyMove)
    } else if game_state.is_threefold_repetition() {
        GameStatus::Draw(DrawReason::Repetition)
    } else if game_state.is_insufficient_material() {
        GameStatus::Draw(DrawReason::InsufficientMaterial)
    } else {
        GameStatus::InProgress
    }
}
