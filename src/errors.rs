//! Crate-wide error types.

use thiserror::Error;

use crate::game_state::chess_types::Color;
use crate::moves::move_descriptions::Move;

/// Reasons a position string in Forsyth-Edwards Notation fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("board layout must contain 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} must cover 8 files, found {files}")]
    FileCount { rank: usize, files: usize },
    #[error("invalid piece character '{0}'")]
    InvalidPieceChar(char),
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
    #[error("invalid castling rights '{0}'")]
    InvalidCastling(String),
    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),
    #[error("{0:?} must have exactly one king, found {1}")]
    KingCount(Color, usize),
    #[error("{0:?} is in check but not to move")]
    OpponentInCheck(Color),
    #[error("unexpected trailing field '{0}'")]
    TrailingFields(String),
}

/// Reasons long-algebraic move text does not name a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move text '{0}'")]
    Malformed(String),
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("'{0}' is not a legal move in this position")]
    NoSuchMove(String),
}

/// Errors surfaced by the game session boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    MoveParse(#[from] MoveParseError),
    #[error("move {0} is not legal in the current position")]
    IllegalMove(Move),
    #[error("a search is already running")]
    SearchInProgress,
    #[error("no search is running")]
    NoSearchRunning,
    #[error("search worker disconnected before delivering a result")]
    WorkerDisconnected,
    #[error("no move to undo")]
    NothingToUndo,
    #[error("invalid {name} value '{value}'")]
    InvalidOption { name: String, value: String },
}
