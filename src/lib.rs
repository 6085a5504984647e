//! Crate root module declarations for the mailbox chess engine core.
//!
//! The board lives in a padded 10x12 mailbox with incrementally maintained
//! piece lists, pawn bitboards and Zobrist key. On top of it sit pseudo-legal
//! move generation, make/take with a king-safety gate, an iterative-deepening
//! alpha-beta search, and a game session that runs searches on a worker
//! thread.

pub mod errors;

pub mod game_state {
    pub mod bitboard;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod game_status;
    pub mod squares;
    pub mod undo_state;
}

pub mod moves {
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod principal_variation;
    pub mod threading;
    pub mod zobrist;
}

pub mod session {
    pub mod game_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
