//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. The padded `squares`
//! array is canonical; piece lists, pawn bitboards, material totals, piece
//! counts, cached king squares and the position key are derived from it and
//! kept in lock-step by the `add_piece`/`clear_piece`/`move_piece` primitives
//! used by move application.

use log::error;

use crate::errors::FenError;
use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_rules::{
    FIFTY_MOVE_LIMIT, REPETITION_LIMIT, STARTING_POSITION_FEN,
};
use crate::game_state::chess_types::*;
use crate::game_state::squares::*;
use crate::search::zobrist::{compute_zobrist_key, piece_square_key};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Index of the combined pawn bitboard in [`GameState::pawns`].
pub const BOTH_SIDES: usize = 2;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone)]
pub struct GameState {
    // --- Mailbox representation ---
    pub squares: [Piece; PADDED_BOARD_SQUARES],

    // --- Derived caches ---
    // [light, dark, both], dense square indices.
    pub pawns: [Bitboard; 3],
    pub king_square: [Square; 2],
    pub piece_locations: [Vec<Square>; PIECE_COUNT],
    pub material_score: [i32; 2],
    pub big_pieces: [u8; 2],
    pub major_pieces: [u8; 2],
    pub minor_pieces: [u8; 2],

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub fifty_move_counter: u16,
    pub fullmove_number: u16,
    /// Half-moves made since the search root.
    pub ply: usize,

    // --- Incremental hashing ---
    pub position_key: u64,

    // --- Make/unmake stack ---
    pub history: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        let mut squares = [Piece::OffBoard; PADDED_BOARD_SQUARES];
        for sq in playable_squares() {
            squares[sq as usize] = Piece::Empty;
        }

        Self {
            squares,

            pawns: [Bitboard::EMPTY; 3],
            king_square: [NO_SQUARE; 2],
            piece_locations: Default::default(),
            material_score: [0; 2],
            big_pieces: [0; 2],
            major_pieces: [0; 2],
            minor_pieces: [0; 2],

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            fifty_move_counter: 0,
            fullmove_number: 1,
            ply: 0,

            position_key: 0,

            history: Vec::new(),
        }
    }
}

impl GameState {
    /// Empty board, light to move, no rights.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.squares
            .get(sq as usize)
            .copied()
            .unwrap_or(Piece::OffBoard)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    /// Every piece on the board with its square, in dense square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        playable_squares()
            .map(|sq| (self.piece_at(sq), sq))
            .filter(|(piece, _)| piece.is_piece())
    }

    #[inline]
    pub fn history(&self) -> &[UndoState] {
        &self.history
    }

    /// Place `piece` on an empty square, updating every derived structure.
    pub(crate) fn add_piece(&mut self, sq: Square, piece: Piece) {
        let info = piece.info();
        let Some(color) = info.color else {
            return;
        };
        let side = color.index();

        self.position_key ^= piece_square_key(piece, sq);
        self.squares[sq as usize] = piece;

        if info.is_pawn {
            self.pawns[side].set_square(sq64(sq));
            self.pawns[BOTH_SIDES].set_square(sq64(sq));
        } else {
            self.big_pieces[side] += 1;
            if info.is_major {
                self.major_pieces[side] += 1;
            }
            if info.is_minor {
                self.minor_pieces[side] += 1;
            }
        }
        if info.is_king {
            self.king_square[side] = sq;
        }

        self.material_score[side] += info.value;
        self.piece_locations[piece.index()].push(sq);
    }

    /// Remove whatever piece stands on `sq`.
    pub(crate) fn clear_piece(&mut self, sq: Square) {
        let piece = self.piece_at(sq);
        let info = piece.info();
        let Some(color) = info.color else {
            return;
        };
        let side = color.index();

        self.position_key ^= piece_square_key(piece, sq);
        self.squares[sq as usize] = Piece::Empty;

        if info.is_pawn {
            self.pawns[side].clear_square(sq64(sq));
            self.pawns[BOTH_SIDES].clear_square(sq64(sq));
        } else {
            self.big_pieces[side] -= 1;
            if info.is_major {
                self.major_pieces[side] -= 1;
            }
            if info.is_minor {
                self.minor_pieces[side] -= 1;
            }
        }

        self.material_score[side] -= info.value;
        let locations = &mut self.piece_locations[piece.index()];
        if let Some(index) = locations.iter().position(|&s| s == sq) {
            locations.swap_remove(index);
        }
    }

    /// Move the piece on `from` to the empty square `to`.
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.piece_at(from);
        let info = piece.info();
        let Some(color) = info.color else {
            return;
        };
        let side = color.index();

        self.position_key ^= piece_square_key(piece, from);
        self.squares[from as usize] = Piece::Empty;
        self.position_key ^= piece_square_key(piece, to);
        self.squares[to as usize] = piece;

        if info.is_pawn {
            for board in [side, BOTH_SIDES] {
                self.pawns[board].clear_square(sq64(from));
                self.pawns[board].set_square(sq64(to));
            }
        }
        if info.is_king {
            self.king_square[side] = to;
        }

        if let Some(slot) = self.piece_locations[piece.index()]
            .iter_mut()
            .find(|s| **s == from)
        {
            *slot = to;
        }
    }

    /// Recompute every derived structure from `squares` and the state flags.
    pub(crate) fn rebuild_derived_state(&mut self) {
        let squares = self.squares;

        self.pawns = [Bitboard::EMPTY; 3];
        self.king_square = [NO_SQUARE; 2];
        self.piece_locations = Default::default();
        self.material_score = [0; 2];
        self.big_pieces = [0; 2];
        self.major_pieces = [0; 2];
        self.minor_pieces = [0; 2];

        for sq in playable_squares() {
            self.squares[sq as usize] = Piece::Empty;
            let piece = squares[sq as usize];
            if piece.is_piece() {
                self.add_piece(sq, piece);
            }
        }

        self.position_key = compute_zobrist_key(self);
    }

    /// True when the current position already occurred since the last
    /// capture or pawn move. The previous ply is skipped since the side to
    /// move differs there.
    pub fn has_repetition(&self) -> bool {
        let len = self.history.len();
        let start = len.saturating_sub(self.fifty_move_counter as usize);
        let end = len.saturating_sub(1);
        self.history[start.min(end)..end]
            .iter()
            .any(|undo| undo.prev_position_key == self.position_key)
    }

    /// Occurrences of the current position since the last irreversible move,
    /// the current one included.
    pub fn repetition_count(&self) -> usize {
        let len = self.history.len();
        let start = len.saturating_sub(self.fifty_move_counter as usize);
        1 + self.history[start..]
            .iter()
            .filter(|undo| undo.prev_position_key == self.position_key)
            .count()
    }

    #[inline]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= REPETITION_LIMIT
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.fifty_move_counter >= FIFTY_MOVE_LIMIT
    }

    /// No pawns, rooks or queens, and at most one minor piece per side.
    pub fn is_insufficient_material(&self) -> bool {
        if !self.pawns[BOTH_SIDES].is_empty() {
            return false;
        }
        let heavy = [
            Piece::LightRook,
            Piece::DarkRook,
            Piece::LightQueen,
            Piece::DarkQueen,
        ];
        if heavy
            .iter()
            .any(|piece| !self.piece_locations[piece.index()].is_empty())
        {
            return false;
        }
        self.minor_pieces.iter().all(|&count| count <= 1)
    }

    /// Cross-check every derived structure against `squares`, reporting the
    /// first mismatch.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut expected = GameState::default();
        expected.squares = self.squares;
        expected.side_to_move = self.side_to_move;
        expected.castling_rights = self.castling_rights;
        expected.en_passant_square = self.en_passant_square;
        expected.rebuild_derived_state();

        for piece in Piece::ALL {
            let mut have = self.piece_locations[piece.index()].clone();
            let mut want = expected.piece_locations[piece.index()].clone();
            have.sort_unstable();
            want.sort_unstable();
            if have != want {
                return Err(format!(
                    "piece list for {piece:?} is {have:?}, board has {want:?}"
                ));
            }
        }

        for (side, color) in [Color::Light, Color::Dark].into_iter().enumerate() {
            let pawn = Piece::from_parts(color, PieceKind::Pawn);
            let pawns = self.pawns[side];
            let count = pawns.count() as usize;
            if count != self.piece_locations[pawn.index()].len() {
                return Err(format!(
                    "{color:?} pawn bitboard holds {count} pawns, list holds {}",
                    self.piece_locations[pawn.index()].len()
                ));
            }
            for dense in pawns.squares() {
                if self.piece_at(sq120(dense)) != pawn {
                    return Err(format!("{color:?} pawn bitboard marks empty square {dense}"));
                }
            }
        }
        if self.pawns[BOTH_SIDES].0 != self.pawns[0].0 | self.pawns[1].0 {
            return Err("combined pawn bitboard out of sync".to_owned());
        }

        if self.material_score != expected.material_score {
            return Err(format!(
                "material {:?}, recomputed {:?}",
                self.material_score, expected.material_score
            ));
        }
        if self.big_pieces != expected.big_pieces
            || self.major_pieces != expected.major_pieces
            || self.minor_pieces != expected.minor_pieces
        {
            return Err("piece category counts out of sync".to_owned());
        }

        for color in [Color::Light, Color::Dark] {
            let king = Piece::from_parts(color, PieceKind::King);
            if self.piece_at(self.king_square(color)) != king {
                return Err(format!(
                    "cached {color:?} king square {} holds {:?}",
                    self.king_square(color),
                    self.piece_at(self.king_square(color))
                ));
            }
        }

        if let Some(ep) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Color::Light => RANK_6,
                Color::Dark => RANK_3,
            };
            if rank_of(ep) != expected_rank {
                return Err(format!("en-passant square {ep} on wrong rank"));
            }
        }

        if self.position_key != expected.position_key {
            return Err(format!(
                "position key {:#018x}, recomputed {:#018x}",
                self.position_key, expected.position_key
            ));
        }

        Ok(())
    }

    /// Invariant self-test. Logs the first mismatch at error level.
    pub fn is_valid(&self) -> bool {
        match self.check_invariants() {
            Ok(()) => true,
            Err(reason) => {
                error!("game state invariant violated: {reason}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_derived_state() {
        let game = GameState::new_game();
        assert!(game.is_valid());
        assert_eq!(game.king_square(Color::Light), E1);
        assert_eq!(game.king_square(Color::Dark), E8);
        assert_eq!(game.pawns[BOTH_SIDES].count(), 16);
        assert_eq!(game.big_pieces, [8, 8]);
        assert_eq!(game.major_pieces, [4, 4]);
        assert_eq!(game.minor_pieces, [4, 4]);
        assert_eq!(game.material_score[0], game.material_score[1]);
        assert_eq!(game.material_score[0], 8 * 100 + 2 * 325 + 2 * 325 + 2 * 550 + 1000 + 50000);
        assert_eq!(game.pieces().count(), 32);
        assert_eq!(game.piece_at(0), Piece::OffBoard);
    }

    #[test]
    fn primitives_keep_caches_in_sync() {
        let mut game = GameState::new_game();
        game.clear_piece(square_from_file_rank(3, 1));
        game.move_piece(D1, square_from_file_rank(3, 4));
        game.add_piece(square_from_file_rank(3, 1), Piece::LightKnight);
        assert!(game.check_invariants().is_ok());
        assert_eq!(game.piece_locations[Piece::LightQueen.index()], vec![square_from_file_rank(3, 4)]);
        assert_eq!(game.minor_pieces[0], 5);
    }

    #[test]
    fn corrupted_cache_is_reported() {
        let mut game = GameState::new_game();
        game.material_score[1] += 1;
        assert!(game.check_invariants().is_err());

        let mut game = GameState::new_game();
        game.position_key ^= 1;
        assert!(!game.is_valid());
    }

    #[test]
    fn insufficient_material_cases() {
        let kn_v_k = GameState::from_fen("4k3/8/8/8/8/8/8/3NK3 w - - 0 1").expect("FEN should parse");
        assert!(kn_v_k.is_insufficient_material());

        let kb_v_kn = GameState::from_fen("4kn2/8/8/8/8/8/8/3BK3 w - - 0 1").expect("FEN should parse");
        assert!(kb_v_kn.is_insufficient_material());

        let knn_v_k = GameState::from_fen("4k3/8/8/8/8/8/8/2NNK3 w - - 0 1").expect("FEN should parse");
        assert!(!knn_v_k.is_insufficient_material());

        let kp_v_k = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!kp_v_k.is_insufficient_material());
    }

    #[test]
    fn fifty_move_counter_threshold() {
        let fresh = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").expect("FEN should parse");
        assert!(!fresh.is_fifty_move_draw());
        let stale = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").expect("FEN should parse");
        assert!(stale.is_fifty_move_draw());
    }

    #[test]
    fn repetition_window_stops_at_last_pawn_move() {
        use crate::move_generation::legal_move_apply::make_move;
        use crate::utils::long_algebraic::parse_long_algebraic;

        fn play(game: &mut GameState, moves: &[&str]) {
            for text in moves {
                let mv = parse_long_algebraic(text, game).expect("move should parse");
                assert!(make_move(game, mv), "{text} should be legal");
            }
        }

        let mut game = GameState::new_game();

        play(&mut game, &["g1f3", "g8f6", "f3g1"]);
        assert!(!game.has_repetition());
        play(&mut game, &["f6g8"]);
        assert!(game.has_repetition());
        assert_eq!(game.repetition_count(), 2);

        play(&mut game, &["e2e4"]);
        assert!(!game.has_repetition());
        assert_eq!(game.repetition_count(), 1);

        play(&mut game, &["g8f6", "g1f3", "f6g8", "f3g1"]);
        assert!(game.has_repetition());

        play(&mut game, &["a7a6", "g1f3", "a6a5", "f3g1"]);
        assert_eq!(game.fifty_move_counter, 1);
        assert!(!game.has_repetition());
    }
}
