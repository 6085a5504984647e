//! Game session: the owned position plus an optional background search.
//!
//! This is the surface a UI or network layer drives. The session owns the
//! authoritative [`GameState`]; a search works on a copy, and every mutating
//! call is refused while one is outstanding so the two never diverge.

use std::time::Duration;

use log::{info, warn};

use crate::errors::EngineError;
use crate::game_state::chess_types::*;
use crate::game_state::game_status::{classify_game_state, GameStatus};
use crate::move_generation::legal_move_apply::{make_move, take_move};
use crate::move_generation::legal_move_generator::{legal_moves, legal_moves_from, move_exists};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::PieceSquareScorer;
use crate::search::iterative_deepening::{SearchConfig, SearchResult};
use crate::search::threading::{SearchCallback, SearchHandle};
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::render_game_state::render_game_state;

#[derive(Debug)]
pub struct GameSession {
    game_state: GameState,
    config: SearchConfig,
    search: Option<SearchHandle>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// New session at the standard starting position.
    pub fn new() -> Self {
        Self::with_state(GameState::new_game())
    }

    pub fn with_state(game_state: GameState) -> Self {
        Self {
            game_state,
            config: SearchConfig::default(),
            search: None,
        }
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    #[inline]
    pub fn search_config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_search_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.search.is_some() {
            return Err(EngineError::SearchInProgress);
        }
        Ok(())
    }

    /// Replace the position. On failure the current position is kept.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.game_state = GameState::from_fen(fen)?;
        Ok(())
    }

    pub fn fen(&self) -> String {
        self.game_state.to_fen()
    }

    pub fn render(&self) -> String {
        render_game_state(&self.game_state)
    }

    /// Apply `mv` if it is legal here; the position is untouched otherwise.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        self.ensure_idle()?;
        if !move_exists(&mut self.game_state, mv) || !make_move(&mut self.game_state, mv) {
            return Err(EngineError::IllegalMove(mv));
        }
        Ok(())
    }

    /// Apply a move given in long algebraic notation, returning the decoded
    /// move.
    pub fn apply_move_str(&mut self, text: &str) -> Result<Move, EngineError> {
        self.ensure_idle()?;
        let mv = parse_long_algebraic(text, &mut self.game_state)?;
        if !make_move(&mut self.game_state, mv) {
            return Err(EngineError::IllegalMove(mv));
        }
        Ok(mv)
    }

    pub fn undo_last_move(&mut self) -> Result<Move, EngineError> {
        self.ensure_idle()?;
        take_move(&mut self.game_state).ok_or(EngineError::NothingToUndo)
    }

    pub fn legal_moves(&mut self) -> Vec<Move> {
        legal_moves(&mut self.game_state)
    }

    pub fn legal_moves_from(&mut self, square: Square) -> Vec<Move> {
        legal_moves_from(&mut self.game_state, square)
    }

    /// Legal moves from a square named in algebraic notation (`"b8"`).
    pub fn legal_moves_from_str(&mut self, square: &str) -> Result<Vec<Move>, EngineError> {
        let square = algebraic_to_square(square)?;
        Ok(self.legal_moves_from(square))
    }

    pub fn classify_game_state(&mut self) -> GameStatus {
        classify_game_state(&mut self.game_state)
    }

    pub fn pieces_snapshot(&self) -> Vec<(Piece, Square)> {
        self.game_state.pieces().collect()
    }

    /// Start a background search with the session's configuration.
    pub fn start_search(&mut self) -> Result<(), EngineError> {
        self.spawn_search(None)
    }

    /// As [`GameSession::start_search`], invoking `callback` on the worker
    /// thread when the result is ready.
    pub fn start_search_with_callback<F>(&mut self, callback: F) -> Result<(), EngineError>
    where
        F: FnOnce(&SearchResult) + Send + 'static,
    {
        self.spawn_search(Some(Box::new(callback)))
    }

    fn spawn_search(&mut self, callback: Option<SearchCallback>) -> Result<(), EngineError> {
        if self.search.is_some() {
            warn!("search requested while another is still running");
            return Err(EngineError::SearchInProgress);
        }
        let mut config = self.config.clone();
        // Each search gets its own flag so a stale stop cannot leak into it.
        config.stop_flag = None;
        info!(
            "starting search: depth {}, budget {:?}, null move {}",
            config.max_depth, config.time_budget, config.use_null_move_cut
        );
        self.search = Some(SearchHandle::spawn(
            self.game_state.clone(),
            PieceSquareScorer,
            config,
            callback,
        ));
        Ok(())
    }

    /// Non-blocking: the result once the worker has finished.
    pub fn poll_search(&mut self) -> Result<Option<SearchResult>, EngineError> {
        let handle = self.search.as_mut().ok_or(EngineError::NoSearchRunning)?;
        match handle.try_result() {
            Ok(None) => Ok(None),
            Ok(Some(result)) => {
                self.search = None;
                Ok(Some(result))
            }
            Err(err) => {
                self.search = None;
                Err(err)
            }
        }
    }

    pub fn wait_for_search(&mut self) -> Result<SearchResult, EngineError> {
        let handle = self.search.take().ok_or(EngineError::NoSearchRunning)?;
        handle.wait()
    }

    /// Stop the running search and return its last completed iteration.
    pub fn cancel_search(&mut self) -> Result<SearchResult, EngineError> {
        let handle = self.search.take().ok_or(EngineError::NoSearchRunning)?;
        handle.cancel()
    }

    /// Set a search option by name: `Depth` (plies), `MoveTime` (ms, 0 for
    /// unbounded) or `NullMove` (boolean). Unknown names are ignored.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let invalid = || EngineError::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        };

        if name.eq_ignore_ascii_case("Depth") {
            let depth = value.trim().parse::<u8>().map_err(|_| invalid())?;
            if depth == 0 {
                return Err(invalid());
            }
            self.config.max_depth = depth;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("MoveTime") {
            let millis = value.trim().parse::<u64>().map_err(|_| invalid())?;
            self.config.time_budget = (millis > 0).then(|| Duration::from_millis(millis));
            return Ok(());
        }
        if name.eq_ignore_ascii_case("NullMove") {
            let v = value.trim().to_ascii_lowercase();
            self.config.use_null_move_cut = match v.as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => return Err(invalid()),
            };
            return Ok(());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::errors::FenError;
    use crate::game_state::game_status::DrawReason;

    #[test]
    fn knight_has_two_developing_moves_after_open_game() {
        let mut session = GameSession::new();
        for text in ["e2e4", "e7e5", "g1f3"] {
            session.apply_move_str(text).expect("move should apply");
        }

        let mut moves: Vec<String> = session
            .legal_moves_from_str("b8")
            .expect("square should parse")
            .iter()
            .map(|mv| mv.to_string())
            .collect();
        moves.sort();
        assert_eq!(moves, vec!["b8a6", "b8c6"]);
    }

    #[test]
    fn bad_position_keeps_current_state() {
        let mut session = GameSession::new();
        session.apply_move_str("d2d4").expect("move should apply");
        let before = session.fen();

        let err = session
            .set_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1")
            .expect_err("seven ranks should fail");
        assert!(matches!(err, EngineError::Fen(_)));
        assert_eq!(session.fen(), before);

        assert!(matches!(
            session.set_position("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(EngineError::Fen(FenError::OpponentInCheck(Color::Dark)))
        ));
        assert_eq!(session.fen(), before);
        assert_eq!(session.legal_moves().len(), 20);

        session
            .set_position(STARTING_POSITION_FEN)
            .expect("start position should load");
        assert_eq!(session.fen(), STARTING_POSITION_FEN);
        assert_eq!(session.pieces_snapshot().len(), 32);
    }

    #[test]
    fn illegal_moves_are_rejected_without_side_effects() {
        let mut session = GameSession::new();
        let before = session.fen();
        assert!(matches!(
            session.apply_move_str("e2e5"),
            Err(EngineError::MoveParse(_))
        ));

        session
            .set_position("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1")
            .expect("FEN should parse");
        let pinned_fen = session.fen();
        assert!(session.apply_move_str("e2c3").is_err());
        assert_eq!(session.fen(), pinned_fen);
        assert_ne!(pinned_fen, before);
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut session = GameSession::new();
        let start = session.fen();
        let mv = session.apply_move_str("g1f3").expect("move should apply");

        assert_eq!(session.undo_last_move().expect("undo should work"), mv);
        assert_eq!(session.fen(), start);
        assert!(matches!(
            session.undo_last_move(),
            Err(EngineError::NothingToUndo)
        ));

        let legal = session.legal_moves();
        assert_eq!(legal.len(), 20);
        session.apply_move(legal[0]).expect("generated move should apply");
    }

    #[test]
    fn draw_classification_through_session() {
        let mut session = GameSession::new();
        for _ in 0..2 {
            for text in ["b1c3", "b8c6", "c3b1", "c6b8"] {
                session.apply_move_str(text).expect("move should apply");
            }
        }
        assert_eq!(
            session.classify_game_state(),
            GameStatus::Draw(DrawReason::Repetition)
        );

        session
            .set_position("8/8/4k3/8/8/8/8/3NK3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(
            session.classify_game_state(),
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        );

        session
            .set_position("4k3/8/8/8/8/8/8/R3K3 w - - 99 70")
            .expect("FEN should parse");
        assert_eq!(session.classify_game_state(), GameStatus::InProgress);
        session.apply_move_str("a1a2").expect("move should apply");
        assert_eq!(
            session.classify_game_state(),
            GameStatus::Draw(DrawReason::FiftyMove)
        );
    }

    #[test]
    fn search_blocks_mutation_until_collected() {
        let mut session = GameSession::new();
        session.set_option("Depth", "3").expect("option should apply");
        session.start_search().expect("search should start");

        assert!(session.is_searching());
        assert!(matches!(
            session.start_search(),
            Err(EngineError::SearchInProgress)
        ));
        assert!(matches!(
            session.apply_move_str("e2e4"),
            Err(EngineError::SearchInProgress)
        ));
        assert_eq!(session.legal_moves().len(), 20);

        let result = session.wait_for_search().expect("search should finish");
        let best = result.best_move.expect("best move should exist");
        assert!(!session.is_searching());
        session.apply_move(best).expect("best move should be legal");
        assert!(matches!(
            session.poll_search(),
            Err(EngineError::NoSearchRunning)
        ));
    }

    #[test]
    fn cancelled_search_still_reports_a_move() {
        let mut session = GameSession::new();
        session.set_option("Depth", "64").expect("option should apply");
        session.set_option("NullMove", "on").expect("option should apply");

        let (tx, rx) = mpsc::channel();
        session
            .start_search_with_callback(move |result| {
                let _ = tx.send(result.stopped);
            })
            .expect("search should start");
        std::thread::sleep(Duration::from_millis(20));

        let result = session.cancel_search().expect("search should stop");
        assert!(result.stopped);
        assert!(result.best_move.is_some());
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    }

    #[test]
    fn options_parse_and_validate() {
        let mut session = GameSession::new();
        session.set_option("depth", "4").expect("option should apply");
        session.set_option("MoveTime", "250").expect("option should apply");
        session.set_option("NullMove", "true").expect("option should apply");
        session.set_option("Ponder", "whatever").expect("unknown options are ignored");

        let config = session.search_config();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.time_budget, Some(Duration::from_millis(250)));
        assert!(config.use_null_move_cut);

        session.set_option("MoveTime", "0").expect("option should apply");
        assert_eq!(session.search_config().time_budget, None);

        assert!(matches!(
            session.set_option("Depth", "deep"),
            Err(EngineError::InvalidOption { .. })
        ));
        assert!(session.set_option("NullMove", "maybe").is_err());
    }
}
