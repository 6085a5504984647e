//! Background search worker.
//!
//! A search runs on its own thread against a private copy of the position.
//! The caller keeps a [`SearchHandle`] that can raise the shared stop flag,
//! poll for the result without blocking, or block until it arrives. The
//! worker always delivers a result, cancelled or not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::errors::EngineError;
use crate::game_state::chess_types::*;
use crate::search::board_scoring::BoardScorer;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};

/// Invoked on the worker thread once the search has finished.
pub type SearchCallback = Box<dyn FnOnce(&SearchResult) + Send + 'static>;

#[derive(Debug)]
pub struct SearchHandle {
    stop_flag: Arc<AtomicBool>,
    receiver: Receiver<SearchResult>,
    worker: Option<JoinHandle<()>>,
}

impl SearchHandle {
    /// Start searching `game_state` on a new thread.
    ///
    /// If `config` carries no stop flag a fresh one is installed; either way
    /// [`SearchHandle::request_stop`] raises the flag the search polls.
    pub fn spawn<S>(
        mut game_state: GameState,
        scorer: S,
        mut config: SearchConfig,
        callback: Option<SearchCallback>,
    ) -> Self
    where
        S: BoardScorer + 'static,
    {
        let stop_flag = config
            .stop_flag
            .get_or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone();
        let (sender, receiver) = mpsc::channel();

        let worker = thread::spawn(move || {
            debug!("search worker started (max depth {})", config.max_depth);
            let result = iterative_deepening_search(&mut game_state, scorer, &config);
            if let Some(callback) = callback {
                callback(&result);
            }
            // The handle may already be gone; nobody is left to tell.
            let _ = sender.send(result);
        });

        Self {
            stop_flag,
            receiver,
            worker: Some(worker),
        }
    }

    /// Ask the worker to stop at its next poll.
    #[inline]
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |worker| worker.is_finished())
    }

    /// Non-blocking poll. `Ok(None)` while the worker is still searching.
    pub fn try_result(&mut self) -> Result<Option<SearchResult>, EngineError> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join_worker();
                Ok(Some(result))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.join_worker();
                Err(EngineError::WorkerDisconnected)
            }
        }
    }

    /// Block until the worker delivers its result.
    pub fn wait(mut self) -> Result<SearchResult, EngineError> {
        let result = self
            .receiver
            .recv()
            .map_err(|_| EngineError::WorkerDisconnected);
        self.join_worker();
        result
    }

    /// Raise the stop flag and wait for the last completed iteration.
    pub fn cancel(self) -> Result<SearchResult, EngineError> {
        self.request_stop();
        self.wait()
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            // A panicking worker already dropped its sender; the caller sees
            // that as WorkerDisconnected.
            let _ = worker.join();
        }
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.request_stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::search::board_scoring::PieceSquareScorer;

    #[test]
    fn worker_delivers_fixed_depth_result() {
        let game = GameState::new_game();
        let handle = SearchHandle::spawn(
            game,
            PieceSquareScorer,
            SearchConfig {
                max_depth: 3,
                ..SearchConfig::default()
            },
            None,
        );
        let result = handle.wait().expect("worker should deliver");
        assert_eq!(result.reached_depth, 3);
        assert!(result.best_move.is_some());
        assert!(!result.stopped);
    }

    #[test]
    fn stop_request_interrupts_deep_search() {
        let game = GameState::new_game();
        let handle = SearchHandle::spawn(
            game,
            PieceSquareScorer,
            SearchConfig {
                max_depth: 64,
                ..SearchConfig::default()
            },
            None,
        );
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.stop_requested());

        let result = handle.cancel().expect("worker should deliver");
        assert!(result.stopped);
        assert!(result.reached_depth < 64);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn polling_eventually_yields_result_and_callback_fires() {
        let (tx, rx) = mpsc::channel();
        let callback: SearchCallback = Box::new(move |result: &SearchResult| {
            let _ = tx.send(result.best_move);
        });
        let game = GameState::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").expect("FEN should parse");
        let mut handle = SearchHandle::spawn(
            game,
            PieceSquareScorer,
            SearchConfig {
                max_depth: 2,
                ..SearchConfig::default()
            },
            Some(callback),
        );

        let result = loop {
            if let Some(result) = handle.try_result().expect("worker should stay connected") {
                break result;
            }
            thread::sleep(Duration::from_millis(1));
        };
        assert!(handle.is_finished());

        let from_callback = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("callback should run");
        assert_eq!(from_callback, result.best_move);
        assert_eq!(
            result.best_move.map(|mv| mv.to_string()),
            Some("d1d5".to_owned())
        );
    }
}
