//! Iterative deepening search with alpha-beta pruning and quiescence.
//!
//! Each depth is searched in full from the root with an open window; the
//! principal variation of a completed depth is read back from the PV table
//! before the next one starts. A depth interrupted by the deadline or the stop
//! flag is discarded, so the result always comes from the last completed
//! iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{
    make_move, make_null_move, take_move, take_null_move,
};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::move_generation::move_generator::{
    generate_pseudo_legal_captures, generate_pseudo_legal_moves_with,
};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::{SearchHeuristics, PV_MOVE_SCORE};
use crate::search::principal_variation::PrincipalVariationTable;

pub const INFINITE: i32 = 30_000;
pub const MATE: i32 = 29_000;

/// Hard ply limit; deeper nodes return the static evaluation.
pub const MAX_SEARCH_DEPTH: usize = 64;

/// Scores beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE - MAX_SEARCH_DEPTH as i32;

/// Nodes between deadline/stop-flag polls.
const CHECK_UP_INTERVAL: u64 = 2048;

const NULL_MOVE_MIN_DEPTH: u8 = 4;
const NULL_MOVE_REDUCTION: u8 = 4;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Wall-clock budget; `None` searches to `max_depth`.
    pub time_budget: Option<Duration>,
    pub use_null_move_cut: bool,
    /// External cancellation token, polled alongside the deadline.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            time_budget: None,
            use_null_move_cut: false,
            stop_flag: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub principal_variation: Vec<Move>,
    pub nodes: u64,
    pub fail_high: u64,
    pub fail_high_first: u64,
    pub null_cuts: u64,
    pub elapsed_ms: u64,
    /// True when the deadline or stop flag ended the search early.
    pub stopped: bool,
}

impl SearchResult {
    /// Share of beta cutoffs produced by the first move searched.
    pub fn ordering_ratio(&self) -> f64 {
        if self.fail_high == 0 {
            0.0
        } else {
            self.fail_high_first as f64 / self.fail_high as f64
        }
    }
}

/// Alpha-beta searcher owning the per-search tables.
pub struct Searcher<S: BoardScorer> {
    scorer: S,
    heuristics: SearchHeuristics,
    pv_table: PrincipalVariationTable,
    deadline: Option<Instant>,
    stop_flag: Option<Arc<AtomicBool>>,
    use_null_move_cut: bool,
    stopped: bool,
    nodes: u64,
    fail_high: u64,
    fail_high_first: u64,
    null_cuts: u64,
}

impl<S: BoardScorer> Searcher<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            heuristics: SearchHeuristics::new(),
            pv_table: PrincipalVariationTable::new(),
            deadline: None,
            stop_flag: None,
            use_null_move_cut: false,
            stopped: false,
            nodes: 0,
            fail_high: 0,
            fail_high_first: 0,
            null_cuts: 0,
        }
    }

    fn clear_for_search(&mut self, config: &SearchConfig, started: Instant) {
        self.heuristics.clear();
        self.pv_table.clear();
        self.deadline = config.time_budget.map(|budget| started + budget);
        self.stop_flag = config.stop_flag.clone();
        self.use_null_move_cut = config.use_null_move_cut;
        self.stopped = false;
        self.nodes = 0;
        self.fail_high = 0;
        self.fail_high_first = 0;
        self.null_cuts = 0;
    }

    fn check_up(&mut self) {
        if let Some(limit) = self.deadline {
            if Instant::now() >= limit {
                self.stopped = true;
            }
        }
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                self.stopped = true;
            }
        }
    }

    /// Search `game_state` by iterative deepening. The state is returned
    /// unchanged.
    pub fn search(&mut self, game_state: &mut GameState, config: &SearchConfig) -> SearchResult {
        let started = Instant::now();
        self.clear_for_search(config, started);

        let saved_ply = game_state.ply;
        game_state.ply = 0;

        let mut result = SearchResult {
            best_score: self.scorer.score(game_state),
            ..SearchResult::default()
        };

        let max_depth = config.max_depth.min(MAX_SEARCH_DEPTH as u8);
        for depth in 1..=max_depth {
            let score = self.alpha_beta(game_state, -INFINITE, INFINITE, depth, true);
            if self.stopped {
                break;
            }

            let line = self.pv_table.extract_line(game_state, depth as usize);
            result.best_move = line.first().copied();
            result.best_score = score;
            result.reached_depth = depth;
            result.principal_variation = line;

            debug!(
                "depth {} score {} move {} nodes {} pv {} ordering {:.2}",
                depth,
                score,
                result.best_move.unwrap_or(Move::NONE),
                self.nodes,
                format_line(&result.principal_variation),
                ratio(self.fail_high_first, self.fail_high),
            );
        }

        // Nothing completed (or the root had an empty PV): fall back to the
        // first legal move so callers always get one when it exists.
        if result.best_move.is_none() && max_depth > 0 {
            result.best_move = legal_moves(game_state).first().copied();
        }

        game_state.ply = saved_ply;

        result.nodes = self.nodes;
        result.fail_high = self.fail_high;
        result.fail_high_first = self.fail_high_first;
        result.null_cuts = self.null_cuts;
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result.stopped = self.stopped;

        if self.stopped {
            info!(
                "search stopped after depth {} ({} nodes, {} ms), best {}",
                result.reached_depth,
                result.nodes,
                result.elapsed_ms,
                result.best_move.unwrap_or(Move::NONE)
            );
        } else {
            info!(
                "search finished at depth {} ({} nodes, {} ms), best {} score {}",
                result.reached_depth,
                result.nodes,
                result.elapsed_ms,
                result.best_move.unwrap_or(Move::NONE),
                result.best_score
            );
        }

        result
    }

    fn alpha_beta(
        &mut self,
        game_state: &mut GameState,
        mut alpha: i32,
        beta: i32,
        depth: u8,
        allow_null: bool,
    ) -> i32 {
        if depth == 0 {
            return self.quiescence(game_state, alpha, beta);
        }

        if self.nodes % CHECK_UP_INTERVAL == 0 {
            self.check_up();
        }
        self.nodes += 1;

        if game_state.ply > 0 && (game_state.has_repetition() || game_state.is_fifty_move_draw()) {
            return 0;
        }
        if game_state.ply >= MAX_SEARCH_DEPTH - 1 {
            return self.scorer.score(game_state);
        }

        let side = game_state.side_to_move;
        let in_check = is_king_in_check(game_state, side);

        // The king counts as a big piece, so more than one means a real one.
        if self.use_null_move_cut
            && allow_null
            && !in_check
            && game_state.ply > 0
            && game_state.big_pieces[side.index()] > 1
            && depth >= NULL_MOVE_MIN_DEPTH
        {
            make_null_move(game_state);
            let score =
                -self.alpha_beta(game_state, -beta, -beta + 1, depth - NULL_MOVE_REDUCTION, false);
            take_null_move(game_state);
            if self.stopped {
                return 0;
            }
            if score >= beta && score.abs() < MATE_THRESHOLD {
                self.null_cuts += 1;
                return beta;
            }
        }

        let mut moves = generate_pseudo_legal_moves_with(game_state, &self.heuristics);
        if let Some(pv_move) = self.pv_table.probe(game_state.position_key) {
            if let Some(mv) = moves.iter_mut().find(|mv| **mv == pv_move) {
                mv.set_score(PV_MOVE_SCORE);
            }
        }
        moves.sort_by(|a, b| b.score().cmp(&a.score()));

        let old_alpha = alpha;
        let mut best_move = Move::NONE;
        let mut legal = 0u32;

        for mv in moves {
            if !make_move(game_state, mv) {
                continue;
            }
            legal += 1;
            let score = -self.alpha_beta(game_state, -beta, -alpha, depth - 1, true);
            take_move(game_state);

            if self.stopped {
                return 0;
            }

            if score > alpha {
                if score >= beta {
                    if legal == 1 {
                        self.fail_high_first += 1;
                    }
                    self.fail_high += 1;
                    if !mv.is_capture() {
                        self.heuristics.record_killer(game_state.ply, mv);
                    }
                    return beta;
                }
                alpha = score;
                best_move = mv;
                if !mv.is_capture() {
                    self.heuristics
                        .record_history(game_state.piece_at(mv.from()), mv.to(), depth);
                }
            }
        }

        if legal == 0 {
            return if in_check {
                -MATE + game_state.ply as i32
            } else {
                0
            };
        }

        if alpha != old_alpha {
            self.pv_table.store(game_state.position_key, best_move);
        }

        alpha
    }

    fn quiescence(&mut self, game_state: &mut GameState, mut alpha: i32, beta: i32) -> i32 {
        if self.nodes % CHECK_UP_INTERVAL == 0 {
            self.check_up();
        }
        self.nodes += 1;

        if game_state.ply > 0 && (game_state.has_repetition() || game_state.is_fifty_move_draw()) {
            return 0;
        }
        if game_state.ply >= MAX_SEARCH_DEPTH - 1 {
            return self.scorer.score(game_state);
        }

        let stand_pat = self.scorer.score(game_state);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = generate_pseudo_legal_captures(game_state);
        moves.sort_by(|a, b| b.score().cmp(&a.score()));

        let old_alpha = alpha;
        let mut best_move = Move::NONE;
        let mut legal = 0u32;

        for mv in moves {
            if !make_move(game_state, mv) {
                continue;
            }
            legal += 1;
            let score = -self.quiescence(game_state, -beta, -alpha);
            take_move(game_state);

            if self.stopped {
                return 0;
            }

            if score > alpha {
                if score >= beta {
                    if legal == 1 {
                        self.fail_high_first += 1;
                    }
                    self.fail_high += 1;
                    return beta;
                }
                alpha = score;
                best_move = mv;
            }
        }

        if alpha != old_alpha {
            self.pv_table.store(game_state.position_key, best_move);
        }

        alpha
    }
}

/// One-shot search with a fresh [`Searcher`].
pub fn iterative_deepening_search<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: S,
    config: &SearchConfig,
) -> SearchResult {
    Searcher::new(scorer).search(game_state, config)
}

fn format_line(line: &[Move]) -> String {
    line.iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
