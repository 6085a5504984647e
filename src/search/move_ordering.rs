//! Move-ordering heuristics: MVV-LVA for captures, killer moves and the
//! history table for quiet moves.
//!
//! Scores are assigned at generation time and only used to sort candidates;
//! the tiers never overlap: PV move, captures, first killer, second killer,
//! then history.

use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::search::iterative_deepening::MAX_SEARCH_DEPTH;

pub const PV_MOVE_SCORE: i32 = 2_000_000;
pub const CAPTURE_BONUS: i32 = 1_000_000;
pub const FIRST_KILLER_SCORE: i32 = 900_000;
pub const SECOND_KILLER_SCORE: i32 = 800_000;

const VICTIM_SCORE: [i32; PIECE_COUNT] = [0, 100, 200, 300, 400, 500, 600, 100, 200, 300, 400, 500, 600];

const fn build_mvv_lva() -> [[i32; PIECE_COUNT]; PIECE_COUNT] {
    let mut table = [[0i32; PIECE_COUNT]; PIECE_COUNT];
    let mut victim = 1;
    while victim < PIECE_COUNT {
        let mut attacker = 1;
        while attacker < PIECE_COUNT {
            table[victim][attacker] = VICTIM_SCORE[victim] + 6 - VICTIM_SCORE[attacker] / 100;
            attacker += 1;
        }
        victim += 1;
    }
    table
}

static MVV_LVA: [[i32; PIECE_COUNT]; PIECE_COUNT] = build_mvv_lva();

/// Ordering score for `attacker` taking `victim`.
#[inline]
pub fn capture_score(attacker: Piece, victim: Piece) -> i32 {
    MVV_LVA[victim.index() % PIECE_COUNT][attacker.index() % PIECE_COUNT] + CAPTURE_BONUS
}

/// Pawn takes pawn.
pub const EN_PASSANT_SCORE: i32 = 105 + CAPTURE_BONUS;

/// Scoring hook for quiet moves, consulted by the move generator.
pub trait MoveOrdering {
    fn quiet_move_score(&self, game_state: &GameState, mv: Move) -> i32;
}

/// Leaves every quiet move at score zero.
pub struct NoOrdering;

impl MoveOrdering for NoOrdering {
    #[inline]
    fn quiet_move_score(&self, _game_state: &GameState, _mv: Move) -> i32 {
        0
    }
}

/// Killer and history tables for one search call.
#[derive(Debug, Clone)]
pub struct SearchHeuristics {
    killers: [[Move; 2]; MAX_SEARCH_DEPTH],
    history: [[i32; PADDED_BOARD_SQUARES]; PIECE_COUNT],
}

impl Default for SearchHeuristics {
    fn default() -> Self {
        Self {
            killers: [[Move::NONE; 2]; MAX_SEARCH_DEPTH],
            history: [[0; PADDED_BOARD_SQUARES]; PIECE_COUNT],
        }
    }
}

impl SearchHeuristics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.killers.fill([Move::NONE; 2]);
        for row in &mut self.history {
            row.fill(0);
        }
    }

    #[inline]
    pub fn killers_at(&self, ply: usize) -> [Move; 2] {
        self.killers.get(ply).copied().unwrap_or([Move::NONE; 2])
    }

    /// Remember a quiet move that caused a beta cutoff at `ply`.
    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.killers.get_mut(ply) else {
            return;
        };
        if slot[0] == mv {
            return;
        }
        slot[1] = slot[0];
        slot[0] = mv;
    }

    /// Reward a quiet move that raised alpha.
    pub fn record_history(&mut self, piece: Piece, to: Square, depth: u8) {
        let entry = &mut self.history[piece.index() % PIECE_COUNT][to as usize];
        *entry = entry.saturating_add(i32::from(depth));
    }

    #[inline]
    pub fn history_score(&self, piece: Piece, to: Square) -> i32 {
        self.history[piece.index() % PIECE_COUNT][to as usize]
    }
}

impl MoveOrdering for SearchHeuristics {
    fn quiet_move_score(&self, game_state: &GameState, mv: Move) -> i32 {
        let [first, second] = self.killers_at(game_state.ply);
        if mv == first {
            FIRST_KILLER_SCORE
        } else if mv == second {
            SECOND_KILLER_SCORE
        } else {
            self.history_score(game_state.piece_at(mv.from()), mv.to())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::squares::*;

    #[test]
    fn mvv_lva_prefers_valuable_victims_and_cheap_attackers() {
        let pawn_takes_queen = capture_score(Piece::LightPawn, Piece::DarkQueen);
        let queen_takes_queen = capture_score(Piece::LightQueen, Piece::DarkQueen);
        let pawn_takes_rook = capture_score(Piece::LightPawn, Piece::DarkRook);
        assert!(pawn_takes_queen > queen_takes_queen);
        assert!(queen_takes_queen > pawn_takes_rook);
        assert_eq!(capture_score(Piece::DarkPawn, Piece::LightPawn), EN_PASSANT_SCORE);
        assert!(capture_score(Piece::LightKing, Piece::DarkPawn) > FIRST_KILLER_SCORE);
    }

    #[test]
    fn killers_shift_and_score_above_history() {
        let game = GameState::new_game();
        let mut heuristics = SearchHeuristics::new();
        let first = Move::pack(G1, square_from_file_rank(5, 2), Piece::Empty, Piece::Empty, 0);
        let second = Move::pack(B1, square_from_file_rank(2, 2), Piece::Empty, Piece::Empty, 0);
        let other = Move::pack(B1, square_from_file_rank(0, 2), Piece::Empty, Piece::Empty, 0);

        heuristics.record_killer(0, second);
        heuristics.record_killer(0, first);
        heuristics.record_killer(0, first);
        assert_eq!(heuristics.killers_at(0), [first, second]);

        heuristics.record_history(Piece::LightKnight, other.to(), 5);
        assert_eq!(heuristics.quiet_move_score(&game, first), FIRST_KILLER_SCORE);
        assert_eq!(heuristics.quiet_move_score(&game, second), SECOND_KILLER_SCORE);
        assert_eq!(heuristics.quiet_move_score(&game, other), 5);

        heuristics.clear();
        assert_eq!(heuristics.quiet_move_score(&game, first), 0);
        assert_eq!(heuristics.killers_at(MAX_SEARCH_DEPTH + 3), [Move::NONE; 2]);
    }
}
