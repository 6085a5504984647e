//! Pseudo-legal move generation on the padded mailbox.
//!
//! Generated moves obey piece movement and occupancy rules but may leave the
//! mover's king attacked; `make_move` is the legality gate. Every move leaves
//! here carrying its ordering score.

use crate::game_state::chess_types::*;
use crate::game_state::squares::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::move_descriptions::*;
use crate::search::move_ordering::{capture_score, MoveOrdering, NoOrdering, EN_PASSANT_SCORE};

const LIGHT_PROMOTIONS: [Piece; 4] = [
    Piece::LightQueen,
    Piece::LightRook,
    Piece::LightBishop,
    Piece::LightKnight,
];
const DARK_PROMOTIONS: [Piece; 4] = [
    Piece::DarkQueen,
    Piece::DarkRook,
    Piece::DarkBishop,
    Piece::DarkKnight,
];

struct MoveCollector<'a, O: MoveOrdering + ?Sized> {
    game_state: &'a GameState,
    ordering: &'a O,
    captures_only: bool,
    moves: Vec<Move>,
}

impl<O: MoveOrdering + ?Sized> MoveCollector<'_, O> {
    fn push_quiet(&mut self, mv: Move) {
        if self.captures_only {
            return;
        }
        let score = self.ordering.quiet_move_score(self.game_state, mv);
        self.moves.push(mv.with_score(score));
    }

    fn push_capture(&mut self, mv: Move) {
        let attacker = self.game_state.piece_at(mv.from());
        self.moves
            .push(mv.with_score(capture_score(attacker, mv.captured())));
    }

    fn push_en_passant(&mut self, mv: Move) {
        self.moves.push(mv.with_score(EN_PASSANT_SCORE));
    }

    fn push_pawn_quiet(&mut self, from: Square, to: Square, promotions: &[Piece; 4], last_rank: u8) {
        if rank_of(from) == last_rank {
            for &promoted in promotions {
                self.push_quiet(Move::pack(from, to, Piece::Empty, promoted, 0));
            }
        } else {
            self.push_quiet(Move::pack(from, to, Piece::Empty, Piece::Empty, 0));
        }
    }

    fn push_pawn_capture(
        &mut self,
        from: Square,
        to: Square,
        captured: Piece,
        promotions: &[Piece; 4],
        last_rank: u8,
    ) {
        if rank_of(from) == last_rank {
            for &promoted in promotions {
                self.push_capture(Move::pack(from, to, captured, promoted, 0));
            }
        } else {
            self.push_capture(Move::pack(from, to, captured, Piece::Empty, 0));
        }
    }
}

/// All pseudo-legal moves for the side to move, quiet moves unscored.
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    generate_pseudo_legal_moves_with(game_state, &NoOrdering)
}

/// All pseudo-legal moves, quiet moves scored by `ordering`.
pub fn generate_pseudo_legal_moves_with<O: MoveOrdering + ?Sized>(
    game_state: &GameState,
    ordering: &O,
) -> Vec<Move> {
    generate(game_state, ordering, false)
}

/// Capturing moves only (including en passant), for quiescence.
pub fn generate_pseudo_legal_captures(game_state: &GameState) -> Vec<Move> {
    generate(game_state, &NoOrdering, true)
}

/// Pseudo-legal moves of the piece on `square`, if it belongs to the side to
/// move.
pub fn generate_pseudo_legal_moves_from(game_state: &GameState, square: Square) -> Vec<Move> {
    let mut moves = generate_pseudo_legal_moves(game_state);
    moves.retain(|mv| mv.from() == square);
    moves
}

fn generate<O: MoveOrdering + ?Sized>(
    game_state: &GameState,
    ordering: &O,
    captures_only: bool,
) -> Vec<Move> {
    let mut collector = MoveCollector {
        game_state,
        ordering,
        captures_only,
        moves: Vec::with_capacity(64),
    };

    let side = game_state.side_to_move;
    generate_pawn_moves(&mut collector, side);
    if !captures_only {
        generate_castling_moves(&mut collector, side);
    }
    generate_piece_moves(&mut collector, side);

    collector.moves
}

fn generate_pawn_moves<O: MoveOrdering + ?Sized>(collector: &mut MoveCollector<'_, O>, side: Color) {
    let game_state = collector.game_state;
    let (pawn, forward, capture_deltas, start_rank, last_rank, promotions) = match side {
        Color::Light => (Piece::LightPawn, 10i8, [9i8, 11], RANK_2, RANK_7, &LIGHT_PROMOTIONS),
        Color::Dark => (Piece::DarkPawn, -10i8, [-9i8, -11], RANK_7, RANK_2, &DARK_PROMOTIONS),
    };

    for &from in &game_state.piece_locations[pawn.index()] {
        let one_step = offset(from, forward);
        if game_state.piece_at(one_step) == Piece::Empty {
            collector.push_pawn_quiet(from, one_step, promotions, last_rank);

            let two_step = offset(one_step, forward);
            if rank_of(from) == start_rank && game_state.piece_at(two_step) == Piece::Empty {
                collector.push_quiet(Move::pack(
                    from,
                    two_step,
                    Piece::Empty,
                    Piece::Empty,
                    FLAG_PAWN_START,
                ));
            }
        }

        for delta in capture_deltas {
            let target = offset(from, delta);
            let victim = game_state.piece_at(target);
            if victim.color() == Some(side.opposite()) {
                collector.push_pawn_capture(from, target, victim, promotions, last_rank);
            }
            if game_state.en_passant_square == Some(target) {
                collector.push_en_passant(Move::pack(
                    from,
                    target,
                    Piece::Empty,
                    Piece::Empty,
                    FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

fn generate_castling_moves<O: MoveOrdering + ?Sized>(
    collector: &mut MoveCollector<'_, O>,
    side: Color,
) {
    let game_state = collector.game_state;
    let (king_home, kingside, queenside, king, rook) = match side {
        Color::Light => (
            E1,
            (CASTLE_LIGHT_KINGSIDE, H1, [F1, G1], F1, G1),
            (CASTLE_LIGHT_QUEENSIDE, A1, [D1, C1, B1], D1, C1),
            Piece::LightKing,
            Piece::LightRook,
        ),
        Color::Dark => (
            E8,
            (CASTLE_DARK_KINGSIDE, H8, [F8, G8], F8, G8),
            (CASTLE_DARK_QUEENSIDE, A8, [D8, C8, B8], D8, C8),
            Piece::DarkKing,
            Piece::DarkRook,
        ),
    };

    if game_state.piece_at(king_home) != king {
        return;
    }
    let enemy = side.opposite();

    let (flag, rook_home, between, transit, target) = kingside;
    if game_state.castling_rights & flag != 0
        && game_state.piece_at(rook_home) == rook
        && between.iter().all(|&sq| game_state.piece_at(sq) == Piece::Empty)
        && !is_square_attacked(game_state, king_home, enemy)
        && !is_square_attacked(game_state, transit, enemy)
    {
        collector.push_quiet(Move::pack(king_home, target, Piece::Empty, Piece::Empty, FLAG_CASTLING));
    }

    let (flag, rook_home, between, transit, target) = queenside;
    if game_state.castling_rights & flag != 0
        && game_state.piece_at(rook_home) == rook
        && between.iter().all(|&sq| game_state.piece_at(sq) == Piece::Empty)
        && !is_square_attacked(game_state, king_home, enemy)
        && !is_square_attacked(game_state, transit, enemy)
    {
        collector.push_quiet(Move::pack(king_home, target, Piece::Empty, Piece::Empty, FLAG_CASTLING));
    }
}

fn generate_piece_moves<O: MoveOrdering + ?Sized>(collector: &mut MoveCollector<'_, O>, side: Color) {
    let game_state = collector.game_state;

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let piece = Piece::from_parts(side, kind);
        let info = piece.info();

        for &from in &game_state.piece_locations[piece.index()] {
            for &delta in info.directions {
                let mut to = offset(from, delta);
                loop {
                    let target = game_state.piece_at(to);
                    if target == Piece::OffBoard || target.color() == Some(side) {
                        break;
                    }
                    if target != Piece::Empty {
                        collector.push_capture(Move::pack(from, to, target, Piece::Empty, 0));
                        break;
                    }
                    collector.push_quiet(Move::pack(from, to, Piece::Empty, Piece::Empty, 0));
                    if !info.is_sliding {
                        break;
                    }
                    to = offset(to, delta);
                }
            }
        }
    }
}
