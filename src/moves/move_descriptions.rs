//! Packed move encoding.
//!
//! Bit layout of [`Move::bits`]:
//!
//! | bits    | field                                    |
//! |---------|------------------------------------------|
//! | 0..7    | from-square (padded index)               |
//! | 7..14   | to-square (padded index)                 |
//! | 14..18  | captured piece id                        |
//! | 18      | en-passant flag                          |
//! | 19      | pawn double-push flag                    |
//! | 20..24  | promoted piece id                        |
//! | 24      | castling flag                            |
//!
//! The ordering score rides along with the move but is not part of its
//! identity: two moves compare equal when their bits match.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::game_state::chess_types::{Piece, Square};
use crate::utils::algebraic::square_to_algebraic;

const SQUARE_MASK: u32 = 0x7F;
const PIECE_MASK: u32 = 0xF;

const TO_SHIFT: u32 = 7;
const CAPTURED_SHIFT: u32 = 14;
const PROMOTED_SHIFT: u32 = 20;

const CAPTURE_MASK: u32 = 0x7C000;
const PROMOTION_MASK: u32 = 0xF0_0000;

pub const FLAG_EN_PASSANT: u32 = 0x4_0000;
pub const FLAG_PAWN_START: u32 = 0x8_0000;
pub const FLAG_CASTLING: u32 = 0x100_0000;

#[derive(Debug, Clone, Copy, Default)]
pub struct Move {
    bits: u32,
    score: i32,
}

impl Move {
    /// Sentinel for "no move"; also marks null moves in the undo history.
    pub const NONE: Move = Move { bits: 0, score: 0 };

    #[inline]
    pub const fn pack(
        from: Square,
        to: Square,
        captured: Piece,
        promoted: Piece,
        flags: u32,
    ) -> Self {
        let bits = (from as u32)
            | ((to as u32) << TO_SHIFT)
            | ((captured as u32) << CAPTURED_SHIFT)
            | ((promoted as u32) << PROMOTED_SHIFT)
            | flags;
        Move { bits, score: 0 }
    }

    #[inline]
    pub const fn from(self) -> Square {
        (self.bits & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.bits >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn captured(self) -> Piece {
        Piece::from_index(((self.bits >> CAPTURED_SHIFT) & PIECE_MASK) as usize)
            .unwrap_or(Piece::Empty)
    }

    #[inline]
    pub fn promoted(self) -> Piece {
        Piece::from_index(((self.bits >> PROMOTED_SHIFT) & PIECE_MASK) as usize)
            .unwrap_or(Piece::Empty)
    }

    /// True for ordinary captures and en-passant captures.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.bits & CAPTURE_MASK != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.bits & PROMOTION_MASK != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.bits & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_pawn_start(self) -> bool {
        self.bits & FLAG_PAWN_START != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.bits & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub const fn score(self) -> i32 {
        self.score
    }

    #[inline]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    #[inline]
    pub const fn with_score(self, score: i32) -> Self {
        Move {
            bits: self.bits,
            score,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

/// Long algebraic form (`e2e4`, `e7e8q`); `0000` for [`Move::NONE`].
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Ok(from), Ok(to)) = (square_to_algebraic(self.from()), square_to_algebraic(self.to()))
        else {
            return f.write_str("0000");
        };
        write!(f, "{from}{to}")?;
        if let Some(kind) = self.promoted().kind() {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}
