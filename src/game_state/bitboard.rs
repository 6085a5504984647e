//! Minimal 64-bit square set used for pawn bookkeeping.
//!
//! Squares are dense indices (`0..64`, see [`crate::game_state::squares`]).

const POP_FOLD_MULTIPLIER: u32 = 0x783a_9b23;

const POP_TABLE: [u8; 64] = [
    63, 30, 3, 32, 25, 41, 22, 33, 15, 50, 42, 13, 11, 53, 19, 34, 61, 29, 2, 51, 21, 43, 45, 10,
    18, 47, 1, 54, 9, 57, 0, 35, 62, 31, 40, 4, 49, 5, 52, 26, 60, 6, 23, 44, 46, 27, 56, 16, 7,
    39, 48, 24, 59, 14, 12, 55, 38, 28, 58, 20, 37, 17, 36, 8,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub fn set_square(&mut self, sq64: u8) {
        self.0 |= 1u64 << sq64;
    }

    #[inline]
    pub fn clear_square(&mut self, sq64: u8) {
        self.0 &= !(1u64 << sq64);
    }

    #[inline]
    pub fn contains(self, sq64: u8) -> bool {
        self.0 & (1u64 << sq64) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Population count by repeatedly clearing the lowest set bit.
    pub fn count(self) -> u32 {
        let mut bits = self.0;
        let mut count = 0;
        while bits != 0 {
            bits &= bits - 1;
            count += 1;
        }
        count
    }

    /// Remove and return the lowest set square. Returns `None` when empty.
    pub fn pop_lowest_square(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let isolated = self.0 ^ (self.0 - 1);
        let fold = (isolated as u32) ^ ((isolated >> 32) as u32);
        self.0 &= self.0 - 1;
        Some(POP_TABLE[(fold.wrapping_mul(POP_FOLD_MULTIPLIER) >> 26) as usize])
    }

    /// Set squares in ascending order. `self` is left untouched.
    pub fn squares(self) -> impl Iterator<Item = u8> {
        let mut remaining = self;
        std::iter::from_fn(move || remaining.pop_lowest_square())
    }
}


#[cfg(test)]
mod tests {
    use super::Bitboard;

    #[test]
    fn set_clear_and_count() {
        let mut bb = Bitboard::EMPTY;
        assert!(bb.is_empty());
        bb.set_square(0);
        bb.set_square(27);
        bb.set_square(63);
        assert_eq!(bb.count(), 3);
        assert!(bb.contains(27));

        bb.clear_square(27);
        assert_eq!(bb.count(), 2);
        assert!(!bb.contains(27));
    }

    #[test]
    fn pop_returns_every_square_in_ascending_order() {
        for sq in 0..64u8 {
            let mut single = Bitboard(1u64 << sq);
            assert_eq!(single.pop_lowest_square(), Some(sq));
            assert!(single.is_empty());
        }

        let mut bb = Bitboard((1u64 << 5) | (1u64 << 40) | (1u64 << 12));
        assert_eq!(bb.pop_lowest_square(), Some(5));
        assert_eq!(bb.pop_lowest_square(), Some(12));
        assert_eq!(bb.pop_lowest_square(), Some(40));
        assert_eq!(bb.pop_lowest_square(), None);
    }

    #[test]
    fn squares_iterates_without_consuming() {
        let bb = Bitboard((1u64 << 63) | (1u64 << 8) | 1);
        assert_eq!(bb.squares().collect::<Vec<_>>(), vec![0, 8, 63]);
        assert_eq!(bb.count(), 3);
        assert_eq!(Bitboard::EMPTY.squares().next(), None);
    }
}
