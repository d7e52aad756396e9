use std::fmt;

use super::{Colour, Direction, File, Rank, Square};

/******************************************\
|==========================================|
|                 Bitboard                 |
|==========================================|
\******************************************/

/// A set of squares packed into a u64, A1 in the least significant bit and
/// H8 in the most significant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

crate::impl_bit_ops!(Bitboard);

impl std::ops::Not for Bitboard {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/******************************************\
|==========================================|
|           Bitboard Constants             |
|==========================================|
\******************************************/

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00ff);
    pub const RANK_8: Bitboard = Bitboard(0xff00_0000_0000_0000);
    pub const BACK_RANKS: Bitboard = Bitboard(Self::RANK_1.0 | Self::RANK_8.0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    /// Every dark square (A1 is dark)
    pub const DARK_SQUARES: Bitboard = Bitboard(0xaa55_aa55_aa55_aa55);
    /// Every light square
    pub const LIGHT_SQUARES: Bitboard = Bitboard(!Self::DARK_SQUARES.0);
}

/******************************************\
|==========================================|
|                Conversions               |
|==========================================|
\******************************************/

impl Square {
    /// Bitboard with only this square set
    #[inline]
    pub const fn bb(&self) -> Bitboard {
        Bitboard(1u64 << *self as u8)
    }
}

impl Rank {
    #[inline]
    pub const fn bb(&self) -> Bitboard {
        Bitboard(Bitboard::RANK_1.0 << (8 * *self as u8))
    }
}

impl File {
    #[inline]
    pub const fn bb(&self) -> Bitboard {
        Bitboard(Bitboard::FILE_A.0 << *self as u8)
    }
}

impl<const N: usize> From<[Square; N]> for Bitboard {
    fn from(squares: [Square; N]) -> Bitboard {
        squares.iter().fold(Bitboard::EMPTY, |bb, sq| bb | sq.bb())
    }
}

/******************************************\
|==========================================|
|         Bitboard Implementation          |
|==========================================|
\******************************************/

impl Bitboard {
    /// Lowest set square, if any
    #[inline]
    pub const fn lsb(&self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Square::from_index(bits.trailing_zeros() as u8),
        }
    }

    /// Highest set square, if any
    #[inline]
    pub const fn msb(&self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Square::from_index(63 - bits.leading_zeros() as u8),
        }
    }

    /// Removes and returns the lowest set square
    #[inline]
    pub const fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        sq
    }

    #[inline]
    pub const fn count_bits(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & square.bb().0 != 0
    }

    #[inline]
    pub const fn set(&mut self, square: Square) {
        self.0 |= square.bb().0;
    }

    #[inline]
    pub const fn clear(&mut self, square: Square) {
        self.0 &= !square.bb().0;
    }

    #[inline]
    pub const fn toggle(&mut self, square: Square) {
        self.0 ^= square.bb().0;
    }

    #[inline]
    pub const fn more_than_one(&self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Shifts every square one step in `dir`; squares pushed off the board are dropped
    #[inline]
    pub const fn shift(&self, dir: Direction) -> Bitboard {
        let (df, _) = dir.deltas();
        let kept = match df {
            1 => self.0 & !Self::FILE_H.0,
            2 => self.0 & !(Self::FILE_H.0 | (Self::FILE_H.0 >> 1)),
            -1 => self.0 & !Self::FILE_A.0,
            -2 => self.0 & !(Self::FILE_A.0 | (Self::FILE_A.0 << 1)),
            _ => self.0,
        };
        let offset = dir as i8;
        if offset > 0 {
            Bitboard(kept << offset as u32)
        } else {
            Bitboard(kept >> (-offset) as u32)
        }
    }

    /// Squares attacked by every pawn of `col` in `pawns`
    #[inline]
    pub const fn pawn_attacks(col: Colour, pawns: Bitboard) -> Bitboard {
        let [left, right] = col.pawn_captures();
        Bitboard(pawns.shift(left).0 | pawns.shift(right).0)
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count_bits() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = "     +---+---+---+---+---+---+---+---+";

        writeln!(f, "{SEPARATOR}")?;
        for rank in Rank::iter().rev() {
            write!(f, " {}   |", rank)?;
            for file in File::iter() {
                let cell = if self.contains(Square::from_parts(file, rank)) { " 1 " } else { "   " };
                write!(f, "{cell}|")?;
            }
            writeln!(f)?;
            writeln!(f, "{SEPARATOR}")?;
        }
        writeln!(f, "       a   b   c   d   e   f   g   h")?;
        write!(f, "Bitboard: {:#x}", self.0)
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsb_msb() {
        let bb = Square::C3.bb() | Square::F7.bb();
        assert_eq!(bb.lsb(), Some(Square::C3));
        assert_eq!(bb.msb(), Some(Square::F7));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
        assert_eq!(Bitboard::EMPTY.msb(), None);
    }

    #[test]
    fn test_pop_lsb_and_iteration() {
        let mut bb = Square::E4.bb() | Square::A1.bb();
        assert_eq!(bb.pop_lsb(), Some(Square::A1));
        assert_eq!(bb.pop_lsb(), Some(Square::E4));
        assert_eq!(bb.pop_lsb(), None);

        let squares: Vec<Square> = Bitboard::from([Square::H8, Square::B2, Square::D5]).collect();
        assert_eq!(squares, vec![Square::B2, Square::D5, Square::H8]);
    }

    #[test]
    fn test_set_clear_toggle() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E4);
        assert!(bb.contains(Square::E4));
        bb.clear(Square::E4);
        assert!(bb.is_empty());
        bb.toggle(Square::D5);
        assert!(bb.contains(Square::D5));
        assert!(!bb.more_than_one());
        bb.set(Square::D6);
        assert!(bb.more_than_one());
        assert_eq!(bb.count_bits(), 2);
    }

    #[test]
    fn test_shift_directions() {
        let bb = Square::E5.bb();
        assert_eq!(bb.shift(Direction::N), Square::E6.bb());
        assert_eq!(bb.shift(Direction::SW), Square::D4.bb());
        assert_eq!(bb.shift(Direction::NEE), Square::G6.bb());
        assert_eq!(bb.shift(Direction::SSW), Square::D3.bb());
    }

    #[test]
    fn test_shift_does_not_wrap() {
        assert_eq!(Square::H5.bb().shift(Direction::E), Bitboard::EMPTY);
        assert_eq!(Square::A5.bb().shift(Direction::NW), Bitboard::EMPTY);
        assert_eq!(Square::G5.bb().shift(Direction::NEE), Bitboard::EMPTY);
        assert_eq!(Square::B5.bb().shift(Direction::SWW), Bitboard::EMPTY);
        assert_eq!(Square::E8.bb().shift(Direction::N), Bitboard::EMPTY);
        assert_eq!(Square::E1.bb().shift(Direction::S), Bitboard::EMPTY);
    }

    #[test]
    fn test_pawn_attacks() {
        let white = Bitboard::pawn_attacks(Colour::White, Square::A2.bb() | Square::E4.bb());
        assert_eq!(white, Bitboard::from([Square::B3, Square::D5, Square::F5]));
        let black = Bitboard::pawn_attacks(Colour::Black, Square::H7.bb());
        assert_eq!(black, Square::G6.bb());
    }

    #[test]
    fn test_square_colours() {
        assert!(Bitboard::DARK_SQUARES.contains(Square::A1));
        assert!(Bitboard::LIGHT_SQUARES.contains(Square::H1));
        for sq in Square::iter() {
            assert_eq!(Bitboard::DARK_SQUARES.contains(sq), sq.is_dark());
        }
    }
}
