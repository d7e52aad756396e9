use serde::{Deserialize, Serialize};

use super::{Rank, Square};

/******************************************\
|==========================================|
|                 Colours                  |
|==========================================|
\******************************************/

/// # Colour Representation
///
/// The two sides of a chess game.

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    /// Number of elements in the Colour enum
    pub const NUM: usize = 2;
}

crate::impl_enum_index!(Colour);

/******************************************\
|==========================================|
|                 Direction                |
|==========================================|
\******************************************/

/// # Direction Representation
///
/// The eight compass directions plus the knight jumps, stored as square index offsets.

#[rustfmt::skip]
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    N = 8, S = -8, W = -1, E = 1,
    NE = 9, NW = 7, SE = -7, SW = -9,
    NNE = 17, NNW = 15, NEE = 10, NWW = 6,
    SEE = -6, SWW = -10, SSE = -15, SSW = -17,
}

impl Direction {
    /// King steps
    #[rustfmt::skip]
    pub const KING: [Direction; 8] = [
        Direction::N, Direction::NE, Direction::E, Direction::SE,
        Direction::S, Direction::SW, Direction::W, Direction::NW,
    ];

    /// Knight jumps
    #[rustfmt::skip]
    pub const KNIGHT: [Direction; 8] = [
        Direction::NNE, Direction::NEE, Direction::SEE, Direction::SSE,
        Direction::SSW, Direction::SWW, Direction::NWW, Direction::NNW,
    ];

    /// Returns the (file, rank) step of the direction
    pub const fn deltas(self) -> (i8, i8) {
        use Direction::*;
        match self {
            N => (0, 1),
            S => (0, -1),
            E => (1, 0),
            W => (-1, 0),
            NE => (1, 1),
            NW => (-1, 1),
            SE => (1, -1),
            SW => (-1, -1),
            NNE => (1, 2),
            NNW => (-1, 2),
            NEE => (2, 1),
            NWW => (-2, 1),
            SEE => (2, -1),
            SWW => (-2, -1),
            SSE => (1, -2),
            SSW => (-1, -2),
        }
    }

    /// True when stepping in this direction increases the square index
    pub const fn is_positive(self) -> bool {
        (self as i8) > 0
    }
}

/******************************************\
|==========================================|
|                 Castling                 |
|==========================================|
\******************************************/

/// # Castling Representation
///
/// Castling rights held in a position, one bit per colour and wing

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castling(pub u8);

impl Default for Castling {
    fn default() -> Self {
        Castling::NONE
    }
}

crate::impl_bit_ops!(Castling);

/******************************************\
|==========================================|
|              Implementation              |
|==========================================|
\******************************************/

impl Colour {
    /// Returns the direction pawns of this colour advance in
    pub const fn forward(&self) -> Direction {
        match self {
            Colour::White => Direction::N,
            Colour::Black => Direction::S,
        }
    }

    /// Returns the two diagonal directions pawns of this colour capture in
    pub const fn pawn_captures(&self) -> [Direction; 2] {
        match self {
            Colour::White => [Direction::NW, Direction::NE],
            Colour::Black => [Direction::SW, Direction::SE],
        }
    }

    /// Returns the home rank of the pieces of this colour
    pub const fn back_rank(&self) -> Rank {
        match self {
            Colour::White => Rank::Rank1,
            Colour::Black => Rank::Rank8,
        }
    }

    /// Returns the FEN side-to-move character
    pub const fn to_char(&self) -> char {
        match self {
            Colour::White => 'w',
            Colour::Black => 'b',
        }
    }
}

impl std::ops::Not for Colour {
    type Output = Self;

    /// Returns the opposite colour
    fn not(self) -> Self::Output {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colour::White => write!(f, "White"),
            Colour::Black => write!(f, "Black"),
        }
    }
}

impl Castling {
    /// Number of possible values of the Castling struct
    pub const NUM: usize = 16;
    // Single rights
    pub const WK: Castling = Castling(1);
    pub const WQ: Castling = Castling(2);
    pub const BK: Castling = Castling(4);
    pub const BQ: Castling = Castling(8);
    // Rights per colour
    pub const WHITE_CASTLING: Castling = Castling(3);
    pub const BLACK_CASTLING: Castling = Castling(12);
    // All or nothing
    pub const ALL: Castling = Castling(15);
    pub const NONE: Castling = Castling(0);

    /// The single rights in slot order (WK, WQ, BK, BQ)
    pub const SINGLES: [Castling; 4] = [Castling::WK, Castling::WQ, Castling::BK, Castling::BQ];

    /// True if any of the bits in `right` are held
    #[inline]
    pub const fn has(self, right: Castling) -> bool {
        self.0 & right.0 != 0
    }

    #[inline]
    pub fn set(&mut self, right: Castling) {
        *self |= right;
    }

    #[inline]
    pub fn remove(&mut self, right: Castling) {
        *self &= !right;
    }

    /// Keep only the rights that are also present in `mask`
    #[inline]
    pub fn mask(&mut self, mask: Castling) {
        self.0 &= mask.0;
    }

    /// King side right for a colour
    #[inline]
    pub const fn king_side(colour: Colour) -> Self {
        match colour {
            Colour::White => Castling::WK,
            Colour::Black => Castling::BK,
        }
    }

    /// Queen side right for a colour
    #[inline]
    pub const fn queen_side(colour: Colour) -> Self {
        match colour {
            Colour::White => Castling::WQ,
            Colour::Black => Castling::BQ,
        }
    }

    /// Both rights of a colour
    #[inline]
    pub const fn for_colour(colour: Colour) -> Self {
        match colour {
            Colour::White => Castling::WHITE_CASTLING,
            Colour::Black => Castling::BLACK_CASTLING,
        }
    }

    /// Slot (0..4) of a single right, used to index per-right tables
    #[inline]
    pub const fn slot(self) -> usize {
        debug_assert!(self.0.count_ones() == 1, "slot() requires a single right");
        self.0.trailing_zeros() as usize
    }
}

impl std::ops::Not for Castling {
    type Output = Self;

    /// Invert the bits to give the opposite castling rights
    #[inline]
    fn not(self) -> Self::Output {
        Castling(!self.0 & 0x0F)
    }
}

impl std::fmt::Display for Castling {
    /// Displays castling rights in the `KQkq` format
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }

        for (right, c) in Castling::SINGLES.iter().zip(['K', 'Q', 'k', 'q']) {
            if self.has(*right) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl Square {
    /// Steps one `dir` away from the square, or `None` when that leaves the board
    #[inline]
    pub const fn add(self, dir: Direction) -> Option<Square> {
        let (df, dr) = dir.deltas();
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;

        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Square::from_index((rank * 8 + file) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_plus_direction() {
        assert_eq!(Square::E4.add(Direction::N), Some(Square::E5));
        assert_eq!(Square::E4.add(Direction::SW), Some(Square::D3));
        assert_eq!(Square::E4.add(Direction::NEE), Some(Square::G5));
        assert_eq!(Square::H4.add(Direction::E), None);
        assert_eq!(Square::A4.add(Direction::W), None);
        assert_eq!(Square::E8.add(Direction::N), None);
        assert_eq!(Square::G7.add(Direction::NEE), None);
        assert_eq!(Square::B2.add(Direction::SWW), None);
    }

    #[test]
    fn test_direction_offsets_match_deltas() {
        for dir in Direction::KING.iter().chain(Direction::KNIGHT.iter()) {
            let (df, dr) = dir.deltas();
            assert_eq!(*dir as i8, dr * 8 + df);
        }
    }

    #[test]
    fn test_castling_bitwise_operations() {
        assert_eq!(Castling::ALL & Castling::WK, Castling::WK);
        assert_eq!(Castling::WK | Castling::BQ, Castling(9));
        assert_eq!(!Castling::ALL, Castling::NONE);
        assert_eq!(!Castling::WK, Castling(14));
    }

    #[test]
    fn test_castling_helpers() {
        let mut castling = Castling::ALL;
        castling.remove(Castling::for_colour(Colour::Black));
        assert!(castling.has(Castling::WK));
        assert!(!castling.has(Castling::BQ));

        castling.mask(!Castling::WK);
        assert_eq!(castling, Castling::WQ);
        assert_eq!(castling.to_string(), "Q");
        assert_eq!(Castling::NONE.to_string(), "-");
        assert_eq!(Castling::ALL.to_string(), "KQkq");
        assert_eq!(Castling::BQ.slot(), 3);
    }

    #[test]
    fn test_colour_helpers() {
        assert_eq!(!Colour::White, Colour::Black);
        assert_eq!(Colour::Black.back_rank(), Rank::Rank8);
        assert_eq!(Colour::White.to_string(), "White");
    }
}
