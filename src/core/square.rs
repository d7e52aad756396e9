use thiserror::Error;

use super::types::Colour;

/******************************************\
|==========================================|
|                 Squares                  |
|==========================================|
\******************************************/

/// # Square representation
///
/// Little-endian rank-file mapping: A1 = 0, H1 = 7, A8 = 56, H8 = 63

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Number of elements in the Square enum
    pub const NUM: usize = 64;
}

crate::impl_enum_index!(Square);

/******************************************\
|==========================================|
|                  Ranks                   |
|==========================================|
\******************************************/

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum Rank {
    Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8,
}

impl Rank {
    /// Number of elements in the Rank enum
    pub const NUM: usize = 8;
}

crate::impl_enum_index!(Rank);

/******************************************\
|==========================================|
|                  Files                   |
|==========================================|
\******************************************/

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
}

impl File {
    /// Number of elements in the File enum
    pub const NUM: usize = 8;
}

crate::impl_enum_index!(File);

/******************************************\
|==========================================|
|              Implementation              |
|==========================================|
\******************************************/

impl Square {
    /// Returns the rank of a square
    #[inline]
    pub const fn rank(&self) -> Rank {
        unsafe { Rank::from_unchecked((*self as u8) >> 3) }
    }

    /// Returns the file of a square
    #[inline]
    pub const fn file(&self) -> File {
        unsafe { File::from_unchecked((*self as u8) & 0b111) }
    }

    /// Combines a file and rank into a square
    #[inline]
    pub const fn from_parts(file: File, rank: Rank) -> Self {
        unsafe { Self::from_unchecked(((rank as u8) << 3) | (file as u8)) }
    }

    /// Mirrors the square vertically (A1 <-> A8)
    #[inline]
    pub const fn flip_rank(&self) -> Self {
        unsafe { Self::from_unchecked((*self as u8) ^ Square::A8 as u8) }
    }

    /// Returns the square as seen from `col`'s side of the board
    ///
    /// ```
    /// assert_eq!(Square::G1.relative(Colour::Black), Square::G8);
    /// ```
    #[inline]
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => self.flip_rank(),
        }
    }

    /// Chebyshev distance (king steps) between two squares
    pub const fn distance(a: Square, b: Square) -> u8 {
        let file_dist = (a.file() as u8).abs_diff(b.file() as u8);
        let rank_dist = (a.rank() as u8).abs_diff(b.rank() as u8);
        if file_dist > rank_dist { file_dist } else { rank_dist }
    }

    /// True for dark squares (A1 is dark)
    #[inline]
    pub const fn is_dark(&self) -> bool {
        ((*self as u8 >> 3) + (*self as u8 & 7)) % 2 == 0
    }
}

impl Rank {
    /// Returns the rank relative to `col`, so Rank1 is always the home rank
    #[inline]
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => unsafe { Self::from_unchecked(7 - (*self as u8)) },
        }
    }

    pub const fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::from_index(c as u8 - b'1'),
            _ => None,
        }
    }
}

impl File {
    pub const fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }

    /// Parses a lowercase file letter
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Self::from_index(c as u8 - b'a'),
            _ => None,
        }
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::fmt::Display for Square {
    /// Displays the square in algebraic form (Square::A1 => "a1")
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/******************************************\
|==========================================|
|              Parsing Strings             |
|==========================================|
\******************************************/

impl std::str::FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(ParseSquareError::InvalidLength(s.chars().count()));
        };

        let file = File::from_char(file_char).ok_or(ParseSquareError::InvalidFileChar(file_char))?;
        let rank = Rank::from_char(rank_char).ok_or(ParseSquareError::InvalidRankChar(rank_char))?;

        Ok(Square::from_parts(file, rank))
    }
}

/******************************************\
|==========================================|
|            Square Parse Errors           |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSquareError {
    #[error("Invalid length for square string: {0}, expected 2")]
    InvalidLength(usize),
    #[error("Invalid file character: '{0}', expected 'a'-'h'")]
    InvalidFileChar(char),
    #[error("Invalid rank character: '{0}', expected '1'-'8'")]
    InvalidRankChar(char),
}
