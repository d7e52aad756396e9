use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Colour;

/******************************************\
|==========================================|
|                  Piece                   |
|==========================================|
\******************************************/

/// # Piece representation
///
/// Colour lives in the low bit and piece type in the upper bits, so
/// `WhitePawn = 0`, `BlackPawn = 1`, `WhiteKnight = 2` and so on.

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    WhitePawn, BlackPawn, WhiteKnight, BlackKnight, WhiteBishop, BlackBishop,
    WhiteRook, BlackRook, WhiteQueen, BlackQueen, WhiteKing, BlackKing,
}

impl Piece {
    /// Number of elements in the Piece enum
    pub const NUM: usize = 12;
}

crate::impl_enum_index!(Piece);

/******************************************\
|==========================================|
|                Piece Type                |
|==========================================|
\******************************************/

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn, Knight, Bishop, Rook, Queen, King,
}

impl PieceType {
    /// Number of elements in the PieceType enum
    pub const NUM: usize = 6;

    /// Piece types that can be held in a reserve and dropped
    pub const DROPPABLE: [PieceType; 5] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ];
}

crate::impl_enum_index!(PieceType);

/******************************************\
|==========================================|
|              Implementation              |
|==========================================|
\******************************************/

impl Piece {
    /// Returns the piece type of the piece
    #[inline]
    pub const fn pt(self) -> PieceType {
        unsafe { PieceType::from_unchecked(self as u8 >> 1) }
    }

    /// Returns the colour of the piece
    #[inline]
    pub const fn colour(self) -> Colour {
        unsafe { Colour::from_unchecked(self as u8 & 1) }
    }

    /// Combines a colour and piece type pair into a piece
    #[inline]
    pub const fn from_parts(colour: Colour, piece_type: PieceType) -> Self {
        unsafe { Piece::from_unchecked(colour as u8 | (piece_type as u8) << 1) }
    }

    /// FEN letter, uppercase for White
    pub const fn to_char(self) -> char {
        let c = self.pt().to_char();
        match self.colour() {
            Colour::White => c.to_ascii_uppercase(),
            Colour::Black => c,
        }
    }

    /// Parses a FEN letter
    pub const fn from_char(c: char) -> Option<Self> {
        let colour = if c.is_ascii_uppercase() { Colour::White } else { Colour::Black };
        match PieceType::from_char(c) {
            Some(pt) => Some(Piece::from_parts(colour, pt)),
            None => None,
        }
    }
}

impl PieceType {
    /// Lowercase letter of the piece type
    pub const fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Parses a piece letter in either case
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Uppercase letter used in SAN (pawns have none but still map to 'P' for drops)
    pub const fn san_char(self) -> char {
        self.to_char().to_ascii_uppercase()
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::fmt::Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/******************************************\
|==========================================|
|                Parse Piece               |
|==========================================|
\******************************************/

impl std::str::FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::from_char(c).ok_or(ParsePieceError::InvalidChar(c)),
            _ => Err(ParsePieceError::InvalidLength(s.chars().count())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePieceError {
    #[error("Invalid length for piece string: {0}, expected 1")]
    InvalidLength(usize),
    #[error("Invalid character for piece string: '{0}', expected one of PNBRQK")]
    InvalidChar(char),
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
    fn test_piece_parts_round_trip() {
        for piece in Piece::iter() {
            assert_eq!(Piece::from_parts(piece.colour(), piece.pt()), piece);
        }
        assert_eq!(Piece::BlackKnight.pt(), PieceType::Knight);
        assert_eq!(Piece::BlackKnight.colour(), Colour::Black);
        assert_eq!(Piece::from_parts(Colour::White, PieceType::King), Piece::WhiteKing);
    }

    #[test]
    fn test_piece_chars() {
        assert_eq!(Piece::WhiteQueen.to_char(), 'Q');
        assert_eq!(Piece::BlackPawn.to_string(), "p");
        assert_eq!(Piece::from_char('R'), Some(Piece::WhiteRook));
        assert_eq!(Piece::from_char('k'), Some(Piece::BlackKing));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(PieceType::Knight.san_char(), 'N');
    }

    #[test]
    fn test_piece_from_str() {
        assert_eq!("P".parse::<Piece>(), Ok(Piece::WhitePawn));
        assert!(matches!("X".parse::<Piece>(), Err(ParsePieceError::InvalidChar('X'))));
        assert!(matches!("Pp".parse::<Piece>(), Err(ParsePieceError::InvalidLength(2))));
    }

    #[test]
    fn test_piece_type_order_follows_value() {
        assert!(PieceType::Pawn < PieceType::Knight);
        assert!(PieceType::Queen < PieceType::King);
        assert!(PieceType::Queen.is_slider());
        assert!(!PieceType::King.is_slider());
    }
}
