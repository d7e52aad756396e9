use crate::core::*;

/******************************************\
|==========================================|
|                Move Flags                |
|==========================================|
\******************************************/

/// Kind of ply a [`Move`] performs
#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveFlag {
    Quiet,
    DoublePawnPush,
    KingCastle,
    QueenCastle,
    Capture,
    EnPassant,
    Promotion,
    PromotionCapture,
    Drop,
}

impl MoveFlag {
    /// Number of elements in the MoveFlag enum
    pub const NUM: usize = 9;

    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(self, MoveFlag::Capture | MoveFlag::EnPassant | MoveFlag::PromotionCapture)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, MoveFlag::Promotion | MoveFlag::PromotionCapture)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }
}

crate::impl_enum_index!(MoveFlag);

/******************************************\
|==========================================|
|                   Move                   |
|==========================================|
\******************************************/

/// # Move representation
///
/// A single ply packed into 32 bits:
///
/// | bits  | field                        |
/// |-------|------------------------------|
/// | 0-5   | from square                  |
/// | 6-11  | to square                    |
/// | 12-15 | flag                         |
/// | 16-18 | moving piece type            |
/// | 19-21 | captured piece type (7 none) |
/// | 22-24 | promotion piece type (7 none)|
///
/// Castling moves go from the king's square to the king's destination, so the
/// same encoding covers Chess960. Drops have `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    data: u32,
}

impl Move {
    const FROM_SHIFT: u32 = 0;
    const TO_SHIFT: u32 = 6;
    const FLAG_SHIFT: u32 = 12;
    const PIECE_SHIFT: u32 = 16;
    const CAPTURED_SHIFT: u32 = 19;
    const PROMOTION_SHIFT: u32 = 22;

    const SQUARE_MASK: u32 = 0x3F;
    const FLAG_MASK: u32 = 0xF;
    const PIECE_MASK: u32 = 0x7;
    const NO_PIECE: u32 = 0x7;

    /// Builds a board move
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        flag: MoveFlag,
        piece: PieceType,
        captured: Option<PieceType>,
    ) -> Self {
        let captured = match captured {
            Some(pt) => pt as u32,
            None => Self::NO_PIECE,
        };

        let data = ((from as u32) << Self::FROM_SHIFT)
            | ((to as u32) << Self::TO_SHIFT)
            | ((flag as u32) << Self::FLAG_SHIFT)
            | ((piece as u32) << Self::PIECE_SHIFT)
            | (captured << Self::CAPTURED_SHIFT)
            | (Self::NO_PIECE << Self::PROMOTION_SHIFT);

        Self { data }
    }

    /// Builds a pawn promotion; the flag is derived from whether something is captured
    #[inline]
    pub const fn new_promotion(
        from: Square,
        to: Square,
        promotion: PieceType,
        captured: Option<PieceType>,
    ) -> Self {
        let flag = match captured {
            Some(_) => MoveFlag::PromotionCapture,
            None => MoveFlag::Promotion,
        };
        let base = Self::new(from, to, flag, PieceType::Pawn, captured);
        let data = (base.data & !(Self::PIECE_MASK << Self::PROMOTION_SHIFT))
            | ((promotion as u32) << Self::PROMOTION_SHIFT);

        Self { data }
    }

    /// Builds a drop of `piece` from the reserve onto `to`
    #[inline]
    pub const fn new_drop(piece: PieceType, to: Square) -> Self {
        Self::new(to, to, MoveFlag::Drop, piece, None)
    }

    #[inline]
    pub const fn from(&self) -> Square {
        unsafe { Square::from_unchecked(((self.data >> Self::FROM_SHIFT) & Self::SQUARE_MASK) as u8) }
    }

    #[inline]
    pub const fn to(&self) -> Square {
        unsafe { Square::from_unchecked(((self.data >> Self::TO_SHIFT) & Self::SQUARE_MASK) as u8) }
    }

    #[inline]
    pub const fn flag(&self) -> MoveFlag {
        unsafe { MoveFlag::from_unchecked(((self.data >> Self::FLAG_SHIFT) & Self::FLAG_MASK) as u8) }
    }

    /// Type of the piece making the move (the dropped piece for drops)
    #[inline]
    pub const fn piece(&self) -> PieceType {
        unsafe { PieceType::from_unchecked(((self.data >> Self::PIECE_SHIFT) & Self::PIECE_MASK) as u8) }
    }

    /// Type of the piece removed by the capture, if any
    #[inline]
    pub const fn captured(&self) -> Option<PieceType> {
        Self::decode_piece(self.data >> Self::CAPTURED_SHIFT)
    }

    /// Type the pawn promotes to, if any
    #[inline]
    pub const fn promotion(&self) -> Option<PieceType> {
        Self::decode_piece(self.data >> Self::PROMOTION_SHIFT)
    }

    #[inline]
    const fn decode_piece(bits: u32) -> Option<PieceType> {
        PieceType::from_index((bits & Self::PIECE_MASK) as u8)
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flag().is_capture()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.flag().is_promotion()
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.flag().is_castle()
    }

    #[inline]
    pub const fn is_drop(&self) -> bool {
        matches!(self.flag(), MoveFlag::Drop)
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_double_push(&self) -> bool {
        matches!(self.flag(), MoveFlag::DoublePawnPush)
    }

    /// True for pawn moves and captures, the moves that reset the half-move clock
    #[inline]
    pub const fn is_zeroing(&self) -> bool {
        (matches!(self.piece(), PieceType::Pawn) && !self.is_drop()) || self.is_capture()
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.data
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, `N@f3`
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_drop() {
            return write!(f, "{}@{}", self.piece().san_char(), self.to());
        }

        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::square::Square::*;

    #[test]
    fn test_encoding_basic() {
        let m = Move::new(E2, E4, MoveFlag::DoublePawnPush, PieceType::Pawn, None);
        assert_eq!(m.from(), E2);
        assert_eq!(m.to(), E4);
        assert_eq!(m.flag(), MoveFlag::DoublePawnPush);
        assert_eq!(m.piece(), PieceType::Pawn);
        assert_eq!(m.captured(), None);
        assert_eq!(m.promotion(), None);
        assert!(m.is_double_push());
        assert!(m.is_zeroing());
        assert_eq!(m.to_string(), "e2e4");
    }

    #[test]
    fn test_encoding_capture() {
        let m = Move::new(D4, C5, MoveFlag::Capture, PieceType::Bishop, Some(PieceType::Knight));
        assert!(m.is_capture());
        assert!(m.is_zeroing());
        assert_eq!(m.captured(), Some(PieceType::Knight));
        assert_eq!(m.piece(), PieceType::Bishop);
    }

    #[test]
    fn test_encoding_promotion() {
        let m = Move::new_promotion(B7, A8, PieceType::Knight, Some(PieceType::Rook));
        assert_eq!(m.flag(), MoveFlag::PromotionCapture);
        assert_eq!(m.promotion(), Some(PieceType::Knight));
        assert_eq!(m.captured(), Some(PieceType::Rook));
        assert_eq!(m.to_string(), "b7a8n");

        let king = Move::new_promotion(E7, E8, PieceType::King, None);
        assert_eq!(king.flag(), MoveFlag::Promotion);
        assert_eq!(king.promotion(), Some(PieceType::King));
    }

    #[test]
    fn test_encoding_castle_and_drop() {
        let castle = Move::new(E1, G1, MoveFlag::KingCastle, PieceType::King, None);
        assert!(castle.is_castle());
        assert!(!castle.is_zeroing());

        let drop = Move::new_drop(PieceType::Knight, F3);
        assert!(drop.is_drop());
        assert_eq!(drop.from(), F3);
        assert_eq!(drop.to(), F3);
        assert_eq!(drop.to_string(), "N@f3");

        let pawn_drop = Move::new_drop(PieceType::Pawn, E4);
        assert!(!pawn_drop.is_zeroing());
    }

    #[test]
    fn test_equality_covers_promotion_piece() {
        let queen = Move::new_promotion(A7, A8, PieceType::Queen, None);
        let rook = Move::new_promotion(A7, A8, PieceType::Rook, None);
        assert_ne!(queen, rook);
    }
}
