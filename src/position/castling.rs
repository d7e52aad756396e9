use crate::core::*;

/******************************************\
|==========================================|
|              Castling Rooks              |
|==========================================|
\******************************************/

/// Where the castling rooks stand and which rights survive a move touching each square.
///
/// Rights are lost when anything moves from or to the king's or a rook's
/// starting square, so `keep[sq]` holds every right that does not depend on `sq`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CastlingRooks {
    keep: [Castling; Square::NUM],

    rook_sq: [Option<Square>; 4],
}

impl Default for CastlingRooks {
    fn default() -> Self {
        Self {
            keep: [Castling::ALL; Square::NUM],
            rook_sq: [None; 4],
        }
    }
}

impl CastlingRooks {
    /// Registers the rook that castles for `right` with the king on `king_sq`
    pub fn add(&mut self, right: Castling, king_sq: Square, rook_sq: Square) {
        self.rook_sq[right.slot()] = Some(rook_sq);
        self.keep[king_sq.index()].remove(right);
        self.keep[rook_sq.index()].remove(right);
    }

    /// Starting square of the rook tied to a single right
    #[inline]
    pub fn rook_sq(&self, right: Castling) -> Option<Square> {
        self.rook_sq[right.slot()]
    }

    /// Rights that survive a piece leaving, entering or exploding on `sq`
    #[inline]
    pub fn keep(&self, sq: Square) -> Castling {
        self.keep[sq.index()]
    }
}

/// King and rook destinations of a castling move, `(king_to, rook_to)`
pub const fn castle_targets(colour: Colour, king_side: bool) -> (Square, Square) {
    let (king_to, rook_to) = if king_side { (Square::G1, Square::F1) } else { (Square::C1, Square::D1) };
    (king_to.relative(colour), rook_to.relative(colour))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_lost_from_king_and_rook_squares() {
        let mut rooks = CastlingRooks::default();
        rooks.add(Castling::WK, Square::E1, Square::H1);
        rooks.add(Castling::WQ, Square::E1, Square::A1);

        assert_eq!(rooks.keep(Square::E1), Castling::BLACK_CASTLING);
        assert_eq!(rooks.keep(Square::H1), !Castling::WK);
        assert_eq!(rooks.keep(Square::D4), Castling::ALL);
        assert_eq!(rooks.rook_sq(Castling::WQ), Some(Square::A1));
        assert_eq!(rooks.rook_sq(Castling::BK), None);
    }

    #[test]
    fn test_castle_targets() {
        assert_eq!(castle_targets(Colour::White, true), (Square::G1, Square::F1));
        assert_eq!(castle_targets(Colour::Black, false), (Square::C8, Square::D8));
    }
}
