//! # Module: `lookup`
//!
//! Precomputed attack and geometry tables plus the functions that query them.
//!
//! ## Key Components
//!
//! - **Attack Tables**: `PAWN_ATTACKS`, `KNIGHT_ATTACKS` and `KING_ATTACKS` hold the
//!   fixed attack sets of the leaping pieces.
//! - **Rays**: `RAYS` holds the empty-board ray from every square in each of the eight
//!   king directions. Sliding attacks are derived from them by cutting each ray at
//!   its first blocker.
//! - **Geometry**: `BETWEEN` and `LINE` describe the squares between and through two
//!   aligned squares. They drive check evasion for drops and castling path checks.

use super::init::*;
use crate::core::{Bitboard, Colour, Direction, Piece, PieceType, Square};

/******************************************\
|==========================================|
|              Type Definitions            |
|==========================================|
\******************************************/

/// Attack table for a single piece type indexed by square
pub(super) type AttackTable = [Bitboard; Square::NUM];
/// Attack table for pawns indexed by colour and square
type PawnAttackTable = [[Bitboard; Square::NUM]; Colour::NUM];
/// Rays indexed by direction slot in `Direction::KING` and square
pub(super) type RayTable = [[Bitboard; Square::NUM]; 8];
/// Table mapping square pairs to bitboards
pub(super) type SquarePairTable = [[Bitboard; Square::NUM]; Square::NUM];

/******************************************\
|==========================================|
|              Attack Tables               |
|==========================================|
\******************************************/

static PAWN_ATTACKS: PawnAttackTable = [
    init_leaper_attacks(&Colour::White.pawn_captures()),
    init_leaper_attacks(&Colour::Black.pawn_captures()),
];

static KNIGHT_ATTACKS: AttackTable = init_leaper_attacks(&Direction::KNIGHT);

static KING_ATTACKS: AttackTable = init_leaper_attacks(&Direction::KING);

const RAY_TABLE: RayTable = init_ray_table();

static RAYS: RayTable = RAY_TABLE;

static BETWEEN: SquarePairTable = init_between_table();

static LINE: SquarePairTable = init_line_table(&RAY_TABLE);

// Direction slots in `Direction::KING`
const ORTHOGONAL_SLOTS: [usize; 4] = [0, 2, 4, 6];
const DIAGONAL_SLOTS: [usize; 4] = [1, 3, 5, 7];

/******************************************\
|==========================================|
|             Attack Functions             |
|==========================================|
\******************************************/

/// Squares a pawn of `colour` on `sq` attacks
#[inline]
pub fn pawn_attacks(colour: Colour, sq: Square) -> Bitboard {
    PAWN_ATTACKS[colour.index()][sq.index()]
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Ray from `sq` in the given `Direction::KING` slot, cut after the first occupied square
#[inline]
fn ray_attacks(slot: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[slot][sq.index()];
    let blockers = ray & occupied;

    let nearest = if Direction::KING[slot].is_positive() { blockers.lsb() } else { blockers.msb() };

    match nearest {
        Some(blocker) => ray ^ RAYS[slot][blocker.index()],
        None => ray,
    }
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    DIAGONAL_SLOTS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &slot| acc | ray_attacks(slot, sq, occupied))
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ORTHOGONAL_SLOTS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &slot| acc | ray_attacks(slot, sq, occupied))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Attack set of any piece standing on `sq` given the board occupancy
pub fn attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece.pt() {
        PieceType::Pawn => pawn_attacks(piece.colour(), sq),
        PieceType::Knight => knight_attacks(sq),
        PieceType::Bishop => bishop_attacks(sq, occupied),
        PieceType::Rook => rook_attacks(sq, occupied),
        PieceType::Queen => queen_attacks(sq, occupied),
        PieceType::King => king_attacks(sq),
    }
}

/******************************************\
|==========================================|
|            Geometry Functions            |
|==========================================|
\******************************************/

/// Squares strictly between `a` and `b`, empty when they are not on a shared line
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index()][b.index()]
}

/// Whole board line through `a` and `b`, empty when they are not aligned
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    LINE[a.index()][b.index()]
}

/// True if `c` sits on the line through `a` and `b`
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line(a, b).contains(c)
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use Square::*;

    #[test]
    fn test_leaper_attacks() {
        assert_eq!(knight_attacks(A1), Bitboard::from([B3, C2]));
        assert_eq!(knight_attacks(E4).count_bits(), 8);
        assert_eq!(king_attacks(H8), Bitboard::from([G8, G7, H7]));
        assert_eq!(pawn_attacks(Colour::White, E4), Bitboard::from([D5, F5]));
        assert_eq!(pawn_attacks(Colour::Black, A7), Bitboard::from([B6]));
        assert_eq!(pawn_attacks(Colour::White, H8), Bitboard::EMPTY);
    }

    #[test]
    fn test_slider_attacks_on_empty_board() {
        assert_eq!(rook_attacks(A1, Bitboard::EMPTY).count_bits(), 14);
        assert_eq!(bishop_attacks(D4, Bitboard::EMPTY).count_bits(), 13);
        assert_eq!(queen_attacks(D4, Bitboard::EMPTY).count_bits(), 27);
    }

    #[test]
    fn test_slider_attacks_stop_at_blockers() {
        let occupied = Bitboard::from([D6, B4, D2, G7]);
        let rook = rook_attacks(D4, occupied);
        assert_eq!(
            rook,
            Bitboard::from([D5, D6, D3, D2, C4, B4, E4, F4, G4, H4])
        );

        let bishop = bishop_attacks(D4, occupied);
        assert!(bishop.contains(G7));
        assert!(!bishop.contains(H8));
        assert!(bishop.contains(A1));
    }

    #[test]
    fn test_between_and_line() {
        assert_eq!(between(E1, H1), Bitboard::from([F1, G1]));
        assert_eq!(between(H1, E1), Bitboard::from([F1, G1]));
        assert_eq!(between(A8, H1).count_bits(), 6);
        assert_eq!(between(A1, C2), Bitboard::EMPTY);

        assert_eq!(line(B2, D4).count_bits(), 8);
        assert!(line(B2, D4).contains(H8));
        assert!(aligned(A1, C3, H8));
        assert!(!aligned(A1, C3, H7));
        assert_eq!(line(A1, B3), Bitboard::EMPTY);
    }

    #[test]
    fn test_attacks_by_piece() {
        let occupied = Bitboard::EMPTY;
        assert_eq!(attacks(Piece::BlackPawn, E5, occupied), Bitboard::from([D4, F4]));
        assert_eq!(attacks(Piece::WhiteKnight, G1, occupied), Bitboard::from([E2, F3, H3]));
        assert_eq!(attacks(Piece::WhiteKing, E1, occupied).count_bits(), 5);
    }
}
