pub mod castling;
pub mod fen;
pub mod movement;
pub mod reserve;
pub mod zobrist;

pub use castling::CastlingRooks;
pub use fen::{ENDGAME_FEN, KIWIPETE_FEN, START_FEN};
pub use movement::PriorState;
pub use reserve::Reserves;
pub use zobrist::Key;

use tracing::error;

use crate::core::*;
use crate::movegen::{attacks, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::variant::{KingRule, KingSafety, Variant};

/******************************************\
|==========================================|
|                 Position                 |
|==========================================|
\******************************************/

/// Full board state of one game at one ply.
///
/// Piece placement lives in a mailbox and in per-type and per-colour
/// bitboards that are always kept in step. The position is a plain value:
/// cloning it gives an independent snapshot.
#[derive(Debug, Clone)]
pub struct Position {
    board: [Option<Piece>; Square::NUM],

    pieces: [Bitboard; PieceType::NUM],

    occupied: [Bitboard; Colour::NUM],

    stm: Colour,

    castling: Castling,

    castling_rooks: CastlingRooks,

    ep: Option<Square>,

    halfmove: u32,

    fullmove: u32,

    reserves: Reserves,

    /// Pieces that started life as pawns, tracked in drop variants only
    promoted: Bitboard,

    chess960: bool,

    variant: Variant,

    key: Key,
}

/******************************************\
|==========================================|
|           Basic Implementation           |
|==========================================|
\******************************************/

impl Position {
    pub(crate) fn empty(variant: Variant) -> Position {
        Position {
            board: [None; Square::NUM],
            pieces: [Bitboard::EMPTY; PieceType::NUM],
            occupied: [Bitboard::EMPTY; Colour::NUM],
            stm: Colour::White,
            castling: Castling::NONE,
            castling_rooks: CastlingRooks::default(),
            ep: None,
            halfmove: 0,
            fullmove: 1,
            reserves: Reserves::default(),
            promoted: Bitboard::EMPTY,
            chess960: variant == Variant::FischerRandom,
            variant,
            key: 0,
        }
    }

    /// The standard starting setup under the given variant's rules
    pub fn startpos(variant: Variant) -> Position {
        // Index 518 is the standard arrangement
        Self::chess960_with_variant(518, variant).unwrap_or_else(|| Position::empty(variant))
    }

    /// Chess960 start position by Scharnagl number (0..=959), or `None` when out of range
    pub fn chess960(index: u16) -> Option<Position> {
        let mut pos = Self::chess960_with_variant(index, Variant::FischerRandom)?;
        pos.chess960 = true;
        Some(pos)
    }

    fn chess960_with_variant(index: u16, variant: Variant) -> Option<Position> {
        const KNIGHT_PAIRS: [(usize, usize); 10] =
            [(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];

        if index > 959 {
            return None;
        }

        let mut back: [Option<PieceType>; File::NUM] = [None; File::NUM];
        let mut n = index as usize;

        back[2 * (n % 4) + 1] = Some(PieceType::Bishop);
        n /= 4;
        back[2 * (n % 4)] = Some(PieceType::Bishop);
        n /= 4;

        let place_nth_empty = |back: &mut [Option<PieceType>; 8], nth: usize, pt: PieceType| {
            if let Some(slot) = back.iter_mut().filter(|s| s.is_none()).nth(nth) {
                *slot = Some(pt);
            }
        };

        place_nth_empty(&mut back, n % 6, PieceType::Queen);
        n /= 6;

        let (first, second) = KNIGHT_PAIRS[n];
        // Placing the second knight first keeps the first index stable
        place_nth_empty(&mut back, second, PieceType::Knight);
        place_nth_empty(&mut back, first, PieceType::Knight);

        for pt in [PieceType::Rook, PieceType::King, PieceType::Rook] {
            place_nth_empty(&mut back, 0, pt);
        }

        let mut pos = Position::empty(variant);
        for colour in Colour::iter() {
            let home = colour.back_rank();
            let pawns = Rank::Rank2.relative(colour);
            for file in File::iter() {
                if let Some(pt) = back[file.index()] {
                    pos.put_piece(Piece::from_parts(colour, pt), Square::from_parts(file, home));
                }
                pos.put_piece(Piece::from_parts(colour, PieceType::Pawn), Square::from_parts(file, pawns));
            }

            let king_sq = pos.king_square(colour)?;
            let rooks = pos.pieces_of(colour, PieceType::Rook);
            let (queen_rook, king_rook) = (rooks.lsb()?, rooks.msb()?);
            pos.castling_rooks.add(Castling::king_side(colour), king_sq, king_rook);
            pos.castling_rooks.add(Castling::queen_side(colour), king_sq, queen_rook);
        }

        if variant.policy().castling_allowed() {
            pos.castling = Castling::ALL;
        }
        pos.key = pos.calc_key();
        Some(pos)
    }

    /******************************************\
    |==========================================|
    |                Accessors                 |
    |==========================================|
    \******************************************/

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Colour {
        self.stm
    }

    #[inline]
    pub fn castling(&self) -> Castling {
        self.castling
    }

    #[inline]
    pub fn castling_rooks(&self) -> &CastlingRooks {
        &self.castling_rooks
    }

    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove
    }

    #[inline]
    pub fn reserves(&self) -> &Reserves {
        &self.reserves
    }

    #[inline]
    pub fn promoted(&self) -> Bitboard {
        self.promoted
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    #[inline]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Every piece of a type, both colours
    #[inline]
    pub fn pieces(&self, pt: PieceType) -> Bitboard {
        self.pieces[pt.index()]
    }

    #[inline]
    pub fn colour_bb(&self, colour: Colour) -> Bitboard {
        self.occupied[colour.index()]
    }

    #[inline]
    pub fn pieces_of(&self, colour: Colour, pt: PieceType) -> Bitboard {
        self.pieces[pt.index()] & self.occupied[colour.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    /// Square of `colour`'s king, the lowest one if the variant allows several
    #[inline]
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.pieces_of(colour, PieceType::King).lsb()
    }

    /******************************************\
    |==========================================|
    |                 Attacks                  |
    |==========================================|
    \******************************************/

    /// Squares of every `by` piece attacking `sq` with the current occupancy
    #[inline]
    pub fn attacks_on(&self, sq: Square, by: Colour) -> Bitboard {
        self.attackers_with(sq, by, self.occupied())
    }

    /// Attackers of `sq` computed against an arbitrary occupancy
    pub fn attackers_with(&self, sq: Square, by: Colour, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(PieceType::Bishop) | self.pieces(PieceType::Queen);
        let orthogonal = self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen);

        let attackers = (pawn_attacks(!by, sq) & self.pieces(PieceType::Pawn))
            | (knight_attacks(sq) & self.pieces(PieceType::Knight))
            | (king_attacks(sq) & self.pieces(PieceType::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & orthogonal);

        attackers & self.colour_bb(by) & occupied
    }

    #[inline]
    pub fn is_attacked(&self, sq: Square, by: Colour) -> bool {
        self.attacks_on(sq, by).is_occupied()
    }

    /// Every square `colour` attacks
    pub fn attacked_by(&self, colour: Colour) -> Bitboard {
        let occupied = self.occupied();
        self.colour_bb(colour).fold(Bitboard::EMPTY, |acc, sq| match self.piece_at(sq) {
            Some(piece) => acc | attacks(piece, sq, occupied),
            None => acc,
        })
    }

    /// Pieces giving check to the side to move, under the variant's notion of check
    pub fn checkers(&self) -> Bitboard {
        let us = self.stm;
        let Some(ksq) = self.king_square(us) else {
            return Bitboard::EMPTY;
        };

        match self.variant.policy().king_safety() {
            KingSafety::None => Bitboard::EMPTY,
            KingSafety::Standard => self.attacks_on(ksq, !us),
            KingSafety::Atomic => {
                let their_king = self.pieces_of(!us, PieceType::King);
                if their_king.is_empty() || (king_attacks(ksq) & their_king).is_occupied() {
                    return Bitboard::EMPTY;
                }
                self.attacks_on(ksq, !us) & !their_king
            }
        }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_occupied()
    }

    /******************************************\
    |==========================================|
    |                Validation                |
    |==========================================|
    \******************************************/

    /// Confirms the internal representation is self-consistent and the king counts
    /// suit the variant. A failure means a bug, not bad input.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.check_invariants();
        if let Err(err) = &result {
            error!(%err, fen = %self.fen(), "position failed validation");
        }
        result
    }

    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let overlap = self.occupied[0] & self.occupied[1];
        if overlap.is_occupied() {
            return Err(InvariantViolation::OverlappingColours(overlap.0));
        }

        let by_type = self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        let piece_total: u32 = self.pieces.iter().map(|bb| bb.count_bits()).sum();
        if by_type != self.occupied() || piece_total != self.occupied().count_bits() {
            return Err(InvariantViolation::OccupancyMismatch);
        }

        for sq in Square::iter() {
            let from_bitboards = self.occupied().contains(sq).then(|| {
                let colour = if self.occupied[0].contains(sq) { Colour::White } else { Colour::Black };
                PieceType::iter().find(|pt| self.pieces(*pt).contains(sq)).map(|pt| Piece::from_parts(colour, pt))
            });
            if from_bitboards.flatten() != self.board[sq.index()] {
                return Err(InvariantViolation::MailboxMismatch(sq));
            }
        }

        let rule = self.variant.policy().king_rule();
        for colour in Colour::iter() {
            let count = self.pieces_of(colour, PieceType::King).count_bits();
            match (rule, count) {
                (KingRule::ExactlyOne, 0) => return Err(InvariantViolation::MissingKing(colour)),
                (KingRule::ExactlyOne | KingRule::AtMostOne, n) if n > 1 => {
                    return Err(InvariantViolation::TooManyKings { colour, count: n });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Positions are equal when everything observable matches: placement, side to
/// move, castling rights with their rooks, en passant square, clocks, reserves
/// and promoted markers.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        let held_rooks = |pos: &Position| {
            Castling::SINGLES.map(|right| {
                pos.castling.has(right).then(|| pos.castling_rooks.rook_sq(right)).flatten()
            })
        };

        self.board == other.board
            && self.stm == other.stm
            && self.castling == other.castling
            && held_rooks(self) == held_rooks(other)
            && self.ep == other.ep
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.reserves == other.reserves
            && self.promoted == other.promoted
            && self.variant == other.variant
    }
}

impl Eq for Position {}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SEPARATOR: &str = "     +---+---+---+---+---+---+---+---+";

        writeln!(f, "{SEPARATOR}")?;
        for rank in Rank::iter().rev() {
            write!(f, " {rank}   |")?;
            for file in File::iter() {
                match self.piece_at(Square::from_parts(file, rank)) {
                    Some(piece) => write!(f, " {piece} |")?,
                    None => write!(f, "   |")?,
                }
            }
            writeln!(f)?;
            writeln!(f, "{SEPARATOR}")?;
        }
        writeln!(f, "       a   b   c   d   e   f   g   h")?;
        write!(f, "FEN: {}", self.fen())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos(Variant::Standard)
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
