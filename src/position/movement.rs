use super::castling::castle_targets;
use super::zobrist::{castle_key, piece_key, reserve_key, side_key};
use super::{Key, Position, Reserves};
use crate::core::*;
use crate::movegen::king_attacks;
use crate::variant::CaptureRouting;

/******************************************\
|==========================================|
|               Prior State                |
|==========================================|
\******************************************/

/// Everything `undo_raw` needs that cannot be read back from the move itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorState {
    castling: Castling,
    ep: Option<Square>,
    halfmove: u32,
    fullmove: u32,
    reserves: Reserves,
    promoted: Bitboard,
    key: Key,
    captured: Option<(Square, Piece)>,
    exploded: Vec<(Square, Piece)>,
    passed_to_partner: Option<Piece>,
}

impl PriorState {
    /// Piece removed by the move's capture and where it stood
    #[inline]
    pub fn captured(&self) -> Option<(Square, Piece)> {
        self.captured
    }

    /// Pieces removed by an atomic explosion, the capturer included
    #[inline]
    pub fn exploded(&self) -> &[(Square, Piece)] {
        &self.exploded
    }

    /// Captured piece to hand to the partner board in bughouse, already demoted
    #[inline]
    pub fn passed_to_partner(&self) -> Option<Piece> {
        self.passed_to_partner
    }
}

/******************************************\
|==========================================|
|            Piece Manipulation            |
|==========================================|
\******************************************/

impl Position {
    /// Puts `piece` on an empty `sq`
    #[inline]
    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none(), "{sq} is occupied");

        self.board[sq.index()] = Some(piece);
        self.pieces[piece.pt().index()].set(sq);
        self.occupied[piece.colour().index()].set(sq);
        self.key ^= piece_key(piece, sq);
    }

    /// Lifts whatever stands on `sq`
    #[inline]
    pub(crate) fn take_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take()?;

        self.pieces[piece.pt().index()].clear(sq);
        self.occupied[piece.colour().index()].clear(sq);
        self.key ^= piece_key(piece, sq);
        Some(piece)
    }

    /// Sets a reserve count and keeps the key in step
    pub(crate) fn set_reserve(&mut self, colour: Colour, pt: PieceType, count: u8) {
        let old = self.reserves.count(colour, pt);
        self.key ^= reserve_key(colour, pt, old) ^ reserve_key(colour, pt, count);
        self.reserves.set_count(colour, pt, count);
    }

    pub(crate) fn add_to_reserve(&mut self, colour: Colour, pt: PieceType) {
        let count = self.reserves.count(colour, pt).saturating_add(1);
        self.set_reserve(colour, pt, count);
    }

    fn take_from_reserve(&mut self, colour: Colour, pt: PieceType) {
        let count = self.reserves.count(colour, pt).saturating_sub(1);
        self.set_reserve(colour, pt, count);
    }

    /// Sets the castling rights and keeps the key in step
    fn set_castling(&mut self, castling: Castling) {
        self.key ^= castle_key(self.castling) ^ castle_key(castling);
        self.castling = castling;
    }

    /// Moves the promoted marker along with its piece
    fn carry_promoted(&mut self, from: Square, to: Square) {
        if self.promoted.contains(from) {
            self.promoted.clear(from);
            self.promoted.set(to);
        }
    }
}

/******************************************\
|==========================================|
|                Apply Move                |
|==========================================|
\******************************************/

impl Position {
    /// Plays `mv` without any legality checking.
    ///
    /// Updates placement, castling rights, the en passant square, both clocks,
    /// reserves and the key. The returned snapshot restores the position
    /// exactly through [`Position::undo_raw`].
    pub fn apply_raw(&mut self, mv: Move) -> PriorState {
        let policy = self.variant.policy();
        let routing = policy.capture_routing();
        let us = self.stm;
        let from = mv.from();
        let to = mv.to();

        let mut prior = PriorState {
            castling: self.castling,
            ep: self.ep,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            reserves: self.reserves,
            promoted: self.promoted,
            key: self.key,
            captured: None,
            exploded: Vec::new(),
            passed_to_partner: None,
        };

        self.key ^= self.ep_key_contribution();
        self.ep = None;
        let mut castling = self.castling;

        if mv.is_drop() {
            self.take_from_reserve(us, mv.piece());
            self.put_piece(Piece::from_parts(us, mv.piece()), to);
        } else if mv.is_castle() {
            let king_side = mv.flag() == MoveFlag::KingCastle;
            let right = if king_side { Castling::king_side(us) } else { Castling::queen_side(us) };
            let (king_to, rook_to) = castle_targets(us, king_side);

            // Lift both first: in Chess960 either may land on the other's square
            let king = self.take_piece(from);
            let rook = self.castling_rooks.rook_sq(right).and_then(|sq| self.take_piece(sq));
            if let Some(king) = king {
                self.put_piece(king, king_to);
            }
            if let Some(rook) = rook {
                self.put_piece(rook, rook_to);
            }

            castling.remove(Castling::for_colour(us));
        } else {
            let capture_sq = match mv.is_en_passant() {
                true => Square::from_parts(to.file(), from.rank()),
                false => to,
            };

            let moving = self.take_piece(from);

            if let Some(victim) = self.take_piece(capture_sq) {
                let demoted = match self.promoted.contains(capture_sq) {
                    true => PieceType::Pawn,
                    false => victim.pt(),
                };
                self.promoted.clear(capture_sq);
                prior.captured = Some((capture_sq, victim));

                match routing {
                    _ if demoted == PieceType::King => {}
                    CaptureRouting::Own => self.add_to_reserve(us, demoted),
                    CaptureRouting::Partner => {
                        prior.passed_to_partner = Some(Piece::from_parts(victim.colour(), demoted));
                    }
                    CaptureRouting::Discard => {}
                }
            }

            let placed = mv.promotion().map(|pt| Piece::from_parts(us, pt)).or(moving);
            if let Some(piece) = placed {
                self.put_piece(piece, to);
            }

            if routing != CaptureRouting::Discard {
                self.carry_promoted(from, to);
                if mv.is_promotion() {
                    self.promoted.set(to);
                }
            }

            if mv.is_double_push() {
                self.ep = from.add(us.forward());
            }

            castling.mask(self.castling_rooks.keep(from) & self.castling_rooks.keep(to));

            if policy.explodes_on_capture() && mv.is_capture() {
                let blast = (king_attacks(to) & self.occupied() & !self.pieces(PieceType::Pawn)) | to.bb();
                for sq in blast {
                    if let Some(piece) = self.take_piece(sq) {
                        prior.exploded.push((sq, piece));
                        castling.mask(self.castling_rooks.keep(sq));
                    }
                }
            }
        }

        self.set_castling(castling);

        self.halfmove = if mv.is_zeroing() { 0 } else { self.halfmove.saturating_add(1) };
        if us == Colour::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }

        self.stm = !us;
        self.key ^= side_key();
        self.key ^= self.ep_key_contribution();

        prior
    }

    /******************************************\
    |==========================================|
    |                Undo Move                 |
    |==========================================|
    \******************************************/

    /// Reverses `apply_raw(mv)` given the snapshot it returned
    pub fn undo_raw(&mut self, mv: Move, prior: &PriorState) {
        let us = !self.stm;
        let from = mv.from();
        let to = mv.to();

        for &(sq, piece) in prior.exploded.iter().rev() {
            self.put_piece(piece, sq);
        }

        if mv.is_drop() {
            self.take_piece(to);
        } else if mv.is_castle() {
            let king_side = mv.flag() == MoveFlag::KingCastle;
            let right = if king_side { Castling::king_side(us) } else { Castling::queen_side(us) };
            let (king_to, rook_to) = castle_targets(us, king_side);

            let king = self.take_piece(king_to);
            let rook = self.take_piece(rook_to);
            if let Some(king) = king {
                self.put_piece(king, from);
            }
            if let (Some(rook), Some(rook_from)) = (rook, self.castling_rooks.rook_sq(right)) {
                self.put_piece(rook, rook_from);
            }
        } else {
            let moved = self.take_piece(to);
            let original = match mv.is_promotion() {
                true => Some(Piece::from_parts(us, PieceType::Pawn)),
                false => moved,
            };
            if let Some(piece) = original {
                self.put_piece(piece, from);
            }
            if let Some((sq, victim)) = prior.captured {
                self.put_piece(victim, sq);
            }
        }

        self.castling = prior.castling;
        self.ep = prior.ep;
        self.halfmove = prior.halfmove;
        self.fullmove = prior.fullmove;
        self.reserves = prior.reserves;
        self.promoted = prior.promoted;
        self.key = prior.key;
        self.stm = us;
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
