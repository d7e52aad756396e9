//! # Module: `movegen`
//!
//! Legal move generation for every variant.
//!
//! ## Pipeline
//!
//! 1. **Pseudo-legal moves**: produced by [`pseudo`] from the attack tables in
//!    [`lookup`], including castling and drops.
//! 2. **King safety**: each move is played on a copy of the position and rejected
//!    if the mover's king is left in check, as the variant defines check.
//! 3. **Variant filter**: [`VariantPolicy::is_legal_extra`] removes moves the
//!    variant forbids outright, such as a king capture in atomic.
//! 4. **Forced captures**: when the variant forces captures and one exists, every
//!    non-capture is dropped.
//! 5. **Ordering**: moves are sorted by piece type, origin and destination so
//!    the list is reproducible.
//!
//! [`VariantPolicy::is_legal_extra`]: crate::variant::VariantPolicy::is_legal_extra

mod init;
mod lookup;
mod pseudo;

pub use lookup::{
    aligned, attacks, between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks,
    queen_attacks, rook_attacks,
};

use tracing::{error, trace};

use crate::core::*;
use crate::position::Position;
use crate::variant::{KingRule, KingSafety};

impl Position {
    /// Every legal move for the side to move, in a fixed order.
    ///
    /// Moves are ordered by piece type, then origin, destination and promotion
    /// piece. A drop sorts after the board moves of its piece type.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantViolation`] if the position is internally
    /// inconsistent. That only happens through a bug, never through input.
    pub fn legal_moves(&self) -> Result<Vec<Move>, InvariantViolation> {
        self.check_king_counts()
            .inspect_err(|err| error!(%err, fen = %self.fen(), "king count broken"))?;
        #[cfg(debug_assertions)]
        self.validate()?;

        let mut moves = Vec::with_capacity(64);
        self.generate_legal(&mut moves);

        trace!(fen = %self.fen(), count = moves.len(), "generated legal moves");
        Ok(moves)
    }

    /// True if `mv` is one of the legal moves of this position
    pub fn is_legal(&self, mv: Move) -> bool {
        let mut moves = Vec::with_capacity(64);
        self.generate_legal(&mut moves);
        moves.contains(&mv)
    }

    /// Fills `out` with the legal moves without validating the position first
    pub(crate) fn generate_legal(&self, out: &mut Vec<Move>) {
        let policy = self.variant().policy();

        out.clear();
        pseudo::generate_pseudo_legal(self, out);
        out.retain(|&mv| self.keeps_king_safe(mv) && policy.is_legal_extra(mv, self));

        if policy.captures_forced() && out.iter().any(Move::is_capture) {
            out.retain(Move::is_capture);
        }

        out.sort_unstable_by_key(|mv| (mv.piece(), mv.is_drop(), mv.from(), mv.to(), mv.promotion()));
    }

    /// Plays `mv` on a copy and checks the mover's king against the variant's
    /// notion of check.
    fn keeps_king_safe(&self, mv: Move) -> bool {
        let us = self.side_to_move();
        let safety = self.variant().policy().king_safety();
        if safety == KingSafety::None {
            return true;
        }

        let mut next = self.clone();
        next.apply_raw(mv);

        let Some(ksq) = next.king_square(us) else {
            // Only possible in atomic, where losing the king is never legal
            return false;
        };

        match safety {
            KingSafety::Standard => !next.is_attacked(ksq, !us),
            KingSafety::Atomic => {
                let their_king = next.pieces_of(!us, PieceType::King);
                their_king.is_empty()
                    || (king_attacks(ksq) & their_king).is_occupied()
                    || (next.attacks_on(ksq, !us) & !their_king).is_empty()
            }
            KingSafety::None => true,
        }
    }

    /// Cheap king count check run before every generation
    fn check_king_counts(&self) -> Result<(), InvariantViolation> {
        let rule = self.variant().policy().king_rule();
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

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
