use super::{CaptureRouting, VariantPolicy};
use crate::core::*;
use crate::movegen::between;
use crate::position::Position;

/// Drop chess. Captured pieces join a reserve, either the capturer's own
/// (crazyhouse) or the partner's on the other board (bughouse).
#[derive(Debug, Clone, Copy)]
pub struct Crazyhouse {
    routing: CaptureRouting,
}

impl Crazyhouse {
    pub const fn new(routing: CaptureRouting) -> Self {
        Self { routing }
    }
}

impl VariantPolicy for Crazyhouse {
    fn capture_routing(&self) -> CaptureRouting {
        self.routing
    }

    /// Empty squares, never a pawn on the first or last rank. When `colour`
    /// is in check only interpositions survive, and nothing under double check.
    fn drop_targets(&self, pos: &Position, pt: PieceType, colour: Colour) -> Bitboard {
        let mut targets = !pos.occupied();
        if pt == PieceType::Pawn {
            targets &= !Bitboard::BACK_RANKS;
        }

        if colour == pos.side_to_move() {
            let checkers = pos.checkers();
            if checkers.more_than_one() {
                return Bitboard::EMPTY;
            }
            if let (Some(checker), Some(ksq)) = (checkers.lsb(), pos.king_square(colour)) {
                targets &= between(checker, ksq);
            }
        }

        targets
    }

    /// Material can always come back through a drop
    fn is_insufficient_material(&self, _pos: &Position) -> bool {
        false
    }
}
