use super::{KingRule, KingSafety, VariantPolicy};
use crate::core::*;
use crate::game::GameStatus;
use crate::position::Position;

/// Atomic chess. Every capture explodes the capturing piece together with all
/// non-pawns next to the target square.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atomic;

impl Atomic {
    /// `colour` can never explode the enemy king with the material left
    fn cannot_win(pos: &Position, colour: Colour) -> bool {
        let kings = pos.pieces(PieceType::King);
        let ours = pos.colour_bb(colour);
        let theirs = pos.colour_bb(!colour);

        if (theirs & kings).is_empty() {
            return false;
        }
        if (ours & !kings).is_empty() {
            return true;
        }

        // Enemy pieces near their king can still be blown up, unless only
        // bishops that never meet are left
        if (theirs & !kings).is_occupied() {
            let bishops = pos.pieces(PieceType::Bishop);
            if pos.occupied() == kings | bishops {
                let white = bishops & pos.colour_bb(Colour::White);
                let black = bishops & pos.colour_bb(Colour::Black);
                if (white & Bitboard::DARK_SQUARES).is_empty() {
                    return (black & Bitboard::LIGHT_SQUARES).is_empty();
                }
                if (white & Bitboard::LIGHT_SQUARES).is_empty() {
                    return (black & Bitboard::DARK_SQUARES).is_empty();
                }
            }
            return false;
        }

        if (pos.pieces(PieceType::Queen) | pos.pieces(PieceType::Pawn)).is_occupied() {
            return false;
        }

        let minors_and_rooks =
            pos.pieces(PieceType::Knight) | pos.pieces(PieceType::Bishop) | pos.pieces(PieceType::Rook);
        if minors_and_rooks.count_bits() == 1 {
            return true;
        }

        pos.occupied() == kings | pos.pieces(PieceType::Knight) && pos.pieces(PieceType::Knight).count_bits() <= 2
    }
}

impl VariantPolicy for Atomic {
    fn king_safety(&self) -> KingSafety {
        KingSafety::Atomic
    }

    fn king_rule(&self) -> KingRule {
        KingRule::AtMostOne
    }

    fn explodes_on_capture(&self) -> bool {
        true
    }

    /// Kings never capture, the blast would take them too
    fn is_legal_extra(&self, mv: Move, _pos: &Position) -> bool {
        !(mv.piece() == PieceType::King && mv.is_capture())
    }

    fn check_termination(&self, pos: &Position, legal_count: usize, in_check: bool) -> Option<GameStatus> {
        let us = pos.side_to_move();
        if pos.king_square(us).is_none() {
            return Some(GameStatus::KingExploded { winner: !us });
        }
        if pos.king_square(!us).is_none() {
            return Some(GameStatus::KingExploded { winner: us });
        }

        match (legal_count, in_check) {
            (0, true) => Some(GameStatus::Checkmate { winner: !us }),
            (0, false) => Some(GameStatus::Stalemate),
            _ => None,
        }
    }

    fn is_insufficient_material(&self, pos: &Position) -> bool {
        Colour::iter().all(|colour| Self::cannot_win(pos, colour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen, Variant::Atomic).unwrap()
    }

    #[test]
    fn test_exploded_king_ends_the_game() {
        let pos = position("rn3bnr/ppp1pppp/8/8/8/8/PPPPPPPP/RNBQKB1R b KQ - 0 1");
        let count = pos.legal_moves().unwrap().len();
        assert_eq!(count, 0);
        assert_eq!(
            Atomic.check_termination(&pos, count, pos.in_check()),
            Some(GameStatus::KingExploded { winner: Colour::White })
        );
    }

    #[test]
    fn test_insufficient_material() {
        assert!(Atomic.is_insufficient_material(&position("4k3/8/8/8/8/8/8/4K3 w - - 0 1")));
        assert!(Atomic.is_insufficient_material(&position("4k3/8/8/8/8/8/8/4KB2 w - - 0 1")));
        assert!(!Atomic.is_insufficient_material(&position("4k3/8/8/8/8/8/8/3QK3 w - - 0 1")));
        // The knight can still be exploded next to the black king
        assert!(!Atomic.is_insufficient_material(&position("4k3/4n3/8/8/8/8/8/3RK3 w - - 0 1")));
    }

    #[test]
    fn test_king_captures_filtered() {
        let capture = Move::new(Square::E1, Square::D2, MoveFlag::Capture, PieceType::King, Some(PieceType::Queen));
        let pos = position("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1");
        assert!(!Atomic.is_legal_extra(capture, &pos));
    }
}
