use super::VariantPolicy;
use crate::core::*;
use crate::game::GameStatus;
use crate::position::Position;

/// Losing chess with orthodox check rules. Captures are compulsory and the
/// goal is to be mated, stalemated or stripped down to the king.
#[derive(Debug, Clone, Copy, Default)]
pub struct Losers;

impl VariantPolicy for Losers {
    fn captures_forced(&self) -> bool {
        true
    }

    fn check_termination(&self, pos: &Position, legal_count: usize, in_check: bool) -> Option<GameStatus> {
        let us = pos.side_to_move();
        let kings = pos.pieces(PieceType::King);

        if (pos.colour_bb(us) & !kings).is_empty() {
            return Some(GameStatus::AllPiecesCaptured { winner: us });
        }
        if (pos.colour_bb(!us) & !kings).is_empty() {
            return Some(GameStatus::AllPiecesCaptured { winner: !us });
        }

        match (legal_count, in_check) {
            (0, true) => Some(GameStatus::Checkmate { winner: us }),
            (0, false) => Some(GameStatus::StalemateWin { winner: us }),
            _ => None,
        }
    }

    fn is_insufficient_material(&self, _pos: &Position) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    fn termination(fen: &str) -> Option<GameStatus> {
        let pos = Position::from_fen(fen, Variant::Losers).unwrap();
        let count = pos.legal_moves().unwrap().len();
        Losers.check_termination(&pos, count, pos.in_check())
    }

    #[test]
    fn test_bare_king_wins() {
        assert_eq!(
            termination("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1"),
            Some(GameStatus::AllPiecesCaptured { winner: Colour::Black })
        );
    }

    #[test]
    fn test_mated_side_wins() {
        // Back rank mate on black
        let fen = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1";
        assert_eq!(termination(fen), Some(GameStatus::Checkmate { winner: Colour::Black }));
    }

    #[test]
    fn test_play_continues() {
        let fen = "4k3/4p3/8/8/8/8/4P3/4K3 w - - 0 1";
        assert_eq!(termination(fen), None);
    }
}
