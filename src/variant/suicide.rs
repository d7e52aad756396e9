use super::{KingRule, KingSafety, VariantPolicy};
use crate::core::*;
use crate::game::GameStatus;
use crate::position::Position;

const SUICIDE_PROMOTIONS: [PieceType; 5] =
    [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight, PieceType::King];

/// What a side with no legal moves gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalemateRule {
    /// The side with fewer pieces wins, equal counts draw
    FewerPieces,
    /// The stalemated side wins
    StalemateWins,
}

/// Suicide and giveaway. Kings are ordinary pieces, captures are compulsory
/// and the goal is to lose everything.
#[derive(Debug, Clone, Copy)]
pub struct Suicide {
    stalemate: StalemateRule,
}

impl Suicide {
    pub const fn new(stalemate: StalemateRule) -> Self {
        Self { stalemate }
    }
}

impl VariantPolicy for Suicide {
    fn king_safety(&self) -> KingSafety {
        KingSafety::None
    }

    fn king_rule(&self) -> KingRule {
        KingRule::Any
    }

    /// Only giveaway keeps castling
    fn castling_allowed(&self) -> bool {
        self.stalemate == StalemateRule::StalemateWins
    }

    fn castling_checks_attacks(&self) -> bool {
        false
    }

    fn captures_forced(&self) -> bool {
        true
    }

    fn promotion_pieces(&self) -> &'static [PieceType] {
        &SUICIDE_PROMOTIONS
    }

    fn check_termination(&self, pos: &Position, legal_count: usize, _in_check: bool) -> Option<GameStatus> {
        let us = pos.side_to_move();
        let ours = pos.colour_bb(us).count_bits();
        let theirs = pos.colour_bb(!us).count_bits();

        if ours == 0 {
            return Some(GameStatus::AllPiecesCaptured { winner: us });
        }
        if theirs == 0 {
            return Some(GameStatus::AllPiecesCaptured { winner: !us });
        }
        if legal_count > 0 {
            return None;
        }

        Some(match self.stalemate {
            StalemateRule::StalemateWins => GameStatus::StalemateWin { winner: us },
            StalemateRule::FewerPieces if ours < theirs => GameStatus::FewerPieces { winner: us },
            StalemateRule::FewerPieces if ours > theirs => GameStatus::FewerPieces { winner: !us },
            StalemateRule::FewerPieces => GameStatus::Stalemate,
        })
    }

    fn is_insufficient_material(&self, _pos: &Position) -> bool {
        false
    }
}
