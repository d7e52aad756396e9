use super::VariantPolicy;
use crate::core::*;
use crate::position::Position;

/// Orthodox chess, also used for Chess960 where only the setup differs
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl VariantPolicy for Standard {}

/// Neither side can ever mate: only kings remain, or kings and a single minor
/// piece, or kings and bishops that all stand on one square colour.
pub(crate) fn insufficient_material(pos: &Position) -> bool {
    let heavy = pos.pieces(PieceType::Pawn) | pos.pieces(PieceType::Rook) | pos.pieces(PieceType::Queen);
    if heavy.is_occupied() {
        return false;
    }

    let knights = pos.pieces(PieceType::Knight);
    let bishops = pos.pieces(PieceType::Bishop);
    if (knights | bishops).count_bits() <= 1 {
        return true;
    }

    knights.is_empty()
        && ((bishops & Bitboard::DARK_SQUARES).is_empty() || (bishops & Bitboard::LIGHT_SQUARES).is_empty())
}
