//! # Module: `coordinate`
//!
//! Long algebraic moves as chess servers and engines send them: `e2e4`,
//! `e7e8q`, `e2-e4`. Castling is accepted both as the king's destination
//! (`e1g1`) and as king-takes-rook (`e1h1`), the form Chess960 needs.

use crate::core::*;
use crate::position::Position;

/// Splits `e7e8q` into origin, destination and promotion piece
fn parse_parts(text: &str) -> Option<(Square, Square, Option<PieceType>)> {
    let compact: String = text.trim().chars().filter(|&c| c != '-').collect();
    if !compact.is_ascii() || !(4..=5).contains(&compact.len()) {
        return None;
    }

    let from = compact[0..2].parse::<Square>().ok()?;
    let to = compact[2..4].parse::<Square>().ok()?;
    let promotion = match compact[4..].chars().next() {
        Some(c) => Some(PieceType::from_char(c).filter(|&pt| pt != PieceType::Pawn)?),
        None => None,
    };

    Some((from, to, promotion))
}

/// True if `text` has the shape of a coordinate move rather than SAN
pub(crate) fn looks_like_coordinate(text: &str) -> bool {
    parse_parts(text).is_some()
}

impl Position {
    /// Rook square of the castling move `mv` for the side to move
    fn castling_rook(&self, mv: Move) -> Option<Square> {
        let us = self.side_to_move();
        match mv.flag() {
            MoveFlag::KingCastle => self.castling_rooks().rook_sq(Castling::king_side(us)),
            MoveFlag::QueenCastle => self.castling_rooks().rook_sq(Castling::queen_side(us)),
            _ => None,
        }
    }

    /// Resolves a coordinate move against the legal moves. An ordinary king
    /// move wins over castling when both fit the text.
    pub fn parse_coordinate(&self, text: &str) -> Result<Move, GameError> {
        let (from, to, promotion) =
            parse_parts(text).ok_or_else(|| NotationError::Coordinate(text.to_string()))?;
        let legal = self.legal_moves()?;

        let exact = legal
            .iter()
            .find(|mv| !mv.is_drop() && !mv.is_castle() && mv.from() == from && mv.to() == to && mv.promotion() == promotion);
        let castle = || {
            legal.iter().find(|&&mv| {
                mv.is_castle() && mv.from() == from && (mv.to() == to || self.castling_rook(mv) == Some(to))
            })
        };

        exact
            .or_else(castle)
            .copied()
            .ok_or_else(|| IllegalMoveError { notation: text.to_string(), fen: self.fen() }.into())
    }

    /// Coordinate text for `mv`. Chess960 castling is written king-takes-rook.
    pub fn to_coordinate(&self, mv: Move) -> String {
        match self.castling_rook(mv) {
            Some(rook) if self.is_chess960() => format!("{}{}", mv.from(), rook),
            _ => mv.to_string(),
        }
    }

    /// Accepts either coordinate notation or SAN, including drops
    pub fn parse_move(&self, text: &str) -> Result<Move, GameError> {
        if looks_like_coordinate(text) {
            self.parse_coordinate(text)
        } else {
            self.parse_san(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;
    use crate::variant::Variant;
    use Square::*;

    #[test]
    fn test_parts() {
        assert_eq!(parse_parts("e2e4"), Some((E2, E4, None)));
        assert_eq!(parse_parts("e7-e8q"), Some((E7, E8, Some(PieceType::Queen))));
        assert_eq!(parse_parts("e7e8p"), None);
        assert_eq!(parse_parts("Nf3"), None);
        assert!(!looks_like_coordinate("exd5"));
        assert!(!looks_like_coordinate("O-O"));
    }

    #[test]
    fn test_castling_forms() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Variant::Standard).unwrap();
        let castle = pos.parse_coordinate("e1g1").unwrap();
        assert_eq!(castle.flag(), MoveFlag::KingCastle);
        assert_eq!(pos.parse_coordinate("e1h1"), Ok(castle));
        assert_eq!(pos.to_coordinate(castle), "e1g1");

        // King on b1, rook on a1: b1c1 is a plain king move, b1a1 castles
        let pos = Position::from_fen("6k1/8/8/8/8/8/8/RK6 w A - 0 1", Variant::FischerRandom).unwrap();
        assert_eq!(pos.parse_coordinate("b1c1").unwrap().flag(), MoveFlag::Quiet);
        let castle = pos.parse_coordinate("b1a1").unwrap();
        assert_eq!(castle.flag(), MoveFlag::QueenCastle);
        assert_eq!(pos.to_coordinate(castle), "b1a1");
    }

    #[test]
    fn test_parse_move_dispatch() {
        let pos = Position::from_fen(START_FEN, Variant::Standard).unwrap();
        assert_eq!(pos.parse_move("g1f3"), pos.parse_move("Nf3"));
        assert!(matches!(pos.parse_move("e2e5"), Err(GameError::Illegal(_))));
        assert!(matches!(pos.parse_coordinate("zz"), Err(GameError::Notation(NotationError::Coordinate(_)))));
    }
}
