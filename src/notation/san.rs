//! # Module: `san`
//!
//! Standard Algebraic Notation for every variant.
//!
//! Generation disambiguates with the origin file, then the rank, then both,
//! and appends `+` or `#`. Parsing is lenient about decoration: check and
//! annotation suffixes, capture markers, `0-0` for castling and promotions
//! written with or without `=` are all accepted. Drops use `N@f3`, with the
//! pawn letter optional (`@e4`).

use crate::core::*;
use crate::position::Position;

/// The parts of a SAN board move, checked against the legal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SanPattern {
    piece: PieceType,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceType>,
}

impl SanPattern {
    fn parse(text: &str) -> Result<SanPattern, SanParseError> {
        let syntax = || SanParseError::InvalidSyntax(text.to_string());

        let mut chars: Vec<char> = text.chars().filter(|c| !matches!(c, 'x' | ':' | '-')).collect();

        // A letter after the destination rank, with or without '=', is a promotion
        let mut promotion = None;
        let n = chars.len();
        if n >= 3 && chars[n - 1].is_ascii_alphabetic() && matches!(chars[n - 2], '1'..='8' | '=') {
            let last = chars[n - 1];
            let pt = PieceType::from_char(last)
                .filter(|&pt| pt != PieceType::Pawn)
                .ok_or(SanParseError::InvalidPromotion(last))?;
            promotion = Some(pt);
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
        }
        if chars.last() == Some(&'=') {
            return Err(syntax());
        }

        if chars.len() < 2 {
            return Err(syntax());
        }
        let square: String = chars.split_off(chars.len() - 2).into_iter().collect();
        let to = square
            .parse::<Square>()
            .map_err(|_| SanParseError::InvalidSquare(text.to_string()))?;

        let mut rest = chars.into_iter().peekable();
        let piece = match rest.peek() {
            Some(&c) if c.is_ascii_uppercase() => {
                rest.next();
                PieceType::from_char(c).ok_or(SanParseError::InvalidPiece(c))?
            }
            _ => PieceType::Pawn,
        };

        let (mut from_file, mut from_rank) = (None, None);
        for c in rest {
            match (File::from_char(c), Rank::from_char(c)) {
                (Some(file), _) if from_file.is_none() => from_file = Some(file),
                (_, Some(rank)) if from_rank.is_none() => from_rank = Some(rank),
                _ => return Err(syntax()),
            }
        }

        Ok(SanPattern { piece, from_file, from_rank, to, promotion })
    }

    fn matches(&self, mv: Move) -> bool {
        !mv.is_drop()
            && !mv.is_castle()
            && mv.piece() == self.piece
            && mv.to() == self.to
            && mv.promotion() == self.promotion
            && self.from_file.is_none_or(|file| mv.from().file() == file)
            && self.from_rank.is_none_or(|rank| mv.from().rank() == rank)
    }
}

/// Piece type and square of a drop such as `N@f3` or `@e4`
fn parse_drop(text: &str) -> Result<(PieceType, Square), SanParseError> {
    let (piece, square) = text.split_once('@').ok_or_else(|| SanParseError::InvalidSyntax(text.to_string()))?;

    let mut letters = piece.chars();
    let pt = match (letters.next(), letters.next()) {
        (None, _) => PieceType::Pawn,
        (Some(c), None) => PieceType::from_char(c)
            .filter(|&pt| pt != PieceType::King)
            .ok_or(SanParseError::InvalidPiece(c))?,
        _ => return Err(SanParseError::InvalidSyntax(text.to_string())),
    };
    let to = square
        .parse::<Square>()
        .map_err(|_| SanParseError::InvalidSquare(text.to_string()))?;

    Ok((pt, to))
}

impl Position {
    /// SAN for `mv`, which must be legal in this position
    pub fn to_san(&self, mv: Move) -> String {
        let mut legal = Vec::new();
        self.generate_legal(&mut legal);
        let mut san = self.san_body(mv, &legal);

        let mut next = self.clone();
        next.apply_raw(mv);
        if next.in_check() {
            next.generate_legal(&mut legal);
            san.push(if legal.is_empty() { '#' } else { '+' });
        }
        san
    }

    fn san_body(&self, mv: Move, legal: &[Move]) -> String {
        match mv.flag() {
            MoveFlag::KingCastle => return "O-O".to_string(),
            MoveFlag::QueenCastle => return "O-O-O".to_string(),
            MoveFlag::Drop => return mv.to_string(),
            _ => {}
        }

        let from = mv.from();
        let mut san = String::new();

        if mv.piece() == PieceType::Pawn {
            if mv.is_capture() {
                san.push(from.file().to_char());
            }
        } else {
            san.push(mv.piece().san_char());
            san.push_str(&disambiguation(mv, legal));
        }

        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to().to_string());

        if let Some(promotion) = mv.promotion() {
            san.push('=');
            san.push(promotion.san_char());
        }
        san
    }

    /// Resolves SAN against the legal moves.
    ///
    /// # Errors
    ///
    /// - [`SanParseError`] (as [`GameError::Notation`]) for malformed text
    /// - [`IllegalMoveError`] if no legal move matches
    /// - [`AmbiguousMoveError`] if several do
    pub fn parse_san(&self, san: &str) -> Result<Move, GameError> {
        let text = san.trim().trim_end_matches(['+', '#', '!', '?']);
        if text.is_empty() {
            return Err(SanParseError::Empty.into());
        }

        let legal = self.legal_moves()?;
        let candidates: Vec<Move> = match text {
            "O-O" | "0-0" => legal.into_iter().filter(|mv| mv.flag() == MoveFlag::KingCastle).collect(),
            "O-O-O" | "0-0-0" => legal.into_iter().filter(|mv| mv.flag() == MoveFlag::QueenCastle).collect(),
            _ if text.contains('@') => {
                let (pt, to) = parse_drop(text)?;
                legal.into_iter().filter(|mv| mv.is_drop() && mv.piece() == pt && mv.to() == to).collect()
            }
            _ => {
                let pattern = SanPattern::parse(text)?;
                legal.into_iter().filter(|&mv| pattern.matches(mv)).collect()
            }
        };

        match candidates.as_slice() {
            [mv] => Ok(*mv),
            [] => Err(IllegalMoveError { notation: san.to_string(), fen: self.fen() }.into()),
            _ => Err(AmbiguousMoveError {
                notation: san.to_string(),
                candidates: candidates.iter().map(|&mv| self.to_san(mv)).collect(),
            }
            .into()),
        }
    }
}

/// Origin qualifier that makes a piece move unique: file, rank or both
fn disambiguation(mv: Move, legal: &[Move]) -> String {
    let from = mv.from();
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| {
            !other.is_drop()
                && !other.is_castle()
                && other.piece() == mv.piece()
                && other.to() == mv.to()
                && other.from() != from
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{KIWIPETE_FEN, START_FEN};
    use crate::variant::Variant;
    use Square::*;

    fn position(fen: &str, variant: Variant) -> Position {
        Position::from_fen(fen, variant).unwrap()
    }

    #[test]
    fn test_san_round_trip_on_every_legal_move() {
        for (fen, variant) in [
            (START_FEN, Variant::Standard),
            (KIWIPETE_FEN, Variant::Standard),
            ("r3k2r/1P6/8/8/8/8/8/R3K2R[Nb] w KQkq - 0 1", Variant::Crazyhouse),
            ("8/1P6/8/8/8/8/6p1/8 w - - 0 1", Variant::Giveaway),
        ] {
            let pos = position(fen, variant);
            for mv in pos.legal_moves().unwrap() {
                let san = pos.to_san(mv);
                assert_eq!(pos.parse_san(&san), Ok(mv), "{san} in {fen}");
            }
        }
    }

    #[test]
    fn test_disambiguation() {
        // Knights on b1 and f1 can both reach d2, rooks on a1 and a5 can both reach a3
        let pos = position("4k3/8/8/R7/8/8/8/RN2KN2 w - - 0 1", Variant::Standard);
        let nbd2 = Move::new(B1, D2, MoveFlag::Quiet, PieceType::Knight, None);
        assert_eq!(pos.to_san(nbd2), "Nbd2");
        let r1a3 = Move::new(A1, A3, MoveFlag::Quiet, PieceType::Rook, None);
        assert_eq!(pos.to_san(r1a3), "R1a3");
    }

    #[test]
    fn test_check_and_mate_suffixes() {
        let pos = position("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2", Variant::Standard);
        let mate = Move::new(D8, H4, MoveFlag::Quiet, PieceType::Queen, None);
        assert_eq!(pos.to_san(mate), "Qh4#");

        let pos = position(START_FEN, Variant::Standard);
        assert_eq!(pos.to_san(Move::new(E2, E4, MoveFlag::DoublePawnPush, PieceType::Pawn, None)), "e4");
    }

    #[test]
    fn test_lenient_parsing() {
        let pos = position("r3k2r/1P6/8/8/8/8/8/R3K2R w KQkq - 0 1", Variant::Standard);
        assert_eq!(pos.parse_san("0-0").unwrap().flag(), MoveFlag::KingCastle);
        assert_eq!(pos.parse_san("O-O-O+").unwrap().flag(), MoveFlag::QueenCastle);
        assert_eq!(pos.parse_san("bxa8=Q").unwrap().promotion(), Some(PieceType::Queen));
        assert_eq!(pos.parse_san("bxa8N").unwrap().promotion(), Some(PieceType::Knight));
        assert_eq!(pos.parse_san("b8=B").unwrap().promotion(), Some(PieceType::Bishop));
    }

    #[test]
    fn test_parse_errors() {
        let pos = position(START_FEN, Variant::Standard);
        assert_eq!(pos.parse_san("  "), Err(SanParseError::Empty.into()));
        assert!(matches!(pos.parse_san("Nf6"), Err(GameError::Illegal(_))));
        assert!(matches!(pos.parse_san("Zf3"), Err(GameError::Notation(NotationError::San(SanParseError::InvalidPiece('Z'))))));
        assert!(matches!(pos.parse_san("Ni9"), Err(GameError::Notation(_))));

        let pos = position("4k3/8/8/8/8/8/8/RN2KN2 w - - 0 1", Variant::Standard);
        match pos.parse_san("Nd2") {
            Err(GameError::Ambiguous(err)) => assert_eq!(err.candidates, vec!["Nbd2", "Nfd2"]),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_drops() {
        let pos = position("4k3/8/8/8/8/8/8/4K3[NP] w - - 0 1", Variant::Crazyhouse);
        assert_eq!(pos.parse_san("N@f3"), Ok(Move::new_drop(PieceType::Knight, F3)));
        assert_eq!(pos.parse_san("@e4"), Ok(Move::new_drop(PieceType::Pawn, E4)));
        assert_eq!(pos.to_san(Move::new_drop(PieceType::Pawn, E4)), "P@e4");
        assert!(matches!(pos.parse_san("P@e1"), Err(GameError::Illegal(_))));
    }
}
