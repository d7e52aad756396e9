use super::Position;
use crate::core::*;
use crate::variant::{KingRule, Variant};

/******************************************\
|==========================================|
|            Useful fen strings            |
|==========================================|
\******************************************/

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

pub const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/******************************************\
|==========================================|
|               Parse Fen                  |
|==========================================|
\******************************************/

impl Position {
    pub const FEN_FIELDS: usize = 6;

    /// Parses a six field FEN under the rules of `variant`.
    ///
    /// Drop variants take their holdings either as a `[...]` suffix or as a
    /// ninth `/` section of the placement field. Castling accepts `KQkq` and
    /// Shredder or X-FEN file letters.
    pub fn from_fen(fen: &str, variant: Variant) -> Result<Position, FenParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, side_to_move, castling, enpassant, halfmove, fullmove] = fields[..] else {
            return Err(FenParseError::InvalidNumberOfFields(fields.len()));
        };

        let mut pos = Position::empty(variant);

        let (board, holdings) = split_holdings(placement)?;
        pos.parse_piece_placement(board)?;
        if let Some(holdings) = holdings {
            pos.parse_holdings(holdings)?;
        }
        pos.check_king_count()?;

        pos.parse_side_to_move(side_to_move)?;
        pos.parse_castling(castling)?;
        pos.parse_enpassant(enpassant)?;

        pos.halfmove = halfmove
            .parse::<u32>()
            .map_err(|_| FenParseError::InvalidHalfmoveClock(halfmove.to_string()))?;
        pos.fullmove = match fullmove.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(FenParseError::InvalidFullmoveNumber(fullmove.to_string())),
        };

        pos.key = pos.calc_key();
        Ok(pos)
    }

    fn parse_piece_placement(&mut self, placement: &str) -> Result<(), FenParseError> {
        let mut rank_iter = Rank::iter().rev();
        let mut rank = rank_iter
            .next()
            .ok_or_else(|| FenParseError::InvalidRankFormat("board has no ranks".to_string()))?;
        let mut file: u8 = 0;
        let mut last_placed: Option<Square> = None;

        for c in placement.chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "rank {rank} has {file} files before '/'"
                        )));
                    }
                    rank = rank_iter.next().ok_or_else(|| {
                        FenParseError::InvalidRankFormat("more than 8 ranks".to_string())
                    })?;
                    file = 0;
                    last_placed = None;
                }

                '0'..='9' => {
                    let skip = c as u8 - b'0';
                    file += skip;
                    if !(1..=8).contains(&skip) || file > 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "bad skip '{c}' on rank {rank}"
                        )));
                    }
                    last_placed = None;
                }

                '~' => {
                    // Promoted pieces only matter where captures go to a reserve
                    let sq = last_placed
                        .filter(|_| self.variant.has_drops())
                        .ok_or(FenParseError::InvalidPiecePlacementChar('~'))?;
                    self.promoted.set(sq);
                }

                _ => {
                    let piece = Piece::from_char(c).ok_or(FenParseError::InvalidPiecePlacementChar(c))?;
                    let file_enum = File::from_index(file).ok_or_else(|| {
                        FenParseError::InvalidRankFormat(format!("rank {rank} runs past the h-file"))
                    })?;
                    let sq = Square::from_parts(file_enum, rank);
                    self.put_piece(piece, sq);
                    last_placed = Some(sq);
                    file += 1;
                }
            }
        }

        if file != 8 || rank_iter.next().is_some() {
            return Err(FenParseError::InvalidRankFormat(
                "expected 8 ranks of 8 files".to_string(),
            ));
        }

        Ok(())
    }

    fn parse_holdings(&mut self, holdings: &str) -> Result<(), FenParseError> {
        if !self.variant.has_drops() {
            return Err(FenParseError::InvalidReserve(format!(
                "{} has no reserves",
                self.variant
            )));
        }

        for c in holdings.chars().filter(|&c| c != '-') {
            match Piece::from_char(c) {
                Some(piece) if piece.pt() != PieceType::King => {
                    let count = self.reserves.count(piece.colour(), piece.pt());
                    self.reserves.set_count(piece.colour(), piece.pt(), count.saturating_add(1));
                }
                _ => return Err(FenParseError::InvalidReserve(holdings.to_string())),
            }
        }

        Ok(())
    }

    fn check_king_count(&self) -> Result<(), FenParseError> {
        let rule = self.variant.policy().king_rule();
        for colour in Colour::iter() {
            let count = self.pieces_of(colour, PieceType::King).count_bits();
            let ok = match rule {
                KingRule::ExactlyOne => count == 1,
                KingRule::AtMostOne => count <= 1,
                KingRule::Any => true,
            };
            if !ok {
                return Err(FenParseError::InvalidKingCount { colour, count });
            }
        }
        Ok(())
    }

    fn parse_side_to_move(&mut self, side_to_move: &str) -> Result<(), FenParseError> {
        self.stm = match side_to_move {
            "w" => Colour::White,
            "b" => Colour::Black,
            _ => return Err(FenParseError::InvalidSideToMove(side_to_move.to_string())),
        };
        Ok(())
    }

    fn parse_castling(&mut self, castling: &str) -> Result<(), FenParseError> {
        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            let colour = if c.is_ascii_uppercase() { Colour::White } else { Colour::Black };
            let back_rank = colour.back_rank();

            let ksq = (self.pieces_of(colour, PieceType::King) & back_rank.bb())
                .lsb()
                .ok_or(FenParseError::MissingCastlingRook(c))?;
            let rooks = self.pieces_of(colour, PieceType::Rook) & back_rank.bb();

            let (king_side, rook_sq) = match c.to_ascii_lowercase() {
                'k' => (true, rooks.filter(|sq| sq.file() > ksq.file()).last()),
                'q' => (false, rooks.filter(|sq| sq.file() < ksq.file()).next()),
                f @ 'a'..='h' => {
                    let file = File::from_char(f).ok_or(FenParseError::InvalidCastlingChar(c))?;
                    let sq = Square::from_parts(file, back_rank);
                    (file > ksq.file(), rooks.contains(sq).then_some(sq))
                }
                _ => return Err(FenParseError::InvalidCastlingChar(c)),
            };

            let rook_sq = rook_sq.ok_or(FenParseError::MissingCastlingRook(c))?;
            let right = match king_side {
                true => Castling::king_side(colour),
                false => Castling::queen_side(colour),
            };

            self.castling.set(right);
            self.castling_rooks.add(right, ksq, rook_sq);

            let standard_rook = if king_side { File::FileH } else { File::FileA };
            if ksq.file() != File::FileE || rook_sq.file() != standard_rook {
                self.chess960 = true;
            }
        }

        Ok(())
    }

    fn parse_enpassant(&mut self, enpassant: &str) -> Result<(), FenParseError> {
        self.ep = match enpassant {
            "-" => None,
            _ => {
                let square = enpassant
                    .parse::<Square>()
                    .map_err(|_| FenParseError::InvalidEnPassantSquare(enpassant.to_string()))?;

                // The target sits behind a pawn of the side that just moved
                if square.rank() != Rank::Rank6.relative(self.stm) {
                    return Err(FenParseError::InvalidEnPassantSquare(enpassant.to_string()));
                }
                Some(square)
            }
        };
        Ok(())
    }
}

/// Splits `board[holdings]` or a nine section `board/holdings` placement field
fn split_holdings(placement: &str) -> Result<(&str, Option<&str>), FenParseError> {
    if let Some(open) = placement.find('[') {
        let holdings = placement[open + 1..]
            .strip_suffix(']')
            .ok_or_else(|| FenParseError::InvalidReserve(placement[open..].to_string()))?;
        return Ok((&placement[..open], Some(holdings)));
    }

    if placement.matches('/').count() == 8 {
        if let Some((board, holdings)) = placement.rsplit_once('/') {
            return Ok((board, Some(holdings)));
        }
    }

    Ok((placement, None))
}

/******************************************\
|==========================================|
|              Generate Fen                |
|==========================================|
\******************************************/

impl Position {
    pub fn fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::iter().rev() {
            let mut empty_count = 0;
            for file in File::iter() {
                let square = Square::from_parts(file, rank);
                match self.piece_at(square) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                        if self.promoted.contains(square) {
                            fen.push('~');
                        }
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::Rank1 {
                fen.push('/');
            }
        }

        if self.variant.has_drops() {
            fen.push('[');
            fen.push_str(&self.reserves.to_fen());
            fen.push(']');
        }

        fen.push(' ');
        fen.push(self.stm.to_char());

        fen.push(' ');
        fen.push_str(&self.castling_fen());

        fen.push(' ');
        match self.ep {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove, self.fullmove));

        fen
    }

    /// `KQkq` for the outermost rooks, the rook's file letter otherwise
    fn castling_fen(&self) -> String {
        if self.castling == Castling::NONE {
            return "-".to_string();
        }

        let mut out = String::new();
        for (right, letter) in Castling::SINGLES.into_iter().zip(['K', 'Q', 'k', 'q']) {
            if !self.castling.has(right) {
                continue;
            }
            let Some(rook_sq) = self.castling_rooks.rook_sq(right) else {
                continue;
            };

            let colour = if right.has(Castling::WHITE_CASTLING) { Colour::White } else { Colour::Black };
            let rooks = self.pieces_of(colour, PieceType::Rook) & colour.back_rank().bb();
            let outermost = match letter.to_ascii_lowercase() {
                'k' => rooks.msb(),
                _ => rooks.lsb(),
            };

            if outermost == Some(rook_sq) {
                out.push(letter);
            } else {
                let file = rook_sq.file().to_char();
                out.push(match colour {
                    Colour::White => file.to_ascii_uppercase(),
                    Colour::Black => file,
                });
            }
        }
        out
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
