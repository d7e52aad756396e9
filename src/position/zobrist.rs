use super::Position;
use crate::core::*;
use crate::utils::PRNG;

/******************************************\
|==========================================|
|              Key Definition              |
|==========================================|
\******************************************/

/// Zobrist key of a position
pub type Key = u64;

/// Reserve counts above this share a key
const MAX_RESERVE_KEYED: usize = 31;

/******************************************\
|==========================================|
|              Zobrist Table               |
|==========================================|
\******************************************/

/// Random keys for every hashed element of a position.
#[derive(Debug)]
struct ZobristTable {
    /// `pieces[piece][square]`
    pieces: [[Key; Square::NUM]; Piece::NUM],
    /// XORed in when Black is to move
    side_to_move: Key,
    /// One key per castling rights combination
    castling: [Key; Castling::NUM],
    /// One key per en passant file
    enpassant: [Key; File::NUM],
    /// `reserves[colour][piece type][count]`, count zero never hashed
    reserves: [[[Key; MAX_RESERVE_KEYED + 1]; PieceType::DROPPABLE.len()]; Colour::NUM],
}

static ZOBRIST: ZobristTable = init_zobrist_table();

const fn init_zobrist_table() -> ZobristTable {
    let mut rng = PRNG::new(0xDEADBEEFCAFEBABE);

    let mut pieces = [[0; Square::NUM]; Piece::NUM];
    let mut castling = [0; Castling::NUM];
    let mut enpassant = [0; File::NUM];
    let mut reserves = [[[0; MAX_RESERVE_KEYED + 1]; PieceType::DROPPABLE.len()]; Colour::NUM];

    let mut i = 0;
    while i < Piece::NUM {
        let mut j = 0;
        while j < Square::NUM {
            pieces[i][j] = rng.random_u64();
            j += 1;
        }
        i += 1;
    }

    let side_to_move = rng.random_u64();

    i = 0;
    while i < Castling::NUM {
        castling[i] = rng.random_u64();
        i += 1;
    }

    i = 0;
    while i < File::NUM {
        enpassant[i] = rng.random_u64();
        i += 1;
    }

    i = 0;
    while i < Colour::NUM {
        let mut j = 0;
        while j < PieceType::DROPPABLE.len() {
            let mut k = 1;
            while k <= MAX_RESERVE_KEYED {
                reserves[i][j][k] = rng.random_u64();
                k += 1;
            }
            j += 1;
        }
        i += 1;
    }

    ZobristTable {
        pieces,
        side_to_move,
        castling,
        enpassant,
        reserves,
    }
}

/******************************************\
|==========================================|
|              Access Functions            |
|==========================================|
\******************************************/

#[inline]
pub(super) fn piece_key(piece: Piece, sq: Square) -> Key {
    ZOBRIST.pieces[piece.index()][sq.index()]
}

#[inline]
pub(super) fn side_key() -> Key {
    ZOBRIST.side_to_move
}

#[inline]
pub(super) fn castle_key(rights: Castling) -> Key {
    ZOBRIST.castling[rights.0 as usize & 0x0F]
}

#[inline]
pub(super) fn ep_key(file: File) -> Key {
    ZOBRIST.enpassant[file.index()]
}

/// Key for holding `count` pieces of `pt`; zero for an empty slot
#[inline]
pub(super) fn reserve_key(colour: Colour, pt: PieceType, count: u8) -> Key {
    match count as usize {
        0 => 0,
        n => ZOBRIST.reserves[colour.index()][pt.index()][n.min(MAX_RESERVE_KEYED)],
    }
}

/******************************************\
|==========================================|
|          Position Implementation         |
|==========================================|
\******************************************/

impl Position {
    /// Computes the key from scratch
    pub(crate) fn calc_key(&self) -> Key {
        let mut key = 0;

        for sq in Square::iter() {
            if let Some(piece) = self.piece_at(sq) {
                key ^= piece_key(piece, sq);
            }
        }

        if self.stm == Colour::Black {
            key ^= side_key();
        }

        key ^= castle_key(self.castling);
        key ^= self.ep_key_contribution();

        for colour in Colour::iter() {
            for pt in PieceType::DROPPABLE {
                key ^= reserve_key(colour, pt, self.reserves.count(colour, pt));
            }
        }

        key
    }

    /// The en passant part of the key. The file is only hashed when a pawn of the
    /// side to move could actually capture, so positions that differ only in an
    /// unusable target square repeat.
    pub(super) fn ep_key_contribution(&self) -> Key {
        match self.ep {
            Some(ep) if self.ep_capturable(ep) => ep_key(ep.file()),
            _ => 0,
        }
    }

    fn ep_capturable(&self, ep: Square) -> bool {
        let capturers = crate::movegen::pawn_attacks(!self.stm, ep)
            & self.pieces_of(self.stm, PieceType::Pawn);
        capturers.is_occupied()
    }
}
