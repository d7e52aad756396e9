use thiserror::Error;

use super::{Colour, Square};
use crate::game::GameStatus;

/******************************************\
|==========================================|
|             FEN Parse Errors             |
|==========================================|
\******************************************/

/// The six FEN fields, used to report where parsing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenField {
    Placement,
    SideToMove,
    Castling,
    EnPassant,
    HalfmoveClock,
    FullmoveNumber,
}

impl std::fmt::Display for FenField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FenField::Placement => "piece placement",
            FenField::SideToMove => "side to move",
            FenField::Castling => "castling rights",
            FenField::EnPassant => "en passant square",
            FenField::HalfmoveClock => "half-move clock",
            FenField::FullmoveNumber => "full-move number",
        };
        write!(f, "{name}")
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("FEN must have 6 space separated fields, found {0}")]
    InvalidNumberOfFields(usize),
    #[error("invalid piece placement character '{0}'")]
    InvalidPiecePlacementChar(char),
    #[error("invalid rank format: {0}")]
    InvalidRankFormat(String),
    #[error("invalid reserve: {0}")]
    InvalidReserve(String),
    #[error("{colour} has {count} kings")]
    InvalidKingCount { colour: Colour, count: u32 },
    #[error("invalid side to move '{0}', expected 'w' or 'b'")]
    InvalidSideToMove(String),
    #[error("invalid castling character '{0}'")]
    InvalidCastlingChar(char),
    #[error("castling right '{0}' has no matching king and rook")]
    MissingCastlingRook(char),
    #[error("invalid en passant square '{0}'")]
    InvalidEnPassantSquare(String),
    #[error("invalid half-move clock '{0}'")]
    InvalidHalfmoveClock(String),
    #[error("invalid full-move number '{0}'")]
    InvalidFullmoveNumber(String),
}

impl FenParseError {
    /// The field the error was found in
    pub fn field(&self) -> Option<FenField> {
        match self {
            FenParseError::InvalidNumberOfFields(_) => None,
            FenParseError::InvalidPiecePlacementChar(_)
            | FenParseError::InvalidRankFormat(_)
            | FenParseError::InvalidReserve(_)
            | FenParseError::InvalidKingCount { .. } => Some(FenField::Placement),
            FenParseError::InvalidSideToMove(_) => Some(FenField::SideToMove),
            FenParseError::InvalidCastlingChar(_) | FenParseError::MissingCastlingRook(_) => {
                Some(FenField::Castling)
            }
            FenParseError::InvalidEnPassantSquare(_) => Some(FenField::EnPassant),
            FenParseError::InvalidHalfmoveClock(_) => Some(FenField::HalfmoveClock),
            FenParseError::InvalidFullmoveNumber(_) => Some(FenField::FullmoveNumber),
        }
    }
}

/******************************************\
|==========================================|
|             SAN Parse Errors             |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanParseError {
    #[error("empty move string")]
    Empty,
    #[error("malformed move '{0}'")]
    InvalidSyntax(String),
    #[error("invalid square in move '{0}'")]
    InvalidSquare(String),
    #[error("invalid piece letter '{0}'")]
    InvalidPiece(char),
    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

/******************************************\
|==========================================|
|             Notation Errors              |
|==========================================|
\******************************************/

/// Malformed FEN, SAN or coordinate input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("bad FEN: {0}")]
    Fen(#[from] FenParseError),
    #[error("bad SAN: {0}")]
    San(#[from] SanParseError),
    #[error("bad coordinate move '{0}'")]
    Coordinate(String),
}

/******************************************\
|==========================================|
|              Move Rejections             |
|==========================================|
\******************************************/

/// A well-formed move that is not legal in the current position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal move '{notation}' in position {fen}")]
pub struct IllegalMoveError {
    pub notation: String,
    pub fen: String,
}

/// A SAN string that matches more than one legal move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ambiguous move '{notation}', candidates: {}", .candidates.join(", "))]
pub struct AmbiguousMoveError {
    pub notation: String,
    pub candidates: Vec<String>,
}

/******************************************\
|==========================================|
|           Invariant Violations           |
|==========================================|
\******************************************/

/// A broken internal contract. Never expected in correct operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{0} has no king")]
    MissingKing(Colour),
    #[error("{colour} has {count} kings")]
    TooManyKings { colour: Colour, count: u32 },
    #[error("squares occupied by both colours: {0:#x}")]
    OverlappingColours(u64),
    #[error("piece bitboards do not match the occupancy")]
    OccupancyMismatch,
    #[error("board array disagrees with the bitboards on {0}")]
    MailboxMismatch(Square),
}

/******************************************\
|==========================================|
|               Game Errors                |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousMoveError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error("the game is over: {0}")]
    GameOver(GameStatus),
    #[error("no draw can be claimed in this position")]
    NoDrawToClaim,
    #[error("this variant has no piece reserves")]
    ReservesDisabled,
}

impl From<FenParseError> for GameError {
    fn from(err: FenParseError) -> Self {
        GameError::Notation(err.into())
    }
}

impl From<SanParseError> for GameError {
    fn from(err: SanParseError) -> Self {
        GameError::Notation(err.into())
    }
}
