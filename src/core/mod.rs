// Value types shared by every other module

mod macros;

pub mod bitboard;
pub mod errors;
pub mod moves;
pub mod piece;
pub mod square;
pub mod types;

pub use bitboard::Bitboard;
pub use errors::*;
pub use moves::{Move, MoveFlag};
pub use piece::{ParsePieceError, Piece, PieceType};
pub use square::{File, ParseSquareError, Rank, Square};
pub use types::{Castling, Colour, Direction};
