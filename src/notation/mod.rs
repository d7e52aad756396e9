//! # Module: `notation`
//!
//! Text forms of moves and games. FEN lives with the position itself; this
//! module adds SAN, coordinate moves and PGN export.

pub mod coordinate;
pub mod pgn;
pub mod san;

pub use pgn::{PgnHeaders, write_pgn};
