use serde::{Deserialize, Serialize};

use crate::core::*;

/******************************************\
|==========================================|
|                 Reserves                 |
|==========================================|
\******************************************/

/// Pieces in hand for the drop variants, counted per colour and piece type.
///
/// Kings are never held. Every other variant keeps both pools empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reserves {
    counts: [[u8; PieceType::DROPPABLE.len()]; Colour::NUM],
}

impl Reserves {
    #[inline]
    pub fn count(&self, colour: Colour, pt: PieceType) -> u8 {
        match pt {
            PieceType::King => 0,
            _ => self.counts[colour.index()][pt.index()],
        }
    }

    /// Sets a count directly. Kings are ignored.
    #[inline]
    pub(crate) fn set_count(&mut self, colour: Colour, pt: PieceType, count: u8) {
        if pt != PieceType::King {
            self.counts[colour.index()][pt.index()] = count;
        }
    }

    /// Piece types `colour` holds at least one of, in pawn to queen order
    pub fn available(&self, colour: Colour) -> impl Iterator<Item = PieceType> + '_ {
        PieceType::DROPPABLE.into_iter().filter(move |&pt| self.count(colour, pt) > 0)
    }

    pub fn total(&self, colour: Colour) -> u32 {
        self.counts[colour.index()].iter().map(|&n| n as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        Colour::iter().all(|colour| self.total(colour) == 0)
    }

    /// FEN holdings text without brackets: White's pieces then Black's, queens first
    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for colour in Colour::iter() {
            for pt in PieceType::DROPPABLE.into_iter().rev() {
                let c = Piece::from_parts(colour, pt).to_char();
                for _ in 0..self.count(colour, pt) {
                    out.push(c);
                }
            }
        }
        out
    }
}
