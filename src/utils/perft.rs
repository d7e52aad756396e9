//! # Module: `perft`
//!
//! Counts leaf nodes of the legal move tree. The counts are checked against
//! published reference values, which makes perft the main correctness oracle
//! for move generation in every variant.

use tracing::debug;

use crate::core::Move;
use crate::position::Position;

fn perft_inner(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = Vec::with_capacity(64);
    pos.generate_legal(&mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mv| {
            let prior = pos.apply_raw(mv);
            let nodes = perft_inner(pos, depth - 1);
            pos.undo_raw(mv, &prior);
            nodes
        })
        .sum()
}

/// Number of legal move sequences of length `depth` from `pos`
pub fn perft(pos: &Position, depth: usize) -> u64 {
    perft_inner(&mut pos.clone(), depth)
}

/// Node counts below each legal root move, in generation order
pub fn perft_divide(pos: &Position, depth: usize) -> Vec<(Move, u64)> {
    let mut pos = pos.clone();
    let mut moves = Vec::with_capacity(64);
    pos.generate_legal(&mut moves);

    let divide: Vec<(Move, u64)> = moves
        .into_iter()
        .map(|mv| {
            let prior = pos.apply_raw(mv);
            let nodes = perft_inner(&mut pos, depth.saturating_sub(1));
            pos.undo_raw(mv, &prior);
            (mv, nodes)
        })
        .collect();

    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
    debug!(fen = %pos.fen(), depth, moves = divide.len(), total, "perft divide");
    divide
}
