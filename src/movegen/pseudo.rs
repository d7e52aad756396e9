//! # Module: `pseudo`
//!
//! Pseudo-legal move generation: every move that obeys piece movement rules
//! for the side to move, before king safety and the variant's extra rules are
//! applied.
//!
//! Pawns are walked one at a time so promotions can use the variant's own
//! promotion set. Castling follows the rook recorded for each right, which
//! covers Chess960 with the same code. Drops come from the reserve, onto the
//! squares the variant allows.

use super::lookup::{attacks, between, pawn_attacks};
use crate::core::*;
use crate::position::Position;
use crate::position::castling::castle_targets;
use crate::variant::KingSafety;

/******************************************\
|==========================================|
|              Helper Functions            |
|==========================================|
\******************************************/

/// Adds one promotion per piece type the variant allows
#[inline]
fn add_promotions(
    from: Square,
    to: Square,
    captured: Option<PieceType>,
    promotions: &[PieceType],
    out: &mut Vec<Move>,
) {
    out.extend(promotions.iter().map(|&pt| Move::new_promotion(from, to, pt, captured)));
}

/******************************************\
|==========================================|
|               Pawn Moves                 |
|==========================================|
\******************************************/

fn gen_pawn_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let them = pos.colour_bb(!us);
    let empty = !pos.occupied();
    let forward = us.forward();
    let promo_rank = Rank::Rank8.relative(us);
    let start_rank = Rank::Rank2.relative(us);
    let promotions = pos.variant().policy().promotion_pieces();

    for from in pos.pieces_of(us, PieceType::Pawn) {
        // Pushes
        if let Some(to) = from.add(forward).filter(|sq| empty.contains(*sq)) {
            if to.rank() == promo_rank {
                add_promotions(from, to, None, promotions, out);
            } else {
                out.push(Move::new(from, to, MoveFlag::Quiet, PieceType::Pawn, None));

                let double = to.add(forward).filter(|sq| empty.contains(*sq));
                if let (true, Some(to2)) = (from.rank() == start_rank, double) {
                    out.push(Move::new(from, to2, MoveFlag::DoublePawnPush, PieceType::Pawn, None));
                }
            }
        }

        // Captures
        for to in pawn_attacks(us, from) & them {
            let captured = pos.piece_at(to).map(Piece::pt);
            if to.rank() == promo_rank {
                add_promotions(from, to, captured, promotions, out);
            } else {
                out.push(Move::new(from, to, MoveFlag::Capture, PieceType::Pawn, captured));
            }
        }

        // En passant, only while the pawn that just double pushed is still there
        if let Some(ep) = pos.ep_square() {
            let victim_sq = Square::from_parts(ep.file(), from.rank());
            let victim = Piece::from_parts(!us, PieceType::Pawn);
            if pawn_attacks(us, from).contains(ep) && pos.piece_at(victim_sq) == Some(victim) {
                out.push(Move::new(from, ep, MoveFlag::EnPassant, PieceType::Pawn, Some(PieceType::Pawn)));
            }
        }
    }
}

/******************************************\
|==========================================|
|              Piece Moves                 |
|==========================================|
\******************************************/

/// Knight, bishop, rook, queen and king moves
fn gen_piece_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let occupied = pos.occupied();
    let ours = pos.colour_bb(us);

    for pt in [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen, PieceType::King] {
        let piece = Piece::from_parts(us, pt);
        for from in pos.pieces_of(us, pt) {
            for to in attacks(piece, from, occupied) & !ours {
                let captured = pos.piece_at(to).map(Piece::pt);
                let flag = if captured.is_some() { MoveFlag::Capture } else { MoveFlag::Quiet };
                out.push(Move::new(from, to, flag, pt, captured));
            }
        }
    }
}

/******************************************\
|==========================================|
|                Castling                  |
|==========================================|
\******************************************/

fn gen_castling(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    if !pos.variant().policy().castling_allowed() {
        return;
    }

    for (right, king_side) in [(Castling::king_side(us), true), (Castling::queen_side(us), false)] {
        if !pos.castling().has(right) {
            continue;
        }
        if let Some(ksq) = castling_king(pos, us).filter(|&ksq| can_castle(pos, ksq, right, king_side)) {
            let (king_to, _) = castle_targets(us, king_side);
            let flag = if king_side { MoveFlag::KingCastle } else { MoveFlag::QueenCastle };
            out.push(Move::new(ksq, king_to, flag, PieceType::King, None));
        }
    }
}

/// The king that holds the castling rights, standing on its home rank
#[inline]
fn castling_king(pos: &Position, us: Colour) -> Option<Square> {
    (pos.pieces_of(us, PieceType::King) & us.back_rank().bb()).lsb()
}

/// Path, rook and attack conditions for castling with `right`
fn can_castle(pos: &Position, ksq: Square, right: Castling, king_side: bool) -> bool {
    let us = pos.side_to_move();
    let policy = pos.variant().policy();

    let Some(rook_sq) = pos.castling_rooks().rook_sq(right) else {
        return false;
    };
    if pos.piece_at(rook_sq) != Some(Piece::from_parts(us, PieceType::Rook)) {
        return false;
    }

    let (king_to, rook_to) = castle_targets(us, king_side);

    // Everything either piece crosses or lands on must be empty, ignoring the two castling pieces
    let occupied = pos.occupied() ^ ksq.bb() ^ rook_sq.bb();
    let king_path = between(ksq, king_to) | king_to.bb();
    let rook_path = between(rook_sq, rook_to) | rook_to.bb();
    if ((king_path | rook_path) & occupied).is_occupied() {
        return false;
    }

    if !policy.castling_checks_attacks() {
        return true;
    }

    if pos.in_check() {
        return false;
    }

    let enemy_kings = match policy.king_safety() {
        KingSafety::Atomic => pos.pieces_of(!us, PieceType::King),
        _ => Bitboard::EMPTY,
    };

    let without_king = pos.occupied() ^ ksq.bb();
    (king_path & !ksq.bb())
        .all(|sq| (pos.attackers_with(sq, !us, without_king) & !enemy_kings).is_empty())
}

/******************************************\
|==========================================|
|                  Drops                   |
|==========================================|
\******************************************/

fn gen_drops(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let policy = pos.variant().policy();

    for pt in pos.reserves().available(us) {
        for to in policy.drop_targets(pos, pt, us) {
            out.push(Move::new_drop(pt, to));
        }
    }
}

/******************************************\
|==========================================|
|               Entry Point                |
|==========================================|
\******************************************/

/// Appends every pseudo-legal move for the side to move to `out`
pub(super) fn generate_pseudo_legal(pos: &Position, out: &mut Vec<Move>) {
    gen_pawn_moves(pos, out);
    gen_piece_moves(pos, out);
    gen_castling(pos, out);
    if pos.variant().has_drops() {
        gen_drops(pos, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;
    use crate::variant::Variant;
    use Square::*;

    fn pseudo(fen: &str, variant: Variant) -> Vec<Move> {
        let pos = Position::from_fen(fen, variant).unwrap();
        let mut out = Vec::new();
        generate_pseudo_legal(&pos, &mut out);
        out
    }

    #[test]
    fn test_start_position_has_twenty_moves() {
        assert_eq!(pseudo(START_FEN, Variant::Standard).len(), 20);
    }

    #[test]
    fn test_suicide_promotes_to_king() {
        let moves = pseudo("8/P7/8/8/8/8/8/8 w - - 0 1", Variant::Suicide);
        assert_eq!(moves.len(), 5);
        assert!(moves.contains(&Move::new_promotion(A7, A8, PieceType::King, None)));
    }

    #[test]
    fn test_en_passant_needs_victim() {
        let moves = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", Variant::Standard);
        assert!(moves.contains(&Move::new(E5, D6, MoveFlag::EnPassant, PieceType::Pawn, Some(PieceType::Pawn))));
    }

    #[test]
    fn test_castling_blocked_and_attacked() {
        let blocked = pseudo("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1", Variant::Standard);
        assert!(blocked.iter().any(|m| m.flag() == MoveFlag::KingCastle));
        assert!(!blocked.iter().any(|m| m.flag() == MoveFlag::QueenCastle));

        let attacked = pseudo("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", Variant::Standard);
        assert!(!attacked.iter().any(|m| m.flag() == MoveFlag::KingCastle));
        assert!(attacked.iter().any(|m| m.flag() == MoveFlag::QueenCastle));

        // b1 may be attacked on the queen side, only the king's path matters
        let b_file = pseudo("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", Variant::Standard);
        assert!(b_file.iter().any(|m| m.flag() == MoveFlag::QueenCastle));
    }

    #[test]
    fn test_giveaway_castles_through_attacks() {
        let moves = pseudo("4kr2/8/8/8/8/8/8/4K2R w K - 0 1", Variant::Giveaway);
        assert!(moves.iter().any(|m| m.flag() == MoveFlag::KingCastle));
        let suicide = pseudo("4kr2/8/8/8/8/8/8/4K2R w K - 0 1", Variant::Suicide);
        assert!(!suicide.iter().any(|m| m.is_castle()));
    }

    #[test]
    fn test_drops_from_reserve() {
        let moves = pseudo("4k3/8/8/8/8/8/8/4K3[Pn] w - - 0 1", Variant::Crazyhouse);
        let drops: Vec<_> = moves.iter().filter(|m| m.is_drop()).collect();
        // 62 empty squares minus the 14 empty back rank squares
        assert_eq!(drops.len(), 48);
        assert!(drops.iter().all(|m| m.piece() == PieceType::Pawn));
    }
}
