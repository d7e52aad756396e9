//! Compile-time builders for the attack and geometry tables in `lookup`.
//!
//! Everything here is a `const fn` driven by `while` loops so the tables are
//! baked into the binary.

use super::lookup::{AttackTable, RayTable, SquarePairTable};
use crate::core::{Bitboard, Direction, Square};

/// Attacks of a piece that steps once in each of `dirs`
pub(super) const fn init_leaper_attacks(dirs: &[Direction]) -> AttackTable {
    let mut table = [Bitboard::EMPTY; Square::NUM];

    let mut i = 0;
    while i < Square::NUM {
        let sq = unsafe { Square::from_unchecked(i as u8) };
        let mut j = 0;
        while j < dirs.len() {
            if let Some(to) = sq.add(dirs[j]) {
                table[i].0 |= to.bb().0;
            }
            j += 1;
        }
        i += 1;
    }

    table
}

/// Rays from every square in the eight directions of `Direction::KING`, excluding the origin
pub(super) const fn init_ray_table() -> RayTable {
    let mut table = [[Bitboard::EMPTY; Square::NUM]; 8];

    let mut d = 0;
    while d < 8 {
        let dir = Direction::KING[d];
        let mut i = 0;
        while i < Square::NUM {
            let mut cursor = unsafe { Square::from_unchecked(i as u8) }.add(dir);
            while let Some(sq) = cursor {
                table[d][i].0 |= sq.bb().0;
                cursor = sq.add(dir);
            }
            i += 1;
        }
        d += 1;
    }

    table
}

/// Squares strictly between two aligned squares; empty when they share no line
pub(super) const fn init_between_table() -> SquarePairTable {
    let mut table = [[Bitboard::EMPTY; Square::NUM]; Square::NUM];

    let mut i = 0;
    while i < Square::NUM {
        let from = unsafe { Square::from_unchecked(i as u8) };
        let mut d = 0;
        while d < 8 {
            let dir = Direction::KING[d];
            let mut between = Bitboard::EMPTY;
            let mut cursor = from.add(dir);
            while let Some(sq) = cursor {
                table[i][sq as usize] = between;
                between.0 |= sq.bb().0;
                cursor = sq.add(dir);
            }
            d += 1;
        }
        i += 1;
    }

    table
}

/// Full board line through two aligned squares, both included; empty otherwise
pub(super) const fn init_line_table(rays: &RayTable) -> SquarePairTable {
    let mut table = [[Bitboard::EMPTY; Square::NUM]; Square::NUM];

    let mut i = 0;
    while i < Square::NUM {
        let from = unsafe { Square::from_unchecked(i as u8) };
        let mut d = 0;
        while d < 4 {
            // Opposite direction sits four slots along in Direction::KING
            let line = Bitboard(rays[d][i].0 | rays[d + 4][i].0 | from.bb().0);
            let mut targets = line;
            targets.0 &= !from.bb().0;
            while let Some(to) = targets.pop_lsb() {
                table[i][to as usize] = line;
            }
            d += 1;
        }
        i += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rays_stop_at_the_edge() {
        let rays = init_ray_table();
        // Direction::KING[0] is north
        assert_eq!(rays[0][Square::E6 as usize], Bitboard::from([Square::E7, Square::E8]));
        // Direction::KING[5] is south-west
        assert_eq!(rays[5][Square::C3 as usize], Bitboard::from([Square::B2, Square::A1]));
        assert_eq!(rays[2][Square::H4 as usize], Bitboard::EMPTY);
    }

    #[test]
    fn test_between_excludes_endpoints() {
        let between = init_between_table();
        assert_eq!(
            between[Square::A1 as usize][Square::D4 as usize],
            Bitboard::from([Square::B2, Square::C3])
        );
        assert_eq!(between[Square::E1 as usize][Square::E2 as usize], Bitboard::EMPTY);
        assert_eq!(between[Square::A1 as usize][Square::B3 as usize], Bitboard::EMPTY);
    }
}
