//! Pawn attack bitboards.
//!
//! Pawns capture diagonally forward, so the attack table differs per color.
//! Pushes are handled by the pawn move generator because they depend on
//! occupancy.

use crate::position::chess_types::{Color, Square};

pub const WHITE_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(1);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(-1);

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

/// Rank step of a forward pawn move for `color`.
#[inline]
pub const fn forward_step(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
pub const fn start_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[inline]
pub const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

const fn generate_pawn_attacks(rank_step: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let target_rank = rank + rank_step;
        let mut attacks = 0u64;

        if target_rank >= 0 && target_rank < 8 {
            if file > 0 {
                attacks |= 1u64 << (target_rank * 8 + file - 1);
            }
            if file < 7 {
                attacks |= 1u64 << (target_rank * 8 + file + 1);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::{pawn_attacks, BLACK_PAWN_ATTACKS, WHITE_PAWN_ATTACKS};
    use crate::position::chess_types::Color;

    #[test]
    fn white_pawn_attacks_from_e2() {
        let e2 = 12u8;
        let expected = (1u64 << 19) | (1u64 << 21);
        assert_eq!(WHITE_PAWN_ATTACKS[e2 as usize], expected);
        assert_eq!(pawn_attacks(Color::White, e2), expected);
    }

    #[test]
    fn black_pawn_attacks_from_a7_stay_on_board() {
        let a7 = 48u8;
        assert_eq!(BLACK_PAWN_ATTACKS[a7 as usize], 1u64 << 41);
    }

    #[test]
    fn pawns_on_last_rank_attack_nothing() {
        assert_eq!(pawn_attacks(Color::White, 60), 0);
        assert_eq!(pawn_attacks(Color::Black, 3), 0);
    }
}
