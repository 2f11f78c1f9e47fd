//! Dead-position detection by material.
//!
//! Covers the cases where no sequence of legal moves can mate: bare kings,
//! king and one minor piece against a bare king, and king and bishop against
//! king and bishop with both bishops on squares of the same color.

use crate::position::{chess_types::*, position::Position};

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

pub fn is_insufficient_material(position: &Position) -> bool {
    for color in [Color::White, Color::Black] {
        let heavy_or_pawns = position.bitboard(color, PieceKind::Pawn)
            | position.bitboard(color, PieceKind::Rook)
            | position.bitboard(color, PieceKind::Queen);
        if heavy_or_pawns != 0 {
            return false;
        }
    }

    let minors = |color: Color| {
        position.bitboard(color, PieceKind::Knight) | position.bitboard(color, PieceKind::Bishop)
    };
    let white_minors = minors(Color::White);
    let black_minors = minors(Color::Black);

    match (white_minors.count_ones(), black_minors.count_ones()) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (1, 1) => {
            let white_bishop = position.bitboard(Color::White, PieceKind::Bishop);
            let black_bishop = position.bitboard(Color::Black, PieceKind::Bishop);
            white_bishop != 0
                && black_bishop != 0
                && (white_bishop & LIGHT_SQUARES != 0) == (black_bishop & LIGHT_SQUARES != 0)
        }
        _ => false,
    }
}
