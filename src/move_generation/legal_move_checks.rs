//! Attack detection.
//!
//! Answers "is this square attacked by that side" by looking outward from the
//! target square with each piece's attack pattern, which is the same test
//! used for check detection, castling safety and the legality filter.

use crate::position::{chess_types::*, position::Position};
use crate::moves::leaper_moves::{king_attacks, knight_attacks};
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::sliding_moves::{bishop_attacks, rook_attacks};

#[inline]
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    let Some(king_sq) = position.king_square(color) else {
        return false;
    };
    is_square_attacked(position, king_sq, color.opposite())
}

pub fn is_square_attacked(position: &Position, square: Square, attacker_color: Color) -> bool {
    let attacker = |kind: PieceKind| position.bitboard(attacker_color, kind);

    // A pawn of the attacker attacks `square` exactly when a defender pawn on
    // `square` would attack the pawn's square.
    if pawn_attacks(attacker_color.opposite(), square) & attacker(PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & attacker(PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & attacker(PieceKind::King) != 0 {
        return true;
    }

    let queens = attacker(PieceKind::Queen);
    let bishops_queens = attacker(PieceKind::Bishop) | queens;
    if bishop_attacks(square, position.occupancy_all) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = attacker(PieceKind::Rook) | queens;
    rook_attacks(square, position.occupancy_all) & rooks_queens != 0
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked};
    use crate::position::chess_types::Color;
    use crate::position::position::Position;

    #[test]
    fn start_position_third_rank_is_covered_by_white() {
        let game = Position::new_game();
        for square in 16..24 {
            assert!(is_square_attacked(&game, square, Color::White));
            assert!(!is_square_attacked(&game, square, Color::Black));
        }
        assert!(!is_square_attacked(&game, 28, Color::White));
    }

    #[test]
    fn pawn_attacks_only_diagonally_forward() {
        let game = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        // d5 pawn attacks c4 and e4, not c6/e6 or d4.
        assert!(is_square_attacked(&game, 26, Color::Black));
        assert!(is_square_attacked(&game, 28, Color::Black));
        assert!(!is_square_attacked(&game, 27, Color::Black));
        assert!(!is_square_attacked(&game, 42, Color::Black));
    }

    #[test]
    fn sliders_are_blocked_by_any_piece() {
        let game = Position::from_fen("4k3/8/8/8/8/8/4P3/r3K3 w - - 0 1").expect("FEN should parse");
        assert!(is_king_in_check(&game, Color::White));
        let blocked =
            Position::from_fen("4k3/8/8/8/8/8/8/r2NK3 w - - 0 1").expect("FEN should parse");
        assert!(!is_king_in_check(&blocked, Color::White));
    }
}
