//! Long algebraic (UCI) move text.
//!
//! `e2e4`, `e1g1` for castling, `e7e8q` for promotion. Text is resolved
//! against the legal move set so flags such as en passant or castling are
//! inferred rather than trusted.

use crate::chess_errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_generator::resolve_move;
use crate::moves::chess_move::{char_to_promotion, ChessMove};
use crate::position::chess_types::{PieceKind, Square};
use crate::position::position::Position;
use crate::utils::algebraic::algebraic_to_square;

/// Splits `e7e8q` into origin, destination and promotion.
pub fn parse_long_algebraic(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(ChessError::UnresolvableSquare(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = text[4..].chars().next().map(char_to_promotion).transpose()?;

    Ok((from, to, promotion))
}

pub fn long_algebraic_to_move(text: &str, position: &Position) -> ChessResult<ChessMove> {
    let (from, to, promotion) = parse_long_algebraic(text)?;
    resolve_move(position, from, to, promotion)
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_move, parse_long_algebraic};
    use crate::chess_errors::ChessError;
    use crate::moves::chess_move::{ChessMove, MoveFlag};
    use crate::position::chess_types::PieceKind;
    use crate::position::position::Position;

    #[test]
    fn parses_plain_and_promotion_moves() {
        assert_eq!(parse_long_algebraic("e2e4").expect("should parse"), (12, 28, None));
        assert_eq!(
            parse_long_algebraic("a7a8n").expect("should parse"),
            (48, 56, Some(PieceKind::Knight))
        );
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            parse_long_algebraic("e2"),
            Err(ChessError::UnresolvableSquare(_))
        ));
        assert!(matches!(
            parse_long_algebraic("z2e4"),
            Err(ChessError::UnresolvableSquare(_))
        ));
        assert!(matches!(
            parse_long_algebraic("a7a8k"),
            Err(ChessError::InvalidPromotionPiece(_))
        ));
    }

    #[test]
    fn infers_castling_and_en_passant() {
        let castle_state =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        assert_eq!(
            long_algebraic_to_move("e1g1", &castle_state).expect("castle should resolve"),
            ChessMove::with_flag(4, 6, MoveFlag::KingSideCastle)
        );

        let en_passant_state =
            Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert_eq!(
            long_algebraic_to_move("e5d6", &en_passant_state).expect("en-passant should resolve"),
            ChessMove::with_flag(36, 43, MoveFlag::EnPassant)
        );
    }
}
