//! The move value type.
//!
//! A `ChessMove` carries only what is needed to replay it on the position it
//! was generated for: origin, destination, promotion kind and a flag for the
//! special rules. Captured pieces are looked up on the board.

use std::fmt;

use crate::chess_errors::{ChessError, ChessResult};
use crate::position::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

/// Special-rule tag of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveFlag {
    #[default]
    Normal,
    DoublePush,
    EnPassant,
    KingSideCastle,
    QueenSideCastle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub flag: MoveFlag,
}

impl ChessMove {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::Normal,
        }
    }

    #[inline]
    pub const fn with_flag(from: Square, to: Square, flag: MoveFlag) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flag,
        }
    }

    #[inline]
    pub const fn promoting(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            flag: MoveFlag::Normal,
        }
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self.flag, MoveFlag::KingSideCastle | MoveFlag::QueenSideCastle)
    }

    /// Long algebraic form, for example `e2e4` or `e7e8q`.
    pub fn to_long_algebraic(&self) -> String {
        let mut out = String::with_capacity(5);
        out.push_str(&square_to_algebraic(self.from));
        out.push_str(&square_to_algebraic(self.to));
        if let Some(promo) = self.promotion {
            if let Ok(ch) = promotion_to_char(promo) {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_algebraic())
    }
}

pub fn promotion_to_char(piece_kind: PieceKind) -> ChessResult<char> {
    match piece_kind {
        PieceKind::Knight => Ok('n'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Queen => Ok('q'),
        _ => Err(ChessError::InvalidPromotionPiece(format!("{piece_kind:?}"))),
    }
}

pub fn char_to_promotion(ch: char) -> ChessResult<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Ok(PieceKind::Knight),
        'b' => Ok(PieceKind::Bishop),
        'r' => Ok(PieceKind::Rook),
        'q' => Ok(PieceKind::Queen),
        _ => Err(ChessError::InvalidPromotionPiece(ch.to_string())),
    }
}

/// Parses a promotion given either as a letter (`q`) or a piece name (`queen`).
pub fn parse_promotion(text: &str) -> ChessResult<PieceKind> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => char_to_promotion(ch),
        _ => match trimmed.to_ascii_lowercase().as_str() {
            "knight" => Ok(PieceKind::Knight),
            "bishop" => Ok(PieceKind::Bishop),
            "rook" => Ok(PieceKind::Rook),
            "queen" => Ok(PieceKind::Queen),
            _ => Err(ChessError::InvalidPromotionPiece(trimmed.to_owned())),
        },
    }
}
