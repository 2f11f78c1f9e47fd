//! Grid view of a position for API clients.
//!
//! Row 0 is rank 8 and column 0 is file a, matching how a board is drawn
//! from White's side.

use serde::Serialize;

use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::position::chess_types::{Color, PieceKind, Square};
use crate::position::position::Position;
use crate::utils::algebraic::{grid_to_square, square_to_grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareView {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    /// Only present on kings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_check: Option<bool>,
}

pub type BoardView = [[Option<SquareView>; 8]; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSquare {
    pub row: u8,
    pub col: u8,
}

impl From<Square> for GridSquare {
    fn from(square: Square) -> Self {
        let (row, col) = square_to_grid(square);
        Self { row, col }
    }
}

pub fn board_view(position: &Position) -> BoardView {
    std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            let square = grid_to_square(row as i64, col as i64).ok()?;
            let piece = position.piece_at(square)?;
            Some(SquareView {
                kind: piece.kind,
                color: piece.color,
                in_check: (piece.kind == PieceKind::King)
                    .then(|| is_king_in_check(position, piece.color)),
            })
        })
    })
}
