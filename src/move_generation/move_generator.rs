use crate::chess_errors::ChessResult;
use crate::moves::chess_move::ChessMove;
use crate::position::chess_types::PieceKind;
use crate::position::position::Position;

/// A legal move together with what it captures and the position it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub captured: Option<PieceKind>,
    pub position_after: Position,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, position: &Position) -> ChessResult<Vec<GeneratedMove>>;
}
