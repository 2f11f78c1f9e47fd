//! Move-source abstraction.
//!
//! The built-in heuristic opponent and the external UCI engine both sit
//! behind `Engine`, so the session layer can ask either for a move without
//! knowing where it comes from.

use crate::chess_errors::ChessResult;
use crate::moves::chess_move::ChessMove;
use crate::position::position::Position;

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub movetime_ms: Option<u64>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    /// Picks a move for the side to move in `position`.
    ///
    /// The returned move is a proposal; callers check it against the legal
    /// set before applying it.
    fn choose_move(&mut self, position: &Position, params: &GoParams) -> ChessResult<ChessMove>;
}
