//! Perft: exhaustive leaf counting of the legal move tree.
//!
//! Counts are compared against published reference values to validate the
//! generator, including castling, en passant and promotion edge cases.

use crate::chess_errors::ChessResult;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::MoveFlag;
use crate::position::position::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

pub fn perft<G: MoveGenerator>(generator: &G, position: &Position, depth: u8) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(position)? {
        if depth == 1 {
            total.nodes += 1;
            total.captures += u64::from(mv.captured.is_some());
            total.en_passant += u64::from(mv.chess_move.flag == MoveFlag::EnPassant);
            total.castles += u64::from(mv.chess_move.is_castle());
            total.promotions += u64::from(mv.chess_move.promotion.is_some());
        } else {
            total.merge(perft(generator, &mv.position_after, depth - 1)?);
        }
    }

    Ok(total)
}

pub fn perft_legal(position: &Position, depth: u8) -> ChessResult<PerftCounts> {
    perft(&LegalMoveGenerator, position, depth)
}
