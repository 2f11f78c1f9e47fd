//! One-ply capture-greedy opponent.
//!
//! Scores every legal move by the value of the piece it captures and plays a
//! uniformly random choice among the best. Quiet positions therefore produce a
//! uniformly random legal move.

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{Engine, GoParams};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::ChessMove;
use crate::position::chess_rules::capture_value;
use crate::position::chess_types::{Color, PieceKind};
use crate::position::position::Position;

/// Heuristic move for `side` using the thread-local generator.
pub fn choose_move(position: &Position, side: Color) -> ChessResult<ChessMove> {
    choose_move_with_rng(position, side, &mut rand::rng())
}

pub fn choose_move_with_rng<R: Rng + ?Sized>(
    position: &Position,
    side: Color,
    rng: &mut R,
) -> ChessResult<ChessMove> {
    if side != position.side_to_move {
        return Err(ChessError::NotYourTurn { requested: side });
    }

    let legal_moves = LegalMoveGenerator.generate_legal_moves(position)?;
    if legal_moves.is_empty() {
        return Err(ChessError::NoLegalMoves);
    }

    let mut best_value = 0u32;
    let mut best_moves = Vec::new();

    for mv in &legal_moves {
        let value = match mv.captured {
            None => 0,
            Some(PieceKind::King) => {
                return Err(ChessError::InvalidPosition(format!(
                    "move {} captures a king",
                    mv.chess_move
                )))
            }
            Some(kind) => capture_value(kind).unwrap_or(0),
        };

        if value > best_value {
            best_value = value;
            best_moves.clear();
            best_moves.push(mv.chess_move);
        } else if value == best_value {
            best_moves.push(mv.chess_move);
        }
    }

    let picked = best_moves
        .as_slice()
        .choose(rng)
        .copied()
        .ok_or(ChessError::NoLegalMoves)?;

    debug!(
        legal = legal_moves.len(),
        ties = best_moves.len(),
        capture_score = best_value,
        mv = %picked,
        "greedy engine picked move"
    );
    Ok(picked)
}

#[derive(Debug, Default)]
pub struct GreedyEngine;

impl GreedyEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for GreedyEngine {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_move(&mut self, position: &Position, _params: &GoParams) -> ChessResult<ChessMove> {
        choose_move(position, position.side_to_move)
    }
}
