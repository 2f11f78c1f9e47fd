//! Single-game state machine.
//!
//! A `Session` owns the authoritative position of one game together with the
//! stack of positions that preceded it. Every mutation either commits fully
//! or fails without touching state, and bumps `revision` when it commits.

use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_generator::{legal_destinations, legal_moves, resolve_move};
use crate::moves::chess_move::ChessMove;
use crate::position::chess_types::{Color, PieceKind, Square};
use crate::position::position::Position;
use crate::status::game_status::{evaluate_status, GameStatus, StatusOptions};
use crate::utils::render_position::render_position;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    position_before: Position,
    chess_move: ChessMove,
    notation: String,
}

/// Snapshot of a session right after a move, taken under the same lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub chess_move: ChessMove,
    pub status: GameStatus,
    pub side_to_move: Color,
    pub move_log: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    position: Position,
    history: Vec<HistoryEntry>,
    revision: u64,
    options: StatusOptions,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StatusOptions::default())
    }
}

impl Session {
    pub fn new(options: StatusOptions) -> Self {
        Self {
            position: Position::new_game(),
            history: Vec::new(),
            revision: 0,
            options,
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Bumped by every committed mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn board(&self) -> String {
        render_position(&self.position)
    }

    /// Applied moves in long algebraic notation, oldest first.
    pub fn move_log(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.notation.clone()).collect()
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.history.last().map(|entry| entry.chess_move)
    }

    pub fn report(&self, chess_move: ChessMove, status: GameStatus) -> MoveReport {
        MoveReport {
            chess_move,
            status,
            side_to_move: self.side_to_move(),
            move_log: self.move_log(),
        }
    }

    pub fn status(&self) -> ChessResult<GameStatus> {
        evaluate_status(
            &self.position,
            self.history.iter().map(|entry| &entry.position_before),
            self.options,
        )
    }

    pub fn legal_destinations(&self, from: Square) -> ChessResult<Vec<Square>> {
        legal_destinations(&self.position, from)
    }

    /// Plays `mv` if it is in the legal set of the live position.
    pub fn apply_move(&mut self, mv: &ChessMove) -> ChessResult<GameStatus> {
        let generated = legal_moves(&self.position)?
            .into_iter()
            .find(|generated| generated.chess_move == *mv)
            .ok_or_else(|| ChessError::IllegalMove(mv.to_long_algebraic()))?;

        let next = generated.position_after;
        let status = evaluate_status(
            &next,
            self.history
                .iter()
                .map(|entry| &entry.position_before)
                .chain(std::iter::once(&self.position)),
            self.options,
        )?;

        let notation = mv.to_long_algebraic();
        let before = std::mem::replace(&mut self.position, next);
        self.history.push(HistoryEntry {
            position_before: before,
            chess_move: *mv,
            notation: notation.clone(),
        });
        self.revision += 1;

        info!(
            mv = %notation,
            captured = ?generated.captured,
            status = %status,
            ply = self.history.len(),
            "move applied"
        );
        debug!("\n{}", self.board());
        Ok(status)
    }

    /// Resolves coordinates against the legal set of the live position.
    ///
    /// A pawn reaching the last rank without a promotion piece becomes a queen.
    pub fn resolve(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<ChessMove> {
        resolve_move(&self.position, from, to, promotion)
    }

    /// Resolves coordinates to a legal move and plays it.
    pub fn apply_coordinates(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<GameStatus> {
        let mv = self.resolve(from, to, promotion)?;
        self.apply_move(&mv)
    }

    pub fn ensure_turn(&self, side: Color) -> ChessResult<()> {
        if side != self.position.side_to_move {
            return Err(ChessError::NotYourTurn { requested: side });
        }
        Ok(())
    }

    /// Takes back the last move, restoring the exact prior position.
    pub fn undo(&mut self) -> ChessResult<ChessMove> {
        let entry = self.history.pop().ok_or(ChessError::NothingToUndo)?;
        self.position = entry.position_before;
        self.revision += 1;
        info!(mv = %entry.notation, ply = self.history.len(), "move undone");
        Ok(entry.chess_move)
    }

    pub fn reset(&mut self) {
        self.position = Position::new_game();
        self.history.clear();
        self.revision += 1;
        info!("session reset");
    }

    /// Starts over from an encoded position; a bad encoding changes nothing.
    pub fn load_fen(&mut self, fen: &str) -> ChessResult<GameStatus> {
        let position = Position::from_fen(fen)?;
        let status = evaluate_status(&position, [], self.options)?;

        self.position = position;
        self.history.clear();
        self.revision += 1;
        info!(fen, status = %status, "position loaded");
        Ok(status)
    }
}
