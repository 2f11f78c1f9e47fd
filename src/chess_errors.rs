//! Errors used throughout the chess session service.
//!
//! This module defines the canonical error type returned by the rules engine,
//! the position codec, sessions, the engine bridge and the API boundary.
//! `ChessError` is the single error type across the crate so that failures
//! propagate with `?` and callers can branch on the variant instead of parsing
//! messages.
//!
//! Usage guidelines:
//! - Rules-engine and input errors (`InvalidCoordinates`, `IllegalMove`,
//!   `InvalidEncoding`, ...) are local and non-retriable; the caller has to
//!   submit a corrected request.
//! - Engine bridge errors (`EngineTimeout`, `EngineNoMove`, ...) and
//!   `StaleMove` may be retried, or the caller may fall back to the built-in
//!   heuristic opponent.
//! - `InvalidPosition` signals a broken structural precondition (for example
//!   a missing king) and should never surface while a session is the sole
//!   mutator of its position.

use thiserror::Error;

use crate::position::chess_types::Color;

/// Unified error type for the chess session service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A row or column fell outside `0..=7`.
    #[error("invalid coordinates: row {row}, col {col}")]
    InvalidCoordinates { row: i64, col: i64 },

    /// The side name was neither `white` nor `black`.
    #[error("invalid side: {0}")]
    InvalidSide(String),

    /// A move or bot request was made for the side that is not to move.
    #[error("not {requested}'s turn")]
    NotYourTurn { requested: Color },

    /// A square in algebraic notation could not be parsed.
    #[error("unresolvable square: {0}")]
    UnresolvableSquare(String),

    /// The promotion piece was not one of knight, bishop, rook or queen.
    #[error("invalid promotion piece: {0}")]
    InvalidPromotionPiece(String),

    /// The requested move is not in the legal move set.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Undo was requested at the initial position.
    #[error("nothing to undo")]
    NothingToUndo,

    /// An encoded position failed validation.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A structural precondition on the position was violated.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A bot move was requested but the side to move has no legal moves.
    #[error("no legal moves available")]
    NoLegalMoves,

    /// The session changed while an engine was thinking.
    #[error("stale move {0}: position changed while the engine was searching")]
    StaleMove(String),

    /// No session is registered under the identifier.
    #[error("session {0} not found")]
    SessionNotFound(u64),

    /// The request could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A configuration value could not be read.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The engine process could not be started or talked to.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine produced no answer before the deadline.
    #[error("engine timed out after {timeout_ms} ms")]
    EngineTimeout { timeout_ms: u64 },

    /// The engine answered without a usable best move.
    #[error("engine returned no move")]
    EngineNoMove,

    /// The engine proposed a move the generator rejects.
    #[error("engine proposed illegal move: {0}")]
    EngineIllegalMove(String),
}

impl ChessError {
    /// Stable snake_case tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ChessError::InvalidCoordinates { .. } => "invalid_coordinates",
            ChessError::InvalidSide(_) => "invalid_side",
            ChessError::NotYourTurn { .. } => "not_your_turn",
            ChessError::UnresolvableSquare(_) => "unresolvable_square",
            ChessError::InvalidPromotionPiece(_) => "invalid_promotion_piece",
            ChessError::IllegalMove(_) => "illegal_move",
            ChessError::NothingToUndo => "nothing_to_undo",
            ChessError::InvalidEncoding(_) => "invalid_encoding",
            ChessError::InvalidPosition(_) => "invalid_position",
            ChessError::NoLegalMoves => "no_legal_moves",
            ChessError::StaleMove(_) => "stale_move",
            ChessError::SessionNotFound(_) => "session_not_found",
            ChessError::InvalidRequest(_) => "invalid_request",
            ChessError::InvalidConfig(_) => "invalid_config",
            ChessError::EngineUnavailable(_) => "engine_unavailable",
            ChessError::EngineTimeout { .. } => "engine_timeout",
            ChessError::EngineNoMove => "engine_no_move",
            ChessError::EngineIllegalMove(_) => "engine_illegal_move",
        }
    }

    /// True for failures a caller may retry or route to another move source.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ChessError::EngineUnavailable(_)
                | ChessError::EngineTimeout { .. }
                | ChessError::EngineNoMove
                | ChessError::EngineIllegalMove(_)
                | ChessError::StaleMove(_)
        )
    }

    /// True for failures that came from the external engine.
    pub fn is_engine_error(&self) -> bool {
        matches!(
            self,
            ChessError::EngineUnavailable(_)
                | ChessError::EngineTimeout { .. }
                | ChessError::EngineNoMove
                | ChessError::EngineIllegalMove(_)
        )
    }
}

pub type ChessResult<T> = Result<T, ChessError>;
