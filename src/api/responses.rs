//! Outbound API responses.
//!
//! Every response carries `success`. Failures have the shape
//! `{"success": false, "message": ..., "error": <kind>}` where `error` is the
//! stable tag from [`ChessError::kind`].

use serde::Serialize;

use crate::api::board_view::{BoardView, GridSquare};
use crate::chess_errors::ChessError;
use crate::position::chess_types::Color;
use crate::session::session::MoveReport;
use crate::session::session_handle::SessionId;
use crate::status::game_status::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub session_id: SessionId,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub success: bool,
    pub board: BoardView,
    pub current_turn: Color,
    pub game_status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub success: bool,
    #[serde(rename = "move")]
    pub chess_move: String,
    pub current_turn: Color,
    pub game_status: GameStatus,
    pub move_history: Vec<String>,
    /// Which move source answered a bot request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

impl MoveResponse {
    pub fn from_report(report: MoveReport, engine: Option<String>) -> Self {
        Self {
            success: true,
            chess_move: report.chess_move.to_long_algebraic(),
            current_turn: report.side_to_move,
            game_status: report.status,
            move_history: report.move_log,
            engine,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMovesResponse {
    pub success: bool,
    pub valid_moves: Vec<GridSquare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    pub current_turn: Color,
    pub game_status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    pub move_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FenResponse {
    pub success: bool,
    pub fen: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
}

impl From<&ChessError> for ErrorResponse {
    fn from(error: &ChessError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error: error.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Session(SessionResponse),
    Board(Box<BoardResponse>),
    Move(MoveResponse),
    ValidMoves(ValidMovesResponse),
    Status(StatusResponse),
    History(HistoryResponse),
    Fen(FenResponse),
    Ack(AckResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_success(&self) -> bool {
        match self {
            Response::Session(r) => r.success,
            Response::Board(r) => r.success,
            Response::Move(r) => r.success,
            Response::ValidMoves(r) => r.success,
            Response::Status(r) => r.success,
            Response::History(r) => r.success,
            Response::Fen(r) => r.success,
            Response::Ack(r) => r.success,
            Response::Error(r) => r.success,
        }
    }

    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"message":"response encoding failed: {e}","error":"internal"}}"#)
        })
    }
}

impl From<ChessError> for Response {
    fn from(error: ChessError) -> Self {
        Response::Error(ErrorResponse::from(&error))
    }
}
