//! Inbound API requests.
//!
//! One request is a JSON object tagged by `op`, for example
//! `{"op": "post-move", "fromRow": 6, "fromCol": 4, "toRow": 4, "toCol": 4, "color": "white"}`.
//! Requests without `sessionId` address the service's default session.

use serde::Deserialize;

use crate::chess_errors::{ChessError, ChessResult};
use crate::session::session_handle::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Request {
    CreateSession,
    GetBoard {
        session_id: Option<SessionId>,
    },
    PostMove {
        session_id: Option<SessionId>,
        from_row: i64,
        from_col: i64,
        to_row: i64,
        to_col: i64,
        color: String,
        promotion: Option<String>,
    },
    /// Without `color` the bot plays for whichever side is to move.
    PostBotMove {
        session_id: Option<SessionId>,
        color: Option<String>,
    },
    PostValidMoves {
        session_id: Option<SessionId>,
        row: i64,
        col: i64,
    },
    PostReset {
        session_id: Option<SessionId>,
    },
    PostUndo {
        session_id: Option<SessionId>,
    },
    GetMoveHistory {
        session_id: Option<SessionId>,
    },
    GetFen {
        session_id: Option<SessionId>,
    },
    LoadFen {
        session_id: Option<SessionId>,
        fen: String,
    },
    CloseSession {
        session_id: SessionId,
    },
}

impl Request {
    pub fn parse(line: &str) -> ChessResult<Self> {
        serde_json::from_str(line).map_err(|e| ChessError::InvalidRequest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Request;
    use crate::chess_errors::ChessError;

    #[test]
    fn move_request_uses_camel_case_fields() {
        let request = Request::parse(
            r#"{"op":"post-move","sessionId":3,"fromRow":6,"fromCol":4,"toRow":4,"toCol":4,"color":"white"}"#,
        )
        .expect("request should parse");
        assert_eq!(
            request,
            Request::PostMove {
                session_id: Some(3),
                from_row: 6,
                from_col: 4,
                to_row: 4,
                to_col: 4,
                color: "white".to_owned(),
                promotion: None,
            }
        );
    }

    #[test]
    fn session_id_is_optional() {
        assert_eq!(
            Request::parse(r#"{"op":"get-board"}"#).expect("request should parse"),
            Request::GetBoard { session_id: None }
        );
        assert_eq!(
            Request::parse(r#"{"op":"create-session"}"#).expect("request should parse"),
            Request::CreateSession
        );
    }

    #[test]
    fn malformed_requests_are_invalid() {
        for line in [
            "not json",
            r#"{"op":"fly"}"#,
            r#"{"op":"post-valid-moves","row":1}"#,
        ] {
            assert!(matches!(
                Request::parse(line),
                Err(ChessError::InvalidRequest(_))
            ));
        }
    }
}
