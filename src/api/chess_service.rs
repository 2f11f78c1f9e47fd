//! Transport-agnostic request handler.
//!
//! `ChessService` owns the session registry and the optional external engine
//! and turns each [`Request`] into exactly one [`Response`]. Failures never
//! escape as `Err`: they are rendered as error responses.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::api::board_view::{board_view, GridSquare};
use crate::api::requests::Request;
use crate::api::responses::{
    AckResponse, BoardResponse, FenResponse, HistoryResponse, MoveResponse, Response,
    SessionResponse, StatusResponse, ValidMovesResponse,
};
use crate::chess_errors::{ChessError, ChessResult};
use crate::config::{EngineConfig, ServiceConfig};
use crate::engines::engine_greedy::GreedyEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::engines::uci_bridge::UciBridge;
use crate::moves::chess_move::parse_promotion;
use crate::position::chess_types::Color;
use crate::session::session::MoveReport;
use crate::session::session_handle::{SessionHandle, SessionId};
use crate::session::session_registry::SessionRegistry;
use crate::utils::algebraic::grid_to_square;

pub struct ChessService {
    config: ServiceConfig,
    registry: SessionRegistry,
    default_session: SessionId,
    // One engine process shared by every session; searches are serialized.
    engine: Mutex<Option<UciBridge>>,
}

impl ChessService {
    pub fn new(config: ServiceConfig) -> Self {
        let registry = SessionRegistry::new(config.status_options());
        let default_session = registry.create().id();
        Self {
            config,
            registry,
            default_session,
            engine: Mutex::new(None),
        }
    }

    #[inline]
    pub fn default_session(&self) -> SessionId {
        self.default_session
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Decodes one JSON request line and returns the encoded response line.
    pub fn handle_line(&self, line: &str) -> String {
        self.respond(line).to_json_line()
    }

    pub fn respond(&self, line: &str) -> Response {
        match Request::parse(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                debug!(error = %e, "rejected request line");
                Response::from(e)
            }
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                if e.is_retriable() {
                    warn!(error = %e, kind = e.kind(), "request failed");
                } else {
                    debug!(error = %e, kind = e.kind(), "request rejected");
                }
                Response::from(e)
            }
        }
    }

    fn dispatch(&self, request: Request) -> ChessResult<Response> {
        match request {
            Request::CreateSession => {
                let handle = self.registry.create();
                Ok(Response::Session(SessionResponse {
                    success: true,
                    session_id: handle.id(),
                    created_at: handle.created_at().to_rfc3339(),
                }))
            }
            Request::GetBoard { session_id } => self.get_board(session_id),
            Request::PostMove {
                session_id,
                from_row,
                from_col,
                to_row,
                to_col,
                color,
                promotion,
            } => {
                let side: Color = color.parse()?;
                let from = grid_to_square(from_row, from_col)?;
                let to = grid_to_square(to_row, to_col)?;
                let promotion = promotion.as_deref().map(parse_promotion).transpose()?;

                let report = self.session(session_id)?.write(|s| {
                    s.ensure_turn(side)?;
                    let mv = s.resolve(from, to, promotion)?;
                    let status = s.apply_move(&mv)?;
                    Ok::<_, ChessError>(s.report(mv, status))
                })?;
                Ok(Response::Move(MoveResponse::from_report(report, None)))
            }
            Request::PostBotMove { session_id, color } => {
                let handle = self.session(session_id)?;
                let side = match color {
                    Some(color) => color.parse()?,
                    None => handle.read(|s| s.side_to_move()),
                };
                let (report, engine) = self.bot_move(&handle, side)?;
                Ok(Response::Move(MoveResponse::from_report(report, Some(engine))))
            }
            Request::PostValidMoves {
                session_id,
                row,
                col,
            } => {
                let from = grid_to_square(row, col)?;
                let destinations = self
                    .session(session_id)?
                    .read(|s| s.legal_destinations(from))?;
                Ok(Response::ValidMoves(ValidMovesResponse {
                    success: true,
                    valid_moves: destinations.into_iter().map(GridSquare::from).collect(),
                }))
            }
            Request::PostReset { session_id } => {
                let (current_turn, game_status) = self.session(session_id)?.write(|s| {
                    s.reset();
                    s.status().map(|status| (s.side_to_move(), status))
                })?;
                Ok(Response::Status(StatusResponse {
                    success: true,
                    message: "Game reset.".to_owned(),
                    current_turn,
                    game_status,
                }))
            }
            Request::PostUndo { session_id } => {
                let report = self.session(session_id)?.write(|s| {
                    let mv = s.undo()?;
                    let status = s.status()?;
                    Ok::<_, ChessError>(s.report(mv, status))
                })?;
                Ok(Response::Move(MoveResponse::from_report(report, None)))
            }
            Request::GetMoveHistory { session_id } => {
                let move_history = self.session(session_id)?.read(|s| s.move_log());
                Ok(Response::History(HistoryResponse {
                    success: true,
                    move_history,
                }))
            }
            Request::GetFen { session_id } => {
                let fen = self.session(session_id)?.read(|s| s.fen());
                Ok(Response::Fen(FenResponse { success: true, fen }))
            }
            Request::LoadFen { session_id, fen } => {
                let (current_turn, game_status) = self.session(session_id)?.write(|s| {
                    s.load_fen(&fen).map(|status| (s.side_to_move(), status))
                })?;
                Ok(Response::Status(StatusResponse {
                    success: true,
                    message: "Position loaded.".to_owned(),
                    current_turn,
                    game_status,
                }))
            }
            Request::CloseSession { session_id } => {
                self.registry.close(session_id)?;
                Ok(Response::Ack(AckResponse {
                    success: true,
                    message: format!("Session {session_id} closed."),
                }))
            }
        }
    }

    fn session(&self, id: Option<SessionId>) -> ChessResult<Arc<SessionHandle>> {
        self.registry.get(id.unwrap_or(self.default_session))
    }

    fn get_board(&self, session_id: Option<SessionId>) -> ChessResult<Response> {
        self.session(session_id)?.read(|s| {
            Ok(Response::Board(Box::new(BoardResponse {
                success: true,
                board: board_view(s.position()),
                current_turn: s.side_to_move(),
                game_status: s.status()?,
            })))
        })
    }

    /// Plays a bot move, preferring the external engine when one is configured.
    fn bot_move(&self, handle: &SessionHandle, side: Color) -> ChessResult<(MoveReport, String)> {
        let Some(engine_config) = &self.config.engine else {
            return heuristic_move(handle, side);
        };

        match self.external_move(engine_config, handle, side) {
            Err(e) if e.is_engine_error() && self.config.fallback_to_heuristic => {
                warn!(
                    session = handle.id(),
                    error = %e,
                    "external engine failed, falling back to heuristic"
                );
                heuristic_move(handle, side)
            }
            other => other,
        }
    }

    fn external_move(
        &self,
        engine_config: &EngineConfig,
        handle: &SessionHandle,
        side: Color,
    ) -> ChessResult<(MoveReport, String)> {
        let mut slot = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(UciBridge::spawn(engine_config)?);
        }
        let Some(bridge) = slot.as_mut() else {
            return Err(ChessError::EngineUnavailable("engine not started".to_owned()));
        };

        let name = bridge.name().to_owned();
        let params = GoParams {
            movetime_ms: Some(engine_config.movetime_ms),
        };
        match handle.request_engine_move(side, bridge, &params) {
            Ok(report) => Ok((report, name)),
            Err(e) => {
                // A process that timed out or went quiet is restarted on the next request.
                if e.is_engine_error() && !matches!(e, ChessError::EngineIllegalMove(_)) {
                    info!(engine = %name, "discarding engine process");
                    *slot = None;
                }
                Err(e)
            }
        }
    }
}

fn heuristic_move(handle: &SessionHandle, side: Color) -> ChessResult<(MoveReport, String)> {
    let mut engine = GreedyEngine::new();
    let report = handle.request_engine_move(side, &mut engine, &GoParams::default())?;
    Ok((report, engine.name().to_owned()))
}
