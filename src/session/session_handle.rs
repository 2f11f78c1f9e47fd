//! Shared, lock-protected session.
//!
//! Mutations take the write lock and queries take the read lock, so a reader
//! only ever sees a fully committed position. Engine searches run with no
//! lock held; the session revision detects moves made in the meantime.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{Engine, GoParams};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::position::chess_types::Color;
use crate::session::session::{MoveReport, Session};
use crate::status::game_status::StatusOptions;

pub type SessionId = u64;

#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    created_at: DateTime<Utc>,
    session: RwLock<Session>,
}

impl SessionHandle {
    pub fn new(id: SessionId, options: StatusOptions) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            session: RwLock::new(Session::new(options)),
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        // Mutations commit in one step, so a poisoned session is still consistent.
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Asks `engine` for a move for `side` and plays it.
    ///
    /// The position is snapshotted under the read lock and the lock released
    /// before the search. If the session moved on during the search the
    /// answer is rejected with `StaleMove`.
    pub fn request_engine_move(
        &self,
        side: Color,
        engine: &mut dyn Engine,
        params: &GoParams,
    ) -> ChessResult<MoveReport> {
        let (position, revision) = self.read(|s| (s.position().clone(), s.revision()));

        if side != position.side_to_move {
            return Err(ChessError::NotYourTurn { requested: side });
        }
        if legal_moves(&position)?.is_empty() {
            return Err(ChessError::NoLegalMoves);
        }

        debug!(session = self.id, engine = engine.name(), revision, "engine search started");
        let mv = engine.choose_move(&position, params)?;

        self.write(|s| {
            if s.revision() != revision {
                return Err(ChessError::StaleMove(mv.to_long_algebraic()));
            }
            let status = s.apply_move(&mv).map_err(|e| match e {
                ChessError::IllegalMove(text) => ChessError::EngineIllegalMove(text),
                other => other,
            })?;
            info!(session = self.id, engine = engine.name(), mv = %mv, "engine move applied");
            Ok(s.report(mv, status))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::SessionHandle;
    use crate::chess_errors::{ChessError, ChessResult};
    use crate::engines::engine_greedy::GreedyEngine;
    use crate::engines::engine_trait::{Engine, GoParams};
    use crate::moves::chess_move::ChessMove;
    use crate::position::chess_types::Color;
    use crate::position::position::Position;
    use crate::status::game_status::StatusOptions;

    /// Plays a fixed answer, optionally letting a rival move in mid-search.
    struct ScriptedEngine<'a> {
        answer: ChessMove,
        interfere: Option<&'a SessionHandle>,
    }

    impl Engine for ScriptedEngine<'_> {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose_move(&mut self, _position: &Position, _params: &GoParams) -> ChessResult<ChessMove> {
            if let Some(handle) = self.interfere {
                handle.write(|s| s.apply_coordinates(12, 28, None))?;
            }
            Ok(self.answer)
        }
    }

    #[test]
    fn engine_move_is_applied_for_the_side_to_move() {
        let handle = SessionHandle::new(1, StatusOptions::default());
        let report = handle
            .request_engine_move(Color::White, &mut GreedyEngine::new(), &GoParams::default())
            .expect("greedy move should apply");
        assert_eq!(handle.read(|s| s.last_move()), Some(report.chess_move));
        assert_eq!(report.side_to_move, Color::Black);
        assert_eq!(report.move_log.len(), 1);
        assert_eq!(handle.read(|s| s.side_to_move()), Color::Black);
    }

    #[test]
    fn engine_request_for_wrong_side_is_rejected() {
        let handle = SessionHandle::new(1, StatusOptions::default());
        assert_eq!(
            handle.request_engine_move(Color::Black, &mut GreedyEngine::new(), &GoParams::default()),
            Err(ChessError::NotYourTurn {
                requested: Color::Black
            })
        );
    }

    #[test]
    fn engine_illegal_answer_is_reported() {
        let handle = SessionHandle::new(1, StatusOptions::default());
        let mut engine = ScriptedEngine {
            answer: ChessMove::new(12, 36),
            interfere: None,
        };
        assert_eq!(
            handle.request_engine_move(Color::White, &mut engine, &GoParams::default()),
            Err(ChessError::EngineIllegalMove("e2e5".to_owned()))
        );
        assert!(handle.read(|s| s.move_log()).is_empty());
    }

    #[test]
    fn move_made_during_search_makes_answer_stale() {
        let handle = SessionHandle::new(1, StatusOptions::default());
        let mut engine = ScriptedEngine {
            answer: ChessMove::new(6, 21),
            interfere: Some(&handle),
        };
        assert_eq!(
            handle.request_engine_move(Color::White, &mut engine, &GoParams::default()),
            Err(ChessError::StaleMove("g1f3".to_owned()))
        );
        assert_eq!(handle.read(|s| s.move_log()), vec!["e2e4"]);
    }

    #[test]
    fn readers_never_observe_a_half_applied_move() {
        let handle = Arc::new(SessionHandle::new(1, StatusOptions::default()));
        let writer = {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                for _ in 0..200 {
                    handle
                        .write(|s| s.apply_coordinates(6, 21, None))
                        .expect("Nf3 should apply");
                    handle.write(|s| s.undo()).expect("undo should apply");
                }
            })
        };

        let start = Position::new_game();
        let after_nf3 = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1")
            .expect("FEN should parse");
        for _ in 0..500 {
            let (position, log_len) = handle.read(|s| (s.position().clone(), s.move_log().len()));
            match log_len {
                0 => assert_eq!(position, start),
                1 => assert_eq!(position, after_nf3),
                other => panic!("unexpected log length {other}"),
            }
        }

        writer.join().expect("writer thread should finish");
    }
}
