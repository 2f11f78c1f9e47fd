//! Independent sessions keyed by identifier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::chess_errors::{ChessError, ChessResult};
use crate::session::session_handle::{SessionHandle, SessionId};
use crate::status::game_status::StatusOptions;

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
    next_id: AtomicU64,
    options: StatusOptions,
}

impl SessionRegistry {
    pub fn new(options: StatusOptions) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            options,
        }
    }

    pub fn create(&self) -> Arc<SessionHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = Arc::new(SessionHandle::new(id, self.options));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&handle));
        info!(session = id, "session created");
        handle
    }

    pub fn get(&self, id: SessionId) -> ChessResult<Arc<SessionHandle>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(ChessError::SessionNotFound(id))
    }

    pub fn close(&self, id: SessionId) -> ChessResult<()> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| info!(session = id, "session closed"))
            .ok_or(ChessError::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
