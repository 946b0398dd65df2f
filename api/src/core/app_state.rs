//! Shared state for all HTTP handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chat_session::{SessionContext, SharedServices};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Process-wide state behind the router.
///
/// Each session sits behind its own async `Mutex`, so messages within a
/// session serialize while different sessions proceed independently. The
/// registry lock is only held for lookup/insert, never across a turn.
pub struct AppState {
    /// Read-only collaborators shared by every session.
    pub shared: SharedServices,
    /// Live sessions by id.
    pub sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionContext>>>>,
}

impl AppState {
    /// Wraps the shared services with an empty session registry.
    pub fn new(shared: SharedServices) -> Self {
        Self {
            shared,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new session and returns its id.
    pub async fn insert_session(&self, ctx: SessionContext) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(ctx)));
        id
    }

    /// Looks up a session by id.
    pub async fn session(&self, id: &Uuid) -> Option<Arc<Mutex<SessionContext>>> {
        self.sessions.read().await.get(id).cloned()
    }
}
