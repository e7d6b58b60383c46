//! In-process implementation of the `SessionRepository` trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quizhub_core::error::DomainError;
use quizhub_core::repository::{PlayerRecord, SessionRecord, SessionRepository};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    sessions: HashMap<Uuid, SessionRecord>,
    codes: HashMap<String, Uuid>,
    players: HashMap<Uuid, PlayerRecord>,
    /// Player ids per session, in join order.
    rosters: HashMap<Uuid, Vec<Uuid>>,
}

/// Session store backed by process memory.
///
/// All tables sit behind one mutex, so the code index and the session table
/// are always updated together. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemorySessionRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session store poisoned: {e}")))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn put_session(&self, session: &SessionRecord) -> Result<(), DomainError> {
        let mut tables = self.tables()?;
        if let Some(&owner) = tables.codes.get(&session.code) {
            if owner != session.id {
                return Err(DomainError::Conflict(format!(
                    "session code {} already in use",
                    session.code
                )));
            }
        }
        if let Some(previous) = tables.sessions.get(&session.id) {
            if previous.code != session.code {
                let stale = previous.code.clone();
                tables.codes.remove(&stale);
            }
        }
        tables.codes.insert(session.code.clone(), session.id);
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<SessionRecord>, DomainError> {
        let tables = self.tables()?;
        Ok(tables
            .codes
            .get(code)
            .and_then(|id| tables.sessions.get(id))
            .cloned())
    }

    async fn get_session_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, DomainError> {
        Ok(self.tables()?.sessions.get(&id).cloned())
    }

    async fn put_player(&self, player: &PlayerRecord) -> Result<(), DomainError> {
        let mut tables = self.tables()?;
        if !tables.sessions.contains_key(&player.session_id) {
            return Err(DomainError::Validation(format!(
                "player {} references unknown session {}",
                player.id, player.session_id
            )));
        }
        if tables.players.insert(player.id, player.clone()).is_none() {
            tables
                .rosters
                .entry(player.session_id)
                .or_default()
                .push(player.id);
        }
        Ok(())
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<PlayerRecord>, DomainError> {
        Ok(self.tables()?.players.get(&id).cloned())
    }

    async fn list_players_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        let tables = self.tables()?;
        let roster = tables.rosters.get(&session_id).map_or(&[][..], Vec::as_slice);
        Ok(roster
            .iter()
            .filter_map(|id| tables.players.get(id))
            .cloned()
            .collect())
    }
}
