//! Test repositories — `SessionRepository` doubles for tests.

use std::sync::Arc;

use async_trait::async_trait;
use quizhub_core::error::DomainError;
use quizhub_core::repository::{PlayerRecord, SessionRecord, SessionRepository};
use uuid::Uuid;

/// A session repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionRepository;

fn connection_refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn put_session(&self, _session: &SessionRecord) -> Result<(), DomainError> {
        Err(connection_refused())
    }

    async fn get_session_by_code(&self, _code: &str) -> Result<Option<SessionRecord>, DomainError> {
        Err(connection_refused())
    }

    async fn get_session_by_id(&self, _id: Uuid) -> Result<Option<SessionRecord>, DomainError> {
        Err(connection_refused())
    }

    async fn put_player(&self, _player: &PlayerRecord) -> Result<(), DomainError> {
        Err(connection_refused())
    }

    async fn get_player(&self, _id: Uuid) -> Result<Option<PlayerRecord>, DomainError> {
        Err(connection_refused())
    }

    async fn list_players_by_session(
        &self,
        _session_id: Uuid,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        Err(connection_refused())
    }
}

/// Wraps another repository and yields to the scheduler before every call.
///
/// Interleaves concurrent tasks between a read and the following write,
/// which is where lost updates show up when callers do not serialize.
#[derive(Clone)]
pub struct YieldingSessionRepository {
    inner: Arc<dyn SessionRepository>,
}

impl YieldingSessionRepository {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn SessionRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SessionRepository for YieldingSessionRepository {
    async fn put_session(&self, session: &SessionRecord) -> Result<(), DomainError> {
        tokio::task::yield_now().await;
        self.inner.put_session(session).await
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<SessionRecord>, DomainError> {
        tokio::task::yield_now().await;
        self.inner.get_session_by_code(code).await
    }

    async fn get_session_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, DomainError> {
        tokio::task::yield_now().await;
        self.inner.get_session_by_id(id).await
    }

    async fn put_player(&self, player: &PlayerRecord) -> Result<(), DomainError> {
        tokio::task::yield_now().await;
        self.inner.put_player(player).await
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<PlayerRecord>, DomainError> {
        tokio::task::yield_now().await;
        let player = self.inner.get_player(id).await;
        tokio::task::yield_now().await;
        player
    }

    async fn list_players_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        tokio::task::yield_now().await;
        self.inner.list_players_by_session(session_id).await
    }
}
