//! Session store abstraction.
//!
//! The stored record types mirror the domain aggregates so that store
//! backends can persist them without depending on the session context.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Unique session identifier.
    pub id: Uuid,
    /// Short join code players type in.
    pub code: String,
    /// Capacity hint supplied at creation.
    pub max_players: u32,
    /// Whole-session completion flag.
    pub complete: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Stored representation of a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Unique player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The session this player joined.
    pub session_id: Uuid,
    /// Submitted answers in submission order.
    pub answers: Vec<String>,
    /// Whether the player has reached the quiz length.
    pub completed: bool,
    /// When the player joined.
    pub joined_at: DateTime<Utc>,
}

/// Keyed store for sessions and players.
///
/// Every write is committed before the call returns; readers never observe a
/// partially written record.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert or update a session by id.
    ///
    /// Returns `DomainError::Conflict` if a different session already owns
    /// the same code.
    async fn put_session(&self, session: &SessionRecord) -> Result<(), DomainError>;

    /// Look up a session by its join code.
    async fn get_session_by_code(&self, code: &str) -> Result<Option<SessionRecord>, DomainError>;

    /// Look up a session by id.
    async fn get_session_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, DomainError>;

    /// Insert or update a player by id.
    ///
    /// Returns `DomainError::Validation` if the owning session does not exist.
    async fn put_player(&self, player: &PlayerRecord) -> Result<(), DomainError>;

    /// Look up a player by id.
    async fn get_player(&self, id: Uuid) -> Result<Option<PlayerRecord>, DomainError>;

    /// All players of a session, in join order.
    async fn list_players_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<PlayerRecord>, DomainError>;
}
