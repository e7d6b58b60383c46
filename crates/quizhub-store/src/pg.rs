//! `PostgreSQL` implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quizhub_core::error::DomainError;
use quizhub_core::repository::{PlayerRecord, SessionRecord, SessionRepository};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Migrations shipped with the workspace (`/migrations`).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// PostgreSQL-backed session store.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Creates a new `PgSessionRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns the migration error if the schema cannot be brought up to date.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    code: String,
    max_players: i32,
    complete: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for SessionRecord {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let max_players = u32::try_from(row.max_players).map_err(|_| {
            DomainError::Infrastructure(format!(
                "session {} has invalid max_players {}",
                row.id, row.max_players
            ))
        })?;
        Ok(Self {
            id: row.id,
            code: row.code,
            max_players,
            complete: row.complete,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: Uuid,
    name: String,
    session_id: Uuid,
    answers: Vec<String>,
    completed: bool,
    joined_at: DateTime<Utc>,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            session_id: row.session_id,
            answers: row.answers,
            completed: row.completed,
            joined_at: row.joined_at,
        }
    }
}

fn infrastructure(err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn put_session(&self, session: &SessionRecord) -> Result<(), DomainError> {
        let max_players = i32::try_from(session.max_players).map_err(|_| {
            DomainError::Validation(format!("max_players {} is too large", session.max_players))
        })?;

        sqlx::query(
            r"
            INSERT INTO quiz_sessions (id, code, max_players, complete, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                code = excluded.code,
                max_players = excluded.max_players,
                complete = excluded.complete
            ",
        )
        .bind(session.id)
        .bind(&session.code)
        .bind(max_players)
        .bind(session.complete)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(code = %session.code, "session code already in use");
                DomainError::Conflict(format!("session code {} already in use", session.code))
            } else {
                infrastructure(&e)
            }
        })?;
        Ok(())
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<SessionRecord>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, code, max_players, complete, created_at FROM quiz_sessions WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        row.map(SessionRecord::try_from).transpose()
    }

    async fn get_session_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, code, max_players, complete, created_at FROM quiz_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        row.map(SessionRecord::try_from).transpose()
    }

    async fn put_player(&self, player: &PlayerRecord) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO quiz_players (id, name, session_id, answers, completed, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                -- join_seq and joined_at keep their original values
                name = excluded.name,
                answers = excluded.answers,
                completed = excluded.completed
            ",
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.session_id)
        .bind(&player.answers)
        .bind(player.completed)
        .bind(player.joined_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::Validation(format!(
                    "player {} references unknown session {}",
                    player.id, player.session_id
                ))
            } else {
                infrastructure(&e)
            }
        })?;
        Ok(())
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<PlayerRecord>, DomainError> {
        let row: Option<PlayerRow> = sqlx::query_as(
            r"
            SELECT id, name, session_id, answers, completed, joined_at
            FROM quiz_players
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(row.map(PlayerRecord::from))
    }

    async fn list_players_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            r"
            SELECT id, name, session_id, answers, completed, joined_at
            FROM quiz_players
            WHERE session_id = $1
            ORDER BY join_seq
            ",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }
}
