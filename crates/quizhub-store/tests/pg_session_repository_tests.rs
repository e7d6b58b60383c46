//! Integration tests for `PgSessionRepository`.
//!
//! These need a PostgreSQL server reachable through `DATABASE_URL`; run them
//! with `cargo test -- --ignored`.

use chrono::{DateTime, TimeZone, Utc};
use quizhub_core::error::DomainError;
use quizhub_core::repository::{PlayerRecord, SessionRecord, SessionRepository};
use quizhub_store::pg::PgSessionRepository;
use sqlx::PgPool;
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn make_session(code: &str) -> SessionRecord {
    SessionRecord {
        id: Uuid::new_v4(),
        code: code.to_owned(),
        max_players: 2,
        complete: false,
        created_at: now(),
    }
}

fn make_player(session_id: Uuid, name: &str) -> PlayerRecord {
    PlayerRecord {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        session_id,
        answers: Vec::new(),
        completed: false,
        joined_at: now(),
    }
}

// --- sessions ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_put_and_get_session_round_trip(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session = make_session("AB12CD");

    repo.put_session(&session).await.unwrap();

    assert_eq!(repo.get_session_by_code("AB12CD").await.unwrap(), Some(session.clone()));
    assert_eq!(repo.get_session_by_id(session.id).await.unwrap(), Some(session));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_get_session_by_unknown_code_returns_none(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);

    assert!(repo.get_session_by_code("ZZZZZZ").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_duplicate_code_is_a_conflict(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    repo.put_session(&make_session("AB12CD")).await.unwrap();

    let result = repo.put_session(&make_session("AB12CD")).await;

    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

// --- players ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_player_updates_keep_join_order(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session = make_session("AB12CD");
    repo.put_session(&session).await.unwrap();
    let mut ann = make_player(session.id, "Ann");
    let bo = make_player(session.id, "Bo");
    repo.put_player(&ann).await.unwrap();
    repo.put_player(&bo).await.unwrap();

    ann.answers = vec!["x".to_owned(), "y".to_owned()];
    repo.put_player(&ann).await.unwrap();

    let players = repo.list_players_by_session(session.id).await.unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0], ann);
    assert_eq!(players[1], bo);
    assert_eq!(repo.get_player(ann.id).await.unwrap(), Some(ann));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_player_for_unknown_session_is_rejected(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);

    let result = repo.put_player(&make_player(Uuid::new_v4(), "Ann")).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}
