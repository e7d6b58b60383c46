//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quizhub_core::clock::Clock;
use quizhub_core::repository::SessionRepository;
use quizhub_core::rng::{DeterministicRng, SystemRng};
use quizhub_store::memory::InMemorySessionRepository;
use quizhub_store::pg::PgSessionRepository;
use quizhub_test_support::{FixedClock, StubInference};
use sqlx::PgPool;
use tower::ServiceExt;

use quizhub_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

fn build_app(repository: Arc<dyn SessionRepository>, inference: StubInference) -> Router {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::seeded(7)));
    let app_state = AppState::new(fixed_clock(), rng, repository, Arc::new(inference));
    quizhub_api::app(app_state)
}

/// Build the full app router over an in-memory store. Same router as
/// `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_inference(StubInference::replying("[]"))
}

/// Build the full app router with scripted inference replies.
pub fn build_test_app_with_inference(inference: StubInference) -> Router {
    build_app(Arc::new(InMemorySessionRepository::new()), inference)
}

/// Build the full app router over a real `PgSessionRepository`.
pub fn build_pg_test_app(pool: PgPool) -> Router {
    build_app(
        Arc::new(PgSessionRepository::new(pool)),
        StubInference::replying("[]"),
    )
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the raw text response.
pub async fn post_text(app: Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Create a session and return its join code.
pub async fn create_session(app: &Router, max_players: i64) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/create-session",
        &serde_json::json!({ "max_players": max_players }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["session_code"].as_str().unwrap().to_owned()
}

/// Join `name` into the session and return the player id.
pub async fn join(app: &Router, code: &str, name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/join-session",
        &serde_json::json!({ "session_code": code, "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["player_id"].as_str().unwrap().to_owned()
}

/// Submit one answer for the player and return the response body.
pub async fn submit(app: &Router, player_id: &str, answer: &str) -> serde_json::Value {
    let (status, json) = post_json(
        app.clone(),
        "/submit-answer",
        &serde_json::json!({ "player_id": player_id, "answer": answer }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json
}
