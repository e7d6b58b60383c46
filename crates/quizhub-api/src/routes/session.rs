//! Routes for the Quiz Session bounded context.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use quizhub_session::application::query_handlers::{self, SessionStatusView};
use quizhub_session::application::command_handlers;
use quizhub_session::domain::aggregates::DEFAULT_MAX_PLAYERS;
use quizhub_session::domain::commands;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

fn default_max_players() -> i64 {
    i64::from(DEFAULT_MAX_PLAYERS)
}

/// Request body for POST /create-session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Capacity hint, defaults to 2.
    #[serde(default = "default_max_players")]
    pub max_players: i64,
}

/// Response body for POST /create-session.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// Join code players use to enter the session.
    pub session_code: String,
}

/// Request body for POST /join-session.
#[derive(Debug, Deserialize)]
pub struct JoinSessionRequest {
    /// Join code of the target session.
    #[serde(default)]
    pub session_code: String,
    /// Display name of the joining player.
    #[serde(default)]
    pub name: String,
}

/// Response body for POST /join-session.
#[derive(Debug, Serialize)]
pub struct JoinSessionResponse {
    /// The new player's identifier.
    pub player_id: Uuid,
    /// The joined session's identifier.
    pub session_id: Uuid,
}

/// Request body for POST /submit-answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The answering player, as returned by /join-session.
    #[serde(default)]
    pub player_id: String,
    /// Opaque answer identifier.
    pub answer: String,
}

/// Response body for POST /submit-answer.
#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    /// Always `"Answer recorded"`.
    pub status: &'static str,
    /// Answers stored for the player so far.
    pub answers_recorded: usize,
    /// Whether the player has finished the quiz.
    pub completed: bool,
}

const INVALID_SESSION: &str = "Invalid session";
const INVALID_PLAYER: &str = "Invalid player ID";

/// POST /create-session
#[instrument(skip(state, request), fields(max_players = request.max_players))]
async fn create_session(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let command = commands::CreateSession {
        correlation_id: Uuid::new_v4(),
        max_players: request.max_players,
    };

    info!(correlation_id = %command.correlation_id, "handling create_session command");

    let result = command_handlers::handle_create_session(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
    )
    .await?;

    Ok(Json(CreateSessionResponse {
        session_code: result.code,
    }))
}

/// POST /join-session
#[instrument(skip(state, request), fields(session_code = %request.session_code))]
async fn join_session(
    State(state): State<AppState>,
    AppJson(request): AppJson<JoinSessionRequest>,
) -> Result<Json<JoinSessionResponse>, ApiError> {
    let command = commands::JoinSession {
        correlation_id: Uuid::new_v4(),
        code: request.session_code,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling join_session command");

    let result = command_handlers::handle_join_session(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
    )
    .await
    .map_err(ApiError::lookup_as_bad_request(INVALID_SESSION))?;

    Ok(Json(JoinSessionResponse {
        player_id: result.player_id,
        session_id: result.session_id,
    }))
}

/// POST /submit-answer
#[instrument(skip(state, request), fields(player_id = %request.player_id))]
async fn submit_answer(
    State(state): State<AppState>,
    AppJson(request): AppJson<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let player_id: Uuid = request
        .player_id
        .parse()
        .map_err(|_| ApiError::InvalidReference(INVALID_PLAYER))?;
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        player_id,
        answer: request.answer,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let result = command_handlers::handle_submit_answer(
        &command,
        &state.player_locks,
        &*state.session_repository,
    )
    .await
    .map_err(ApiError::lookup_as_bad_request(INVALID_PLAYER))?;

    Ok(Json(SubmitAnswerResponse {
        status: "Answer recorded",
        answers_recorded: result.answers_recorded,
        completed: result.completed,
    }))
}

/// GET /session-status/{code}
#[instrument(skip(state))]
async fn session_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SessionStatusView>, ApiError> {
    let view = query_handlers::get_session_status(&code, &*state.session_repository).await?;
    Ok(Json(view))
}

/// GET /results/{code}
#[instrument(skip(state))]
async fn results(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let results = query_handlers::get_results(&code, &*state.session_repository).await?;
    Ok(Json(results))
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-session", post(create_session))
        .route("/join-session", post(join_session))
        .route("/submit-answer", post(submit_answer))
        .route("/session-status/{code}", get(session_status))
        .route("/results/{code}", get(results))
}
