//! Routes proxied to the inference service.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures_util::StreamExt;
use quizhub_core::error::DomainError;
use quizhub_inference::quiz::{self, QuizQuestion};
use quizhub_inference::stream::relay_answer;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for POST /generate-quiz.
#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    /// Subject of the quiz.
    #[serde(default)]
    pub topic: Option<String>,
}

/// Request body for POST /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Free-form question forwarded to the model as the prompt.
    #[serde(default)]
    pub question: Option<String>,
}

/// Returns the trimmed-empty check shared by both endpoints.
fn non_blank(value: Option<String>, missing: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::Validation(missing.to_owned()).into())
}

/// POST /generate-quiz
#[instrument(skip(state, request))]
async fn generate_quiz(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateQuizRequest>,
) -> Result<Json<Vec<QuizQuestion>>, ApiError> {
    let topic = non_blank(request.topic, "No topic provided")?;

    info!(%topic, "generating quiz");

    let questions = quiz::generate_quiz(&*state.inference, &topic).await?;
    Ok(Json(questions))
}

/// POST /ask
#[instrument(skip(state, request))]
async fn ask(
    State(state): State<AppState>,
    AppJson(request): AppJson<AskRequest>,
) -> Result<Response, ApiError> {
    let question = non_blank(request.question, "No question provided")?;

    info!(question_len = question.len(), "relaying question");

    let chunks = relay_answer(&*state.inference, &question).await;
    let body = Body::from_stream(chunks.map(Ok::<_, Infallible>));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

/// Returns the router for the inference proxy.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-quiz", post(generate_quiz))
        .route("/ask", post(ask))
}
