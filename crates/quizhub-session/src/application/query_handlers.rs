//! Query handlers for the Quiz Session context.
//!
//! This module contains query handlers that read sessions and players from
//! the store and return read-only view DTOs. Views are point-in-time
//! snapshots; they may trail concurrent submissions.

use std::collections::BTreeMap;

use quizhub_core::error::DomainError;
use quizhub_core::repository::{PlayerRecord, SessionRepository};
use serde::Serialize;

use crate::domain::code::SessionCode;
use crate::domain::tally::dominant_answer;

/// Completion state of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatusView {
    /// Player display name.
    pub name: String,
    /// Whether the player has finished the quiz.
    pub completed: bool,
}

/// Read-only view of a session's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatusView {
    /// Players in join order.
    pub players: Vec<PlayerStatusView>,
    /// `true` when every player has completed. Vacuously `true` for a
    /// session nobody has joined yet.
    pub all_done: bool,
}

async fn load_players(
    code: &str,
    repo: &dyn SessionRepository,
) -> Result<Vec<PlayerRecord>, DomainError> {
    let parsed =
        SessionCode::parse(code).map_err(|_| DomainError::SessionNotFound(code.to_owned()))?;
    let session = repo
        .get_session_by_code(parsed.as_str())
        .await?
        .ok_or_else(|| DomainError::SessionNotFound(code.to_owned()))?;
    repo.list_players_by_session(session.id).await
}

/// Retrieves the completion status of every player in a session.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no session has this code, or any
/// store error.
pub async fn get_session_status(
    code: &str,
    repo: &dyn SessionRepository,
) -> Result<SessionStatusView, DomainError> {
    let players = load_players(code, repo).await?;
    let all_done = players.iter().all(|p| p.completed);
    let players = players
        .into_iter()
        .map(|p| PlayerStatusView {
            name: p.name,
            completed: p.completed,
        })
        .collect();
    Ok(SessionStatusView { players, all_done })
}

/// Computes each player's dominant answer, keyed by player name.
///
/// Players with no answers map to `"unknown"`. When two players share a name
/// the one who joined later wins.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no session has this code, or any
/// store error.
pub async fn get_results(
    code: &str,
    repo: &dyn SessionRepository,
) -> Result<BTreeMap<String, String>, DomainError> {
    let players = load_players(code, repo).await?;
    let mut results = BTreeMap::new();
    for player in players {
        let answer = dominant_answer(&player.answers);
        results.insert(player.name, answer);
    }
    Ok(results)
}
