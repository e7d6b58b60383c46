//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session is registered under the given join code.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// No player exists with the given identifier.
    #[error("player not found: {0}")]
    PlayerNotFound(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g. a join code already in use).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for the two lookup failures (unknown code or player).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::PlayerNotFound(_))
    }
}
