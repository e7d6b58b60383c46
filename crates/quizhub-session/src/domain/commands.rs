//! Commands for the Quiz Session context.

use quizhub_core::command::Command;
use uuid::Uuid;

/// Command to open a new quiz session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Requested capacity hint. Must be positive.
    pub max_players: i64,
}

impl Command for CreateSession {
    fn command_type(&self) -> &'static str {
        "session.create_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add a player to a session.
#[derive(Debug, Clone)]
pub struct JoinSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Join code of the target session.
    pub code: String,
    /// Display name of the new player.
    pub name: String,
}

impl Command for JoinSession {
    fn command_type(&self) -> &'static str {
        "session.join_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record one answer for a player.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The answering player.
    pub player_id: Uuid,
    /// Opaque answer identifier.
    pub answer: String,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "session.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
