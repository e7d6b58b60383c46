//! Aggregate roots for the Quiz Session context.

use chrono::{DateTime, Utc};
use quizhub_core::clock::Clock;
use quizhub_core::repository::{PlayerRecord, SessionRecord};
use uuid::Uuid;

use crate::domain::code::SessionCode;

/// Number of answers that makes up a full quiz.
pub const QUIZ_LENGTH: usize = 10;

/// Capacity hint used when a session is created without one.
pub const DEFAULT_MAX_PLAYERS: u32 = 2;

/// The aggregate root for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Join code.
    pub code: SessionCode,
    /// Capacity hint. Joins are not checked against it.
    pub max_players: u32,
    /// Whole-session completion flag. Not written back by the engine.
    pub complete: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl QuizSession {
    /// Creates a new, incomplete session.
    #[must_use]
    pub fn new(id: Uuid, code: SessionCode, max_players: u32, clock: &dyn Clock) -> Self {
        Self {
            id,
            code,
            max_players,
            complete: false,
            created_at: clock.now(),
        }
    }

    /// Converts the aggregate into its stored form.
    #[must_use]
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            code: self.code.as_str().to_owned(),
            max_players: self.max_players,
            complete: self.complete,
            created_at: self.created_at,
        }
    }
}

/// The aggregate root for a participant in one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Display name, not validated.
    pub name: String,
    /// Owning session.
    pub session_id: Uuid,
    /// Answers in submission order.
    answers: Vec<String>,
    /// Set once the answer count first reaches [`QUIZ_LENGTH`].
    completed: bool,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

impl Player {
    /// Creates a freshly joined player with no answers.
    #[must_use]
    pub fn join(id: Uuid, session_id: Uuid, name: String, clock: &dyn Clock) -> Self {
        Self {
            id,
            name,
            session_id,
            answers: Vec::new(),
            completed: false,
            joined_at: clock.now(),
        }
    }

    /// Appends an answer.
    ///
    /// Completion is an equality test against [`QUIZ_LENGTH`] at the moment of
    /// the append. Answers past the quiz length are still recorded and leave
    /// the flag untouched, so it never reverts.
    pub fn record_answer(&mut self, answer: String) {
        self.answers.push(answer);
        if self.answers.len() == QUIZ_LENGTH {
            self.completed = true;
        }
    }

    /// Answers in submission order.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Whether the player has finished the quiz.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Converts the aggregate into its stored form.
    #[must_use]
    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            id: self.id,
            name: self.name.clone(),
            session_id: self.session_id,
            answers: self.answers.clone(),
            completed: self.completed,
            joined_at: self.joined_at,
        }
    }
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            session_id: record.session_id,
            answers: record.answers,
            completed: record.completed,
            joined_at: record.joined_at,
        }
    }
}
