//! Command handlers for the Quiz Session context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist state.

use std::sync::Mutex;

use quizhub_core::clock::Clock;
use quizhub_core::error::DomainError;
use quizhub_core::repository::SessionRepository;
use quizhub_core::rng::DeterministicRng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::locks::PlayerLocks;
use crate::domain::aggregates::{Player, QuizSession};
use crate::domain::code::{CODE_LENGTH, SessionCode, generate_code};
use crate::domain::commands::{CreateSession, JoinSession, SubmitAnswer};

/// How many fresh codes `handle_create_session` tries before giving up on
/// collisions.
pub const MAX_CODE_ATTEMPTS: usize = 8;

/// Result of a successfully created session.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    /// The new session's identifier.
    pub session_id: Uuid,
    /// The join code handed out to players.
    pub code: String,
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy)]
pub struct JoinSessionResult {
    /// The new player's identifier.
    pub player_id: Uuid,
    /// The joined session's identifier.
    pub session_id: Uuid,
}

/// Result of a recorded answer.
#[derive(Debug, Clone, Copy)]
pub struct SubmitAnswerResult {
    /// Total answers stored for the player after this submission.
    pub answers_recorded: usize,
    /// Whether the player has completed the quiz.
    pub completed: bool,
}

/// Handles the `CreateSession` command: validates the capacity hint,
/// generates a join code, and persists the new session.
///
/// A code collision reported by the store is retried with a fresh code, up to
/// [`MAX_CODE_ATTEMPTS`] times.
///
/// The `Mutex` is locked only while drawing a code, never across an await.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `max_players` is not in
/// `1..=i32::MAX`,
/// `DomainError::Conflict` if every attempted code collided, or any store
/// error.
pub async fn handle_create_session(
    command: &CreateSession,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
) -> Result<CreateSessionResult, DomainError> {
    let max_players = i32::try_from(command.max_players)
        .ok()
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "max_players must be a positive integer, got {}",
                command.max_players
            ))
        })?;

    let mut attempt = 0;
    loop {
        attempt += 1;
        let code = {
            let mut rng_guard = rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            generate_code(&mut *rng_guard, CODE_LENGTH)
        };

        let session = QuizSession::new(Uuid::new_v4(), code, max_players, clock);
        match repo.put_session(&session.to_record()).await {
            Ok(()) => {
                debug!(session_id = %session.id, code = %session.code, "session created");
                return Ok(CreateSessionResult {
                    session_id: session.id,
                    code: session.code.into_inner(),
                });
            }
            Err(DomainError::Conflict(reason)) if attempt < MAX_CODE_ATTEMPTS => {
                warn!(attempt, %reason, "join code collision, generating another");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Handles the `JoinSession` command: resolves the session by code and
/// persists a new player with no answers.
///
/// The session's `max_players` is not checked.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if the code is malformed or
/// unknown, or any store error.
pub async fn handle_join_session(
    command: &JoinSession,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<JoinSessionResult, DomainError> {
    let code = SessionCode::parse(&command.code)
        .map_err(|_| DomainError::SessionNotFound(command.code.clone()))?;
    let session = repo
        .get_session_by_code(code.as_str())
        .await?
        .ok_or_else(|| DomainError::SessionNotFound(command.code.clone()))?;

    let player = Player::join(Uuid::new_v4(), session.id, command.name.clone(), clock);
    repo.put_player(&player.to_record()).await?;

    Ok(JoinSessionResult {
        player_id: player.id,
        session_id: session.id,
    })
}

/// Handles the `SubmitAnswer` command: appends the answer to the player's
/// history and updates completion.
///
/// The load-append-store sequence runs under the player's lock so concurrent
/// submissions for one player never overwrite each other.
///
/// # Errors
///
/// Returns `DomainError::PlayerNotFound` if the player is unknown, or any
/// store error. On error the stored player is left unchanged.
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    locks: &PlayerLocks,
    repo: &dyn SessionRepository,
) -> Result<SubmitAnswerResult, DomainError> {
    let _guard = locks.acquire(command.player_id).await?;

    let mut player: Player = repo
        .get_player(command.player_id)
        .await?
        .ok_or(DomainError::PlayerNotFound(command.player_id))?
        .into();

    let was_completed = player.completed();
    player.record_answer(command.answer.clone());
    repo.put_player(&player.to_record()).await?;

    if player.completed() && !was_completed {
        debug!(player_id = %player.id, "player completed the quiz");
    }

    Ok(SubmitAnswerResult {
        answers_recorded: player.answers().len(),
        completed: player.completed(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};
    use quizhub_core::error::DomainError;
    use quizhub_core::repository::SessionRepository;
    use quizhub_core::rng::DeterministicRng;
    use quizhub_store::memory::InMemorySessionRepository;
    use quizhub_test_support::{
        FailingSessionRepository, FixedClock, MockRng, SequenceRng, YieldingSessionRepository,
    };
    use uuid::Uuid;

    use crate::application::command_handlers::{
        MAX_CODE_ATTEMPTS, handle_create_session, handle_join_session, handle_submit_answer,
    };
    use crate::application::locks::PlayerLocks;
    use crate::domain::aggregates::QUIZ_LENGTH;
    use crate::domain::code::SessionCode;
    use crate::domain::commands::{CreateSession, JoinSession, SubmitAnswer};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn create(max_players: i64) -> CreateSession {
        CreateSession {
            correlation_id: Uuid::new_v4(),
            max_players,
        }
    }

    fn join(code: &str, name: &str) -> JoinSession {
        JoinSession {
            correlation_id: Uuid::new_v4(),
            code: code.to_owned(),
            name: name.to_owned(),
        }
    }

    fn submit(player_id: Uuid, answer: &str) -> SubmitAnswer {
        SubmitAnswer {
            correlation_id: Uuid::new_v4(),
            player_id,
            answer: answer.to_owned(),
        }
    }

    async fn create_and_join(repo: &InMemorySessionRepository) -> Uuid {
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let created = handle_create_session(&create(2), &fixed_clock(), &rng, repo)
            .await
            .unwrap();
        handle_join_session(&join(&created.code, "Ann"), &fixed_clock(), repo)
            .await
            .unwrap()
            .player_id
    }

    #[tokio::test]
    async fn test_handle_create_session_persists_incomplete_session() {
        // Arrange
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<SequenceRng> = Mutex::new(SequenceRng::new(vec![0, 1, 2, 26, 27, 28]));
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;

        // Act
        let result = handle_create_session(&create(4), &fixed_clock(), rng_ref, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.code, "ABC012");
        let stored = repo.get_session_by_code("ABC012").await.unwrap().unwrap();
        assert_eq!(stored.id, result.session_id);
        assert_eq!(stored.max_players, 4);
        assert!(!stored.complete);
        assert_eq!(stored.created_at, fixed_clock().0);
    }

    #[tokio::test]
    async fn test_handle_create_session_rejects_non_positive_max_players() {
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);

        for max_players in [0, -1, i64::from(i32::MAX) + 1, i64::from(u32::MAX)] {
            let result = handle_create_session(&create(max_players), &fixed_clock(), &rng, &repo).await;
            match result.unwrap_err() {
                DomainError::Validation(msg) => assert!(msg.contains("max_players")),
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_handle_create_session_accepts_largest_storable_max_players() {
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);

        let result =
            handle_create_session(&create(i64::from(i32::MAX)), &fixed_clock(), &rng, &repo)
                .await
                .unwrap();

        let stored = repo.get_session_by_code(&result.code).await.unwrap().unwrap();
        assert_eq!(i64::from(stored.max_players), i64::from(i32::MAX));
    }

    #[tokio::test]
    async fn test_handle_create_session_retries_on_code_collision() {
        // Arrange — the first draw repeats an existing code, the second is fresh.
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<SequenceRng> = Mutex::new(SequenceRng::new(vec![
            0, 0, 0, 0, 0, 0, // AAAAAA
            0, 0, 0, 0, 0, 0, // AAAAAA again
            1, 1, 1, 1, 1, 1, // BBBBBB
        ]));
        let first = handle_create_session(&create(2), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        // Act
        let second = handle_create_session(&create(2), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(first.code, "AAAAAA");
        assert_eq!(second.code, "BBBBBB");
        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_handle_create_session_gives_up_after_max_attempts() {
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        handle_create_session(&create(2), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        let result = handle_create_session(&create(2), &fixed_clock(), &rng, &repo).await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert!(MAX_CODE_ATTEMPTS > 1);
    }

    #[tokio::test]
    async fn test_handle_create_session_generates_well_formed_code() {
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<quizhub_core::rng::SystemRng> =
            Mutex::new(quizhub_core::rng::SystemRng::from_os());

        let result = handle_create_session(&create(2), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        assert!(SessionCode::parse(&result.code).is_ok());
    }

    #[tokio::test]
    async fn test_handle_create_session_propagates_store_failure() {
        let rng: Mutex<MockRng> = Mutex::new(MockRng);

        let result =
            handle_create_session(&create(2), &fixed_clock(), &rng, &FailingSessionRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_join_session_persists_player_without_answers() {
        // Arrange
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let created = handle_create_session(&create(2), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        // Act
        let joined = handle_join_session(&join(&created.code, "Bo"), &fixed_clock(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(joined.session_id, created.session_id);
        let player = repo.get_player(joined.player_id).await.unwrap().unwrap();
        assert_eq!(player.name, "Bo");
        assert_eq!(player.session_id, created.session_id);
        assert!(player.answers.is_empty());
        assert!(!player.completed);
    }

    #[tokio::test]
    async fn test_handle_join_session_does_not_enforce_capacity() {
        let repo = InMemorySessionRepository::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let created = handle_create_session(&create(1), &fixed_clock(), &rng, &repo)
            .await
            .unwrap();

        for name in ["Ann", "Bo", "Cy"] {
            handle_join_session(&join(&created.code, name), &fixed_clock(), &repo)
                .await
                .unwrap();
        }

        let players = repo.list_players_by_session(created.session_id).await.unwrap();
        assert_eq!(players.len(), 3);
    }

    #[tokio::test]
    async fn test_handle_join_session_returns_error_when_code_unknown() {
        let repo = InMemorySessionRepository::new();

        let result = handle_join_session(&join("ZZZZZZ", "Ann"), &fixed_clock(), &repo).await;

        match result.unwrap_err() {
            DomainError::SessionNotFound(code) => assert_eq!(code, "ZZZZZZ"),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_join_session_rejects_malformed_code_without_store_lookup() {
        let result = handle_join_session(
            &join("zz-top", "Ann"),
            &fixed_clock(),
            &FailingSessionRepository,
        )
        .await;

        match result.unwrap_err() {
            DomainError::SessionNotFound(code) => assert_eq!(code, "zz-top"),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_submit_answer_appends_and_completes_at_quiz_length() {
        // Arrange
        let repo = InMemorySessionRepository::new();
        let player_id = create_and_join(&repo).await;
        let locks = PlayerLocks::new();

        // Act
        let mut last = None;
        for i in 0..QUIZ_LENGTH {
            let result = handle_submit_answer(&submit(player_id, &format!("a{i}")), &locks, &repo)
                .await
                .unwrap();
            assert_eq!(result.completed, i + 1 == QUIZ_LENGTH);
            last = Some(result);
        }

        // Assert
        let last = last.unwrap();
        assert_eq!(last.answers_recorded, QUIZ_LENGTH);
        let player = repo.get_player(player_id).await.unwrap().unwrap();
        assert!(player.completed);
        assert_eq!(player.answers.first().map(String::as_str), Some("a0"));
        assert_eq!(player.answers.last().map(String::as_str), Some("a9"));
    }

    #[tokio::test]
    async fn test_handle_submit_answer_past_quiz_length_keeps_completion() {
        let repo = InMemorySessionRepository::new();
        let player_id = create_and_join(&repo).await;
        let locks = PlayerLocks::new();
        for _ in 0..QUIZ_LENGTH {
            handle_submit_answer(&submit(player_id, "x"), &locks, &repo)
                .await
                .unwrap();
        }

        let eleventh = handle_submit_answer(&submit(player_id, "y"), &locks, &repo)
            .await
            .unwrap();

        assert!(eleventh.completed);
        assert_eq!(eleventh.answers_recorded, QUIZ_LENGTH + 1);
    }

    #[tokio::test]
    async fn test_handle_submit_answer_returns_error_when_player_unknown() {
        let repo = InMemorySessionRepository::new();
        let locks = PlayerLocks::new();
        let player_id = Uuid::new_v4();

        let result = handle_submit_answer(&submit(player_id, "x"), &locks, &repo).await;

        match result.unwrap_err() {
            DomainError::PlayerNotFound(id) => assert_eq!(id, player_id),
            other => panic!("expected PlayerNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_submissions_for_one_player_are_not_lost() {
        // Arrange — the yielding store widens the read-modify-write window.
        let inner = Arc::new(InMemorySessionRepository::new());
        let player_id = create_and_join(&inner).await;
        let repo: Arc<dyn SessionRepository> = Arc::new(YieldingSessionRepository::new(inner));
        let locks = Arc::new(PlayerLocks::new());
        let submissions = 25;

        // Act
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..submissions {
            let repo = Arc::clone(&repo);
            let locks = Arc::clone(&locks);
            tasks.spawn(async move {
                handle_submit_answer(&submit(player_id, &format!("answer-{i}")), &locks, &*repo)
                    .await
                    .unwrap();
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        // Assert
        let player = repo.get_player(player_id).await.unwrap().unwrap();
        assert_eq!(player.answers.len(), submissions);
        assert!(player.completed);
        let mut distinct = player.answers.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), submissions);
    }

    #[tokio::test]
    async fn test_handle_submit_answer_propagates_store_failure() {
        let locks = PlayerLocks::new();

        let result =
            handle_submit_answer(&submit(Uuid::new_v4(), "x"), &locks, &FailingSessionRepository)
                .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
