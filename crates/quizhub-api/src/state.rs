//! Shared application state.

use std::sync::{Arc, Mutex};

use quizhub_core::clock::Clock;
use quizhub_core::repository::SessionRepository;
use quizhub_core::rng::DeterministicRng;
use quizhub_inference::InferenceBackend;
use quizhub_session::application::locks::PlayerLocks;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for session and player timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Randomness for join codes.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Session and player store.
    pub session_repository: Arc<dyn SessionRepository>,
    /// Per-player submission locks.
    pub player_locks: Arc<PlayerLocks>,
    /// Question generation and chat backend.
    pub inference: Arc<dyn InferenceBackend>,
}

impl AppState {
    /// Create new application state with an empty lock table.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        session_repository: Arc<dyn SessionRepository>,
        inference: Arc<dyn InferenceBackend>,
    ) -> Self {
        Self {
            clock,
            rng,
            session_repository,
            player_locks: Arc::new(PlayerLocks::new()),
            inference,
        }
    }
}
