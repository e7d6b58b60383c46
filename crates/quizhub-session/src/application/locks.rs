//! Per-player mutual exclusion for answer submission.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quizhub_core::error::DomainError;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// Hands out one async lock per player id.
///
/// Holding a player's guard serializes every load-modify-store sequence on
/// that player record. Different players never contend.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl PlayerLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `player_id`.
    ///
    /// The table mutex is only held while looking up the entry, never across
    /// the await.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock table is poisoned.
    pub async fn acquire(&self, player_id: Uuid) -> Result<OwnedMutexGuard<()>, DomainError> {
        let lock = {
            let mut table = self
                .locks
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("player lock table poisoned: {e}")))?;
            Arc::clone(table.entry(player_id).or_default())
        };
        Ok(lock.lock_owned().await)
    }
}
