//! Per-tournament serialization points
//!
//! Enrollment and outcome operations for the same tournament must not
//! interleave their check-then-mutate sequences. Each tournament id maps to
//! one async mutex; operations on different tournaments proceed fully
//! concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-tournament guards
#[derive(Default)]
pub struct TournamentLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl TournamentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, tournament_id: Uuid) -> Arc<AsyncMutex<()>> {
        self.inner
            .lock()
            .expect("tournament lock registry poisoned")
            .entry(tournament_id)
            .or_default()
            .clone()
    }

    /// Acquire the guard for one tournament, waiting if another operation on
    /// the same tournament holds it.
    pub async fn acquire(&self, tournament_id: Uuid) -> OwnedMutexGuard<()> {
        self.handle(tournament_id).lock_owned().await
    }
}
