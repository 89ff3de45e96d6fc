//! Match outcome processing
//!
//! Recording an outcome retires the loser, removes the completed match, and
//! persists the permanent result, then asks the lifecycle whether the round
//! is complete. The pending-match delete is the atomic gate: of two
//! concurrent resolutions of the same pairing, exactly one observes the
//! deletion and the other fails with `MatchNotFound` before mutating anything.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::MatchResult;
use crate::domain::error::{EngineError, EngineResult};
use crate::engine::{TournamentLifecycle, TournamentLocks};
use crate::repository::TournamentStore;

pub struct MatchOutcomeProcessor {
    store: Arc<dyn TournamentStore>,
    locks: Arc<TournamentLocks>,
    lifecycle: Arc<TournamentLifecycle>,
}

impl MatchOutcomeProcessor {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        locks: Arc<TournamentLocks>,
        lifecycle: Arc<TournamentLifecycle>,
    ) -> Self {
        Self {
            store,
            locks,
            lifecycle,
        }
    }

    /// Record the outcome of one match.
    ///
    /// Every precondition is checked before any mutation: the tournament and
    /// both teams exist, the loser is enrolled, and a pending match pairs
    /// exactly these two teams (slot order irrelevant).
    pub async fn record_outcome(
        &self,
        tournament_id: Uuid,
        winner_team_id: Uuid,
        loser_team_id: Uuid,
        winner_score: i32,
        loser_score: i32,
    ) -> EngineResult<MatchResult> {
        // Score and distinctness validation happens before the guard is taken
        let result = MatchResult::new(
            tournament_id,
            winner_team_id,
            loser_team_id,
            winner_score,
            loser_score,
        )?;

        let _guard = self.locks.acquire(tournament_id).await;

        let tournament = self
            .store
            .find_tournament(tournament_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

        self.store
            .find_team(winner_team_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Winner team not found".to_string()))?;
        self.store
            .find_team(loser_team_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Loser team not found".to_string()))?;

        let loser_enrollment = self
            .store
            .find_enrollment_by_team_and_tournament(loser_team_id, tournament_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound("Loser is not enrolled in this tournament".to_string())
            })?;

        // Atomic gate: delete the pending match for this pairing. A racing
        // resolution of the same match sees `None` here and fails cleanly.
        let deleted_match = self
            .store
            .delete_pending_match_between(tournament_id, winner_team_id, loser_team_id)
            .await?;
        let Some(match_id) = deleted_match else {
            return Err(EngineError::MatchNotFound);
        };

        // The loser is permanently out of the tournament
        self.store.delete_enrollment(loser_enrollment.id).await?;

        let stored = self.store.create_result(&result).await?;

        tracing::info!(
            tournament_id = %tournament_id,
            match_id = %match_id,
            winner_team_id = %winner_team_id,
            loser_team_id = %loser_team_id,
            winner_score,
            loser_score,
            "Match outcome recorded"
        );

        self.lifecycle.on_match_resolved(&tournament).await?;

        Ok(stored)
    }
}
