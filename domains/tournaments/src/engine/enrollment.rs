//! Enrollment ledger
//!
//! Records which teams are enrolled in which tournament, enforcing the
//! capacity and duplicate-enrollment rules. The enrollment that fills the
//! last slot hands the full team set to the lifecycle, inside the same
//! per-tournament guard, so the capacity check and the start transition
//! cannot interleave with a competing enrollment.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Enrollment;
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::notifications::{Notifier, TournamentNotification};
use crate::domain::state::TournamentState;
use crate::engine::{TournamentLifecycle, TournamentLocks};
use crate::repository::TournamentStore;

pub struct EnrollmentLedger {
    store: Arc<dyn TournamentStore>,
    locks: Arc<TournamentLocks>,
    lifecycle: Arc<TournamentLifecycle>,
    notifier: Arc<dyn Notifier>,
}

impl EnrollmentLedger {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        locks: Arc<TournamentLocks>,
        lifecycle: Arc<TournamentLifecycle>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            locks,
            lifecycle,
            notifier,
        }
    }

    /// Enroll a team in a tournament on behalf of `acting_user`.
    ///
    /// Preconditions, each failing with its own code and without mutation:
    /// the tournament exists, it is accepting enrollments, the acting user is
    /// a member of the team, the team exists and is not already enrolled, and
    /// a slot is free. Filling the final slot starts the tournament.
    pub async fn enroll(
        &self,
        tournament_id: Uuid,
        team_id: Uuid,
        acting_user: Uuid,
    ) -> EngineResult<Enrollment> {
        let _guard = self.locks.acquire(tournament_id).await;

        let tournament = self
            .store
            .find_tournament(tournament_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

        if tournament.state != TournamentState::AcceptingEnrollment {
            return Err(EngineError::InvalidState(format!(
                "Tournament is not accepting enrollments (state: {})",
                tournament.state
            )));
        }

        let team = self
            .store
            .find_team(team_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Team not found".to_string()))?;

        if !self.store.is_member(acting_user, team_id).await? {
            return Err(EngineError::Forbidden(
                "Only a member of the team can enroll it".to_string(),
            ));
        }

        if self
            .store
            .find_enrollment_by_team_and_tournament(team_id, tournament_id)
            .await?
            .is_some()
        {
            return Err(EngineError::DuplicateEnrollment);
        }

        let count = self.store.count_enrollments(tournament_id).await?;
        if count >= tournament.max_teams as i64 {
            return Err(EngineError::CapacityExceeded);
        }

        let enrollment = self
            .store
            .create_enrollment(&Enrollment::new(team_id, tournament_id))
            .await?;

        tracing::info!(
            tournament_id = %tournament_id,
            team_id = %team.id,
            enrolled = count + 1,
            capacity = tournament.max_teams,
            "Team enrolled"
        );

        self.notifier
            .notify(TournamentNotification::EnrollmentAccepted {
                tournament_id,
                team_id: team.id,
            })
            .await;

        // This enrollment may have filled the last slot; the guard is still
        // held, so exactly one caller can be the one that starts the bracket.
        if count + 1 == tournament.max_teams as i64 {
            let teams = self.store.enrolled_teams(tournament_id).await?;
            self.lifecycle.start(&tournament, teams).await?;
        }

        Ok(enrollment)
    }

    /// All enrollments for a tournament. Unknown ids yield an empty list.
    pub async fn list_by_tournament(&self, tournament_id: Uuid) -> EngineResult<Vec<Enrollment>> {
        self.store.list_enrollments_by_tournament(tournament_id).await
    }

    /// All enrollments for a team. Unknown ids yield an empty list.
    pub async fn list_by_team(&self, team_id: Uuid) -> EngineResult<Vec<Enrollment>> {
        self.store.list_enrollments_by_team(team_id).await
    }

    /// Withdraw an enrollment, administratively or when a team is eliminated.
    pub async fn remove(&self, enrollment_id: Uuid) -> EngineResult<()> {
        if !self.store.delete_enrollment(enrollment_id).await? {
            return Err(EngineError::NotFound("Enrollment not found".to_string()));
        }
        tracing::info!(enrollment_id = %enrollment_id, "Enrollment removed");
        Ok(())
    }
}
