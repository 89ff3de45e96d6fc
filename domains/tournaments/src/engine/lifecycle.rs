//! Tournament lifecycle state machine driver
//!
//! Owns the `AcceptingEnrollment → InProgress → Finished` transitions and
//! decides, after each resolved match, whether to advance the bracket or
//! declare a champion.
//!
//! Both entry points assume the caller holds the tournament's guard from
//! [`TournamentLocks`](crate::engine::TournamentLocks); the compare-and-swap
//! state updates are the cross-process backstop.

use std::sync::Arc;

use crate::domain::entities::{Team, Tournament};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::notifications::{Notifier, TournamentNotification};
use crate::domain::state::{TournamentEvent, TournamentState, TournamentStateMachine};
use crate::engine::BracketGenerator;
use crate::repository::TournamentStore;

pub struct TournamentLifecycle {
    store: Arc<dyn TournamentStore>,
    notifier: Arc<dyn Notifier>,
    bracket: BracketGenerator,
}

impl TournamentLifecycle {
    pub fn new(store: Arc<dyn TournamentStore>, notifier: Arc<dyn Notifier>) -> Self {
        let bracket = BracketGenerator::new(store.clone());
        Self {
            store,
            notifier,
            bracket,
        }
    }

    /// Start the tournament: flip state to in-progress and draw round one.
    ///
    /// Executes at most once per tournament. A second attempt observes the
    /// already-updated state through the compare-and-swap and is a no-op.
    pub async fn start(&self, tournament: &Tournament, teams: Vec<Team>) -> EngineResult<()> {
        if teams.len() as i32 != tournament.max_teams {
            return Err(EngineError::InternalInconsistency(format!(
                "start invoked with {} teams for a capacity-{} tournament",
                teams.len(),
                tournament.max_teams
            )));
        }

        let next =
            TournamentStateMachine::transition(tournament.state, TournamentEvent::CapacityReached)
                .map_err(|e| EngineError::InvalidState(e.to_string()))?;

        let applied = self
            .store
            .set_tournament_state(tournament.id, tournament.state, next)
            .await?;
        if !applied {
            tracing::debug!(
                tournament_id = %tournament.id,
                "Tournament already started, skipping"
            );
            return Ok(());
        }

        tracing::info!(
            tournament_id = %tournament.id,
            teams = teams.len(),
            "Tournament is now in progress"
        );

        let matches = self.bracket.generate_round(tournament, &teams).await?;
        self.notifier
            .notify(TournamentNotification::RoundStarted {
                tournament_id: tournament.id,
                match_ids: matches.iter().map(|m| m.id).collect(),
            })
            .await;

        Ok(())
    }

    /// Evaluate round completion after a match has been resolved.
    ///
    /// While pending matches remain, the round is still in progress and
    /// nothing happens. Once the round empties, either the sole surviving
    /// enrollment becomes champion or the survivors are paired into the next
    /// round.
    pub async fn on_match_resolved(&self, tournament: &Tournament) -> EngineResult<()> {
        let pending = self.store.count_pending_matches(tournament.id).await?;
        if pending > 0 {
            return Ok(());
        }

        let survivors = self.store.enrolled_teams(tournament.id).await?;
        match survivors.len() {
            0 => {
                // A tournament cannot empty its enrollments without passing
                // through the one-remaining case
                tracing::error!(
                    tournament_id = %tournament.id,
                    "Enrollments emptied without a champion"
                );
                Err(EngineError::InternalInconsistency(format!(
                    "tournament {} has no pending matches and no enrollments",
                    tournament.id
                )))
            }
            1 => self.declare_champion(tournament, &survivors[0]).await,
            _ => {
                let matches = self.bracket.generate_round(tournament, &survivors).await?;
                tracing::info!(
                    tournament_id = %tournament.id,
                    survivors = survivors.len(),
                    "Next bracket round started"
                );
                self.notifier
                    .notify(TournamentNotification::RoundStarted {
                        tournament_id: tournament.id,
                        match_ids: matches.iter().map(|m| m.id).collect(),
                    })
                    .await;
                Ok(())
            }
        }
    }

    async fn declare_champion(&self, tournament: &Tournament, champion: &Team) -> EngineResult<()> {
        let next = TournamentStateMachine::transition(
            TournamentState::InProgress,
            TournamentEvent::ChampionDecided,
        )
        .map_err(|e| EngineError::InvalidState(e.to_string()))?;

        let applied = self
            .store
            .set_tournament_state(tournament.id, TournamentState::InProgress, next)
            .await?;
        if !applied {
            tracing::warn!(
                tournament_id = %tournament.id,
                "Champion already declared, skipping"
            );
            return Ok(());
        }

        tracing::info!(
            tournament_id = %tournament.id,
            team_id = %champion.id,
            "Champion decided"
        );
        self.notifier
            .notify(TournamentNotification::ChampionDecided {
                tournament_id: tournament.id,
                team_id: champion.id,
            })
            .await;

        Ok(())
    }
}
