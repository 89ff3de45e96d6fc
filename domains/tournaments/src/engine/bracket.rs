//! Bracket round generation
//!
//! Seeding policy: uniform random shuffle, then pair consecutive teams.
//! There is no skill-based bracketing.

use std::sync::Arc;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::domain::entities::{Match, Team, Tournament};
use crate::domain::error::{EngineError, EngineResult};
use crate::repository::TournamentStore;

/// Shuffle the teams and pair them off for one round.
///
/// Rejects odd or sub-2 inputs rather than silently dropping a team.
pub fn pair_teams(teams: &[Team]) -> EngineResult<Vec<(Uuid, Uuid)>> {
    if teams.len() < 2 || teams.len() % 2 != 0 {
        return Err(EngineError::InvalidBracketInput(format!(
            "A bracket round requires an even team count of at least 2, got {}",
            teams.len()
        )));
    }

    let mut ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
    ids.shuffle(&mut rand::thread_rng());

    Ok(ids.chunks(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Produces and persists one round of paired matches
pub struct BracketGenerator {
    store: Arc<dyn TournamentStore>,
}

impl BracketGenerator {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    /// Generate one round over the given teams: every team appears in exactly
    /// one new pending match, both scores start at zero.
    pub async fn generate_round(
        &self,
        tournament: &Tournament,
        teams: &[Team],
    ) -> EngineResult<Vec<Match>> {
        let pairs = pair_teams(teams)?;

        let mut matches = Vec::with_capacity(pairs.len());
        for (first, second) in pairs {
            let game = Match::new(tournament.id, first, second)?;
            matches.push(self.store.create_match(&game).await?);
        }

        tracing::info!(
            tournament_id = %tournament.id,
            matches = matches.len(),
            "Bracket round generated"
        );

        Ok(matches)
    }
}
