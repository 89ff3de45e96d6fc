//! Domain entities for the Knockout tournaments domain
//!
//! Each entity includes proper validation, serialization, and business rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{EngineError, EngineResult};
pub use crate::domain::state::{MatchStatus, TournamentState};

/// Capacities a tournament may be created with. The bracket is single
/// elimination, so the field must be a power of two.
pub const VALID_CAPACITIES: [i32; 4] = [2, 4, 8, 16];

/// Game categories a tournament can be organized under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "game_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    Rpg,
    Shooter,
    Sports,
    SurvivalHorror,
    Builder,
}

impl std::fmt::Display for GameCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCategory::Rpg => write!(f, "rpg"),
            GameCategory::Shooter => write!(f, "shooter"),
            GameCategory::Sports => write!(f, "sports"),
            GameCategory::SurvivalHorror => write!(f, "survival_horror"),
            GameCategory::Builder => write!(f, "builder"),
        }
    }
}

/// Player entity — the identity the roster and the mailer resolve against.
///
/// Authentication itself lives outside this domain; handlers receive the
/// acting player id explicitly from the boundary layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with validation
    pub fn new(username: String, email: String) -> EngineResult<Self> {
        if username.is_empty() || username.len() > 50 {
            return Err(EngineError::Validation(
                "Username must be 1-50 characters".to_string(),
            ));
        }

        // Light-weight shape check; the boundary layer performs full
        // address validation on request DTOs.
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(EngineError::Validation("Invalid email format".to_string()));
        }

        Ok(Player {
            id: Uuid::new_v4(),
            username,
            email,
            created_at: Utc::now(),
        })
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with validation
    pub fn new(name: String) -> EngineResult<Self> {
        if name.is_empty() || name.len() > 100 {
            return Err(EngineError::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }

        Ok(Team {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        })
    }
}

/// Roster entry — association between a Player and a Team.
///
/// At most one member per team carries the captain flag; the roster service
/// enforces this when members are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub captain: bool,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(team_id: Uuid, user_id: Uuid, captain: bool) -> Self {
        TeamMember {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            captain,
            created_at: Utc::now(),
        }
    }
}

/// Tournament entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub game: String,
    pub category: GameCategory,
    pub state: TournamentState,
    pub organizer_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_teams: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament with validation.
    ///
    /// `state` may only be `Next` (a draft) or `AcceptingEnrollment`; the
    /// engine owns every later transition.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        game: String,
        category: GameCategory,
        state: TournamentState,
        organizer_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        max_teams: i32,
    ) -> EngineResult<Self> {
        if name.is_empty() || name.len() > 100 {
            return Err(EngineError::Validation(
                "Tournament name must be 1-100 characters".to_string(),
            ));
        }

        if game.is_empty() || game.len() > 50 {
            return Err(EngineError::Validation(
                "Game must be 1-50 characters".to_string(),
            ));
        }

        Self::validate_capacity(max_teams)?;

        if !matches!(
            state,
            TournamentState::Next | TournamentState::AcceptingEnrollment
        ) {
            return Err(EngineError::Validation(format!(
                "Tournaments cannot be created in the '{}' state",
                state
            )));
        }

        if end_date < start_date {
            return Err(EngineError::Validation(
                "End date cannot be before start date".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Tournament {
            id: Uuid::new_v4(),
            name,
            game,
            category,
            state,
            organizer_id,
            start_date,
            end_date,
            max_teams,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate that the capacity is one of the supported bracket sizes
    pub fn validate_capacity(max_teams: i32) -> EngineResult<()> {
        if !VALID_CAPACITIES.contains(&max_teams) {
            return Err(EngineError::Validation(format!(
                "Capacity must be one of {:?}, got {}",
                VALID_CAPACITIES, max_teams
            )));
        }
        Ok(())
    }
}

/// Match entity — one pairing inside a bracket round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub first_team_id: Uuid,
    pub second_team_id: Uuid,
    pub first_score: i32,
    pub second_score: i32,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Create a new pending match between two distinct teams
    pub fn new(tournament_id: Uuid, first_team_id: Uuid, second_team_id: Uuid) -> EngineResult<Self> {
        if first_team_id == second_team_id {
            return Err(EngineError::Validation(
                "A match requires two distinct teams".to_string(),
            ));
        }

        Ok(Match {
            id: Uuid::new_v4(),
            tournament_id,
            first_team_id,
            second_team_id,
            first_score: 0,
            second_score: 0,
            status: MatchStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Whether this match pairs exactly the two given teams, in either slot order
    pub fn pairs(&self, team_a: Uuid, team_b: Uuid) -> bool {
        (self.first_team_id == team_a && self.second_team_id == team_b)
            || (self.first_team_id == team_b && self.second_team_id == team_a)
    }
}

/// The permanent record of a decided match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchResult {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub winner_team_id: Uuid,
    pub loser_team_id: Uuid,
    pub winner_score: i32,
    pub loser_score: i32,
    pub created_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn new(
        tournament_id: Uuid,
        winner_team_id: Uuid,
        loser_team_id: Uuid,
        winner_score: i32,
        loser_score: i32,
    ) -> EngineResult<Self> {
        if winner_team_id == loser_team_id {
            return Err(EngineError::Validation(
                "Winner and loser must be distinct teams".to_string(),
            ));
        }

        if winner_score < 0 || loser_score < 0 {
            return Err(EngineError::Validation(
                "Scores cannot be negative".to_string(),
            ));
        }

        Ok(MatchResult {
            id: Uuid::new_v4(),
            tournament_id,
            winner_team_id,
            loser_team_id,
            winner_score,
            loser_score,
            created_at: Utc::now(),
        })
    }
}

/// Enrollment entity — the binding of one team to one tournament.
///
/// Never mutated after creation; removed when the team is eliminated or an
/// administrator withdraws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub team_id: Uuid,
    pub tournament_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(team_id: Uuid, tournament_id: Uuid) -> Self {
        Enrollment {
            id: Uuid::new_v4(),
            team_id,
            tournament_id,
            created_at: Utc::now(),
        }
    }
}
