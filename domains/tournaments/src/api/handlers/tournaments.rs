//! Tournament management API handlers
//!
//! Creation validates the capacity against the closed {2, 4, 8, 16} set
//! before the lifecycle ever runs. Deletion issues explicit, ordered deletes
//! of matches, enrollments, and results.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::{ActingUser, TournamentsState};
use crate::domain::entities::{GameCategory, Tournament};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::state::{TournamentEvent, TournamentState, TournamentStateMachine};

/// Request for creating a tournament
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub game: String,

    pub category: GameCategory,

    /// Initial state; defaults to accepting enrollments. Only `next` (a
    /// draft) may be chosen instead.
    pub state: Option<TournamentState>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub max_teams: i32,
}

/// Request for updating a tournament (admin, before it starts)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub game: Option<String>,

    pub category: Option<GameCategory>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_teams: Option<i32>,
}

/// Query parameters for listing tournaments
#[derive(Debug, Deserialize, Default)]
pub struct TournamentListQuery {
    pub state: Option<TournamentState>,
    pub category: Option<GameCategory>,
}

/// Create a tournament
///
/// **POST /v1/tournaments**
///
/// The acting user becomes the organizer and must be a registered player.
pub async fn create_tournament(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Json(request): Json<CreateTournamentRequest>,
) -> EngineResult<Json<Tournament>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    if state.store.find_player(acting_user.0).await?.is_none() {
        return Err(EngineError::NotFound("Organizer not found".to_string()));
    }

    let tournament = Tournament::new(
        request.name,
        request.game,
        request.category,
        request
            .state
            .unwrap_or(TournamentState::AcceptingEnrollment),
        acting_user.0,
        request.start_date,
        request.end_date,
        request.max_teams,
    )?;

    let created = state.store.create_tournament(&tournament).await?;

    tracing::info!(
        tournament_id = %created.id,
        capacity = created.max_teams,
        state = %created.state,
        "Tournament created"
    );

    Ok(Json(created))
}

/// Get a tournament by id
///
/// **GET /v1/tournaments/{id}**
pub async fn get_tournament(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<Json<Tournament>> {
    let tournament = state
        .store
        .find_tournament(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

    Ok(Json(tournament))
}

/// List tournaments, optionally filtered by state and category
///
/// **GET /v1/tournaments**
pub async fn list_tournaments(
    State(state): State<TournamentsState>,
    Query(query): Query<TournamentListQuery>,
) -> EngineResult<Json<Vec<Tournament>>> {
    let tournaments = state
        .store
        .list_tournaments(query.state, query.category)
        .await?;

    Ok(Json(tournaments))
}

/// Update a tournament before it starts
///
/// **PATCH /v1/tournaments/{id}**
///
/// Only the organizer may update, and only while the tournament has not left
/// the enrollment phase. Lifecycle state is never updated through this path.
pub async fn update_tournament(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTournamentRequest>,
) -> EngineResult<Json<Tournament>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    let mut tournament = state
        .store
        .find_tournament(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

    if tournament.organizer_id != acting_user.0 {
        return Err(EngineError::Forbidden(
            "Only the organizer can update a tournament".to_string(),
        ));
    }

    if !matches!(
        tournament.state,
        TournamentState::Next | TournamentState::AcceptingEnrollment
    ) {
        return Err(EngineError::InvalidState(format!(
            "Tournament cannot be updated in the '{}' state",
            tournament.state
        )));
    }

    if let Some(name) = request.name {
        tournament.name = name;
    }
    if let Some(game) = request.game {
        tournament.game = game;
    }
    if let Some(category) = request.category {
        tournament.category = category;
    }
    if let Some(start_date) = request.start_date {
        tournament.start_date = start_date;
    }
    if let Some(end_date) = request.end_date {
        tournament.end_date = end_date;
    }
    if let Some(max_teams) = request.max_teams {
        Tournament::validate_capacity(max_teams)?;
        let enrolled = state.store.count_enrollments(id).await?;
        if enrolled > max_teams as i64 {
            return Err(EngineError::Validation(format!(
                "Capacity {} is below the current enrollment count {}",
                max_teams, enrolled
            )));
        }
        tournament.max_teams = max_teams;
    }

    if tournament.end_date < tournament.start_date {
        return Err(EngineError::Validation(
            "End date cannot be before start date".to_string(),
        ));
    }

    let updated = state.store.update_tournament(&tournament).await?;
    Ok(Json(updated))
}

/// Open a drafted tournament for enrollment
///
/// **POST /v1/tournaments/{id}/open**
pub async fn open_enrollment(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<Json<Tournament>> {
    let tournament = state
        .store
        .find_tournament(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

    if tournament.organizer_id != acting_user.0 {
        return Err(EngineError::Forbidden(
            "Only the organizer can open enrollment".to_string(),
        ));
    }

    let next = TournamentStateMachine::transition(tournament.state, TournamentEvent::OpenEnrollment)
        .map_err(|e| EngineError::InvalidState(e.to_string()))?;

    state
        .store
        .set_tournament_state(id, tournament.state, next)
        .await?;

    let updated = state
        .store
        .find_tournament(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

    tracing::info!(tournament_id = %id, "Enrollment opened");

    Ok(Json(updated))
}

/// Delete a tournament
///
/// **DELETE /v1/tournaments/{id}**
///
/// Removes matches, enrollments, and results in that order, then the
/// tournament row itself.
pub async fn delete_tournament(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<StatusCode> {
    let tournament = state
        .store
        .find_tournament(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

    if tournament.organizer_id != acting_user.0 {
        return Err(EngineError::Forbidden(
            "Only the organizer can delete a tournament".to_string(),
        ));
    }

    // Ordered cleanup: dependent rows before the owning row
    state.store.delete_matches_for_tournament(id).await?;
    state.store.delete_enrollments_for_tournament(id).await?;
    state.store.delete_results_for_tournament(id).await?;
    state.store.delete_tournament(id).await?;

    tracing::info!(tournament_id = %id, "Tournament deleted");

    Ok(StatusCode::NO_CONTENT)
}
