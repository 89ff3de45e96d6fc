//! Enrollment API handlers
//!
//! The enroll path runs through the engine's ledger; list endpoints are pure
//! reads and return an empty list for unknown filter keys.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::{ActingUser, TournamentsState};
use crate::domain::entities::Enrollment;
use crate::domain::error::EngineResult;

/// Request for enrolling a team in a tournament
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub tournament_id: Uuid,
    pub team_id: Uuid,
}

/// Enroll a team in a tournament
///
/// **POST /v1/enrollments**
///
/// The acting user must be a member of the team. Filling the final slot
/// starts the tournament and draws round one.
pub async fn enroll(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Json(request): Json<EnrollRequest>,
) -> EngineResult<Json<Enrollment>> {
    let enrollment = state
        .engine
        .ledger
        .enroll(request.tournament_id, request.team_id, acting_user.0)
        .await?;

    Ok(Json(enrollment))
}

/// List enrollments for a tournament
///
/// **GET /v1/tournaments/{tournament_id}/enrollments**
pub async fn list_by_tournament(
    State(state): State<TournamentsState>,
    Path(tournament_id): Path<Uuid>,
) -> EngineResult<Json<Vec<Enrollment>>> {
    let enrollments = state.engine.ledger.list_by_tournament(tournament_id).await?;
    Ok(Json(enrollments))
}

/// List enrollments for a team
///
/// **GET /v1/teams/{team_id}/enrollments**
pub async fn list_by_team(
    State(state): State<TournamentsState>,
    Path(team_id): Path<Uuid>,
) -> EngineResult<Json<Vec<Enrollment>>> {
    let enrollments = state.engine.ledger.list_by_team(team_id).await?;
    Ok(Json(enrollments))
}

/// Withdraw an enrollment
///
/// **DELETE /v1/enrollments/{id}**
pub async fn remove(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<StatusCode> {
    state.engine.ledger.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
