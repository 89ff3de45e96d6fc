//! Result API handlers
//!
//! Recording an outcome is the lifecycle path and runs through the engine.
//! Update and delete exist for administrative corrections only; they never
//! touch enrollments, matches, or tournament state.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TournamentsState;
use crate::domain::entities::MatchResult;
use crate::domain::error::{EngineError, EngineResult};

/// Request for recording a match outcome
#[derive(Debug, Deserialize, Validate)]
pub struct RecordOutcomeRequest {
    pub tournament_id: Uuid,
    pub winner_team_id: Uuid,
    pub loser_team_id: Uuid,

    #[validate(range(min = 0))]
    pub winner_score: i32,

    #[validate(range(min = 0))]
    pub loser_score: i32,
}

/// Request for administratively correcting a recorded result
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResultRequest {
    #[validate(range(min = 0))]
    pub winner_score: Option<i32>,

    #[validate(range(min = 0))]
    pub loser_score: Option<i32>,
}

/// Record a match outcome
///
/// **POST /v1/results**
///
/// Retires the loser, removes the completed match, persists the result, and
/// advances the bracket when the round is complete.
pub async fn record_outcome(
    State(state): State<TournamentsState>,
    Json(request): Json<RecordOutcomeRequest>,
) -> EngineResult<Json<MatchResult>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    let result = state
        .engine
        .outcomes
        .record_outcome(
            request.tournament_id,
            request.winner_team_id,
            request.loser_team_id,
            request.winner_score,
            request.loser_score,
        )
        .await?;

    Ok(Json(result))
}

/// Get a result by id
///
/// **GET /v1/results/{id}**
pub async fn get_result(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<Json<MatchResult>> {
    let result = state
        .store
        .find_result(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Result not found".to_string()))?;

    Ok(Json(result))
}

/// List results for a tournament
///
/// **GET /v1/tournaments/{tournament_id}/results**
pub async fn list_by_tournament(
    State(state): State<TournamentsState>,
    Path(tournament_id): Path<Uuid>,
) -> EngineResult<Json<Vec<MatchResult>>> {
    let results = state.store.list_results_by_tournament(tournament_id).await?;
    Ok(Json(results))
}

/// Administratively correct a result's scores
///
/// **PATCH /v1/results/{id}**
pub async fn update_result(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResultRequest>,
) -> EngineResult<Json<MatchResult>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    let mut result = state
        .store
        .find_result(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Result not found".to_string()))?;

    if let Some(winner_score) = request.winner_score {
        result.winner_score = winner_score;
    }
    if let Some(loser_score) = request.loser_score {
        result.loser_score = loser_score;
    }

    let updated = state.store.update_result(&result).await?;
    Ok(Json(updated))
}

/// Administratively delete a result
///
/// **DELETE /v1/results/{id}**
pub async fn delete_result(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<StatusCode> {
    if !state.store.delete_result(id).await? {
        return Err(EngineError::NotFound("Result not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
