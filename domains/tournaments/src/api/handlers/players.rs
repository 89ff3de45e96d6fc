//! Player registration API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TournamentsState;
use crate::domain::entities::Player;
use crate::domain::error::{EngineError, EngineResult};

/// Request for registering a new player
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,
}

/// Register a player
///
/// **POST /v1/players**
pub async fn create_player(
    State(state): State<TournamentsState>,
    Json(request): Json<CreatePlayerRequest>,
) -> EngineResult<Json<Player>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    let player = Player::new(request.username, request.email)?;
    let created = state.store.create_player(&player).await?;

    Ok(Json(created))
}

/// Get a player by id
///
/// **GET /v1/players/{id}**
pub async fn get_player(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<Json<Player>> {
    let player = state
        .store
        .find_player(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Player not found".to_string()))?;

    Ok(Json(player))
}

/// List all players
///
/// **GET /v1/players**
pub async fn list_players(
    State(state): State<TournamentsState>,
) -> EngineResult<Json<Vec<Player>>> {
    let players = state.store.list_players().await?;
    Ok(Json(players))
}
