//! Match listing API handlers
//!
//! Matches are created and removed by the engine; the API only reads them.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::TournamentsState;
use crate::domain::entities::Match;
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::state::MatchStatus;

/// Query parameters for listing matches
#[derive(Debug, Deserialize, Default)]
pub struct MatchListQuery {
    pub status: Option<MatchStatus>,
}

/// List a tournament's matches, optionally filtered by status
///
/// **GET /v1/tournaments/{tournament_id}/matches**
pub async fn list_by_tournament(
    State(state): State<TournamentsState>,
    Path(tournament_id): Path<Uuid>,
    Query(query): Query<MatchListQuery>,
) -> EngineResult<Json<Vec<Match>>> {
    if state.store.find_tournament(tournament_id).await?.is_none() {
        return Err(EngineError::NotFound("Tournament not found".to_string()));
    }

    let mut matches = state.store.list_matches_by_tournament(tournament_id).await?;
    if let Some(status) = query.status {
        matches.retain(|m| m.status == status);
    }

    Ok(Json(matches))
}
