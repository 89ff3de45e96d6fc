//! Team and roster management API handlers
//!
//! Team deletion issues explicit, ordered deletes of dependent rows; nothing
//! relies on implicit storage-level cascades.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::{ActingUser, TournamentsState};
use crate::domain::entities::{Team, TeamMember};
use crate::domain::error::{EngineError, EngineResult};

/// Request for creating a team with its initial roster
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Players forming the initial roster. The acting user becomes captain
    /// when they appear in this list.
    #[validate(length(min = 1))]
    pub player_ids: Vec<Uuid>,
}

/// Request for adding a player to an existing team
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub captain: bool,
}

/// Response for team operations, roster included
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<TeamMember>,
}

/// Create a team with its initial roster
///
/// **POST /v1/teams**
///
/// Every listed player must exist; the acting user is flagged captain when
/// present in the list.
pub async fn create_team(
    acting_user: ActingUser,
    State(state): State<TournamentsState>,
    Json(request): Json<CreateTeamRequest>,
) -> EngineResult<Json<TeamResponse>> {
    request
        .validate()
        .map_err(|e| EngineError::Validation(format!("Validation failed: {}", e)))?;

    // Every roster id must resolve to a registered player
    for player_id in &request.player_ids {
        if state.store.find_player(*player_id).await?.is_none() {
            return Err(EngineError::NotFound(format!(
                "Player {} not found",
                player_id
            )));
        }
    }

    if state
        .store
        .find_team_by_name(&request.name)
        .await?
        .is_some()
    {
        return Err(EngineError::Validation(
            "Team name already taken".to_string(),
        ));
    }

    let team = Team::new(request.name)?;
    let created = state.store.create_team(&team).await?;

    let mut members = Vec::with_capacity(request.player_ids.len());
    for player_id in request.player_ids {
        let captain = player_id == acting_user.0;
        let member = state
            .store
            .add_member(&TeamMember::new(created.id, player_id, captain))
            .await?;
        members.push(member);
    }

    tracing::info!(team_id = %created.id, members = members.len(), "Team created");

    Ok(Json(TeamResponse {
        id: created.id,
        name: created.name,
        members,
    }))
}

/// Get a team with its roster
///
/// **GET /v1/teams/{id}**
pub async fn get_team(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<Json<TeamResponse>> {
    let team = state
        .store
        .find_team(id)
        .await?
        .ok_or_else(|| EngineError::NotFound("Team not found".to_string()))?;

    let members = state.store.list_members(id).await?;

    Ok(Json(TeamResponse {
        id: team.id,
        name: team.name,
        members,
    }))
}

/// List all teams
///
/// **GET /v1/teams**
pub async fn list_teams(State(state): State<TournamentsState>) -> EngineResult<Json<Vec<Team>>> {
    let teams = state.store.list_teams().await?;
    Ok(Json(teams))
}

/// Delete a team
///
/// **DELETE /v1/teams/{id}**
///
/// Removes the team's enrollments and roster first, then the team itself.
pub async fn delete_team(
    State(state): State<TournamentsState>,
    Path(id): Path<Uuid>,
) -> EngineResult<StatusCode> {
    if state.store.find_team(id).await?.is_none() {
        return Err(EngineError::NotFound("Team not found".to_string()));
    }

    // Ordered cleanup: dependent rows before the owning row
    for enrollment in state.store.list_enrollments_by_team(id).await? {
        state.store.delete_enrollment(enrollment.id).await?;
    }
    state.store.delete_members_for_team(id).await?;
    state.store.delete_team(id).await?;

    tracing::info!(team_id = %id, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List a team's roster
///
/// **GET /v1/teams/{team_id}/members**
pub async fn list_members(
    State(state): State<TournamentsState>,
    Path(team_id): Path<Uuid>,
) -> EngineResult<Json<Vec<TeamMember>>> {
    if state.store.find_team(team_id).await?.is_none() {
        return Err(EngineError::NotFound("Team not found".to_string()));
    }

    let members = state.store.list_members(team_id).await?;
    Ok(Json(members))
}

/// Add a player to a team
///
/// **POST /v1/teams/{team_id}/members**
///
/// A player can appear on a team only once; a team carries at most one
/// captain.
pub async fn add_member(
    State(state): State<TournamentsState>,
    Path(team_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> EngineResult<Json<TeamMember>> {
    if state.store.find_team(team_id).await?.is_none() {
        return Err(EngineError::NotFound("Team not found".to_string()));
    }
    if state.store.find_player(request.user_id).await?.is_none() {
        return Err(EngineError::NotFound("Player not found".to_string()));
    }

    if state.store.is_member(request.user_id, team_id).await? {
        return Err(EngineError::Validation(
            "Player is already on this team".to_string(),
        ));
    }

    if request.captain {
        let members = state.store.list_members(team_id).await?;
        if members.iter().any(|m| m.captain) {
            return Err(EngineError::Validation(
                "Team already has a captain".to_string(),
            ));
        }
    }

    let member = state
        .store
        .add_member(&TeamMember::new(team_id, request.user_id, request.captain))
        .await?;

    Ok(Json(member))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_request_validation() {
        let valid = CreateTeamRequest {
            name: "Falcons".to_string(),
            player_ids: vec![Uuid::new_v4()],
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateTeamRequest {
            name: "".to_string(),
            player_ids: vec![Uuid::new_v4()],
        };
        assert!(empty_name.validate().is_err());

        let empty_roster = CreateTeamRequest {
            name: "Falcons".to_string(),
            player_ids: vec![],
        };
        assert!(empty_roster.validate().is_err());
    }

    #[test]
    fn test_add_member_request_defaults_to_non_captain() {
        let json = format!(r#"{{"user_id": "{}"}}"#, Uuid::new_v4());
        let request: AddMemberRequest = serde_json::from_str(&json).unwrap();
        assert!(!request.captain);
    }
}
