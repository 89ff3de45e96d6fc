//! Route definitions for Tournaments domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{enrollments, matches, players, results, teams, tournaments};
use super::middleware::TournamentsState;

/// Create player registration routes
fn player_routes() -> Router<TournamentsState> {
    Router::new()
        .route(
            "/v1/players",
            get(players::list_players).post(players::create_player),
        )
        .route("/v1/players/{id}", get(players::get_player))
}

/// Create team management routes
fn team_routes() -> Router<TournamentsState> {
    Router::new()
        .route("/v1/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/v1/teams/{id}",
            get(teams::get_team).delete(teams::delete_team),
        )
        .route(
            "/v1/teams/{team_id}/members",
            get(teams::list_members).post(teams::add_member),
        )
}

/// Create tournament management routes
fn tournament_routes() -> Router<TournamentsState> {
    Router::new()
        .route(
            "/v1/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route(
            "/v1/tournaments/{id}",
            get(tournaments::get_tournament)
                .patch(tournaments::update_tournament)
                .delete(tournaments::delete_tournament),
        )
        .route(
            "/v1/tournaments/{id}/open",
            post(tournaments::open_enrollment),
        )
}

/// Create enrollment routes
fn enrollment_routes() -> Router<TournamentsState> {
    Router::new()
        .route("/v1/enrollments", post(enrollments::enroll))
        .route("/v1/enrollments/{id}", delete(enrollments::remove))
        .route(
            "/v1/tournaments/{tournament_id}/enrollments",
            get(enrollments::list_by_tournament),
        )
        .route(
            "/v1/teams/{team_id}/enrollments",
            get(enrollments::list_by_team),
        )
}

/// Create match listing routes (matches themselves are engine-owned)
fn match_routes() -> Router<TournamentsState> {
    Router::new().route(
        "/v1/tournaments/{tournament_id}/matches",
        get(matches::list_by_tournament),
    )
}

/// Create result routes
fn result_routes() -> Router<TournamentsState> {
    Router::new()
        .route("/v1/results", post(results::record_outcome))
        .route(
            "/v1/results/{id}",
            get(results::get_result)
                .patch(results::update_result)
                .delete(results::delete_result),
        )
        .route(
            "/v1/tournaments/{tournament_id}/results",
            get(results::list_by_tournament),
        )
}

/// Compose all Tournaments domain routes
pub fn routes() -> Router<TournamentsState> {
    Router::new()
        .merge(player_routes())
        .merge(team_routes())
        .merge(tournament_routes())
        .merge(enrollment_routes())
        .merge(match_routes())
        .merge(result_routes())
}
