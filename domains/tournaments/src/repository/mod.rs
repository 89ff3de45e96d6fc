//! Repository layer for the tournaments domain
//!
//! The engine consumes storage through the [`TournamentStore`] trait so the
//! same lifecycle logic runs over Postgres in production and the in-memory
//! store in tests and local development.

pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::domain::entities::{
    Enrollment, GameCategory, Match, MatchResult, Player, Team, TeamMember, Tournament,
};
use crate::domain::error::EngineResult;
use crate::domain::state::TournamentState;

pub use memory::MemoryTournamentStore;
pub use postgres::PgTournamentStore;

/// Storage abstraction consumed by the engine.
///
/// Two contracts carry concurrency weight:
/// - [`set_tournament_state`](TournamentStore::set_tournament_state) is a
///   compare-and-swap: the update applies only if the stored state still
///   equals `expected`, and the return value says whether it did.
/// - [`delete_pending_match_between`](TournamentStore::delete_pending_match_between)
///   deletes at most one row and reports the id it removed, so exactly one of
///   two concurrent resolutions of the same match can observe a deletion.
#[async_trait::async_trait]
pub trait TournamentStore: Send + Sync {
    // --- Players ---
    async fn create_player(&self, player: &Player) -> EngineResult<Player>;
    async fn find_player(&self, id: Uuid) -> EngineResult<Option<Player>>;
    async fn list_players(&self) -> EngineResult<Vec<Player>>;

    // --- Teams ---
    async fn create_team(&self, team: &Team) -> EngineResult<Team>;
    async fn find_team(&self, id: Uuid) -> EngineResult<Option<Team>>;
    async fn find_team_by_name(&self, name: &str) -> EngineResult<Option<Team>>;
    async fn list_teams(&self) -> EngineResult<Vec<Team>>;
    async fn delete_team(&self, id: Uuid) -> EngineResult<bool>;

    // --- Roster ---
    async fn add_member(&self, member: &TeamMember) -> EngineResult<TeamMember>;
    async fn list_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>>;
    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> EngineResult<bool>;
    async fn delete_members_for_team(&self, team_id: Uuid) -> EngineResult<u64>;
    /// Email addresses of every member of the team, for the notifier
    async fn member_emails(&self, team_id: Uuid) -> EngineResult<Vec<String>>;

    // --- Tournaments ---
    async fn create_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament>;
    async fn find_tournament(&self, id: Uuid) -> EngineResult<Option<Tournament>>;
    async fn list_tournaments(
        &self,
        state: Option<TournamentState>,
        category: Option<GameCategory>,
    ) -> EngineResult<Vec<Tournament>>;
    async fn update_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament>;
    /// Compare-and-swap the lifecycle state. Returns whether the swap applied.
    async fn set_tournament_state(
        &self,
        id: Uuid,
        expected: TournamentState,
        next: TournamentState,
    ) -> EngineResult<bool>;
    async fn delete_tournament(&self, id: Uuid) -> EngineResult<bool>;

    // --- Enrollments ---
    async fn create_enrollment(&self, enrollment: &Enrollment) -> EngineResult<Enrollment>;
    async fn find_enrollment(&self, id: Uuid) -> EngineResult<Option<Enrollment>>;
    async fn find_enrollment_by_team_and_tournament(
        &self,
        team_id: Uuid,
        tournament_id: Uuid,
    ) -> EngineResult<Option<Enrollment>>;
    async fn list_enrollments_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<Enrollment>>;
    async fn list_enrollments_by_team(&self, team_id: Uuid) -> EngineResult<Vec<Enrollment>>;
    async fn count_enrollments(&self, tournament_id: Uuid) -> EngineResult<i64>;
    /// Teams currently enrolled in the tournament, in enrollment order
    async fn enrolled_teams(&self, tournament_id: Uuid) -> EngineResult<Vec<Team>>;
    async fn delete_enrollment(&self, id: Uuid) -> EngineResult<bool>;
    async fn delete_enrollments_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64>;

    // --- Matches ---
    async fn create_match(&self, game: &Match) -> EngineResult<Match>;
    async fn list_matches_by_tournament(&self, tournament_id: Uuid) -> EngineResult<Vec<Match>>;
    async fn count_pending_matches(&self, tournament_id: Uuid) -> EngineResult<i64>;
    /// Atomically delete the pending match pairing exactly the two given
    /// teams, in either slot order.
    /// Returns the id of the deleted match, or `None` if no such match existed.
    async fn delete_pending_match_between(
        &self,
        tournament_id: Uuid,
        team_a: Uuid,
        team_b: Uuid,
    ) -> EngineResult<Option<Uuid>>;
    async fn delete_matches_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64>;

    // --- Results ---
    async fn create_result(&self, result: &MatchResult) -> EngineResult<MatchResult>;
    async fn find_result(&self, id: Uuid) -> EngineResult<Option<MatchResult>>;
    async fn list_results_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<MatchResult>>;
    async fn update_result(&self, result: &MatchResult) -> EngineResult<MatchResult>;
    async fn delete_result(&self, id: Uuid) -> EngineResult<bool>;
    async fn delete_results_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64>;
}
