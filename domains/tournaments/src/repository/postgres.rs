//! Postgres store implementation
//!
//! All queries use the runtime `query_as` API with explicit binds. The two
//! concurrency-sensitive operations rely on row-level atomicity:
//! `set_tournament_state` is an `UPDATE ... WHERE state = $expected`, and
//! `delete_pending_match_between` is a `DELETE ... RETURNING id` — in both
//! cases the affected-row count tells the caller whether it won the race.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Enrollment, GameCategory, Match, MatchResult, Player, Team, TeamMember, Tournament,
};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::state::TournamentState;
use crate::repository::TournamentStore;

/// Postgres-backed [`TournamentStore`]
#[derive(Clone)]
pub struct PgTournamentStore {
    pool: PgPool,
}

impl PgTournamentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TournamentStore for PgTournamentStore {
    // --- Players ---

    async fn create_player(&self, player: &Player) -> EngineResult<Player> {
        let created = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (id, username, email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(player.id)
        .bind(&player.username)
        .bind(&player.email)
        .bind(player.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_player(&self, id: Uuid) -> EngineResult<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT id, username, email, created_at FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    async fn list_players(&self) -> EngineResult<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(
            "SELECT id, username, email, created_at FROM players ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    // --- Teams ---

    async fn create_team(&self, team: &Team) -> EngineResult<Team> {
        let created = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(team.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_team(&self, id: Uuid) -> EngineResult<Option<Team>> {
        let team =
            sqlx::query_as::<_, Team>("SELECT id, name, created_at FROM teams WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(team)
    }

    async fn find_team_by_name(&self, name: &str) -> EngineResult<Option<Team>> {
        let team =
            sqlx::query_as::<_, Team>("SELECT id, name, created_at FROM teams WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(team)
    }

    async fn list_teams(&self) -> EngineResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name, created_at FROM teams ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn delete_team(&self, id: Uuid) -> EngineResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // --- Roster ---

    async fn add_member(&self, member: &TeamMember) -> EngineResult<TeamMember> {
        let created = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (id, team_id, user_id, captain, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, team_id, user_id, captain, created_at
            "#,
        )
        .bind(member.id)
        .bind(member.team_id)
        .bind(member.user_id)
        .bind(member.captain)
        .bind(member.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>> {
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT id, team_id, user_id, captain, created_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> EngineResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE user_id = $1 AND team_id = $2",
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn delete_members_for_team(&self, team_id: Uuid) -> EngineResult<u64> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn member_emails(&self, team_id: Uuid) -> EngineResult<Vec<String>> {
        let emails: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT p.email
            FROM team_members m
            INNER JOIN players p ON m.user_id = p.id
            WHERE m.team_id = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(emails)
    }

    // --- Tournaments ---

    async fn create_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament> {
        let created = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments
                (id, name, game, category, state, organizer_id,
                 start_date, end_date, max_teams, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, game, category, state, organizer_id,
                      start_date, end_date, max_teams, created_at, updated_at
            "#,
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.game)
        .bind(tournament.category)
        .bind(tournament.state)
        .bind(tournament.organizer_id)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(tournament.max_teams)
        .bind(tournament.created_at)
        .bind(tournament.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_tournament(&self, id: Uuid) -> EngineResult<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT id, name, game, category, state, organizer_id,
                   start_date, end_date, max_teams, created_at, updated_at
            FROM tournaments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tournament)
    }

    async fn list_tournaments(
        &self,
        state: Option<TournamentState>,
        category: Option<GameCategory>,
    ) -> EngineResult<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT id, name, game, category, state, organizer_id,
                   start_date, end_date, max_teams, created_at, updated_at
            FROM tournaments
            WHERE ($1::tournament_state IS NULL OR state = $1)
              AND ($2::game_category IS NULL OR category = $2)
            ORDER BY created_at
            "#,
        )
        .bind(state)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(tournaments)
    }

    async fn update_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament> {
        let updated = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments SET
                name = $2,
                game = $3,
                category = $4,
                organizer_id = $5,
                start_date = $6,
                end_date = $7,
                max_teams = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, game, category, state, organizer_id,
                      start_date, end_date, max_teams, created_at, updated_at
            "#,
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.game)
        .bind(tournament.category)
        .bind(tournament.organizer_id)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(tournament.max_teams)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::NotFound("Tournament not found".to_string()))?;

        Ok(updated)
    }

    async fn set_tournament_state(
        &self,
        id: Uuid,
        expected: TournamentState,
        next: TournamentState,
    ) -> EngineResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tournaments
            SET state = $3, updated_at = NOW()
            WHERE id = $1 AND state = $2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_tournament(&self, id: Uuid) -> EngineResult<bool> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // --- Enrollments ---

    async fn create_enrollment(&self, enrollment: &Enrollment) -> EngineResult<Enrollment> {
        let created = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (id, team_id, tournament_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, tournament_id, created_at
            "#,
        )
        .bind(enrollment.id)
        .bind(enrollment.team_id)
        .bind(enrollment.tournament_id)
        .bind(enrollment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The (team_id, tournament_id) unique index is the cross-process
            // backstop for the duplicate-enrollment race
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                EngineError::DuplicateEnrollment
            }
            _ => EngineError::Database(e),
        })?;

        Ok(created)
    }

    async fn find_enrollment(&self, id: Uuid) -> EngineResult<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT id, team_id, tournament_id, created_at FROM enrollments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn find_enrollment_by_team_and_tournament(
        &self,
        team_id: Uuid,
        tournament_id: Uuid,
    ) -> EngineResult<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, team_id, tournament_id, created_at
            FROM enrollments
            WHERE team_id = $1 AND tournament_id = $2
            "#,
        )
        .bind(team_id)
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn list_enrollments_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<Enrollment>> {
        let enrollments = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, team_id, tournament_id, created_at
            FROM enrollments
            WHERE tournament_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    async fn list_enrollments_by_team(&self, team_id: Uuid) -> EngineResult<Vec<Enrollment>> {
        let enrollments = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, team_id, tournament_id, created_at
            FROM enrollments
            WHERE team_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    async fn count_enrollments(&self, tournament_id: Uuid) -> EngineResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn enrolled_teams(&self, tournament_id: Uuid) -> EngineResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM enrollments e
            INNER JOIN teams t ON e.team_id = t.id
            WHERE e.tournament_id = $1
            ORDER BY e.created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn delete_enrollment(&self, id: Uuid) -> EngineResult<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_enrollments_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let result = sqlx::query("DELETE FROM enrollments WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // --- Matches ---

    async fn create_match(&self, game: &Match) -> EngineResult<Match> {
        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches
                (id, tournament_id, first_team_id, second_team_id,
                 first_score, second_score, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tournament_id, first_team_id, second_team_id,
                      first_score, second_score, status, created_at
            "#,
        )
        .bind(game.id)
        .bind(game.tournament_id)
        .bind(game.first_team_id)
        .bind(game.second_team_id)
        .bind(game.first_score)
        .bind(game.second_score)
        .bind(game.status)
        .bind(game.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_matches_by_tournament(&self, tournament_id: Uuid) -> EngineResult<Vec<Match>> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, tournament_id, first_team_id, second_team_id,
                   first_score, second_score, status, created_at
            FROM matches
            WHERE tournament_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    async fn count_pending_matches(&self, tournament_id: Uuid) -> EngineResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM matches WHERE tournament_id = $1 AND status = 'pending'",
        )
        .bind(tournament_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn delete_pending_match_between(
        &self,
        tournament_id: Uuid,
        team_a: Uuid,
        team_b: Uuid,
    ) -> EngineResult<Option<Uuid>> {
        let deleted: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM matches
            WHERE tournament_id = $1
              AND status = 'pending'
              AND ((first_team_id = $2 AND second_team_id = $3)
                OR (first_team_id = $3 AND second_team_id = $2))
            RETURNING id
            "#,
        )
        .bind(tournament_id)
        .bind(team_a)
        .bind(team_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }

    async fn delete_matches_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let result = sqlx::query("DELETE FROM matches WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // --- Results ---

    async fn create_result(&self, result: &MatchResult) -> EngineResult<MatchResult> {
        let created = sqlx::query_as::<_, MatchResult>(
            r#"
            INSERT INTO results
                (id, tournament_id, winner_team_id, loser_team_id,
                 winner_score, loser_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tournament_id, winner_team_id, loser_team_id,
                      winner_score, loser_score, created_at
            "#,
        )
        .bind(result.id)
        .bind(result.tournament_id)
        .bind(result.winner_team_id)
        .bind(result.loser_team_id)
        .bind(result.winner_score)
        .bind(result.loser_score)
        .bind(result.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_result(&self, id: Uuid) -> EngineResult<Option<MatchResult>> {
        let result = sqlx::query_as::<_, MatchResult>(
            r#"
            SELECT id, tournament_id, winner_team_id, loser_team_id,
                   winner_score, loser_score, created_at
            FROM results
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn list_results_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<MatchResult>> {
        let results = sqlx::query_as::<_, MatchResult>(
            r#"
            SELECT id, tournament_id, winner_team_id, loser_team_id,
                   winner_score, loser_score, created_at
            FROM results
            WHERE tournament_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn update_result(&self, result: &MatchResult) -> EngineResult<MatchResult> {
        let updated = sqlx::query_as::<_, MatchResult>(
            r#"
            UPDATE results SET
                winner_team_id = $2,
                loser_team_id = $3,
                winner_score = $4,
                loser_score = $5
            WHERE id = $1
            RETURNING id, tournament_id, winner_team_id, loser_team_id,
                      winner_score, loser_score, created_at
            "#,
        )
        .bind(result.id)
        .bind(result.winner_team_id)
        .bind(result.loser_team_id)
        .bind(result.winner_score)
        .bind(result.loser_score)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::NotFound("Result not found".to_string()))?;

        Ok(updated)
    }

    async fn delete_result(&self, id: Uuid) -> EngineResult<bool> {
        let result = sqlx::query("DELETE FROM results WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_results_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let result = sqlx::query("DELETE FROM results WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
