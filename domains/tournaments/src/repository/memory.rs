//! In-memory store implementation
//!
//! Backs tests and local development without external infrastructure. Keeps
//! the same uniqueness backstops the Postgres schema enforces (team name,
//! (team, tournament) enrollment pair).

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::entities::{
    Enrollment, GameCategory, Match, MatchResult, Player, Team, TeamMember, Tournament,
};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::state::{MatchStatus, TournamentState};
use crate::repository::TournamentStore;

#[derive(Default)]
struct MemoryInner {
    players: HashMap<Uuid, Player>,
    teams: HashMap<Uuid, Team>,
    members: HashMap<Uuid, TeamMember>,
    tournaments: HashMap<Uuid, Tournament>,
    enrollments: HashMap<Uuid, Enrollment>,
    matches: HashMap<Uuid, Match>,
    results: HashMap<Uuid, MatchResult>,
}

/// In-memory [`TournamentStore`]
#[derive(Default)]
pub struct MemoryTournamentStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

#[async_trait::async_trait]
impl TournamentStore for MemoryTournamentStore {
    // --- Players ---

    async fn create_player(&self, player: &Player) -> EngineResult<Player> {
        let mut inner = self.lock();
        if inner
            .players
            .values()
            .any(|p| p.username == player.username)
        {
            return Err(EngineError::Validation(
                "Username already taken".to_string(),
            ));
        }
        inner.players.insert(player.id, player.clone());
        Ok(player.clone())
    }

    async fn find_player(&self, id: Uuid) -> EngineResult<Option<Player>> {
        Ok(self.lock().players.get(&id).cloned())
    }

    async fn list_players(&self) -> EngineResult<Vec<Player>> {
        let mut players: Vec<Player> = self.lock().players.values().cloned().collect();
        players.sort_by_key(|p| p.created_at);
        Ok(players)
    }

    // --- Teams ---

    async fn create_team(&self, team: &Team) -> EngineResult<Team> {
        let mut inner = self.lock();
        if inner.teams.values().any(|t| t.name == team.name) {
            return Err(EngineError::Validation(
                "Team name already taken".to_string(),
            ));
        }
        inner.teams.insert(team.id, team.clone());
        Ok(team.clone())
    }

    async fn find_team(&self, id: Uuid) -> EngineResult<Option<Team>> {
        Ok(self.lock().teams.get(&id).cloned())
    }

    async fn find_team_by_name(&self, name: &str) -> EngineResult<Option<Team>> {
        Ok(self
            .lock()
            .teams
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn list_teams(&self) -> EngineResult<Vec<Team>> {
        let mut teams: Vec<Team> = self.lock().teams.values().cloned().collect();
        teams.sort_by_key(|t| t.created_at);
        Ok(teams)
    }

    async fn delete_team(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.lock().teams.remove(&id).is_some())
    }

    // --- Roster ---

    async fn add_member(&self, member: &TeamMember) -> EngineResult<TeamMember> {
        let mut inner = self.lock();
        if inner
            .members
            .values()
            .any(|m| m.team_id == member.team_id && m.user_id == member.user_id)
        {
            return Err(EngineError::Validation(
                "Player is already on this team".to_string(),
            ));
        }
        inner.members.insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn list_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>> {
        let mut members: Vec<TeamMember> = self
            .lock()
            .members
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.created_at);
        Ok(members)
    }

    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> EngineResult<bool> {
        Ok(self
            .lock()
            .members
            .values()
            .any(|m| m.team_id == team_id && m.user_id == user_id))
    }

    async fn delete_members_for_team(&self, team_id: Uuid) -> EngineResult<u64> {
        let mut inner = self.lock();
        let before = inner.members.len();
        inner.members.retain(|_, m| m.team_id != team_id);
        Ok((before - inner.members.len()) as u64)
    }

    async fn member_emails(&self, team_id: Uuid) -> EngineResult<Vec<String>> {
        let inner = self.lock();
        let mut members: Vec<&TeamMember> = inner
            .members
            .values()
            .filter(|m| m.team_id == team_id)
            .collect();
        members.sort_by_key(|m| m.created_at);
        Ok(members
            .iter()
            .filter_map(|m| inner.players.get(&m.user_id).map(|p| p.email.clone()))
            .collect())
    }

    // --- Tournaments ---

    async fn create_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament> {
        self.lock()
            .tournaments
            .insert(tournament.id, tournament.clone());
        Ok(tournament.clone())
    }

    async fn find_tournament(&self, id: Uuid) -> EngineResult<Option<Tournament>> {
        Ok(self.lock().tournaments.get(&id).cloned())
    }

    async fn list_tournaments(
        &self,
        state: Option<TournamentState>,
        category: Option<GameCategory>,
    ) -> EngineResult<Vec<Tournament>> {
        let mut tournaments: Vec<Tournament> = self
            .lock()
            .tournaments
            .values()
            .filter(|t| state.map_or(true, |s| t.state == s))
            .filter(|t| category.map_or(true, |c| t.category == c))
            .cloned()
            .collect();
        tournaments.sort_by_key(|t| t.created_at);
        Ok(tournaments)
    }

    async fn update_tournament(&self, tournament: &Tournament) -> EngineResult<Tournament> {
        let mut inner = self.lock();
        if !inner.tournaments.contains_key(&tournament.id) {
            return Err(EngineError::NotFound("Tournament not found".to_string()));
        }
        inner.tournaments.insert(tournament.id, tournament.clone());
        Ok(tournament.clone())
    }

    async fn set_tournament_state(
        &self,
        id: Uuid,
        expected: TournamentState,
        next: TournamentState,
    ) -> EngineResult<bool> {
        let mut inner = self.lock();
        match inner.tournaments.get_mut(&id) {
            Some(t) if t.state == expected => {
                t.state = next;
                t.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_tournament(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.lock().tournaments.remove(&id).is_some())
    }

    // --- Enrollments ---

    async fn create_enrollment(&self, enrollment: &Enrollment) -> EngineResult<Enrollment> {
        let mut inner = self.lock();
        if inner
            .enrollments
            .values()
            .any(|e| e.team_id == enrollment.team_id && e.tournament_id == enrollment.tournament_id)
        {
            return Err(EngineError::DuplicateEnrollment);
        }
        inner.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment.clone())
    }

    async fn find_enrollment(&self, id: Uuid) -> EngineResult<Option<Enrollment>> {
        Ok(self.lock().enrollments.get(&id).cloned())
    }

    async fn find_enrollment_by_team_and_tournament(
        &self,
        team_id: Uuid,
        tournament_id: Uuid,
    ) -> EngineResult<Option<Enrollment>> {
        Ok(self
            .lock()
            .enrollments
            .values()
            .find(|e| e.team_id == team_id && e.tournament_id == tournament_id)
            .cloned())
    }

    async fn list_enrollments_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<Enrollment>> {
        let mut enrollments: Vec<Enrollment> = self
            .lock()
            .enrollments
            .values()
            .filter(|e| e.tournament_id == tournament_id)
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| e.created_at);
        Ok(enrollments)
    }

    async fn list_enrollments_by_team(&self, team_id: Uuid) -> EngineResult<Vec<Enrollment>> {
        let mut enrollments: Vec<Enrollment> = self
            .lock()
            .enrollments
            .values()
            .filter(|e| e.team_id == team_id)
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| e.created_at);
        Ok(enrollments)
    }

    async fn count_enrollments(&self, tournament_id: Uuid) -> EngineResult<i64> {
        Ok(self
            .lock()
            .enrollments
            .values()
            .filter(|e| e.tournament_id == tournament_id)
            .count() as i64)
    }

    async fn enrolled_teams(&self, tournament_id: Uuid) -> EngineResult<Vec<Team>> {
        let inner = self.lock();
        let mut enrollments: Vec<&Enrollment> = inner
            .enrollments
            .values()
            .filter(|e| e.tournament_id == tournament_id)
            .collect();
        enrollments.sort_by_key(|e| e.created_at);
        Ok(enrollments
            .iter()
            .filter_map(|e| inner.teams.get(&e.team_id).cloned())
            .collect())
    }

    async fn delete_enrollment(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.lock().enrollments.remove(&id).is_some())
    }

    async fn delete_enrollments_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let mut inner = self.lock();
        let before = inner.enrollments.len();
        inner
            .enrollments
            .retain(|_, e| e.tournament_id != tournament_id);
        Ok((before - inner.enrollments.len()) as u64)
    }

    // --- Matches ---

    async fn create_match(&self, game: &Match) -> EngineResult<Match> {
        self.lock().matches.insert(game.id, game.clone());
        Ok(game.clone())
    }

    async fn list_matches_by_tournament(&self, tournament_id: Uuid) -> EngineResult<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .lock()
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.created_at);
        Ok(matches)
    }

    async fn count_pending_matches(&self, tournament_id: Uuid) -> EngineResult<i64> {
        Ok(self
            .lock()
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id && m.status == MatchStatus::Pending)
            .count() as i64)
    }

    async fn delete_pending_match_between(
        &self,
        tournament_id: Uuid,
        team_a: Uuid,
        team_b: Uuid,
    ) -> EngineResult<Option<Uuid>> {
        let mut inner = self.lock();
        let id = inner
            .matches
            .values()
            .find(|m| {
                m.tournament_id == tournament_id
                    && m.status == MatchStatus::Pending
                    && m.pairs(team_a, team_b)
            })
            .map(|m| m.id);
        if let Some(id) = id {
            inner.matches.remove(&id);
        }
        Ok(id)
    }

    async fn delete_matches_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let mut inner = self.lock();
        let before = inner.matches.len();
        inner.matches.retain(|_, m| m.tournament_id != tournament_id);
        Ok((before - inner.matches.len()) as u64)
    }

    // --- Results ---

    async fn create_result(&self, result: &MatchResult) -> EngineResult<MatchResult> {
        self.lock().results.insert(result.id, result.clone());
        Ok(result.clone())
    }

    async fn find_result(&self, id: Uuid) -> EngineResult<Option<MatchResult>> {
        Ok(self.lock().results.get(&id).cloned())
    }

    async fn list_results_by_tournament(
        &self,
        tournament_id: Uuid,
    ) -> EngineResult<Vec<MatchResult>> {
        let mut results: Vec<MatchResult> = self
            .lock()
            .results
            .values()
            .filter(|r| r.tournament_id == tournament_id)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.created_at);
        Ok(results)
    }

    async fn update_result(&self, result: &MatchResult) -> EngineResult<MatchResult> {
        let mut inner = self.lock();
        if !inner.results.contains_key(&result.id) {
            return Err(EngineError::NotFound("Result not found".to_string()));
        }
        inner.results.insert(result.id, result.clone());
        Ok(result.clone())
    }

    async fn delete_result(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.lock().results.remove(&id).is_some())
    }

    async fn delete_results_for_tournament(&self, tournament_id: Uuid) -> EngineResult<u64> {
        let mut inner = self.lock();
        let before = inner.results.len();
        inner.results.retain(|_, r| r.tournament_id != tournament_id);
        Ok((before - inner.results.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enrollment_uniqueness_backstop() {
        let store = MemoryTournamentStore::new();
        let team_id = Uuid::new_v4();
        let tournament_id = Uuid::new_v4();

        store
            .create_enrollment(&Enrollment::new(team_id, tournament_id))
            .await
            .unwrap();
        let err = store
            .create_enrollment(&Enrollment::new(team_id, tournament_id))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateEnrollment));
    }

    #[tokio::test]
    async fn test_state_cas_applies_once() {
        let store = MemoryTournamentStore::new();
        let tournament = Tournament::new(
            "Cup".to_string(),
            "Game".to_string(),
            GameCategory::Rpg,
            TournamentState::AcceptingEnrollment,
            Uuid::new_v4(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
            2,
        )
        .unwrap();
        store.create_tournament(&tournament).await.unwrap();

        let first = store
            .set_tournament_state(
                tournament.id,
                TournamentState::AcceptingEnrollment,
                TournamentState::InProgress,
            )
            .await
            .unwrap();
        let second = store
            .set_tournament_state(
                tournament.id,
                TournamentState::AcceptingEnrollment,
                TournamentState::InProgress,
            )
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
        let stored = store.find_tournament(tournament.id).await.unwrap().unwrap();
        assert_eq!(stored.state, TournamentState::InProgress);
    }

    #[tokio::test]
    async fn test_delete_pending_match_between_is_single_shot() {
        let store = MemoryTournamentStore::new();
        let tournament_id = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let m = Match::new(tournament_id, a, b).unwrap();
        store.create_match(&m).await.unwrap();

        // Slot order must not matter
        let deleted = store
            .delete_pending_match_between(tournament_id, b, a)
            .await
            .unwrap();
        assert_eq!(deleted, Some(m.id));

        let again = store
            .delete_pending_match_between(tournament_id, a, b)
            .await
            .unwrap();
        assert_eq!(again, None);
    }

    #[tokio::test]
    async fn test_member_emails_resolves_through_roster() {
        let store = MemoryTournamentStore::new();
        let team = Team::new("Falcons".to_string()).unwrap();
        store.create_team(&team).await.unwrap();

        let ana = Player::new("ana".to_string(), "ana@example.com".to_string()).unwrap();
        let bob = Player::new("bob".to_string(), "bob@example.com".to_string()).unwrap();
        store.create_player(&ana).await.unwrap();
        store.create_player(&bob).await.unwrap();

        store
            .add_member(&TeamMember::new(team.id, ana.id, true))
            .await
            .unwrap();
        store
            .add_member(&TeamMember::new(team.id, bob.id, false))
            .await
            .unwrap();

        let emails = store.member_emails(team.id).await.unwrap();
        assert_eq!(emails.len(), 2);
        assert!(emails.contains(&"ana@example.com".to_string()));
        assert!(emails.contains(&"bob@example.com".to_string()));
    }
}
