//! End-to-end engine scenarios over the in-memory store.
//!
//! Covers the full lifecycle: enrollment gating, bracket generation, outcome
//! processing, round advancement, and champion declaration.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use knockout_tournaments::{
    EngineError, GameCategory, MatchStatus, MemoryTournamentStore, Player, RecordingNotifier,
    Team, TeamMember, Tournament, TournamentEngine, TournamentNotification, TournamentState,
    TournamentStore,
};

struct Fixture {
    store: Arc<MemoryTournamentStore>,
    notifier: Arc<RecordingNotifier>,
    engine: TournamentEngine,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(MemoryTournamentStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = TournamentEngine::new(store.clone(), notifier.clone());
        Self {
            store,
            notifier,
            engine,
        }
    }

    async fn organizer(&self) -> Player {
        let organizer = Player::new("organizer".to_string(), "org@example.com".to_string()).unwrap();
        self.store.create_player(&organizer).await.unwrap();
        organizer
    }

    async fn tournament(&self, max_teams: i32) -> Tournament {
        let organizer = self.organizer().await;
        let tournament = Tournament::new(
            format!("Cup of {}", max_teams),
            "Rocket Arena".to_string(),
            GameCategory::Shooter,
            TournamentState::AcceptingEnrollment,
            organizer.id,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            max_teams,
        )
        .unwrap();
        self.store.create_tournament(&tournament).await.unwrap();
        tournament
    }

    /// Create a team with a single member and return (team, member id)
    async fn team(&self, name: &str) -> (Team, Uuid) {
        let player = Player::new(
            format!("{}-captain", name.to_lowercase().replace(' ', "-")),
            format!("{}@example.com", name.to_lowercase().replace(' ', "-")),
        )
        .unwrap();
        self.store.create_player(&player).await.unwrap();

        let team = Team::new(name.to_string()).unwrap();
        self.store.create_team(&team).await.unwrap();
        self.store
            .add_member(&TeamMember::new(team.id, player.id, true))
            .await
            .unwrap();

        (team, player.id)
    }

    /// Enroll `n` fresh teams into the tournament, returning them in order
    async fn enroll_teams(&self, tournament: &Tournament, n: usize) -> Vec<Team> {
        let mut teams = Vec::with_capacity(n);
        for i in 0..n {
            let (team, member) = self.team(&format!("Team {}", i + 1)).await;
            self.engine
                .ledger
                .enroll(tournament.id, team.id, member)
                .await
                .unwrap();
            teams.push(team);
        }
        teams
    }

    async fn tournament_state(&self, id: Uuid) -> TournamentState {
        self.store.find_tournament(id).await.unwrap().unwrap().state
    }

    async fn pending_matches(&self, id: Uuid) -> Vec<knockout_tournaments::Match> {
        self.store
            .list_matches_by_tournament(id)
            .await
            .unwrap()
            .into_iter()
            .filter(|m| m.status == MatchStatus::Pending)
            .collect()
    }
}

// ----------------------------------------------------------------------------
// Scenario A: filling capacity starts the tournament
// ----------------------------------------------------------------------------

#[tokio::test]
async fn filling_capacity_starts_tournament_and_draws_round_one() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;

    let teams = fx.enroll_teams(&tournament, 4).await;

    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::InProgress
    );

    let pending = fx.pending_matches(tournament.id).await;
    assert_eq!(pending.len(), 2);

    // Every enrolled team appears in exactly one match
    let mut seen = HashSet::new();
    for m in &pending {
        assert!(seen.insert(m.first_team_id));
        assert!(seen.insert(m.second_team_id));
    }
    let expected: HashSet<Uuid> = teams.iter().map(|t| t.id).collect();
    assert_eq!(seen, expected);

    // One round-started event carrying both match ids
    let rounds: Vec<_> = fx
        .notifier
        .events_for(tournament.id)
        .into_iter()
        .filter(|e| matches!(e, TournamentNotification::RoundStarted { .. }))
        .collect();
    assert_eq!(rounds.len(), 1);
    match &rounds[0] {
        TournamentNotification::RoundStarted { match_ids, .. } => {
            assert_eq!(match_ids.len(), 2)
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn partial_enrollment_leaves_tournament_open() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;

    fx.enroll_teams(&tournament, 3).await;

    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::AcceptingEnrollment
    );
    assert!(fx.pending_matches(tournament.id).await.is_empty());
}

// ----------------------------------------------------------------------------
// Scenario B: resolving a round generates the next one
// ----------------------------------------------------------------------------

#[tokio::test]
async fn resolving_full_round_generates_next_round() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 4).await;

    let round_one = fx.pending_matches(tournament.id).await;
    assert_eq!(round_one.len(), 2);

    // First team of each pairing wins
    fx.engine
        .outcomes
        .record_outcome(
            tournament.id,
            round_one[0].first_team_id,
            round_one[0].second_team_id,
            3,
            1,
        )
        .await
        .unwrap();

    // Round not yet complete: no new matches drawn
    assert_eq!(fx.pending_matches(tournament.id).await.len(), 1);

    fx.engine
        .outcomes
        .record_outcome(
            tournament.id,
            round_one[1].first_team_id,
            round_one[1].second_team_id,
            2,
            0,
        )
        .await
        .unwrap();

    // Two survivors, one new match pairing exactly the two winners
    let enrollments = fx
        .store
        .list_enrollments_by_tournament(tournament.id)
        .await
        .unwrap();
    assert_eq!(enrollments.len(), 2);

    let survivors: HashSet<Uuid> = enrollments.iter().map(|e| e.team_id).collect();
    assert_eq!(
        survivors,
        HashSet::from([round_one[0].first_team_id, round_one[1].first_team_id])
    );

    let round_two = fx.pending_matches(tournament.id).await;
    assert_eq!(round_two.len(), 1);
    assert!(round_two[0].pairs(round_one[0].first_team_id, round_one[1].first_team_id));

    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::InProgress
    );
}

// ----------------------------------------------------------------------------
// Scenario C: the final resolution declares a champion
// ----------------------------------------------------------------------------

#[tokio::test]
async fn final_resolution_declares_champion_and_finishes_tournament() {
    let fx = Fixture::new();
    let tournament = fx.tournament(2).await;
    let teams = fx.enroll_teams(&tournament, 2).await;

    let finals = fx.pending_matches(tournament.id).await;
    assert_eq!(finals.len(), 1);

    let winner = finals[0].first_team_id;
    let loser = finals[0].second_team_id;

    fx.engine
        .outcomes
        .record_outcome(tournament.id, winner, loser, 5, 4)
        .await
        .unwrap();

    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::Finished
    );

    let enrollments = fx
        .store
        .list_enrollments_by_tournament(tournament.id)
        .await
        .unwrap();
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0].team_id, winner);

    let champions: Vec<_> = fx
        .notifier
        .events_for(tournament.id)
        .into_iter()
        .filter(|e| matches!(e, TournamentNotification::ChampionDecided { .. }))
        .collect();
    assert_eq!(champions.len(), 1);
    assert_eq!(
        champions[0],
        TournamentNotification::ChampionDecided {
            tournament_id: tournament.id,
            team_id: winner,
        }
    );

    // Both teams were originally enrolled
    assert!(teams.iter().any(|t| t.id == winner));
    assert!(teams.iter().any(|t| t.id == loser));
}

#[tokio::test]
async fn champion_is_not_declared_while_matches_are_pending() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 4).await;

    let round_one = fx.pending_matches(tournament.id).await;
    fx.engine
        .outcomes
        .record_outcome(
            tournament.id,
            round_one[0].first_team_id,
            round_one[0].second_team_id,
            1,
            0,
        )
        .await
        .unwrap();

    let champions = fx
        .notifier
        .events_for(tournament.id)
        .into_iter()
        .filter(|e| matches!(e, TournamentNotification::ChampionDecided { .. }))
        .count();
    assert_eq!(champions, 0);
    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::InProgress
    );
}

// ----------------------------------------------------------------------------
// Scenario D: enrollment after closure
// ----------------------------------------------------------------------------

#[tokio::test]
async fn enrolling_into_running_tournament_fails_without_mutation() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 4).await;

    let (late_team, late_member) = fx.team("Latecomers").await;
    let err = fx
        .engine
        .ledger
        .enroll(tournament.id, late_team.id, late_member)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidState(_)));
    assert_eq!(err.error_code(), "INVALID_STATE");

    let count = fx.store.count_enrollments(tournament.id).await.unwrap();
    assert_eq!(count, 4);
}

// ----------------------------------------------------------------------------
// Scenario E: resolving an already-resolved pairing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn recording_outcome_twice_for_same_pairing_fails_with_match_not_found() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 4).await;

    let round_one = fx.pending_matches(tournament.id).await;
    let winner = round_one[0].first_team_id;
    let loser = round_one[0].second_team_id;

    fx.engine
        .outcomes
        .record_outcome(tournament.id, winner, loser, 3, 1)
        .await
        .unwrap();

    let err = fx
        .engine
        .outcomes
        .record_outcome(tournament.id, winner, loser, 3, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MatchNotFound));
    assert_eq!(err.error_code(), "MATCH_NOT_FOUND");
}

// ----------------------------------------------------------------------------
// Outcome round-trip
// ----------------------------------------------------------------------------

#[tokio::test]
async fn outcome_removes_exactly_one_match_and_one_enrollment_and_adds_one_result() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 4).await;

    let before_matches = fx.pending_matches(tournament.id).await;
    let target = before_matches[0].clone();

    let result = fx
        .engine
        .outcomes
        .record_outcome(
            tournament.id,
            target.second_team_id, // slot order must not matter
            target.first_team_id,
            7,
            2,
        )
        .await
        .unwrap();

    // Exactly that match disappeared
    let after_matches = fx.pending_matches(tournament.id).await;
    assert_eq!(after_matches.len(), before_matches.len() - 1);
    assert!(after_matches.iter().all(|m| m.id != target.id));

    // Exactly the loser's enrollment disappeared
    let enrollments = fx
        .store
        .list_enrollments_by_tournament(tournament.id)
        .await
        .unwrap();
    assert_eq!(enrollments.len(), 3);
    assert!(enrollments.iter().all(|e| e.team_id != target.first_team_id));

    // Exactly one result row with full linkage
    let results = fx
        .store
        .list_results_by_tournament(tournament.id)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, result.id);
    assert_eq!(results[0].tournament_id, tournament.id);
    assert_eq!(results[0].winner_team_id, target.second_team_id);
    assert_eq!(results[0].loser_team_id, target.first_team_id);
    assert_eq!(results[0].winner_score, 7);
    assert_eq!(results[0].loser_score, 2);
}

// ----------------------------------------------------------------------------
// Enrollment precondition codes
// ----------------------------------------------------------------------------

#[tokio::test]
async fn enrollment_preconditions_fail_with_distinct_codes() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    let (team, member) = fx.team("Falcons").await;

    // Unknown tournament
    let err = fx
        .engine
        .ledger
        .enroll(Uuid::new_v4(), team.id, member)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");

    // Unknown team
    let err = fx
        .engine
        .ledger
        .enroll(tournament.id, Uuid::new_v4(), member)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");

    // Acting user is not on the team
    let outsider = Player::new("outsider".to_string(), "out@example.com".to_string()).unwrap();
    fx.store.create_player(&outsider).await.unwrap();
    let err = fx
        .engine
        .ledger
        .enroll(tournament.id, team.id, outsider.id)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "FORBIDDEN");

    // Duplicate enrollment
    fx.engine
        .ledger
        .enroll(tournament.id, team.id, member)
        .await
        .unwrap();
    let err = fx
        .engine
        .ledger
        .enroll(tournament.id, team.id, member)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_ENROLLMENT");

    // No mutation beyond the one successful enrollment
    assert_eq!(fx.store.count_enrollments(tournament.id).await.unwrap(), 1);
}

#[tokio::test]
async fn capacity_is_never_exceeded() {
    let fx = Fixture::new();
    let tournament = fx.tournament(2).await;
    fx.enroll_teams(&tournament, 2).await;

    // The tournament filled and started; a further enrollment is rejected for
    // state, and the count stays at capacity
    let (team, member) = fx.team("Overflow").await;
    let err = fx
        .engine
        .ledger
        .enroll(tournament.id, team.id, member)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    assert_eq!(fx.store.count_enrollments(tournament.id).await.unwrap(), 2);
}

// ----------------------------------------------------------------------------
// Enrollment ledger reads and removal
// ----------------------------------------------------------------------------

#[tokio::test]
async fn list_endpoints_return_empty_for_unknown_keys() {
    let fx = Fixture::new();

    let by_tournament = fx
        .engine
        .ledger
        .list_by_tournament(Uuid::new_v4())
        .await
        .unwrap();
    assert!(by_tournament.is_empty());

    let by_team = fx.engine.ledger.list_by_team(Uuid::new_v4()).await.unwrap();
    assert!(by_team.is_empty());
}

#[tokio::test]
async fn removing_unknown_enrollment_fails_with_not_found() {
    let fx = Fixture::new();
    let err = fx.engine.ledger.remove(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn administrative_removal_frees_a_slot() {
    let fx = Fixture::new();
    let tournament = fx.tournament(4).await;
    fx.enroll_teams(&tournament, 3).await;

    let enrollments = fx
        .engine
        .ledger
        .list_by_tournament(tournament.id)
        .await
        .unwrap();
    fx.engine.ledger.remove(enrollments[0].id).await.unwrap();

    assert_eq!(fx.store.count_enrollments(tournament.id).await.unwrap(), 2);
    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::AcceptingEnrollment
    );
}

// ----------------------------------------------------------------------------
// Invariant violation surfacing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn empty_enrollments_without_champion_surfaces_internal_inconsistency() {
    let fx = Fixture::new();
    let tournament = fx.tournament(2).await;

    // Force the tournament into progress with no enrollments at all
    fx.store
        .set_tournament_state(
            tournament.id,
            TournamentState::AcceptingEnrollment,
            TournamentState::InProgress,
        )
        .await
        .unwrap();

    let err = fx
        .engine
        .lifecycle
        .on_match_resolved(&fx.store.find_tournament(tournament.id).await.unwrap().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InternalInconsistency(_)));
    assert_eq!(err.error_code(), "INTERNAL_INCONSISTENCY");
}

// ----------------------------------------------------------------------------
// Full tournament run
// ----------------------------------------------------------------------------

#[tokio::test]
async fn eight_team_tournament_runs_to_completion() {
    let fx = Fixture::new();
    let tournament = fx.tournament(8).await;
    fx.enroll_teams(&tournament, 8).await;

    // Resolve rounds until the tournament finishes
    let mut rounds = 0;
    loop {
        let pending = fx.pending_matches(tournament.id).await;
        if pending.is_empty() {
            break;
        }
        rounds += 1;
        assert!(rounds <= 3, "an 8-team bracket has exactly 3 rounds");

        for m in pending {
            fx.engine
                .outcomes
                .record_outcome(tournament.id, m.first_team_id, m.second_team_id, 1, 0)
                .await
                .unwrap();
        }
    }

    assert_eq!(rounds, 3);
    assert_eq!(
        fx.tournament_state(tournament.id).await,
        TournamentState::Finished
    );

    // 7 eliminations → 7 results, 1 survivor
    let results = fx
        .store
        .list_results_by_tournament(tournament.id)
        .await
        .unwrap();
    assert_eq!(results.len(), 7);
    assert_eq!(fx.store.count_enrollments(tournament.id).await.unwrap(), 1);

    // 3 round-started events and exactly 1 champion event
    let events = fx.notifier.events_for(tournament.id);
    let round_events = events
        .iter()
        .filter(|e| matches!(e, TournamentNotification::RoundStarted { .. }))
        .count();
    let champion_events = events
        .iter()
        .filter(|e| matches!(e, TournamentNotification::ChampionDecided { .. }))
        .count();
    assert_eq!(round_events, 3);
    assert_eq!(champion_events, 1);
}
