//! Email-backed notifier
//!
//! Translates lifecycle events into per-member emails. The event only carries
//! ids; this adapter resolves names and member addresses through the store
//! and renders via the email crate's templates. Delivery is fire-and-forget:
//! failures are logged and never propagated into the lifecycle.

use std::sync::Arc;

use knockout_email::EmailService;
use uuid::Uuid;

use crate::domain::notifications::{Notifier, TournamentNotification};
use crate::repository::TournamentStore;

pub struct EmailNotifier {
    store: Arc<dyn TournamentStore>,
    email: Arc<dyn EmailService>,
}

impl EmailNotifier {
    pub fn new(store: Arc<dyn TournamentStore>, email: Arc<dyn EmailService>) -> Self {
        Self { store, email }
    }

    async fn tournament_name(&self, tournament_id: Uuid) -> Option<String> {
        match self.store.find_tournament(tournament_id).await {
            Ok(Some(t)) => Some(t.name),
            Ok(None) => {
                tracing::warn!(
                    tournament_id = %tournament_id,
                    "Notification for unknown tournament, dropping"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    tournament_id = %tournament_id,
                    error = %e,
                    "Failed to resolve tournament for notification"
                );
                None
            }
        }
    }

    async fn emails_for_team(&self, team_id: Uuid) -> Vec<String> {
        match self.store.member_emails(team_id).await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::warn!(
                    team_id = %team_id,
                    error = %e,
                    "Failed to resolve member addresses"
                );
                Vec::new()
            }
        }
    }

    async fn send_round_started(&self, tournament_id: Uuid) {
        let Some(name) = self.tournament_name(tournament_id).await else {
            return;
        };

        let teams = match self.store.enrolled_teams(tournament_id).await {
            Ok(teams) => teams,
            Err(e) => {
                tracing::warn!(
                    tournament_id = %tournament_id,
                    error = %e,
                    "Failed to resolve enrolled teams for notification"
                );
                return;
            }
        };

        for team in teams {
            for recipient in self.emails_for_team(team.id).await {
                if let Err(e) = self
                    .email
                    .send_round_started(&name, tournament_id, &recipient)
                    .await
                {
                    tracing::warn!(
                        tournament_id = %tournament_id,
                        recipient = %recipient,
                        error = %e,
                        "Failed to send round-started email"
                    );
                }
            }
        }
    }

    async fn send_champion(&self, tournament_id: Uuid, team_id: Uuid) {
        let Some(name) = self.tournament_name(tournament_id).await else {
            return;
        };

        for recipient in self.emails_for_team(team_id).await {
            if let Err(e) = self
                .email
                .send_champion(&name, tournament_id, team_id, &recipient)
                .await
            {
                tracing::warn!(
                    tournament_id = %tournament_id,
                    recipient = %recipient,
                    error = %e,
                    "Failed to send champion email"
                );
            }
        }
    }

    async fn send_enrollment_accepted(&self, tournament_id: Uuid, team_id: Uuid) {
        let Some(name) = self.tournament_name(tournament_id).await else {
            return;
        };

        let team_name = match self.store.find_team(team_id).await {
            Ok(Some(team)) => team.name,
            _ => return,
        };

        for recipient in self.emails_for_team(team_id).await {
            if let Err(e) = self
                .email
                .send_enrollment_accepted(&name, tournament_id, &team_name, &recipient)
                .await
            {
                tracing::warn!(
                    tournament_id = %tournament_id,
                    recipient = %recipient,
                    error = %e,
                    "Failed to send enrollment email"
                );
            }
        }
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notification: TournamentNotification) {
        match notification {
            TournamentNotification::RoundStarted { tournament_id, .. } => {
                self.send_round_started(tournament_id).await;
            }
            TournamentNotification::ChampionDecided {
                tournament_id,
                team_id,
            } => {
                self.send_champion(tournament_id, team_id).await;
            }
            TournamentNotification::EnrollmentAccepted {
                tournament_id,
                team_id,
            } => {
                self.send_enrollment_accepted(tournament_id, team_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{GameCategory, Player, Team, TeamMember, Tournament};
    use crate::domain::state::TournamentState;
    use crate::repository::MemoryTournamentStore;
    use knockout_email::mock::MockEmailService;

    async fn seeded_store() -> (Arc<MemoryTournamentStore>, Tournament, Team) {
        let store = Arc::new(MemoryTournamentStore::new());

        let tournament = Tournament::new(
            "Summer Cup".to_string(),
            "Rocket Arena".to_string(),
            GameCategory::Shooter,
            TournamentState::AcceptingEnrollment,
            Uuid::new_v4(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            2,
        )
        .unwrap();
        store.create_tournament(&tournament).await.unwrap();

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

        (store, tournament, team)
    }

    #[tokio::test]
    async fn test_champion_email_reaches_every_member() {
        let (store, tournament, team) = seeded_store().await;
        let email = Arc::new(MockEmailService::new());
        let notifier = EmailNotifier::new(store, email.clone());

        notifier
            .notify(TournamentNotification::ChampionDecided {
                tournament_id: tournament.id,
                team_id: team.id,
            })
            .await;

        let sent = email.captured_of_type("champion_decided");
        assert_eq!(sent.len(), 2);
        let recipients: Vec<&str> = sent.iter().map(|e| e.message.to.as_str()).collect();
        assert!(recipients.contains(&"ana@example.com"));
        assert!(recipients.contains(&"bob@example.com"));
    }

    #[tokio::test]
    async fn test_enrollment_email_mentions_team_and_tournament() {
        let (store, tournament, team) = seeded_store().await;
        let email = Arc::new(MockEmailService::new());
        let notifier = EmailNotifier::new(store, email.clone());

        notifier
            .notify(TournamentNotification::EnrollmentAccepted {
                tournament_id: tournament.id,
                team_id: team.id,
            })
            .await;

        let sent = email.captured_of_type("enrollment_accepted");
        assert_eq!(sent.len(), 2);
        assert!(sent[0].message.body_text.contains("Falcons"));
        assert!(sent[0].message.body_text.contains("Summer Cup"));
    }

    #[tokio::test]
    async fn test_unknown_tournament_is_dropped_silently() {
        let (store, _, team) = seeded_store().await;
        let email = Arc::new(MockEmailService::new());
        let notifier = EmailNotifier::new(store, email.clone());

        notifier
            .notify(TournamentNotification::ChampionDecided {
                tournament_id: Uuid::new_v4(),
                team_id: team.id,
            })
            .await;

        assert_eq!(email.captured_count(), 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_panic_or_propagate() {
        let (store, tournament, team) = seeded_store().await;
        let email = Arc::new(MockEmailService::new());
        email.fail_next_send();
        let notifier = EmailNotifier::new(store, email.clone());

        notifier
            .notify(TournamentNotification::ChampionDecided {
                tournament_id: tournament.id,
                team_id: team.id,
            })
            .await;

        // First send failed, second member still got theirs
        assert_eq!(email.captured_count(), 1);
    }
}
