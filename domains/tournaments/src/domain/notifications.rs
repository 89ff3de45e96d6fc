//! Lifecycle notification events and the notifier seam
//!
//! The engine emits events; delivery is a downstream concern. Implementations
//! must treat `notify` as fire-and-forget — a failed delivery never fails the
//! lifecycle transition that produced the event.

use std::sync::Mutex;

use uuid::Uuid;

/// Events the engine emits as the lifecycle advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentNotification {
    /// A new bracket round has been drawn
    RoundStarted {
        tournament_id: Uuid,
        match_ids: Vec<Uuid>,
    },
    /// The sole surviving team has won the tournament
    ChampionDecided { tournament_id: Uuid, team_id: Uuid },
    /// A team's enrollment was accepted
    EnrollmentAccepted { tournament_id: Uuid, team_id: Uuid },
}

impl TournamentNotification {
    pub fn tournament_id(&self) -> Uuid {
        match self {
            Self::RoundStarted { tournament_id, .. }
            | Self::ChampionDecided { tournament_id, .. }
            | Self::EnrollmentAccepted { tournament_id, .. } => *tournament_id,
        }
    }
}

/// Consumer of lifecycle events
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: TournamentNotification);
}

/// Notifier that drops every event. Useful where no delivery is wired up.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait::async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _notification: TournamentNotification) {}
}

/// Notifier that records every event in memory, for tests
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<TournamentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<TournamentNotification> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    /// Recorded events for one tournament
    pub fn events_for(&self, tournament_id: Uuid) -> Vec<TournamentNotification> {
        self.events()
            .into_iter()
            .filter(|e| e.tournament_id() == tournament_id)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().expect("notifier lock poisoned").clear();
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: TournamentNotification) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(notification);
    }
}
