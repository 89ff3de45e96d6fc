//! The tournament engine: enrollment gating, bracket generation, outcome
//! processing, and lifecycle transitions.
//!
//! Component dependencies, leaves first: [`BracketGenerator`] →
//! [`TournamentLifecycle`] → [`EnrollmentLedger`] / [`MatchOutcomeProcessor`].
//! All mutating entry points serialize per tournament through
//! [`TournamentLocks`]; there is no cross-tournament coordination.

pub mod bracket;
pub mod enrollment;
pub mod lifecycle;
pub mod locks;
pub mod outcome;

use std::sync::Arc;

use crate::domain::notifications::Notifier;
use crate::repository::TournamentStore;

pub use bracket::{pair_teams, BracketGenerator};
pub use enrollment::EnrollmentLedger;
pub use lifecycle::TournamentLifecycle;
pub use locks::TournamentLocks;
pub use outcome::MatchOutcomeProcessor;

/// Fully wired engine over one store and one notifier
#[derive(Clone)]
pub struct TournamentEngine {
    pub ledger: Arc<EnrollmentLedger>,
    pub outcomes: Arc<MatchOutcomeProcessor>,
    pub lifecycle: Arc<TournamentLifecycle>,
}

impl TournamentEngine {
    pub fn new(store: Arc<dyn TournamentStore>, notifier: Arc<dyn Notifier>) -> Self {
        let locks = Arc::new(TournamentLocks::new());
        let lifecycle = Arc::new(TournamentLifecycle::new(store.clone(), notifier.clone()));
        let ledger = Arc::new(EnrollmentLedger::new(
            store.clone(),
            locks.clone(),
            lifecycle.clone(),
            notifier,
        ));
        let outcomes = Arc::new(MatchOutcomeProcessor::new(store, locks, lifecycle.clone()));

        Self {
            ledger,
            outcomes,
            lifecycle,
        }
    }
}
