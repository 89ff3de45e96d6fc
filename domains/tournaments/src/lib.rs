//! Tournaments domain: teams, enrollments, brackets, match outcomes, lifecycle

pub mod api;
pub mod domain;
pub mod engine;
pub mod notify;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::error::{EngineError, EngineResult};
pub use domain::notifications::{
    Notifier, NullNotifier, RecordingNotifier, TournamentNotification,
};
pub use domain::state::{
    MatchStatus, StateError, TournamentEvent, TournamentState, TournamentStateMachine,
};

// Re-export engine types
pub use engine::{
    pair_teams, BracketGenerator, EnrollmentLedger, MatchOutcomeProcessor, TournamentEngine,
    TournamentLifecycle, TournamentLocks,
};

// Re-export notifier and repository types
pub use notify::EmailNotifier;
pub use repository::{MemoryTournamentStore, PgTournamentStore, TournamentStore};

// Re-export API types
pub use api::routes;
pub use api::TournamentsState;
