//! Knockout application composition root
//!
//! Wires the Postgres store, the email notifier, and the tournament engine
//! into a single axum router.

use std::sync::Arc;

use axum::Router;
use knockout_email::{EmailConfig, EmailService, EmailServiceFactory};
use knockout_tournaments::{
    EmailNotifier, Notifier, PgTournamentStore, TournamentEngine, TournamentStore,
    TournamentsState,
};
use sqlx::PgPool;

/// Create the main application router with all routes and middleware
pub async fn create_app(pool: PgPool) -> Result<Router, anyhow::Error> {
    // Storage
    let store: Arc<dyn TournamentStore> = Arc::new(PgTournamentStore::new(pool));

    // Email service from environment
    let email_config = EmailConfig::from_env()?;
    let email: Arc<dyn EmailService> = Arc::from(EmailServiceFactory::create(email_config)?);

    // Lifecycle notifications fan out to team members over email
    let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier::new(store.clone(), email));

    // The engine: enrollment ledger, bracket generator, outcome processor,
    // lifecycle — all serialized per tournament
    let engine = TournamentEngine::new(store.clone(), notifier);

    let state = TournamentsState { store, engine };

    // Build router — compose domain routes with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Knockout API v0.1.0" }))
        .merge(knockout_tournaments::routes().with_state(state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
