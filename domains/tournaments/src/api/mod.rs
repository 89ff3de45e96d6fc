//! API layer for the tournaments domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::TournamentsState;
pub use routes::routes;
