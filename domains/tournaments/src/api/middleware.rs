//! Tournaments domain state and acting-user extraction
//!
//! Authentication lives outside this domain. The boundary hands the acting
//! player's id in explicitly through the `x-user-id` header; handlers pass it
//! on as a plain argument — no operation reads an ambient security context.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use knockout_common::Error;
use uuid::Uuid;

use crate::engine::TournamentEngine;
use crate::repository::TournamentStore;

/// Application state for the Tournaments domain
#[derive(Clone)]
pub struct TournamentsState {
    pub store: Arc<dyn TournamentStore>,
    pub engine: TournamentEngine,
}

/// The player id the upstream auth layer resolved for this request
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub Uuid);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| Error::Authentication("Missing x-user-id header".to_string()))?;

        let raw = header
            .to_str()
            .map_err(|_| Error::Authentication("Invalid x-user-id header".to_string()))?;

        let id = Uuid::parse_str(raw)
            .map_err(|_| Error::Authentication("Invalid x-user-id header".to_string()))?;

        Ok(ActingUser(id))
    }
}
