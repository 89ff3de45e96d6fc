//! Error taxonomy for the tournament engine
//!
//! Every failure the engine can produce maps to a stable, distinguishable
//! code so the API layer can translate it without inspecting message text.
//! Precondition failures are detected before any mutation and never retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type for engine and repository operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Team is already enrolled in this tournament")]
    DuplicateEnrollment,

    #[error("Tournament has no enrollment slots left")]
    CapacityExceeded,

    #[error("Invalid bracket input: {0}")]
    InvalidBracketInput(String),

    #[error("No pending match exists for this pairing")]
    MatchNotFound,

    #[error("Bracket invariant violated: {0}")]
    InternalInconsistency(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::NotFound(_) | EngineError::MatchNotFound => StatusCode::NOT_FOUND,
            EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::InvalidState(_)
            | EngineError::DuplicateEnrollment
            | EngineError::CapacityExceeded => StatusCode::CONFLICT,
            EngineError::InvalidBracketInput(_)
            | EngineError::InternalInconsistency(_)
            | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::InvalidState(_) => "INVALID_STATE",
            EngineError::Forbidden(_) => "FORBIDDEN",
            EngineError::DuplicateEnrollment => "DUPLICATE_ENROLLMENT",
            EngineError::CapacityExceeded => "CAPACITY_EXCEEDED",
            EngineError::InvalidBracketInput(_) => "INVALID_BRACKET_INPUT",
            EngineError::MatchNotFound => "MATCH_NOT_FOUND",
            EngineError::InternalInconsistency(_) => "INTERNAL_INCONSISTENCY",
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // InternalInconsistency is a defect signal, not a user input error
        if matches!(self, EngineError::InternalInconsistency(_)) {
            tracing::error!(error = %self, "Bracket invariant violated");
        } else if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
