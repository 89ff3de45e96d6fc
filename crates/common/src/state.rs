//! State machine support shared by domain crates
//!
//! A transition is rejected either because the current state is terminal or
//! because the event does not apply to it. The error carries the state and
//! event names so callers can surface them without extra lookups.

use thiserror::Error;

/// Errors produced by rejected state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("event '{event}' does not apply in state '{from}'")]
    InvalidTransition { from: String, event: String },

    #[error("'{0}' is a terminal state")]
    TerminalState(String),
}
