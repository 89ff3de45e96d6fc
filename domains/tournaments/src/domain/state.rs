//! State machines for tournaments domain entities
//!
//! Each state machine defines:
//! - Valid states
//! - Events that trigger transitions
//! - Terminal states
//!
//! Tournament state only ever moves forward; there is no path back to
//! enrollment once a bracket has been drawn.

use serde::{Deserialize, Serialize};

pub use knockout_common::StateError;

// ============================================================================
// Tournament State Machine
// ============================================================================

/// Tournament lifecycle states.
///
/// `Next` is a pre-tournament draft created by an organizer; the engine never
/// transitions into or out of it — opening enrollment is an organizer action
/// at the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tournament_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    Next,
    AcceptingEnrollment,
    InProgress,
    Finished,
}

impl TournamentState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [TournamentState] {
        match self {
            Self::Next => &[Self::AcceptingEnrollment],
            Self::AcceptingEnrollment => &[Self::InProgress],
            Self::InProgress => &[Self::Finished],
            Self::Finished => &[],
        }
    }
}

impl std::fmt::Display for TournamentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::AcceptingEnrollment => write!(f, "accepting_enrollment"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Events that trigger tournament state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TournamentEvent {
    /// Organizer opens a drafted tournament for enrollment
    OpenEnrollment,
    /// The final enrollment fills the tournament to capacity
    CapacityReached,
    /// The last surviving team is declared champion
    ChampionDecided,
}

impl std::fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenEnrollment => write!(f, "open_enrollment"),
            Self::CapacityReached => write!(f, "capacity_reached"),
            Self::ChampionDecided => write!(f, "champion_decided"),
        }
    }
}

/// Tournament state machine
pub struct TournamentStateMachine;

impl TournamentStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(
        current: TournamentState,
        event: TournamentEvent,
    ) -> Result<TournamentState, StateError> {
        // Check for terminal state
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (TournamentState::Next, TournamentEvent::OpenEnrollment) => {
                TournamentState::AcceptingEnrollment
            }
            (TournamentState::AcceptingEnrollment, TournamentEvent::CapacityReached) => {
                TournamentState::InProgress
            }
            (TournamentState::InProgress, TournamentEvent::ChampionDecided) => {
                TournamentState::Finished
            }

            // Invalid transitions
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: TournamentState, event: &TournamentEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}

// ============================================================================
// Match status
// ============================================================================

/// Status of a match — a closed set, never a free-form string.
///
/// The lifecycle path deletes matches when they resolve; `Finished` and
/// `Canceled` exist for administrative corrections outside that flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Finished,
    Canceled,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Finished => write!(f, "finished"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod tournament_state_machine {
        use super::*;

        #[test]
        fn test_valid_next_to_accepting() {
            let result = TournamentStateMachine::transition(
                TournamentState::Next,
                TournamentEvent::OpenEnrollment,
            );
            assert_eq!(result, Ok(TournamentState::AcceptingEnrollment));
        }

        #[test]
        fn test_valid_accepting_to_in_progress() {
            let result = TournamentStateMachine::transition(
                TournamentState::AcceptingEnrollment,
                TournamentEvent::CapacityReached,
            );
            assert_eq!(result, Ok(TournamentState::InProgress));
        }

        #[test]
        fn test_valid_in_progress_to_finished() {
            let result = TournamentStateMachine::transition(
                TournamentState::InProgress,
                TournamentEvent::ChampionDecided,
            );
            assert_eq!(result, Ok(TournamentState::Finished));
        }

        #[test]
        fn test_no_regression_to_enrollment() {
            // A running tournament cannot re-open enrollment
            let result = TournamentStateMachine::transition(
                TournamentState::InProgress,
                TournamentEvent::OpenEnrollment,
            );
            assert!(matches!(result, Err(StateError::InvalidTransition { .. })));
        }

        #[test]
        fn test_cannot_start_twice() {
            // CapacityReached only applies while accepting enrollments
            let result = TournamentStateMachine::transition(
                TournamentState::InProgress,
                TournamentEvent::CapacityReached,
            );
            assert!(matches!(result, Err(StateError::InvalidTransition { .. })));
        }

        #[test]
        fn test_terminal_finished_cannot_transition() {
            for event in [
                TournamentEvent::OpenEnrollment,
                TournamentEvent::CapacityReached,
                TournamentEvent::ChampionDecided,
            ] {
                let result = TournamentStateMachine::transition(TournamentState::Finished, event);
                assert!(matches!(result, Err(StateError::TerminalState(_))));
            }
        }

        #[test]
        fn test_draft_cannot_skip_enrollment() {
            let result = TournamentStateMachine::transition(
                TournamentState::Next,
                TournamentEvent::CapacityReached,
            );
            assert!(matches!(result, Err(StateError::InvalidTransition { .. })));
        }

        #[test]
        fn test_is_terminal() {
            assert!(!TournamentState::Next.is_terminal());
            assert!(!TournamentState::AcceptingEnrollment.is_terminal());
            assert!(!TournamentState::InProgress.is_terminal());
            assert!(TournamentState::Finished.is_terminal());
        }

        #[test]
        fn test_valid_transitions_are_forward_only() {
            assert_eq!(
                TournamentState::Next.valid_transitions(),
                &[TournamentState::AcceptingEnrollment]
            );
            assert_eq!(
                TournamentState::AcceptingEnrollment.valid_transitions(),
                &[TournamentState::InProgress]
            );
            assert_eq!(
                TournamentState::InProgress.valid_transitions(),
                &[TournamentState::Finished]
            );
            assert!(TournamentState::Finished.valid_transitions().is_empty());
        }

        #[test]
        fn test_can_transition() {
            assert!(TournamentStateMachine::can_transition(
                TournamentState::AcceptingEnrollment,
                &TournamentEvent::CapacityReached
            ));
            assert!(!TournamentStateMachine::can_transition(
                TournamentState::Finished,
                &TournamentEvent::CapacityReached
            ));
        }
    }

    #[test]
    fn test_state_serialization_names() {
        assert_eq!(
            serde_json::to_string(&TournamentState::AcceptingEnrollment).unwrap(),
            "\"accepting_enrollment\""
        );
        assert_eq!(
            serde_json::to_string(&MatchStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
