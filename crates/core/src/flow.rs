//! State machine for multi-step email verification flows.
//!
//! Signup and password reset both walk the same three states:
//!
//! ```text
//! CODE_REQUESTED --VerifyCode--> CODE_VERIFIED --Complete--> COMPLETED
//!       ^                              |
//!       +---------RequestCode----------+
//! ```
//!
//! Requesting a fresh code is allowed from either live state and resets the
//! flow to `CodeRequested` with a new code and attempt counter. `Completed`
//! is terminal; a finished flow row is deleted rather than reused.

use lingkod_db::entities::verification_flow::FlowState;

/// Event driving a verification flow forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// A (re-)request for a one-time code.
    RequestCode,
    /// A correct code was supplied.
    VerifyCode,
    /// The final step (account creation or password change) succeeded.
    Complete,
}

/// Compute the next state for an event, or `None` if the event is not
/// allowed in the current state.
#[must_use]
pub const fn transition(state: FlowState, event: FlowEvent) -> Option<FlowState> {
    match (state, event) {
        (FlowState::CodeRequested | FlowState::CodeVerified, FlowEvent::RequestCode) => {
            Some(FlowState::CodeRequested)
        }
        (FlowState::CodeRequested, FlowEvent::VerifyCode) => Some(FlowState::CodeVerified),
        (FlowState::CodeVerified, FlowEvent::Complete) => Some(FlowState::Completed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [FlowState; 3] = [
        FlowState::CodeRequested,
        FlowState::CodeVerified,
        FlowState::Completed,
    ];

    const ALL_EVENTS: [FlowEvent; 3] = [
        FlowEvent::RequestCode,
        FlowEvent::VerifyCode,
        FlowEvent::Complete,
    ];

    #[test]
    fn test_happy_path() {
        let s = transition(FlowState::CodeRequested, FlowEvent::VerifyCode).unwrap();
        assert_eq!(s, FlowState::CodeVerified);
        let s = transition(s, FlowEvent::Complete).unwrap();
        assert_eq!(s, FlowState::Completed);
    }

    #[test]
    fn test_resend_resets_to_code_requested() {
        assert_eq!(
            transition(FlowState::CodeRequested, FlowEvent::RequestCode),
            Some(FlowState::CodeRequested)
        );
        assert_eq!(
            transition(FlowState::CodeVerified, FlowEvent::RequestCode),
            Some(FlowState::CodeRequested)
        );
    }

    #[test]
    fn test_completed_is_terminal() {
        for event in ALL_EVENTS {
            assert_eq!(transition(FlowState::Completed, event), None);
        }
    }

    #[test]
    fn test_cannot_skip_verification() {
        assert_eq!(transition(FlowState::CodeRequested, FlowEvent::Complete), None);
    }

    #[test]
    fn test_cannot_verify_twice() {
        assert_eq!(transition(FlowState::CodeVerified, FlowEvent::VerifyCode), None);
    }

    #[test]
    fn test_every_transition_lands_in_a_known_state() {
        for state in ALL_STATES {
            for event in ALL_EVENTS {
                if let Some(next) = transition(state, event) {
                    assert!(ALL_STATES.contains(&next));
                }
            }
        }
    }
}
