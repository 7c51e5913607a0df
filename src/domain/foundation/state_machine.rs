//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions on entity lifecycle statuses.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for VersionStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (Draft, PendingReview) |
///             (PendingReview, Approved) |
///             // ... etc
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Draft => vec![PendingReview],
///             // ... etc
///         }
///     }
/// }
///
/// // Usage:
/// let new_status = current_status.transition_to(VersionStatus::Approved)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal three-state machine to exercise the trait defaults
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ReviewState {
        Open,
        Merged,
        Closed,
    }

    impl StateMachine for ReviewState {
        fn can_transition_to(&self, target: &Self) -> bool {
            use ReviewState::*;
            matches!((self, target), (Open, Merged) | (Open, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use ReviewState::*;
            match self {
                Open => vec![Merged, Closed],
                Merged => vec![],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let state = ReviewState::Open;
        let result = state.transition_to(ReviewState::Merged);
        assert_eq!(result, Ok(ReviewState::Merged));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let state = ReviewState::Merged;
        let result = state.transition_to(ReviewState::Open);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_matches_valid_transitions() {
        assert!(!ReviewState::Open.is_terminal());
        assert!(ReviewState::Merged.is_terminal());
        assert!(ReviewState::Closed.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in [ReviewState::Open, ReviewState::Merged, ReviewState::Closed] {
            for valid_target in state.valid_transitions() {
                assert!(
                    state.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    state,
                    valid_target
                );
            }
        }
    }
}
