//! Transition rules for status enums.

use std::fmt;

use super::ValidationError;

/// A status enum with a fixed successor table.
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Display + 'static {
    /// Statuses reachable in one step from `self`.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Returns `target` if the move is allowed.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on `status` naming both ends of the rejected move
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(ValidationError::invalid_format(
            "status",
            format!("cannot move from {} to {}", self, target),
        ))
    }

    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}
