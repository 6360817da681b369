//! WbsStatus enum for tracking the lifecycle of projects and work packages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of a WBS element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WbsStatus {
    #[default]
    Inactive,
    Active,
    Complete,
}

/// Inactive elements can be activated or gated straight to complete;
/// active ones only completed.
impl StateMachine for WbsStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            WbsStatus::Inactive => &[WbsStatus::Active, WbsStatus::Complete],
            WbsStatus::Active => &[WbsStatus::Complete],
            WbsStatus::Complete => &[],
        }
    }
}

impl fmt::Display for WbsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WbsStatus::Inactive => "INACTIVE",
            WbsStatus::Active => "ACTIVE",
            WbsStatus::Complete => "COMPLETE",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inactive() {
        assert_eq!(WbsStatus::default(), WbsStatus::Inactive);
    }

    #[test]
    fn inactive_can_be_activated() {
        assert_eq!(
            WbsStatus::Inactive.transition_to(WbsStatus::Active),
            Ok(WbsStatus::Active)
        );
    }

    #[test]
    fn active_cannot_be_reactivated() {
        assert!(WbsStatus::Active.transition_to(WbsStatus::Active).is_err());
    }

    #[test]
    fn complete_is_terminal() {
        assert!(WbsStatus::Complete.is_terminal());
        assert!(!WbsStatus::Complete.can_transition_to(&WbsStatus::Active));
    }

    #[test]
    fn displays_as_screaming_case() {
        assert_eq!(WbsStatus::Inactive.to_string(), "INACTIVE");
        assert_eq!(WbsStatus::Complete.to_string(), "COMPLETE");
    }

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&WbsStatus::Active).unwrap(), "\"ACTIVE\"");
    }
}
