//! Type-specific change request payloads.
//!
//! A change request carries exactly one of these, selected by its kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ProposedSolutionId, UserId, ValidationError};

use super::ProposedSolution;

/// Discriminant of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestKind {
    /// Scope change: budget, timeline and scope proposals.
    Standard,
    Activation,
    StageGate,
}

impl fmt::Display for ChangeRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeRequestKind::Standard => "STANDARD",
            ChangeRequestKind::Activation => "ACTIVATION",
            ChangeRequestKind::StageGate => "STAGE_GATE",
        };
        write!(f, "{}", s)
    }
}

/// Why a scope change is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Estimation,
    School,
    Manufacturing,
    Rules,
    OtherProject,
    Design,
    Initialization,
    Competition,
    Maintenance,
    Other,
}

/// A reason code paired with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeReason {
    pub reason: ReasonCode,
    pub explain: String,
}

impl ScopeReason {
    pub fn new(reason: ReasonCode, explain: impl Into<String>) -> Self {
        Self {
            reason,
            explain: explain.into(),
        }
    }
}

/// Payload of a standard (scope) change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDetail {
    pub what: String,
    pub why: Vec<ScopeReason>,
    pub proposed_solutions: Vec<ProposedSolution>,
}

impl ScopeDetail {
    /// # Errors
    ///
    /// - `EmptyField` on `what` if blank
    /// - `EmptyField` on `why` if no reason is given
    pub fn new(
        what: impl Into<String>,
        why: Vec<ScopeReason>,
        proposed_solutions: Vec<ProposedSolution>,
    ) -> Result<Self, ValidationError> {
        let what = what.into();
        if what.trim().is_empty() {
            return Err(ValidationError::empty_field("what"));
        }
        if why.is_empty() {
            return Err(ValidationError::empty_field("why"));
        }
        Ok(Self {
            what,
            why,
            proposed_solutions,
        })
    }
}

/// Payload of an activation change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationDetail {
    pub project_lead: UserId,
    pub project_manager: UserId,
    pub start_date: NaiveDate,
    pub confirm_details: bool,
}

impl ActivationDetail {
    /// # Errors
    ///
    /// - `InvalidFormat` on `confirm_details` if the submitter did not confirm
    pub fn new(
        project_lead: UserId,
        project_manager: UserId,
        start_date: NaiveDate,
        confirm_details: bool,
    ) -> Result<Self, ValidationError> {
        if !confirm_details {
            return Err(ValidationError::invalid_format(
                "confirm_details",
                "activation details must be confirmed",
            ));
        }
        Ok(Self {
            project_lead,
            project_manager,
            start_date,
            confirm_details,
        })
    }
}

/// Payload of a stage gate change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageGateDetail {
    /// Unspent budget in whole dollars.
    pub leftover_budget: i64,
    pub confirm_done: bool,
}

impl StageGateDetail {
    /// # Errors
    ///
    /// - `InvalidFormat` on `confirm_done` if the submitter did not confirm
    /// - `OutOfRange` on `leftover_budget` if negative
    pub fn new(leftover_budget: i64, confirm_done: bool) -> Result<Self, ValidationError> {
        if !confirm_done {
            return Err(ValidationError::invalid_format(
                "confirm_done",
                "work must be confirmed done",
            ));
        }
        if leftover_budget < 0 {
            return Err(ValidationError::out_of_range(
                "leftover_budget",
                0,
                i64::MAX,
                leftover_budget,
            ));
        }
        Ok(Self {
            leftover_budget,
            confirm_done,
        })
    }
}

/// Exactly one type-specific payload per change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestDetails {
    Standard(ScopeDetail),
    Activation(ActivationDetail),
    StageGate(StageGateDetail),
}

impl ChangeRequestDetails {
    pub fn kind(&self) -> ChangeRequestKind {
        match self {
            ChangeRequestDetails::Standard(_) => ChangeRequestKind::Standard,
            ChangeRequestDetails::Activation(_) => ChangeRequestKind::Activation,
            ChangeRequestDetails::StageGate(_) => ChangeRequestKind::StageGate,
        }
    }

    /// The approved proposed solution of a scope payload, if any.
    pub fn approved_solution(&self) -> Option<&ProposedSolution> {
        match self {
            ChangeRequestDetails::Standard(detail) => {
                detail.proposed_solutions.iter().find(|s| s.is_approved())
            }
            _ => None,
        }
    }

    /// Mark the proposed solution `id` approved; `None` if there is no such proposal.
    pub fn approve_solution(&mut self, id: &ProposedSolutionId) -> Option<&ProposedSolution> {
        let ChangeRequestDetails::Standard(detail) = self else {
            return None;
        };
        let solution = detail.proposed_solutions.iter_mut().find(|s| s.id() == id)?;
        solution.approve();
        Some(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_detail_requires_what_and_why() {
        assert!(ScopeDetail::new("", vec![ScopeReason::new(ReasonCode::Design, "x")], vec![])
            .is_err());
        assert!(ScopeDetail::new("Add cooling", vec![], vec![]).is_err());
        assert!(ScopeDetail::new(
            "Add cooling",
            vec![ScopeReason::new(ReasonCode::Design, "overheats")],
            vec![]
        )
        .is_ok());
    }

    #[test]
    fn only_scope_payloads_approve_solutions() {
        let solution =
            ProposedSolution::new("Thicker tube", 10, 0, "", UserId::new("a").unwrap()).unwrap();
        let id = *solution.id();
        let mut scope = ChangeRequestDetails::Standard(
            ScopeDetail::new(
                "Stiffen frame",
                vec![ScopeReason::new(ReasonCode::Design, "flex")],
                vec![solution],
            )
            .unwrap(),
        );
        let mut gate = ChangeRequestDetails::StageGate(StageGateDetail::new(0, true).unwrap());

        assert!(scope.approved_solution().is_none());
        assert!(scope.approve_solution(&id).is_some());
        assert_eq!(scope.approved_solution().map(|s| *s.id()), Some(id));
        assert!(gate.approve_solution(&id).is_none());
    }

    #[test]
    fn activation_requires_confirmation() {
        let lead = UserId::new("lead").unwrap();
        let pm = UserId::new("pm").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert!(ActivationDetail::new(lead.clone(), pm.clone(), date, false).is_err());
        assert!(ActivationDetail::new(lead, pm, date, true).is_ok());
    }

    #[test]
    fn stage_gate_requires_confirmation_and_non_negative_budget() {
        assert!(StageGateDetail::new(10, false).is_err());
        assert!(StageGateDetail::new(-1, true).is_err());
        assert!(StageGateDetail::new(0, true).is_ok());
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let details = ChangeRequestDetails::StageGate(StageGateDetail::new(5, true).unwrap());
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["type"], "STAGE_GATE");
        assert_eq!(details.kind(), ChangeRequestKind::StageGate);
    }
}
