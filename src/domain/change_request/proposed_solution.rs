//! Proposed solution: a quantified remedy attached to a scope change request.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProposedSolutionId, Timestamp, UserId, ValidationError};

/// A budget/timeline/scope proposal. Exactly one is approved per accepted
/// scope change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSolution {
    id: ProposedSolutionId,
    description: String,
    /// Budget impact in whole dollars.
    budget_impact: i64,
    /// Timeline impact in weeks.
    timeline_impact: i32,
    scope_impact: String,
    approved: bool,
    created_by: UserId,
    date_created: Timestamp,
}

impl ProposedSolution {
    /// Create a new, unapproved proposal.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the description is blank
    /// - `OutOfRange` if the budget or timeline impact is negative
    pub fn new(
        description: impl Into<String>,
        budget_impact: i64,
        timeline_impact: i32,
        scope_impact: impl Into<String>,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        if budget_impact < 0 {
            return Err(ValidationError::out_of_range(
                "budget_impact",
                0,
                i64::MAX,
                budget_impact,
            ));
        }
        if timeline_impact < 0 {
            return Err(ValidationError::out_of_range(
                "timeline_impact",
                0,
                i64::from(i32::MAX),
                i64::from(timeline_impact),
            ));
        }

        Ok(Self {
            id: ProposedSolutionId::new(),
            description,
            budget_impact,
            timeline_impact,
            scope_impact: scope_impact.into(),
            approved: false,
            created_by,
            date_created: Timestamp::now(),
        })
    }

    /// Reconstitute a proposal from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProposedSolutionId,
        description: String,
        budget_impact: i64,
        timeline_impact: i32,
        scope_impact: String,
        approved: bool,
        created_by: UserId,
        date_created: Timestamp,
    ) -> Self {
        Self {
            id,
            description,
            budget_impact,
            timeline_impact,
            scope_impact,
            approved,
            created_by,
            date_created,
        }
    }

    pub fn id(&self) -> &ProposedSolutionId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn budget_impact(&self) -> i64 {
        self.budget_impact
    }

    pub fn timeline_impact(&self) -> i32 {
        self.timeline_impact
    }

    pub fn scope_impact(&self) -> &str {
        &self.scope_impact
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn date_created(&self) -> &Timestamp {
        &self.date_created
    }

    pub(super) fn approve(&mut self) {
        self.approved = true;
    }
}
