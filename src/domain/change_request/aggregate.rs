//! Change request aggregate.
//!
//! A change request is submitted pending, reviewed exactly once by a
//! distinct reviewer, and may be soft-deleted only while still pending.
//!
//! # Ownership
//!
//! A change request references its target by `WbsNumber`; it never owns
//! the WBS entities it mutates. The effects of a review are computed by
//! the application layer and committed together with the reviewed state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChangeRequestId, Lifecycle, ProposedSolutionId, Timestamp, UserId,
};
use crate::domain::wbs::WbsNumber;

use super::{
    ActivationDetail, ChangeRequestDetails, ChangeRequestError, ChangeRequestKind,
    ProposedSolution, Resource, ScopeDetail, StageGateDetail,
};

/// Review state of a change request: pending, or decided once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewState {
    #[default]
    Pending,
    Reviewed {
        reviewer: UserId,
        accepted: bool,
        review_notes: String,
        date_reviewed: Timestamp,
    },
}

impl ReviewState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewState::Pending)
    }

    /// Tri-state acceptance: `None` while pending.
    pub fn accepted(&self) -> Option<bool> {
        match self {
            ReviewState::Pending => None,
            ReviewState::Reviewed { accepted, .. } => Some(*accepted),
        }
    }
}

/// Change request aggregate.
///
/// # Invariants
///
/// - `review` moves from `Pending` to `Reviewed` exactly once
/// - the reviewer is never the submitter
/// - deletion is only possible while pending
/// - `details` is the only source of the change request's kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    id: ChangeRequestId,
    submitter: UserId,
    wbs_number: WbsNumber,
    date_submitted: Timestamp,
    review: ReviewState,
    lifecycle: Lifecycle,
    details: ChangeRequestDetails,
}

impl ChangeRequest {
    /// Create a new pending change request.
    pub fn new(submitter: UserId, wbs_number: WbsNumber, details: ChangeRequestDetails) -> Self {
        Self {
            id: ChangeRequestId::new(),
            submitter,
            wbs_number,
            date_submitted: Timestamp::now(),
            review: ReviewState::Pending,
            lifecycle: Lifecycle::Active,
            details,
        }
    }

    /// Reconstitute a change request from persistence (no validation).
    pub fn reconstitute(
        id: ChangeRequestId,
        submitter: UserId,
        wbs_number: WbsNumber,
        date_submitted: Timestamp,
        review: ReviewState,
        lifecycle: Lifecycle,
        details: ChangeRequestDetails,
    ) -> Self {
        Self {
            id,
            submitter,
            wbs_number,
            date_submitted,
            review,
            lifecycle,
            details,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ChangeRequestId {
        &self.id
    }

    pub fn submitter(&self) -> &UserId {
        &self.submitter
    }

    pub fn wbs_number(&self) -> &WbsNumber {
        &self.wbs_number
    }

    pub fn date_submitted(&self) -> &Timestamp {
        &self.date_submitted
    }

    pub fn review(&self) -> &ReviewState {
        &self.review
    }

    pub fn accepted(&self) -> Option<bool> {
        self.review.accepted()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn details(&self) -> &ChangeRequestDetails {
        &self.details
    }

    pub fn kind(&self) -> ChangeRequestKind {
        self.details.kind()
    }

    pub fn scope_detail(&self) -> Option<&ScopeDetail> {
        match &self.details {
            ChangeRequestDetails::Standard(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn activation_detail(&self) -> Option<&ActivationDetail> {
        match &self.details {
            ChangeRequestDetails::Activation(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn stage_gate_detail(&self) -> Option<&StageGateDetail> {
        match &self.details {
            ChangeRequestDetails::StageGate(detail) => Some(detail),
            _ => None,
        }
    }

    /// Looks up a proposed solution on a scope change request.
    pub fn proposed_solution(&self, id: &ProposedSolutionId) -> Option<&ProposedSolution> {
        self.scope_detail()?
            .proposed_solutions
            .iter()
            .find(|s| s.id() == id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guards
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that the change request is still open for changes.
    ///
    /// # Errors
    ///
    /// - `Deleted` if soft-deleted
    /// - `AlreadyReviewed` if a decision has been recorded
    pub fn ensure_pending(&self) -> Result<(), ChangeRequestError> {
        if self.lifecycle.is_deleted() {
            return Err(ChangeRequestError::deleted(Resource::ChangeRequest, self.id));
        }
        if !self.review.is_pending() {
            return Err(ChangeRequestError::already_reviewed(self.id));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the review decision.
    ///
    /// # Errors
    ///
    /// - `Deleted` / `AlreadyReviewed` per [`Self::ensure_pending`]
    /// - `Forbidden` if the reviewer submitted this change request
    pub fn record_review(
        &mut self,
        reviewer: UserId,
        accepted: bool,
        review_notes: impl Into<String>,
    ) -> Result<(), ChangeRequestError> {
        self.ensure_pending()?;
        if reviewer == self.submitter {
            return Err(ChangeRequestError::forbidden(
                "reviewers cannot review their own change request",
            ));
        }

        self.review = ReviewState::Reviewed {
            reviewer,
            accepted,
            review_notes: review_notes.into().trim().to_string(),
            date_reviewed: Timestamp::now(),
        };
        Ok(())
    }

    /// Attach another proposed solution to a pending scope change request.
    ///
    /// # Errors
    ///
    /// - `Deleted` / `AlreadyReviewed` per [`Self::ensure_pending`]
    /// - `ValidationFailed` if this is not a scope change request
    pub fn add_proposed_solution(
        &mut self,
        solution: ProposedSolution,
    ) -> Result<ProposedSolutionId, ChangeRequestError> {
        self.ensure_pending()?;
        let kind = self.kind();
        match &mut self.details {
            ChangeRequestDetails::Standard(detail) => {
                let id = *solution.id();
                detail.proposed_solutions.push(solution);
                Ok(id)
            }
            _ => Err(ChangeRequestError::validation(
                "type",
                format!("{} change requests do not take proposed solutions", kind),
            )),
        }
    }

    /// Mark one proposed solution approved and return it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no proposed solution with that id belongs to this change request
    pub fn approve_solution(
        &mut self,
        id: &ProposedSolutionId,
    ) -> Result<ProposedSolution, ChangeRequestError> {
        self.details
            .approve_solution(id)
            .cloned()
            .ok_or_else(|| ChangeRequestError::not_found(Resource::ProposedSolution, id))
    }

    pub fn approved_solution(&self) -> Option<&ProposedSolution> {
        self.details.approved_solution()
    }

    /// Take over the decision recorded on `reviewed`, an earlier-loaded copy
    /// of this change request, keeping proposals added to this copy since.
    ///
    /// # Errors
    ///
    /// - `Deleted` / `AlreadyReviewed` per [`Self::ensure_pending`]
    /// - `ValidationFailed` if `reviewed` is another change request or carries no decision
    /// - `NotFound` if its approved solution is missing here
    pub fn adopt_review(&mut self, reviewed: &ChangeRequest) -> Result<(), ChangeRequestError> {
        self.ensure_pending()?;
        if reviewed.id != self.id || reviewed.review.is_pending() {
            return Err(ChangeRequestError::validation(
                "accepted",
                "no review decision to adopt for this change request",
            ));
        }
        if let Some(solution) = reviewed.approved_solution() {
            self.approve_solution(solution.id())?;
        }
        self.review = reviewed.review.clone();
        Ok(())
    }

    /// Soft-delete the change request.
    ///
    /// # Errors
    ///
    /// - `AlreadyDeleted` if already soft-deleted
    /// - `ValidationFailed` if it has already been reviewed
    pub fn delete(&mut self, by: UserId) -> Result<(), ChangeRequestError> {
        if self.lifecycle.is_deleted() {
            return Err(ChangeRequestError::already_deleted(self.id));
        }
        if !self.review.is_pending() {
            return Err(ChangeRequestError::validation(
                "accepted",
                "cannot delete a reviewed change request",
            ));
        }
        self.lifecycle = Lifecycle::deleted_now(Some(by));
        Ok(())
    }
}
