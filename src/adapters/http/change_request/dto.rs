//! HTTP DTOs for change request endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::change_log::Change;
use crate::domain::change_request::{
    ChangeRequest, ChangeRequestDetails, ChangeRequestError, ChangeRequestKind, ReviewState,
    ScopeReason,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A proposed solution as submitted over HTTP.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposedSolutionRequest {
    pub description: String,
    pub budget_impact: i64,
    pub timeline_impact: i32,
    #[serde(default)]
    pub scope_impact: String,
}

/// Request to submit a scope change request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScopeRequest {
    pub wbs_number: String,
    pub what: String,
    pub why: Vec<ScopeReason>,
    #[serde(default)]
    pub proposed_solutions: Vec<ProposedSolutionRequest>,
}

/// Request to submit an activation change request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivationRequest {
    pub wbs_number: String,
    pub project_lead: String,
    pub project_manager: String,
    pub start_date: NaiveDate,
    pub confirm_details: bool,
}

/// Request to submit a stage gate change request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStageGateRequest {
    pub wbs_number: String,
    pub leftover_budget: i64,
    pub confirm_done: bool,
}

/// Request to review a change request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub accepted: bool,
    #[serde(default)]
    pub review_notes: String,
    #[serde(default)]
    pub proposed_solution_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Change request view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRequestResponse {
    pub id: String,
    pub kind: ChangeRequestKind,
    pub wbs_number: String,
    pub submitter: String,
    pub date_submitted: String,
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_reviewed: Option<String>,
    pub details: ChangeRequestDetails,
}

impl From<ChangeRequest> for ChangeRequestResponse {
    fn from(cr: ChangeRequest) -> Self {
        let (reviewer, review_notes, date_reviewed) = match cr.review() {
            ReviewState::Pending => (None, None, None),
            ReviewState::Reviewed {
                reviewer,
                review_notes,
                date_reviewed,
                ..
            } => (
                Some(reviewer.to_string()),
                Some(review_notes.clone()),
                Some(date_reviewed.as_datetime().to_rfc3339()),
            ),
        };

        Self {
            id: cr.id().to_string(),
            kind: cr.kind(),
            wbs_number: cr.wbs_number().to_string(),
            submitter: cr.submitter().to_string(),
            date_submitted: cr.date_submitted().as_datetime().to_rfc3339(),
            accepted: cr.accepted(),
            reviewer,
            review_notes,
            date_reviewed,
            details: cr.details().clone(),
        }
    }
}

/// One change log entry.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeResponse {
    pub id: String,
    pub change_request_id: String,
    pub implementer: String,
    pub wbs_number: String,
    pub detail: String,
    pub date_implemented: String,
}

impl From<Change> for ChangeResponse {
    fn from(change: Change) -> Self {
        Self {
            id: change.id().to_string(),
            change_request_id: change.change_request_id().to_string(),
            implementer: change.implementer().to_string(),
            wbs_number: change.wbs_number().to_string(),
            detail: change.detail().to_string(),
            date_implemented: change.date_implemented().as_datetime().to_rfc3339(),
        }
    }
}

/// Outcome of a review: the finalized request and every change it applied.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub change_request: ChangeRequestResponse,
    pub changes: Vec<ChangeResponse>,
}

/// Response for a newly attached proposed solution.
#[derive(Debug, Clone, Serialize)]
pub struct ProposedSolutionCreatedResponse {
    pub proposed_solution_id: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Carries the error's code; validation failures also name the field.
    pub fn from_error(error: &ChangeRequestError) -> Self {
        let details = match error {
            ChangeRequestError::ValidationFailed { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        };
        Self {
            code: error.code().to_string(),
            message: error.message(),
            details,
        }
    }
}
