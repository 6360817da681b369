//! HTTP handlers for change request endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::change_request::{
    AddProposedSolutionCommand, AddProposedSolutionHandler, ChangeHistoryHandler,
    ChangeHistoryQuery, CreateActivationChangeRequestCommand,
    CreateActivationChangeRequestHandler, CreateScopeChangeRequestCommand,
    CreateScopeChangeRequestHandler, CreateStageGateChangeRequestCommand,
    CreateStageGateChangeRequestHandler, DeleteChangeRequestCommand, DeleteChangeRequestHandler,
    GetChangeRequestHandler, GetChangeRequestQuery, ProjectLocks, ProposedSolutionDraft,
    ReviewChangeRequestCommand, ReviewChangeRequestHandler,
};
use crate::domain::change_request::ChangeRequestError;
use crate::domain::foundation::{
    AuthenticatedUser, ChangeRequestId, CommandMetadata, ProposedSolutionId, UserId,
    ValidationError,
};
use crate::domain::wbs::WbsNumber;
use crate::ports::{ChangeLogReader, ChangeRequestRepository, NotificationGateway, WbsRepository};

use super::dto::{
    ChangeRequestResponse, ChangeResponse, CreateActivationRequest, CreateScopeRequest,
    CreateStageGateRequest, ErrorResponse, ProposedSolutionCreatedResponse,
    ProposedSolutionRequest, ReviewRequest, ReviewResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChangeRequestHandlers {
    create_scope: Arc<CreateScopeChangeRequestHandler>,
    create_activation: Arc<CreateActivationChangeRequestHandler>,
    create_stage_gate: Arc<CreateStageGateChangeRequestHandler>,
    add_solution: Arc<AddProposedSolutionHandler>,
    review: Arc<ReviewChangeRequestHandler>,
    delete: Arc<DeleteChangeRequestHandler>,
    get: Arc<GetChangeRequestHandler>,
    history: Arc<ChangeHistoryHandler>,
    expose_internal_errors: bool,
}

impl ChangeRequestHandlers {
    /// Wires every change request handler over the same ports.
    pub fn new(
        change_requests: Arc<dyn ChangeRequestRepository>,
        wbs: Arc<dyn WbsRepository>,
        change_log: Arc<dyn ChangeLogReader>,
        notifier: Arc<dyn NotificationGateway>,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            create_scope: Arc::new(CreateScopeChangeRequestHandler::new(
                change_requests.clone(),
                wbs.clone(),
                notifier.clone(),
            )),
            create_activation: Arc::new(CreateActivationChangeRequestHandler::new(
                change_requests.clone(),
                wbs.clone(),
                notifier.clone(),
            )),
            create_stage_gate: Arc::new(CreateStageGateChangeRequestHandler::new(
                change_requests.clone(),
                wbs.clone(),
                notifier.clone(),
            )),
            add_solution: Arc::new(AddProposedSolutionHandler::new(change_requests.clone())),
            review: Arc::new(ReviewChangeRequestHandler::new(
                change_requests.clone(),
                wbs,
                notifier,
                locks,
            )),
            delete: Arc::new(DeleteChangeRequestHandler::new(change_requests.clone())),
            get: Arc::new(GetChangeRequestHandler::new(change_requests)),
            history: Arc::new(ChangeHistoryHandler::new(change_log)),
            expose_internal_errors: false,
        }
    }

    /// Expose infrastructure error messages in 500 responses.
    pub fn with_internal_errors_exposed(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    fn error(&self, error: ChangeRequestError) -> Response {
        handle_change_request_error(error, self.expose_internal_errors)
    }
}

fn metadata(user: AuthenticatedUser) -> CommandMetadata {
    CommandMetadata::new(user).via_http()
}

fn parse_wbs_number(raw: &str) -> Result<WbsNumber, ChangeRequestError> {
    Ok(raw.parse::<WbsNumber>()?)
}

fn parse_change_request_id(raw: &str) -> Result<ChangeRequestId, ChangeRequestError> {
    raw.parse()
        .map_err(|_| ChangeRequestError::from(ValidationError::invalid_format("id", "not a UUID")))
}

fn parse_user_id(raw: String, field: &str) -> Result<UserId, ChangeRequestError> {
    UserId::new(raw).map_err(|_| ChangeRequestError::validation(field, "must not be empty"))
}

fn drafts(solutions: Vec<ProposedSolutionRequest>) -> Vec<ProposedSolutionDraft> {
    solutions
        .into_iter()
        .map(|s| ProposedSolutionDraft {
            description: s.description,
            budget_impact: s.budget_impact,
            timeline_impact: s.timeline_impact,
            scope_impact: s.scope_impact,
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /change-requests/scope - Submit a scope change request
pub async fn create_scope(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateScopeRequest>,
) -> Response {
    let wbs_number = match parse_wbs_number(&req.wbs_number) {
        Ok(n) => n,
        Err(e) => return handlers.error(e),
    };
    let cmd = CreateScopeChangeRequestCommand {
        wbs_number,
        what: req.what,
        why: req.why,
        proposed_solutions: drafts(req.proposed_solutions),
    };

    match handlers.create_scope.handle(cmd, metadata(user)).await {
        Ok(result) => created(result.change_request.into()),
        Err(e) => handlers.error(e),
    }
}

/// POST /change-requests/activation - Submit an activation change request
pub async fn create_activation(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateActivationRequest>,
) -> Response {
    let cmd = match activation_command(req) {
        Ok(cmd) => cmd,
        Err(e) => return handlers.error(e),
    };

    match handlers.create_activation.handle(cmd, metadata(user)).await {
        Ok(result) => created(result.change_request.into()),
        Err(e) => handlers.error(e),
    }
}

fn activation_command(
    req: CreateActivationRequest,
) -> Result<CreateActivationChangeRequestCommand, ChangeRequestError> {
    Ok(CreateActivationChangeRequestCommand {
        wbs_number: parse_wbs_number(&req.wbs_number)?,
        project_lead: parse_user_id(req.project_lead, "project_lead")?,
        project_manager: parse_user_id(req.project_manager, "project_manager")?,
        start_date: req.start_date,
        confirm_details: req.confirm_details,
    })
}

/// POST /change-requests/stage-gate - Submit a stage gate change request
pub async fn create_stage_gate(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateStageGateRequest>,
) -> Response {
    let wbs_number = match parse_wbs_number(&req.wbs_number) {
        Ok(n) => n,
        Err(e) => return handlers.error(e),
    };
    let cmd = CreateStageGateChangeRequestCommand {
        wbs_number,
        leftover_budget: req.leftover_budget,
        confirm_done: req.confirm_done,
    };

    match handlers.create_stage_gate.handle(cmd, metadata(user)).await {
        Ok(result) => created(result.change_request.into()),
        Err(e) => handlers.error(e),
    }
}

/// GET /change-requests/:id - Load a change request
pub async fn get_change_request(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let change_request_id = match parse_change_request_id(&id) {
        Ok(id) => id,
        Err(e) => return handlers.error(e),
    };

    match handlers
        .get
        .handle(GetChangeRequestQuery { change_request_id })
        .await
    {
        Ok(cr) => {
            let response: ChangeRequestResponse = cr.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handlers.error(e),
    }
}

/// POST /change-requests/:id/proposed-solutions - Attach a proposed solution
pub async fn add_proposed_solution(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<ProposedSolutionRequest>,
) -> Response {
    let change_request_id = match parse_change_request_id(&id) {
        Ok(id) => id,
        Err(e) => return handlers.error(e),
    };
    let cmd = AddProposedSolutionCommand {
        change_request_id,
        description: req.description,
        budget_impact: req.budget_impact,
        timeline_impact: req.timeline_impact,
        scope_impact: req.scope_impact,
    };

    match handlers.add_solution.handle(cmd, metadata(user)).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(ProposedSolutionCreatedResponse {
                proposed_solution_id: result.proposed_solution_id.to_string(),
            }),
        )
            .into_response(),
        Err(e) => handlers.error(e),
    }
}

/// POST /change-requests/:id/review - Accept or deny a change request
pub async fn review_change_request(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Response {
    let cmd = match review_command(&id, req) {
        Ok(cmd) => cmd,
        Err(e) => return handlers.error(e),
    };

    match handlers.review.handle(cmd, metadata(user)).await {
        Ok(result) => {
            let response = ReviewResponse {
                change_request: result.change_request.into(),
                changes: result.changes.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handlers.error(e),
    }
}

fn review_command(
    id: &str,
    req: ReviewRequest,
) -> Result<ReviewChangeRequestCommand, ChangeRequestError> {
    let proposed_solution_id = req
        .proposed_solution_id
        .map(|raw| {
            raw.parse::<ProposedSolutionId>().map_err(|_| {
                ChangeRequestError::validation("proposed_solution_id", "not a UUID")
            })
        })
        .transpose()?;

    Ok(ReviewChangeRequestCommand {
        change_request_id: parse_change_request_id(id)?,
        accepted: req.accepted,
        review_notes: req.review_notes,
        proposed_solution_id,
    })
}

/// DELETE /change-requests/:id - Soft-delete a pending change request
pub async fn delete_change_request(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let change_request_id = match parse_change_request_id(&id) {
        Ok(id) => id,
        Err(e) => return handlers.error(e),
    };

    match handlers
        .delete
        .handle(DeleteChangeRequestCommand { change_request_id }, metadata(user))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handlers.error(e),
    }
}

/// GET /change-requests/:id/changes - Changes applied by one change request
pub async fn list_changes_by_change_request(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let query = match parse_change_request_id(&id) {
        Ok(id) => ChangeHistoryQuery::ByChangeRequest(id),
        Err(e) => return handlers.error(e),
    };
    changes_response(&handlers, query).await
}

/// GET /wbs/:wbs_number/changes - Changes recorded against one WBS element
pub async fn list_changes_by_wbs_number(
    State(handlers): State<ChangeRequestHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(wbs_number): Path<String>,
) -> Response {
    let query = match parse_wbs_number(&wbs_number) {
        Ok(n) => ChangeHistoryQuery::ByWbsNumber(n),
        Err(e) => return handlers.error(e),
    };
    changes_response(&handlers, query).await
}

async fn changes_response(handlers: &ChangeRequestHandlers, query: ChangeHistoryQuery) -> Response {
    match handlers.history.handle(query).await {
        Ok(changes) => {
            let response: Vec<ChangeResponse> = changes.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handlers.error(e),
    }
}

fn created(response: ChangeRequestResponse) -> Response {
    (StatusCode::CREATED, Json(response)).into_response()
}

/// Maps change request errors to HTTP responses.
pub fn handle_change_request_error(error: ChangeRequestError, expose_internal: bool) -> Response {
    let status = match &error {
        ChangeRequestError::Forbidden(_) => StatusCode::FORBIDDEN,
        ChangeRequestError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChangeRequestError::Deleted { .. } | ChangeRequestError::AlreadyDeleted(_) => {
            StatusCode::GONE
        }
        ChangeRequestError::AlreadyReviewed(_) => StatusCode::CONFLICT,
        ChangeRequestError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        ChangeRequestError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "change request operation failed");
            let body = if expose_internal {
                ErrorResponse::internal(msg.clone())
            } else {
                ErrorResponse::internal("Internal server error")
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    (status, Json(ErrorResponse::from_error(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::change_request::Resource;

    #[test]
    fn errors_map_to_expected_status_codes() {
        let cases = vec![
            (ChangeRequestError::forbidden("nope"), StatusCode::FORBIDDEN),
            (
                ChangeRequestError::not_found(Resource::ChangeRequest, "x"),
                StatusCode::NOT_FOUND,
            ),
            (
                ChangeRequestError::deleted(Resource::WbsElement, "1.1.0"),
                StatusCode::GONE,
            ),
            (ChangeRequestError::already_deleted("x"), StatusCode::GONE),
            (ChangeRequestError::already_reviewed("x"), StatusCode::CONFLICT),
            (
                ChangeRequestError::validation("what", "empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ChangeRequestError::infrastructure("db down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_change_request_error(error, false).status(), expected);
        }
    }

    #[test]
    fn malformed_identifiers_are_validation_errors() {
        assert!(matches!(
            parse_wbs_number("1.x.0"),
            Err(ChangeRequestError::ValidationFailed { .. })
        ));
        assert!(matches!(
            parse_change_request_id("not-a-uuid"),
            Err(ChangeRequestError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn review_command_rejects_malformed_solution_id() {
        let req = ReviewRequest {
            accepted: true,
            review_notes: String::new(),
            proposed_solution_id: Some("nope".to_string()),
        };

        let result = review_command(&ChangeRequestId::new().to_string(), req);

        assert!(matches!(
            result,
            Err(ChangeRequestError::ValidationFailed { field, .. })
                if field == "proposed_solution_id"
        ));
    }
}
