//! HTTP routes for change request endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_proposed_solution, create_activation, create_scope, create_stage_gate,
    delete_change_request, get_change_request, list_changes_by_change_request,
    list_changes_by_wbs_number, review_change_request, ChangeRequestHandlers,
};

/// Creates the change request router.
///
/// Routes:
/// - `POST /change-requests/scope` - Submit a scope change request
/// - `POST /change-requests/activation` - Submit an activation change request
/// - `POST /change-requests/stage-gate` - Submit a stage gate change request
/// - `GET /change-requests/:id` - Load a change request
/// - `DELETE /change-requests/:id` - Soft-delete a pending change request
/// - `POST /change-requests/:id/proposed-solutions` - Attach a proposed solution
/// - `POST /change-requests/:id/review` - Accept or deny
/// - `GET /change-requests/:id/changes` - Changes applied by a change request
/// - `GET /wbs/:wbs_number/changes` - Changes recorded against a WBS element
pub fn change_request_routes(handlers: ChangeRequestHandlers) -> Router {
    Router::new()
        .route("/change-requests/scope", post(create_scope))
        .route("/change-requests/activation", post(create_activation))
        .route("/change-requests/stage-gate", post(create_stage_gate))
        .route(
            "/change-requests/:id",
            get(get_change_request).delete(delete_change_request),
        )
        .route(
            "/change-requests/:id/proposed-solutions",
            post(add_proposed_solution),
        )
        .route("/change-requests/:id/review", post(review_change_request))
        .route(
            "/change-requests/:id/changes",
            get(list_changes_by_change_request),
        )
        .route("/wbs/:wbs_number/changes", get(list_changes_by_wbs_number))
        .with_state(handlers)
}
