//! HTTP adapter for change request endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChangeRequestResponse, ChangeResponse, CreateActivationRequest, CreateScopeRequest,
    CreateStageGateRequest, ErrorResponse, ProposedSolutionCreatedResponse,
    ProposedSolutionRequest, ReviewRequest, ReviewResponse,
};
pub use handlers::{handle_change_request_error, ChangeRequestHandlers};
pub use routes::change_request_routes;
