//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the ports.

pub mod change_request;

pub use change_request::{
    AddProposedSolutionCommand, AddProposedSolutionHandler, AddProposedSolutionResult,
    ChangeHistoryHandler, ChangeHistoryQuery,
    CreateActivationChangeRequestCommand, CreateActivationChangeRequestHandler,
    CreateChangeRequestResult, CreateScopeChangeRequestCommand, CreateScopeChangeRequestHandler,
    CreateStageGateChangeRequestCommand, CreateStageGateChangeRequestHandler,
    DeleteChangeRequestCommand, DeleteChangeRequestHandler, GetChangeRequestHandler,
    GetChangeRequestQuery, ProjectLocks, Propagation,
    ProposedSolutionDraft, ReviewChangeRequestCommand, ReviewChangeRequestHandler,
    ReviewChangeRequestResult, SchedulePropagator,
};
