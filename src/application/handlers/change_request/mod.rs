//! Change request command handlers.
//!
//! Creation (one handler per kind), proposed solutions, review, deletion and
//! the read-side queries.
//! The review handler owns the dependency graph propagation and the
//! per-project locks that serialize reviews.

mod add_proposed_solution;
mod create_activation;
mod create_scope;
mod create_stage_gate;
mod delete;
mod guards;
mod notify;
mod project_locks;
mod propagate;
mod queries;
mod review;

#[cfg(test)]
pub(crate) mod test_support;

pub use add_proposed_solution::{
    AddProposedSolutionCommand, AddProposedSolutionHandler, AddProposedSolutionResult,
};
pub use create_activation::{
    CreateActivationChangeRequestCommand, CreateActivationChangeRequestHandler,
};
pub use create_scope::{
    CreateChangeRequestResult, CreateScopeChangeRequestCommand, CreateScopeChangeRequestHandler,
    ProposedSolutionDraft,
};
pub use create_stage_gate::{
    CreateStageGateChangeRequestCommand, CreateStageGateChangeRequestHandler,
};
pub use delete::{DeleteChangeRequestCommand, DeleteChangeRequestHandler};
pub use project_locks::ProjectLocks;
pub use propagate::{Propagation, SchedulePropagator};
pub use queries::{
    ChangeHistoryHandler, ChangeHistoryQuery, GetChangeRequestHandler, GetChangeRequestQuery,
};
pub use review::{
    ReviewChangeRequestCommand, ReviewChangeRequestHandler, ReviewChangeRequestResult,
};
