//! Change request domain module.
//!
//! Change requests are proposals to mutate project or work package state.
//! They come in three kinds, modelled as one tagged payload:
//!
//! - `Standard` - scope change with proposed solutions (budget/timeline)
//! - `Activation` - moves an element from Inactive to Active
//! - `StageGate` - marks a work package Complete once its checklists are done

mod aggregate;
mod details;
mod errors;
mod proposed_solution;

pub use aggregate::{ChangeRequest, ReviewState};
pub use details::{
    ActivationDetail, ChangeRequestDetails, ChangeRequestKind, ReasonCode, ScopeDetail,
    ScopeReason, StageGateDetail,
};
pub use errors::{ChangeRequestError, Resource};
pub use proposed_solution::ProposedSolution;
