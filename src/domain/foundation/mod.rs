//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, roles, lifecycle and error types
//! that form the vocabulary of the change-control domain.

mod auth;
mod command;
mod errors;
mod ids;
mod lifecycle;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use command::{CommandMetadata, CommandSource};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChangeId, ChangeRequestId, ProposedSolutionId, TeamId, UserId};
pub use lifecycle::{Lifecycle, Lookup};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
