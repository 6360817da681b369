//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, roles, lifecycle, errors)
//! - `wbs` - Work breakdown structure: elements, projects, work packages
//! - `change_request` - Change request aggregate and its typed payloads
//! - `change_log` - Immutable audit records of applied changes

pub mod change_log;
pub mod change_request;
pub mod foundation;
pub mod wbs;
