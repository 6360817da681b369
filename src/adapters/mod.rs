//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - in-process store for tests and database-less runs
//! - `postgres` - PostgreSQL repositories
//! - `notifications` - Slack, no-op and recording gateways
//! - `auth` - bearer token validation
//! - `http` - axum routes and middleware

pub mod auth;
pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;
