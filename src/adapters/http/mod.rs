//! HTTP adapters - REST API implementations.

pub mod change_request;
pub mod middleware;

pub use change_request::{change_request_routes, ChangeRequestHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
