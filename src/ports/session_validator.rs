//! Identity and role provider boundary.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Resolves a bearer token to the acting user and their organisation role.
///
/// Unknown tokens are `AuthError::InvalidToken`. Providers that issue
/// expiring tokens report `TokenExpired`; an unreachable provider reports
/// `ServiceUnavailable` so the HTTP layer can answer 503 instead of 401.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` arrives without its `Bearer ` prefix.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
