//! Authentication and role types for the domain layer.
//!
//! These types represent the acting user as supplied by the identity
//! provider. They have **no external dependencies** - any provider can
//! populate them via the `SessionValidator` port.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Organisation role of a user, lowest privilege first.
///
/// The declaration order defines the privilege ordering used by the
/// authorization checks below.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Guest,
    Member,
    Leadership,
    Head,
    Admin,
    AppAdmin,
}

impl Role {
    /// Members and above may submit change requests and proposed solutions.
    pub fn can_submit(&self) -> bool {
        *self >= Role::Member
    }

    /// Leadership and above may review change requests.
    pub fn can_review(&self) -> bool {
        *self >= Role::Leadership
    }

    /// Admins may act on change requests they did not submit.
    pub fn is_admin(&self) -> bool {
        *self >= Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Guest => "GUEST",
            Role::Member => "MEMBER",
            Role::Leadership => "LEADERSHIP",
            Role::Head => "HEAD",
            Role::Admin => "ADMIN",
            Role::AppAdmin => "APP_ADMIN",
        };
        write!(f, "{}", s)
    }
}

/// Authenticated user resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// Organisation role used for authorization decisions.
    pub role: Role,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, role: Role, display_name: Option<String>) -> Self {
        Self {
            id,
            role,
            display_name,
        }
    }

    /// Returns the user's display name, or the user id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Why a bearer token did not resolve to a user.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown or malformed token.
    #[error("Invalid token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The identity provider could not be reached.
    #[error("Identity provider unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Provider outages; the token itself may still be good.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
