//! Bearer-token validator backed by a fixed token table.
//!
//! Used in development and tests, and in front of deployments where an
//! upstream gateway has already authenticated the caller.
//!
//! # Example
//!
//! ```ignore
//! use wbs_review::adapters::auth::StaticTokenValidator;
//! use wbs_review::domain::foundation::Role;
//!
//! let validator = StaticTokenValidator::new()
//!     .with_test_user("lead-token", "lead-1", Role::Leadership);
//!
//! let user = validator.validate("lead-token").await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::StaticToken;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId, ValidationError};
use crate::ports::SessionValidator;

/// Maps opaque tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, AuthenticatedUser>,
    force_error: Option<AuthError>,
}

impl StaticTokenValidator {
    /// Creates an empty validator that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validator from configured token entries.
    pub fn from_config(entries: &[StaticToken]) -> Result<Self, ValidationError> {
        entries.iter().try_fold(Self::new(), |validator, entry| {
            let user = AuthenticatedUser::new(UserId::new(&entry.user_id)?, entry.role, None);
            Ok(validator.with_user(&entry.token, user))
        })
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Adds a token for a user with the given id and role.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_test_user(
        self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        role: Role,
    ) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).expect("test user id must not be blank"),
            role,
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }

    /// Returns the number of registered tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl SessionValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }

        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
