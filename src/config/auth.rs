//! Authentication configuration
//!
//! Identity is resolved by an external provider in front of this service.
//! The service itself only maps opaque bearer tokens to users and roles,
//! configured as `token=user_id:ROLE` entries separated by commas.

use serde::Deserialize;

use crate::domain::foundation::Role;

use super::error::ValidationError;
use super::server::Environment;

/// One configured bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// `token=user_id:ROLE` entries, comma-separated
    #[serde(default)]
    pub static_tokens: Option<String>,
}

impl AuthConfig {
    /// Parse the configured token entries.
    pub fn tokens(&self) -> Result<Vec<StaticToken>, ValidationError> {
        let Some(raw) = self.static_tokens.as_deref() else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect()
    }

    /// Validate authentication configuration
    ///
    /// In production, every token must be at least 16 characters.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let tokens = self.tokens()?;
        if *environment == Environment::Production && tokens.iter().any(|t| t.token.len() < 16) {
            return Err(ValidationError::StaticTokenTooShort);
        }
        Ok(())
    }
}

fn parse_entry(entry: &str) -> Result<StaticToken, ValidationError> {
    let invalid = || ValidationError::InvalidStaticToken(entry.to_string());

    let (token, identity) = entry.split_once('=').ok_or_else(invalid)?;
    let (user_id, role) = identity.split_once(':').ok_or_else(invalid)?;
    let role: Role = serde_json::from_value(serde_json::Value::String(role.trim().to_uppercase()))
        .map_err(|_| invalid())?;

    if token.trim().is_empty() || user_id.trim().is_empty() {
        return Err(invalid());
    }

    Ok(StaticToken {
        token: token.trim().to_string(),
        user_id: user_id.trim().to_string(),
        role,
    })
}
