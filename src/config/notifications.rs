//! Notification configuration (Slack)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Slack notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Master switch; notifications are also off outside production
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Slack bot token (xoxb-...)
    #[serde(default)]
    pub slack_bot_token: Option<SecretString>,

    /// Base URL for the Slack Web API
    #[serde(default = "default_api_base_url")]
    pub slack_api_base_url: String,
}

impl NotificationConfig {
    /// Returns true if a non-empty bot token is configured.
    pub fn has_token(&self) -> bool {
        self.slack_bot_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().trim().is_empty())
    }

    /// Validate notification configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if let Some(token) = &self.slack_bot_token {
            let token = token.expose_secret();
            if !token.is_empty() && !token.starts_with("xox") {
                return Err(ValidationError::InvalidSlackToken);
            }
        }
        if *environment == Environment::Production
            && self.enabled
            && !self.slack_api_base_url.starts_with("https://")
        {
            return Err(ValidationError::NotificationUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            slack_bot_token: None,
            slack_api_base_url: default_api_base_url(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}
