//! Slack notification gateway.
//!
//! Posts change request notices with `chat.postMessage`. Team notices go to
//! the team's channel; reviewed notices are sent as direct messages, using
//! the submitter's user id as the Slack handle.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SlackConfig::new(bot_token);
//! let gateway = SlackNotificationGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChangeRequestId, DomainError, ErrorCode, UserId};
use crate::ports::{NotificationGateway, NotificationTarget};

/// Slack API configuration.
#[derive(Clone)]
pub struct SlackConfig {
    /// Bot token (xoxb-...).
    bot_token: SecretString,

    /// Base URL for the Slack Web API (default: https://slack.com/api).
    api_base_url: String,
}

impl SlackConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into()),
            api_base_url: "https://slack.com/api".to_string(),
        }
    }

    /// Create from an already-wrapped secret.
    pub fn from_secret(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            api_base_url: "https://slack.com/api".to_string(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack implementation of the notification gateway.
pub struct SlackNotificationGateway {
    config: SlackConfig,
    http_client: reqwest::Client,
}

impl SlackNotificationGateway {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), DomainError> {
        let url = format!("{}/chat.postMessage", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.bot_token.expose_secret())
            .json(&PostMessageRequest { channel, text })
            .send()
            .await
            .map_err(|e| notification_error(format!("Slack request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(notification_error(format!(
                "Slack returned HTTP {}",
                response.status()
            )));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| notification_error(format!("Invalid Slack response: {}", e)))?;

        if !body.ok {
            return Err(notification_error(format!(
                "Slack rejected message: {}",
                body.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }
        Ok(())
    }
}

fn notification_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::NotificationFailed, message)
}

/// Text of a creation notice.
fn created_text(
    message: &str,
    change_request_id: &ChangeRequestId,
    budget_impact: Option<i64>,
) -> String {
    match budget_impact {
        Some(impact) if impact > 0 => format!(
            "{} (CR {}, requested budget impact ${})",
            message, change_request_id, impact
        ),
        _ => format!("{} (CR {})", message, change_request_id),
    }
}

#[async_trait]
impl NotificationGateway for SlackNotificationGateway {
    async fn notify_created(
        &self,
        target: &NotificationTarget,
        message: &str,
        change_request_id: &ChangeRequestId,
        budget_impact: Option<i64>,
    ) -> Result<(), DomainError> {
        let channel = match target {
            NotificationTarget::Team(team) => match &team.channel_id {
                Some(channel) => channel.as_str(),
                None => {
                    tracing::debug!(team = %team.name, "Team has no channel, skipping notice");
                    return Ok(());
                }
            },
            NotificationTarget::User(user) => user.as_str(),
        };

        let text = created_text(message, change_request_id, budget_impact);
        self.post_message(channel, &text).await?;
        tracing::info!(cr_id = %change_request_id, channel, "Posted change request notice");
        Ok(())
    }

    async fn notify_reviewed(
        &self,
        user: &UserId,
        change_request_id: &ChangeRequestId,
    ) -> Result<(), DomainError> {
        let text = format!("Your change request {} has been reviewed!", change_request_id);
        self.post_message(user.as_str(), &text).await
    }
}
