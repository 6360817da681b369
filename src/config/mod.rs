//! Runtime configuration for the review service.
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `WBS_REVIEW` prefix and nested values
//! use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use wbs_review::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod logging;
mod notifications;
mod server;

pub use auth::{AuthConfig, StaticToken};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use notifications::NotificationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Every configuration section, each optional with defaults.
///
/// Every section has defaults, so an empty environment yields a development
/// server backed by the in-memory store with notifications disabled.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Listener, deployment environment and request limits.
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; absent means the in-memory store.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Chat notifications (Slack)
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Bearer token mapping
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `.env` and then `WBS_REVIEW__*` environment variables.
    ///
    /// # Environment Variable Format
    ///
    /// - `WBS_REVIEW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WBS_REVIEW__DATABASE__URL=...` -> `database.url = ...`
    /// - `WBS_REVIEW__NOTIFICATIONS__SLACK_BOT_TOKEN=xoxb-...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WBS_REVIEW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic checks that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = &self.server.environment;
        self.server.validate()?;
        self.logging.validate()?;
        self.database.validate()?;
        self.notifications.validate(environment)?;
        self.auth.validate(environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Chat notifications are sent only from production with a token configured.
    pub fn notifications_enabled(&self) -> bool {
        self.is_production() && self.notifications.enabled && self.notifications.has_token()
    }
}
