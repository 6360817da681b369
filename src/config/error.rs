//! Configuration loading and validation errors.

use thiserror::Error;

/// Failure to produce a usable `AppConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A loaded value that cannot be used as given.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    // server
    #[error("server host and port do not form a socket address")]
    InvalidAddress,
    #[error("server port must be non-zero")]
    InvalidPort,
    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,
    #[error("internal error details must not be exposed in production")]
    InternalErrorsExposed,

    // logging
    #[error("log filter does not parse: {0}")]
    InvalidLogFilter(String),

    // database
    #[error("database url must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,
    #[error("database max_connections must be positive and at least min_connections")]
    InvalidPoolSize,
    #[error("database pool may not exceed 100 connections")]
    PoolSizeTooLarge,

    // notifications
    #[error("{0} is required")]
    MissingRequired(&'static str),
    #[error("slack bot token must start with xox")]
    InvalidSlackToken,
    #[error("slack api url must use https in production")]
    NotificationUrlMustBeHttps,

    // auth
    #[error("static token entry {0:?} is not token=user_id:ROLE")]
    InvalidStaticToken(String),
    #[error("static tokens must be at least 16 characters in production")]
    StaticTokenTooShort,
}
