//! PostgreSQL pool settings.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// `database` section. Without a URL the in-memory store is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            min_connections: 2,
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Blank values count as unset.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let is_postgres = |url: &str| {
            url.starts_with("postgres://") || url.starts_with("postgresql://")
        };
        if self.url().is_some_and(|url| !is_postgres(url)) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn no_url_means_in_memory() {
        assert!(DatabaseConfig::default().url().is_none());
        assert!(with_url("   ").url().is_none());
        assert!(DatabaseConfig::default().validate().is_ok());
    }

    #[test]
    fn accepts_both_postgres_schemes() {
        assert!(with_url("postgres://review@db/wbs").validate().is_ok());
        assert!(with_url(" postgresql://review@db/wbs ").validate().is_ok());
        assert_eq!(
            with_url("mysql://review@db/wbs").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn pool_bounds_are_checked() {
        let inverted = DatabaseConfig {
            min_connections: 20,
            max_connections: 10,
            ..Default::default()
        };
        assert_eq!(inverted.validate(), Err(ValidationError::InvalidPoolSize));

        let empty = DatabaseConfig {
            min_connections: 0,
            max_connections: 0,
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ValidationError::InvalidPoolSize));

        let huge = DatabaseConfig {
            max_connections: MAX_POOL_SIZE + 1,
            ..Default::default()
        };
        assert_eq!(huge.validate(), Err(ValidationError::PoolSizeTooLarge));
    }
}
