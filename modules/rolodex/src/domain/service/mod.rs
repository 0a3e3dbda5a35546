//! Domain service: all business rules live here, behind plain model types.
//! Handlers translate HTTP to these calls and map errors to responses.

mod admin;
mod auth;
mod contacts;
mod events;
mod export;
mod follow_ups;
mod profile;
mod tags;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::cache::{Cache, NoopCache};
use crate::domain::error::DomainError;

/// Settings the service needs beyond its connections.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// Base URL used in shared profile links and vCards.
    pub public_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_days: 30,
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

pub struct Service {
    db: DatabaseConnection,
    cache: Arc<dyn Cache>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self {
            db,
            cache: Arc::new(NoopCache),
            config,
        }
    }

    pub fn with_cache(db: DatabaseConnection, cache: Arc<dyn Cache>, config: ServiceConfig) -> Self {
        Self { db, cache, config }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Liveness probe: confirms the database answers.
    pub async fn health(&self) -> Result<(), DomainError> {
        self.db.ping().await?;
        Ok(())
    }
}

/// Treats whitespace-only input as empty; used wherever a blank string
/// clears an optional field.
pub(crate) fn none_if_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_clear() {
        assert_eq!(none_if_blank("".into()), None);
        assert_eq!(none_if_blank("   ".into()), None);
        assert_eq!(none_if_blank(" x ".into()), Some("x".into()));
    }
}
