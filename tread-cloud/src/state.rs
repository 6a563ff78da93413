//! Application state

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use sqlx::postgres::PgPoolOptions;
use tread_analytics::AnalyticsConfig;

use crate::config::Config;
use crate::db::{AnalyticsStore, PgStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, cloned into every request
#[derive(Clone)]
pub struct AppState {
    /// Source of orders, items, products and customers
    pub store: Arc<dyn AnalyticsStore>,
    /// Secret for admin JWT validation
    pub jwt_secret: String,
    /// Store timezone defining report days
    pub timezone: Tz,
    /// Per-fetch timeout
    pub query_timeout: Duration,
    pub analytics: Arc<AnalyticsConfig>,
}

impl AppState {
    /// Connect to PostgreSQL and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.query_timeout)
            .connect(&config.database_url)
            .await?;
        tracing::info!(
            max_connections = config.db_max_connections,
            "PostgreSQL pool ready"
        );

        Ok(Self::with_store(Arc::new(PgStore::new(pool)), config))
    }

    pub fn with_store(store: Arc<dyn AnalyticsStore>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            timezone: config.store_timezone,
            query_timeout: config.query_timeout,
            analytics: Arc::new(config.analytics.clone()),
        }
    }
}
