//! Server configuration

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use tread_analytics::AnalyticsConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Admin analytics server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for admin JWTs
    pub jwt_secret: String,
    /// Timezone that defines the store's calendar days
    pub store_timezone: Tz,
    /// Upper bound for each report's data fetch
    pub query_timeout: Duration,
    pub db_max_connections: u32,
    /// `LOG_FORMAT=json`
    pub log_json: bool,
    /// Directory for the rolling log file
    pub log_dir: Option<String>,
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret<F>(lookup: &F, name: &str, environment: &str) -> Result<String, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let mut analytics = AnalyticsConfig::default();
        let inventory = &mut analytics.inventory;
        inventory.lead_time_days =
            parse_or(&lookup, "INVENTORY_LEAD_TIME_DAYS", inventory.lead_time_days);
        inventory.safety_factor =
            parse_or(&lookup, "INVENTORY_SAFETY_FACTOR", inventory.safety_factor);
        inventory.review_period_days = parse_or(
            &lookup,
            "INVENTORY_REVIEW_PERIOD_DAYS",
            inventory.review_period_days,
        );
        let churn = &mut analytics.churn;
        churn.gap_multiplier = parse_or(&lookup, "CHURN_GAP_MULTIPLIER", churn.gap_multiplier);
        churn.global_threshold_days = parse_or(
            &lookup,
            "CHURN_GLOBAL_THRESHOLD_DAYS",
            churn.global_threshold_days,
        );
        let forecast = &mut analytics.forecast;
        forecast.horizon_days = parse_or(&lookup, "FORECAST_HORIZON_DAYS", forecast.horizon_days);
        forecast.min_history_days =
            parse_or(&lookup, "FORECAST_MIN_HISTORY_DAYS", forecast.min_history_days);
        forecast.history_days =
            parse_or(&lookup, "FORECAST_HISTORY_DAYS", forecast.history_days);

        let timezone = lookup("STORE_TIMEZONE").unwrap_or_else(|| "Asia/Manila".into());

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: parse_or(&lookup, "HTTP_PORT", 8080),
            jwt_secret: Self::require_secret(&lookup, "JWT_SECRET", &environment)?,
            environment,
            store_timezone: shared::util::parse_timezone(&timezone),
            query_timeout: Duration::from_millis(parse_or(&lookup, "QUERY_TIMEOUT_MS", 5000)),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            analytics,
        })
    }
}

/// Parse an optional variable, keeping `default` when unset or malformed
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
