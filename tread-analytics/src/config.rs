//! Tunable constants for the analytics reports
//!
//! Every threshold used in a classification lives here; the server maps its
//! environment onto [`AnalyticsConfig`] and passes it down.

use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Default number of rows in the best-seller ranking
pub const DEFAULT_BEST_SELLERS_LIMIT: usize = 10;
/// Upper bound accepted for the best-seller ranking
pub const MAX_BEST_SELLERS_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub inventory: InventoryConfig,
    pub churn: ChurnConfig,
    pub forecast: ForecastConfig,
}

/// Reorder-point model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Sales history used to estimate daily demand
    pub lookback: Period,
    /// Supplier lead time
    pub lead_time_days: f64,
    /// Multiplier applied to lead-time demand for safety stock
    pub safety_factor: f64,
    /// Days of demand held above the reorder point
    pub review_period_days: f64,
    /// Below `reorder_point × urgent_ratio` the reorder is urgent
    pub urgent_ratio: f64,
    /// Above `optimal_stock × overstock_ratio` the product is overstocked
    pub overstock_ratio: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            lookback: Period::Month,
            lead_time_days: 7.0,
            safety_factor: 0.5,
            review_period_days: 14.0,
            urgent_ratio: 0.5,
            overstock_ratio: 2.0,
        }
    }
}

/// Churn-risk scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// High risk once the silence exceeds this multiple of the personal gap
    pub gap_multiplier: f64,
    /// Reference silence for customers without a usable purchase rhythm
    pub global_threshold_days: f64,
    /// Orders needed before the personal gap is trusted
    pub min_orders_for_gap: usize,
    /// Scores at or above this are `medium` risk
    pub medium_threshold: f64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            gap_multiplier: 2.0,
            global_threshold_days: 90.0,
            min_orders_for_gap: 2,
            medium_threshold: 0.35,
        }
    }
}

/// Forecast model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub horizon_days: u32,
    pub min_history_days: usize,
    /// Trailing days of sales the trend is fitted on (never less than the period)
    pub history_days: u32,
    /// Confidence multiplier for the residual standard deviation (95%)
    pub z_score: f64,
    /// Apply day-of-week factors when the history covers two full weeks
    pub seasonality: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            min_history_days: 7,
            history_days: 90,
            z_score: 1.96,
            seasonality: true,
        }
    }
}
