//! Tread analytics engine
//!
//! Pure report computations over a snapshot of storefront rows. Every function
//! takes the rows plus an explicit window (or `now` and store timezone) and
//! returns serializable report values; nothing here performs I/O.

pub mod config;
pub mod customers;
pub mod forecast;
pub mod inventory;
pub mod money;
pub mod overview;
pub mod period;
pub mod quadrant;
pub mod rollup;
pub mod segmentation;
pub mod stats;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use config::{AnalyticsConfig, ChurnConfig, ForecastConfig, InventoryConfig};
pub use customers::CustomerStats;
pub use forecast::{ForecastPoint, ForecastReport, HistoricalPoint, Metric};
pub use inventory::{InventoryRecommendation, StockAction};
pub use overview::OverviewStats;
pub use period::{Period, ReportWindow};
pub use quadrant::{MarginSource, ProductInsight, Quadrant};
pub use rollup::{BestSeller, BrandRevenue, CategoryRevenue, StatusCount};
pub use segmentation::{
    ChurnRiskCustomer, CustomerSegmentRecord, RecommendedAction, RiskLevel, Segment,
    SegmentReport,
};
pub use timeline::DailyTimelinePoint;
