//! Service layer

pub mod analytics;

pub use analytics::AnalyticsService;
