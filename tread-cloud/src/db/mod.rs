//! Database access layer
//!
//! Handlers read through [`AnalyticsStore`] so the API can run against the
//! storefront's PostgreSQL database or an in-memory snapshot in tests.

#[cfg(test)]
pub mod memory;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Order, OrderItem, Product, User};

pub use pg::PgStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to the rows the reports are computed from
///
/// Time bounds are `[from, to)`; `from = None` reads from the beginning.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn orders(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, BoxError>;

    /// Lines of the orders placed within the bounds
    async fn order_items(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<OrderItem>, BoxError>;

    async fn products(&self) -> Result<Vec<Product>, BoxError>;

    /// Customer accounts (admins and staff excluded)
    async fn customers(&self) -> Result<Vec<User>, BoxError>;
}
