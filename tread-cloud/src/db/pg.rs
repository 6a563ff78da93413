//! PostgreSQL-backed store
//!
//! Reads the storefront tables directly; the schema is owned elsewhere and
//! never written or migrated from here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus, Product, User};
use sqlx::PgPool;

use super::{AnalyticsStore, BoxError};

/// `orders` row before the status string is validated
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    /// Rows with an unrecognized status are skipped with a warning
    fn into_order(self) -> Option<Order> {
        match self.status.parse::<OrderStatus>() {
            Ok(status) => Some(Order {
                id: self.id,
                user_id: self.user_id,
                total: self.total,
                status,
                created_at: self.created_at,
            }),
            Err(e) => {
                tracing::warn!(order_id = self.id, error = %e, "Skipping order with unknown status");
                None
            }
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn orders(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, BoxError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, total, status, created_at
            FROM orders
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND created_at < $2
            ORDER BY id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().filter_map(OrderRow::into_order).collect())
    }

    async fn order_items(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<OrderItem>, BoxError> {
        let rows: Vec<OrderItem> = sqlx::query_as(
            r#"
            SELECT oi.order_id, oi.product_id, oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE ($1::timestamptz IS NULL OR o.created_at >= $1)
              AND o.created_at < $2
            ORDER BY oi.order_id, oi.product_id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn products(&self) -> Result<Vec<Product>, BoxError> {
        let rows: Vec<Product> = sqlx::query_as(
            "SELECT id, name, brand, category, price, stock, cost FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn customers(&self) -> Result<Vec<User>, BoxError> {
        let rows: Vec<User> = sqlx::query_as(
            "SELECT id, name, email, created_at FROM users WHERE role = 'customer' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: &str) -> OrderRow {
        OrderRow {
            id: 7,
            user_id: 3,
            total: Decimal::new(12_500, 2),
            status: status.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_row_status_conversion() {
        let order = row("reserved").into_order().unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total, Decimal::new(125, 0));
        assert!(row("refunded").into_order().is_none());
    }
}
