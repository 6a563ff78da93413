//! In-memory store for router tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Order, OrderItem, Product, User};

use super::{AnalyticsStore, BoxError};

/// Which dataset a [`MemoryStore`] should fail to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Orders,
    Items,
    Products,
    Customers,
}

#[derive(Default)]
pub struct MemoryStore {
    pub orders: Vec<Order>,
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub customers: Vec<User>,
    pub failing: Option<Dataset>,
    pub delay: Option<(Dataset, Duration)>,
    /// Every dataset read, in call order
    pub calls: Arc<Mutex<Vec<Dataset>>>,
}

impl MemoryStore {
    pub fn failing(mut self, dataset: Dataset) -> Self {
        self.failing = Some(dataset);
        self
    }

    pub fn slow(mut self, dataset: Dataset, delay: Duration) -> Self {
        self.delay = Some((dataset, delay));
        self
    }

    async fn access(&self, dataset: Dataset) -> Result<(), BoxError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(dataset);
        }
        if let Some((slow, delay)) = self.delay
            && slow == dataset
        {
            tokio::time::sleep(delay).await;
        }
        if self.failing == Some(dataset) {
            return Err(format!("{dataset:?} unavailable").into());
        }
        Ok(())
    }
}

fn in_range(at: DateTime<Utc>, from: Option<DateTime<Utc>>, to: DateTime<Utc>) -> bool {
    from.is_none_or(|from| at >= from) && at < to
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn orders(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, BoxError> {
        self.access(Dataset::Orders).await?;
        Ok(self
            .orders
            .iter()
            .filter(|o| in_range(o.created_at, from, to))
            .cloned()
            .collect())
    }

    async fn order_items(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
    ) -> Result<Vec<OrderItem>, BoxError> {
        self.access(Dataset::Items).await?;
        Ok(self
            .items
            .iter()
            .filter(|item| {
                self.orders
                    .iter()
                    .any(|o| o.id == item.order_id && in_range(o.created_at, from, to))
            })
            .cloned()
            .collect())
    }

    async fn products(&self) -> Result<Vec<Product>, BoxError> {
        self.access(Dataset::Products).await?;
        Ok(self.products.clone())
    }

    async fn customers(&self) -> Result<Vec<User>, BoxError> {
        self.access(Dataset::Customers).await?;
        Ok(self.customers.clone())
    }
}
