//! Report assembly: fetch the rows a report needs, run the engine
//!
//! Every dataset fetch is bounded by the configured query timeout. Single
//! reports fail as a whole; [`AnalyticsService::full_report`] fetches each
//! dataset once, computes every section from that snapshot and marks
//! failures per section.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::error::AppError;
use shared::models::{Order, OrderItem, Product, User};
use shared::util;
use tread_analytics::{
    BestSeller, BrandRevenue, CategoryRevenue, ChurnRiskCustomer, CustomerStats,
    DailyTimelinePoint, ForecastReport, InventoryRecommendation, Metric, OverviewStats, Period,
    ProductInsight, ReportWindow, SegmentReport, StatusCount, config::DEFAULT_BEST_SELLERS_LIMIT,
    customers, forecast, inventory, overview, quadrant, rollup, segmentation, timeline,
};

use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Orders, their lines and the catalog for one window
struct SalesSnapshot {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    products: Vec<Product>,
}

/// Datasets of one full report, each fetched once
struct ReportSnapshot {
    /// Every order up to the end of today
    orders: Result<Vec<Order>, AppError>,
    items: Result<Vec<OrderItem>, AppError>,
    products: Result<Vec<Product>, AppError>,
    customers: Result<Vec<User>, AppError>,
}

type Sales<'a> = (&'a Vec<Order>, &'a Vec<OrderItem>, &'a Vec<Product>);

impl ReportSnapshot {
    fn sales(&self) -> Result<Sales<'_>, &AppError> {
        Ok((
            self.orders.as_ref()?,
            self.items.as_ref()?,
            self.products.as_ref()?,
        ))
    }
}

/// One section of the full report
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ok { data: T },
    Error { code: u16, message: String },
}

impl<T> From<Result<T, &AppError>> for Section<T> {
    fn from(result: Result<T, &AppError>) -> Self {
        match result {
            Ok(data) => Section::Ok { data },
            Err(err) => Section::Error {
                code: err.code.code(),
                message: err.message.clone(),
            },
        }
    }
}

impl<T> Section<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Section::Ok { .. })
    }
}

/// Every report for one period; sections fail independently
#[derive(Debug, Serialize)]
pub struct FullReport {
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub overview: Section<OverviewStats>,
    pub timeline: Section<Vec<DailyTimelinePoint>>,
    pub best_sellers: Section<Vec<BestSeller>>,
    pub revenue_by_brand: Section<Vec<BrandRevenue>>,
    pub revenue_by_category: Section<Vec<CategoryRevenue>>,
    pub order_status: Section<Vec<StatusCount>>,
    pub customers: Section<CustomerStats>,
    pub forecast: Section<ForecastReport>,
    pub segments: Section<SegmentReport>,
    pub churn_risk: Section<Vec<ChurnRiskCustomer>>,
    pub inventory: Section<Vec<InventoryRecommendation>>,
    pub product_insights: Section<Vec<ProductInsight>>,
}

impl FullReport {
    pub fn failed_sections(&self) -> usize {
        [
            self.overview.is_ok(),
            self.timeline.is_ok(),
            self.best_sellers.is_ok(),
            self.revenue_by_brand.is_ok(),
            self.revenue_by_category.is_ok(),
            self.order_status.is_ok(),
            self.customers.is_ok(),
            self.forecast.is_ok(),
            self.segments.is_ok(),
            self.churn_risk.is_ok(),
            self.inventory.is_ok(),
            self.product_insights.is_ok(),
        ]
        .iter()
        .filter(|ok| !**ok)
        .count()
    }
}

/// Report service bound to one request instant
pub struct AnalyticsService<'a> {
    state: &'a AppState,
    now: DateTime<Utc>,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            now: Utc::now(),
        }
    }

    fn window(&self, period: Period) -> ReportWindow {
        ReportWindow::new(period, self.now, self.state.timezone)
    }

    /// Run one dataset fetch under the query timeout
    async fn fetch<T, F>(&self, dataset: &'static str, fut: F) -> ServiceResult<T>
    where
        F: Future<Output = Result<T, BoxError>>,
    {
        match tokio::time::timeout(self.state.query_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ServiceError::Timeout(dataset)),
        }
    }

    /// Orders of the window and the one before it
    async fn window_orders(&self, window: &ReportWindow) -> ServiceResult<Vec<Order>> {
        let (from, to) = window.fetch_range();
        self.fetch("orders", self.state.store.orders(Some(from), to)).await
    }

    /// Every order up to the end of today
    async fn order_history(&self) -> ServiceResult<Vec<Order>> {
        let tz = self.state.timezone;
        let to = util::day_end_utc(util::local_date(self.now, tz), tz);
        self.fetch("orders", self.state.store.orders(None, to)).await
    }

    async fn sales(&self, window: &ReportWindow) -> ServiceResult<SalesSnapshot> {
        let (from, to) = window.fetch_range();
        let store = &self.state.store;
        let (orders, items, products) = tokio::try_join!(
            self.fetch("orders", store.orders(Some(from), to)),
            self.fetch("order items", store.order_items(Some(from), to)),
            self.fetch("products", store.products()),
        )?;
        Ok(SalesSnapshot {
            orders,
            items,
            products,
        })
    }

    pub async fn overview(&self, period: Period) -> ServiceResult<OverviewStats> {
        let window = self.window(period);
        let orders = self.window_orders(&window).await?;
        Ok(overview::overview(&orders, &window))
    }

    pub async fn timeline(&self, period: Period) -> ServiceResult<Vec<DailyTimelinePoint>> {
        let window = self.window(period);
        let orders = self.window_orders(&window).await?;
        Ok(timeline::daily_timeline(&orders, &window))
    }

    pub async fn best_sellers(&self, period: Period, limit: usize) -> ServiceResult<Vec<BestSeller>> {
        let window = self.window(period);
        let s = self.sales(&window).await?;
        Ok(rollup::best_sellers(
            &s.orders, &s.items, &s.products, &window, limit,
        ))
    }

    pub async fn revenue_by_brand(&self, period: Period) -> ServiceResult<Vec<BrandRevenue>> {
        let window = self.window(period);
        let s = self.sales(&window).await?;
        Ok(rollup::revenue_by_brand(&s.orders, &s.items, &s.products, &window))
    }

    pub async fn revenue_by_category(&self, period: Period) -> ServiceResult<Vec<CategoryRevenue>> {
        let window = self.window(period);
        let s = self.sales(&window).await?;
        Ok(rollup::revenue_by_category(
            &s.orders, &s.items, &s.products, &window,
        ))
    }

    pub async fn order_status(&self, period: Period) -> ServiceResult<Vec<StatusCount>> {
        let window = self.window(period);
        let orders = self.window_orders(&window).await?;
        Ok(rollup::order_status_distribution(&orders, &window))
    }

    pub async fn customer_stats(&self, period: Period) -> ServiceResult<CustomerStats> {
        let window = self.window(period);
        let (users, orders) = tokio::try_join!(
            self.fetch("customers", self.state.store.customers()),
            self.order_history(),
        )?;
        Ok(customers::customer_stats(&users, &orders, &window))
    }

    pub async fn forecast(&self, period: Period, metric: Metric) -> ServiceResult<ForecastReport> {
        let window = self.window(period);
        let config = &self.state.analytics.forecast;
        let from = util::day_start_utc(forecast::lookback_start(&window, config), window.tz);
        let (_, to) = window.fetch_range();
        let orders = self
            .fetch("orders", self.state.store.orders(Some(from), to))
            .await?;
        Ok(forecast::forecast(&orders, &window, metric, config))
    }

    pub async fn segments(&self) -> ServiceResult<SegmentReport> {
        let orders = self.order_history().await?;
        Ok(segmentation::customer_segments(
            &orders,
            self.now,
            self.state.timezone,
            &self.state.analytics.churn,
        ))
    }

    pub async fn churn_risk(&self) -> ServiceResult<Vec<ChurnRiskCustomer>> {
        let orders = self.order_history().await?;
        Ok(segmentation::churn_risk(
            &orders,
            self.now,
            self.state.timezone,
            &self.state.analytics.churn,
        ))
    }

    pub async fn inventory(&self) -> ServiceResult<Vec<InventoryRecommendation>> {
        let config = &self.state.analytics.inventory;
        let window = self.window(config.lookback);
        let s = self.sales(&window).await?;
        Ok(inventory::recommendations(
            &s.orders, &s.items, &s.products, &window, config,
        ))
    }

    pub async fn product_insights(&self, period: Period) -> ServiceResult<Vec<ProductInsight>> {
        let window = self.window(period);
        let s = self.sales(&window).await?;
        Ok(quadrant::product_insights(
            &s.orders, &s.items, &s.products, &window,
        ))
    }

    /// Fetch every dataset of the full report once, concurrently
    ///
    /// Items cover both the report window and the inventory lookback.
    async fn snapshot(&self, window: &ReportWindow, inventory: &ReportWindow) -> ReportSnapshot {
        let (period_from, to) = window.fetch_range();
        let (inventory_from, _) = inventory.fetch_range();
        let from = period_from.min(inventory_from);
        let store = &self.state.store;
        let (orders, items, products, customers) = tokio::join!(
            self.order_history(),
            self.fetch("order items", store.order_items(Some(from), to)),
            self.fetch("products", store.products()),
            self.fetch("customers", store.customers()),
        );
        ReportSnapshot {
            orders: orders.map_err(AppError::from),
            items: items.map_err(AppError::from),
            products: products.map_err(AppError::from),
            customers: customers.map_err(AppError::from),
        }
    }

    pub async fn full_report(&self, period: Period, metric: Metric) -> FullReport {
        let analytics = &self.state.analytics;
        let window = self.window(period);
        let inventory_window = self.window(analytics.inventory.lookback);
        let snapshot = self.snapshot(&window, &inventory_window).await;

        let orders = snapshot.orders.as_ref();
        let sales = snapshot.sales();
        let (now, tz) = (self.now, self.state.timezone);

        let report = FullReport {
            period,
            generated_at: now,
            overview: orders.map(|o| overview::overview(o, &window)).into(),
            timeline: orders.map(|o| timeline::daily_timeline(o, &window)).into(),
            best_sellers: sales
                .map(|(o, i, p)| {
                    rollup::best_sellers(o, i, p, &window, DEFAULT_BEST_SELLERS_LIMIT)
                })
                .into(),
            revenue_by_brand: sales
                .map(|(o, i, p)| rollup::revenue_by_brand(o, i, p, &window))
                .into(),
            revenue_by_category: sales
                .map(|(o, i, p)| rollup::revenue_by_category(o, i, p, &window))
                .into(),
            order_status: orders
                .map(|o| rollup::order_status_distribution(o, &window))
                .into(),
            customers: snapshot
                .customers
                .as_ref()
                .and_then(|users| orders.map(|o| customers::customer_stats(users, o, &window)))
                .into(),
            forecast: orders
                .map(|o| forecast::forecast(o, &window, metric, &analytics.forecast))
                .into(),
            segments: orders
                .map(|o| segmentation::customer_segments(o, now, tz, &analytics.churn))
                .into(),
            churn_risk: orders
                .map(|o| segmentation::churn_risk(o, now, tz, &analytics.churn))
                .into(),
            inventory: sales
                .map(|(o, i, p)| {
                    inventory::recommendations(o, i, p, &inventory_window, &analytics.inventory)
                })
                .into(),
            product_insights: sales
                .map(|(o, i, p)| quadrant::product_insights(o, i, p, &window))
                .into(),
        };

        let failed = report.failed_sections();
        if failed > 0 {
            tracing::warn!(period = period.as_str(), failed, "Full report has failed sections");
        }
        report
    }
}
