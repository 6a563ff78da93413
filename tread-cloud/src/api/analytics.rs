//! Analytics endpoints: one per report, plus the combined report

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use tread_analytics::{
    BestSeller, BrandRevenue, CategoryRevenue, ChurnRiskCustomer, CustomerStats,
    DailyTimelinePoint, ForecastReport, InventoryRecommendation, Metric, OverviewStats, Period,
    ProductInsight, SegmentReport, StatusCount,
    config::{DEFAULT_BEST_SELLERS_LIMIT, MAX_BEST_SELLERS_LIMIT},
};

use crate::auth::AdminIdentity;
use crate::services::AnalyticsService;
use crate::services::analytics::FullReport;
use crate::state::AppState;

use super::ApiResult;

/// `?period=7d|30d|90d|1y` (anything else means 30d)
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn period(&self) -> Period {
        self.period.as_deref().map(Period::parse).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct BestSellersQuery {
    pub period: Option<String>,
    pub limit: Option<String>,
}

impl BestSellersQuery {
    fn limit(&self) -> Result<usize, AppError> {
        let Some(raw) = self.limit.as_deref() else {
            return Ok(DEFAULT_BEST_SELLERS_LIMIT);
        };
        let limit: usize = raw.trim().parse().map_err(|_| {
            AppError::with_message(ErrorCode::InvalidFormat, "limit must be a positive integer")
                .with_detail("field", "limit")
        })?;
        if !(1..=MAX_BEST_SELLERS_LIMIT).contains(&limit) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("limit must be between 1 and {MAX_BEST_SELLERS_LIMIT}"),
            )
            .with_detail("field", "limit")
            .with_detail("max", MAX_BEST_SELLERS_LIMIT));
        }
        Ok(limit)
    }
}

/// `?period=&metric=revenue|orders` (unknown metric means revenue)
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub period: Option<String>,
    pub metric: Option<String>,
}

impl ForecastQuery {
    fn period(&self) -> Period {
        self.period.as_deref().map(Period::parse).unwrap_or_default()
    }

    fn metric(&self) -> Metric {
        self.metric.as_deref().map(Metric::parse).unwrap_or_default()
    }
}

/// GET /api/admin/analytics/overview
pub async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<OverviewStats> {
    let stats = AnalyticsService::new(&state).overview(query.period()).await?;
    Ok(Json(stats))
}

/// GET /api/admin/analytics/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<DailyTimelinePoint>> {
    let points = AnalyticsService::new(&state).timeline(query.period()).await?;
    Ok(Json(points))
}

/// GET /api/admin/analytics/best-sellers
pub async fn get_best_sellers(
    State(state): State<AppState>,
    Query(query): Query<BestSellersQuery>,
) -> ApiResult<Vec<BestSeller>> {
    let limit = query.limit()?;
    let period = query.period.as_deref().map(Period::parse).unwrap_or_default();
    let rows = AnalyticsService::new(&state)
        .best_sellers(period, limit)
        .await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/revenue/brands
pub async fn get_brand_revenue(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<BrandRevenue>> {
    let rows = AnalyticsService::new(&state)
        .revenue_by_brand(query.period())
        .await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/revenue/categories
pub async fn get_category_revenue(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<CategoryRevenue>> {
    let rows = AnalyticsService::new(&state)
        .revenue_by_category(query.period())
        .await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/order-status
pub async fn get_order_status(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<StatusCount>> {
    let rows = AnalyticsService::new(&state)
        .order_status(query.period())
        .await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/customers
pub async fn get_customer_stats(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<CustomerStats> {
    let stats = AnalyticsService::new(&state)
        .customer_stats(query.period())
        .await?;
    Ok(Json(stats))
}

/// GET /api/admin/analytics/forecast
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<ForecastReport> {
    let report = AnalyticsService::new(&state)
        .forecast(query.period(), query.metric())
        .await?;
    Ok(Json(report))
}

/// GET /api/admin/analytics/segments
pub async fn get_segments(State(state): State<AppState>) -> ApiResult<SegmentReport> {
    let report = AnalyticsService::new(&state).segments().await?;
    Ok(Json(report))
}

/// GET /api/admin/analytics/churn-risk
pub async fn get_churn_risk(State(state): State<AppState>) -> ApiResult<Vec<ChurnRiskCustomer>> {
    let rows = AnalyticsService::new(&state).churn_risk().await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/inventory
pub async fn get_inventory(
    State(state): State<AppState>,
) -> ApiResult<Vec<InventoryRecommendation>> {
    let rows = AnalyticsService::new(&state).inventory().await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/product-insights
pub async fn get_product_insights(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<ProductInsight>> {
    let rows = AnalyticsService::new(&state)
        .product_insights(query.period())
        .await?;
    Ok(Json(rows))
}

/// GET /api/admin/analytics/report
///
/// Always 200; failed sections carry their own error code.
pub async fn get_full_report(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Query(query): Query<ForecastQuery>,
) -> Json<FullReport> {
    tracing::info!(
        admin = %admin.user_id,
        email = %admin.email,
        period = query.period().as_str(),
        "Full analytics report requested"
    );
    let report = AnalyticsService::new(&state)
        .full_report(query.period(), query.metric())
        .await;
    Json(report)
}
