//! API routes for tread-cloud

pub mod analytics;
pub mod health;

use axum::routing::get;
use axum::{Router, middleware};
use shared::error::AppError;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth::admin_auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Admin analytics (JWT authenticated, admin role)
    let admin = Router::new()
        .route("/overview", get(analytics::get_overview))
        .route("/timeline", get(analytics::get_timeline))
        .route("/best-sellers", get(analytics::get_best_sellers))
        .route("/revenue/brands", get(analytics::get_brand_revenue))
        .route("/revenue/categories", get(analytics::get_category_revenue))
        .route("/order-status", get(analytics::get_order_status))
        .route("/customers", get(analytics::get_customer_stats))
        .route("/forecast", get(analytics::get_forecast))
        .route("/segments", get(analytics::get_segments))
        .route("/churn-risk", get(analytics::get_churn_risk))
        .route("/inventory", get(analytics::get_inventory))
        .route("/product-insights", get(analytics::get_product_insights))
        .route("/report", get(analytics::get_full_report))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/admin/analytics", admin)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
