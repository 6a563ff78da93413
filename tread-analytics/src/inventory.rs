//! Reorder-point inventory recommendations

use serde::Serialize;
use shared::models::{Order, OrderItem, Product};

use crate::config::InventoryConfig;
use crate::money::round2;
use crate::period::ReportWindow;
use crate::rollup::product_sales;

/// Variant order is urgency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAction {
    UrgentReorder,
    ReorderSoon,
    Overstocked,
    Optimal,
}

impl StockAction {
    /// First matching rule wins
    pub fn classify(
        stock: f64,
        reorder_point: f64,
        optimal_stock: f64,
        config: &InventoryConfig,
    ) -> Self {
        if stock < reorder_point * config.urgent_ratio {
            Self::UrgentReorder
        } else if stock < reorder_point {
            Self::ReorderSoon
        } else if stock > optimal_stock * config.overstock_ratio {
            Self::Overstocked
        } else {
            Self::Optimal
        }
    }

    pub fn needs_reorder(&self) -> bool {
        matches!(self, Self::UrgentReorder | Self::ReorderSoon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecommendation {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub current_stock: i32,
    pub units_sold: i64,
    pub avg_daily_sales: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub optimal_stock: f64,
    pub action: StockAction,
    /// Units to bring stock back to the optimal level; 0 unless reordering
    pub suggested_order_quantity: i64,
}

/// Stock levels derived from average daily demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockLevels {
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub optimal_stock: f64,
}

impl StockLevels {
    pub fn from_demand(avg_daily_sales: f64, config: &InventoryConfig) -> Self {
        let lead_time_demand = avg_daily_sales * config.lead_time_days;
        let safety_stock = lead_time_demand * config.safety_factor;
        let reorder_point = lead_time_demand + safety_stock;
        Self {
            safety_stock,
            reorder_point,
            optimal_stock: reorder_point + avg_daily_sales * config.review_period_days,
        }
    }
}

/// Suggested reorder size: `ceil(optimal - stock)` for reorder actions, else 0
pub fn suggested_order_quantity(action: StockAction, stock: f64, optimal_stock: f64) -> i64 {
    if !action.needs_reorder() {
        return 0;
    }
    let missing = (optimal_stock - stock).ceil();
    if missing.is_finite() && missing > 0.0 {
        missing as i64
    } else {
        0
    }
}

/// One recommendation per catalog product, most urgent first (ties by id)
///
/// Demand is measured over the current part of `window`.
pub fn recommendations(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
    config: &InventoryConfig,
) -> Vec<InventoryRecommendation> {
    let (sales, _) = product_sales(orders, items, window);
    let days = window.days() as f64;

    let mut rows: Vec<InventoryRecommendation> = products
        .iter()
        .map(|product| {
            let units_sold = sales.get(&product.id).map_or(0, |s| s.units);
            let avg_daily_sales = units_sold as f64 / days;
            let levels = StockLevels::from_demand(avg_daily_sales, config);
            let stock = f64::from(product.stock.max(0));
            let action =
                StockAction::classify(stock, levels.reorder_point, levels.optimal_stock, config);
            InventoryRecommendation {
                product_id: product.id,
                name: product.name.clone(),
                brand: product.brand.clone(),
                current_stock: product.stock,
                units_sold,
                avg_daily_sales: round2(avg_daily_sales),
                safety_stock: round2(levels.safety_stock),
                reorder_point: round2(levels.reorder_point),
                optimal_stock: round2(levels.optimal_stock),
                action,
                suggested_order_quantity: suggested_order_quantity(
                    action,
                    stock,
                    levels.optimal_stock,
                ),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.action.cmp(&b.action).then(a.product_id.cmp(&b.product_id)));

    tracing::debug!(
        products = rows.len(),
        reorder = rows.iter().filter(|r| r.action.needs_reorder()).count(),
        "Computed inventory recommendations"
    );
    rows
}
