//! Growth / margin product quadrant
//!
//! Margins share one scale across the catalog: cost-based percentages when
//! every product has a usable cost, otherwise price percentile ranks for all.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use shared::models::{Order, OrderItem, Product};

use crate::money::{self, round2, to_f64};
use crate::period::ReportWindow;
use crate::rollup::{Sales, product_sales};
use crate::stats::{median, percentile_rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// High growth, high margin
    Star,
    /// Low growth, high margin
    CashCow,
    /// High growth, low margin
    QuestionMark,
    Dog,
}

impl Quadrant {
    /// "High" means strictly above the threshold
    pub fn classify(
        growth_rate: f64,
        profit_margin: f64,
        growth_median: f64,
        margin_median: f64,
    ) -> Self {
        match (growth_rate > growth_median, profit_margin > margin_median) {
            (true, true) => Self::Star,
            (false, true) => Self::CashCow,
            (true, false) => Self::QuestionMark,
            (false, false) => Self::Dog,
        }
    }
}

/// Where the catalog's margin figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginSource {
    /// `(price - cost) / price`
    Cost,
    /// Price percentile rank across the catalog, some cost missing
    PriceRank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInsight {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub revenue: f64,
    pub previous_revenue: f64,
    /// Percent change of item revenue vs the previous window
    pub growth_rate: f64,
    pub profit_margin: f64,
    pub margin_source: MarginSource,
    pub quadrant: Quadrant,
}

/// `(price - cost) / price` in percent; `None` without a cost or a positive price
fn cost_margin(product: &Product) -> Option<f64> {
    let cost = product.cost?;
    if product.price <= Decimal::ZERO {
        return None;
    }
    let margin = (product.price - cost) / product.price * Decimal::ONE_HUNDRED;
    Some(margin.to_f64().unwrap_or(0.0))
}

/// One margin per product, in catalog order, all from the same source
fn catalog_margins(products: &[Product]) -> (Vec<f64>, MarginSource) {
    if let Some(margins) = products.iter().map(cost_margin).collect::<Option<Vec<_>>>() {
        return (margins, MarginSource::Cost);
    }
    let prices: Vec<f64> = products.iter().map(|p| to_f64(p.price)).collect();
    let ranks = prices.iter().map(|p| percentile_rank(*p, &prices)).collect();
    (ranks, MarginSource::PriceRank)
}

/// Classify every catalog product, sorted by product id
pub fn product_insights(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
) -> Vec<ProductInsight> {
    let (current, previous) = product_sales(orders, items, window);
    let revenue_of = |sales: &HashMap<i64, Sales>, id: i64| {
        sales.get(&id).map_or(0.0, |s| to_f64(s.revenue))
    };
    let (margins, source) = catalog_margins(products);

    let measured: Vec<(&Product, f64, f64, f64, f64)> = products
        .iter()
        .zip(margins)
        .map(|(product, margin)| {
            let revenue = revenue_of(&current, product.id);
            let previous_revenue = revenue_of(&previous, product.id);
            let growth = money::percent_change(revenue, previous_revenue);
            (product, revenue, previous_revenue, growth, margin)
        })
        .collect();

    let growth_median = median(&measured.iter().map(|m| m.3).collect::<Vec<_>>());
    let margin_median = median(&measured.iter().map(|m| m.4).collect::<Vec<_>>());

    let mut rows: Vec<ProductInsight> = measured
        .into_iter()
        .map(|(product, revenue, previous_revenue, growth, margin)| ProductInsight {
            product_id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            revenue,
            previous_revenue,
            growth_rate: growth,
            profit_margin: round2(margin),
            margin_source: source,
            quadrant: Quadrant::classify(growth, margin, growth_median, margin_median),
        })
        .collect();
    rows.sort_by_key(|r| r.product_id);

    tracing::debug!(
        products = rows.len(),
        ?source,
        growth_median,
        margin_median,
        "Computed product insights"
    );
    rows
}
