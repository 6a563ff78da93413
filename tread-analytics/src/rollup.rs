//! Best sellers and revenue breakdowns over order items

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Order, OrderItem, OrderStatus, Product};

use crate::money::{self, to_f64};
use crate::period::{ReportWindow, WindowPosition};

const UNKNOWN: &str = "Unknown";

/// Units and item revenue of one grouping key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Sales {
    pub units: i64,
    pub revenue: Decimal,
}

impl Sales {
    fn add(&mut self, item: &OrderItem) {
        self.units += i64::from(item.quantity);
        self.revenue += item.line_total();
    }
}

/// Per-product sales of revenue orders, split into (current, previous) window
pub(crate) fn product_sales(
    orders: &[Order],
    items: &[OrderItem],
    window: &ReportWindow,
) -> (HashMap<i64, Sales>, HashMap<i64, Sales>) {
    let positions: HashMap<i64, WindowPosition> = orders
        .iter()
        .filter(|o| o.status.is_revenue())
        .map(|o| (o.id, window.position(o.created_at)))
        .collect();

    let mut current: HashMap<i64, Sales> = HashMap::new();
    let mut previous: HashMap<i64, Sales> = HashMap::new();
    for item in items {
        if item.quantity <= 0 {
            tracing::debug!(order_id = item.order_id, "Skipping non-positive quantity line");
            continue;
        }
        match positions.get(&item.order_id) {
            Some(WindowPosition::Current) => current.entry(item.product_id).or_default().add(item),
            Some(WindowPosition::Previous) => {
                previous.entry(item.product_id).or_default().add(item)
            }
            _ => {}
        }
    }
    (current, previous)
}

/// Best seller row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSeller {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub units_sold: i64,
    pub revenue: f64,
}

/// Top `limit` products by item revenue (ties: units desc, then id asc)
pub fn best_sellers(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
    limit: usize,
) -> Vec<BestSeller> {
    let catalog: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let (current, _) = product_sales(orders, items, window);

    let mut ranked: Vec<(i64, Sales)> = current.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.units.cmp(&a.units))
            .then(a_id.cmp(b_id))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(product_id, sales)| {
            let product = catalog.get(&product_id);
            BestSeller {
                product_id,
                name: product
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("Unknown product #{product_id}")),
                brand: product.map_or(UNKNOWN, |p| p.brand.as_str()).to_string(),
                category: product.map_or(UNKNOWN, |p| p.category.as_str()).to_string(),
                units_sold: sales.units,
                revenue: to_f64(sales.revenue),
            }
        })
        .collect()
}

/// Revenue of one brand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandRevenue {
    pub brand: String,
    pub units_sold: i64,
    pub revenue: f64,
    /// Share of total item revenue, percent
    pub share: f64,
}

/// Revenue of one tyre category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub units_sold: i64,
    pub revenue: f64,
    /// Share of total item revenue, percent
    pub share: f64,
}

/// Group current-window product sales by a product attribute, sorted by revenue desc then key
fn group_by<F>(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
    key: F,
) -> Vec<(String, Sales, f64)>
where
    F: Fn(&Product) -> &str,
{
    let catalog: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let (current, _) = product_sales(orders, items, window);

    let mut groups: BTreeMap<String, Sales> = BTreeMap::new();
    for (product_id, sales) in current {
        let name = catalog.get(&product_id).map_or(UNKNOWN, |p| key(p));
        let entry = groups.entry(name.to_string()).or_default();
        entry.units += sales.units;
        entry.revenue += sales.revenue;
    }

    let total: Decimal = groups.values().map(|s| s.revenue).sum();
    let total = to_f64(total);

    let mut rows: Vec<(String, Sales, f64)> = groups
        .into_iter()
        .map(|(name, sales)| {
            let share = money::round2(money::ratio(to_f64(sales.revenue), total) * 100.0);
            (name, sales, share)
        })
        .collect();
    rows.sort_by(|(a_key, a, _), (b_key, b, _)| b.revenue.cmp(&a.revenue).then(a_key.cmp(b_key)));
    rows
}

pub fn revenue_by_brand(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
) -> Vec<BrandRevenue> {
    group_by(orders, items, products, window, |p| p.brand.as_str())
        .into_iter()
        .map(|(brand, sales, share)| BrandRevenue {
            brand,
            units_sold: sales.units,
            revenue: to_f64(sales.revenue),
            share,
        })
        .collect()
}

pub fn revenue_by_category(
    orders: &[Order],
    items: &[OrderItem],
    products: &[Product],
    window: &ReportWindow,
) -> Vec<CategoryRevenue> {
    group_by(orders, items, products, window, |p| p.category.as_str())
        .into_iter()
        .map(|(category, sales, share)| CategoryRevenue {
            category,
            units_sold: sales.units,
            revenue: to_f64(sales.revenue),
            share,
        })
        .collect()
}

/// Order count of one status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Orders per status in the current window; every status listed, zeros included
pub fn order_status_distribution(orders: &[Order], window: &ReportWindow) -> Vec<StatusCount> {
    let mut counts: BTreeMap<OrderStatus, usize> =
        OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for order in orders {
        if window.position(order.created_at) == WindowPosition::Current {
            *counts.entry(order.status).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}
