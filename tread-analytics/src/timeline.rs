//! Daily revenue / order-count series

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;

use crate::money::to_f64;
use crate::period::ReportWindow;

/// Revenue trend data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTimelinePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub order_count: usize,
}

/// One point per calendar date of the window, zero-filled, ascending
pub fn daily_timeline(orders: &[Order], window: &ReportWindow) -> Vec<DailyTimelinePoint> {
    daily_series(orders, window, window.dates())
}

/// Zero-filled series over the given dates, bucketed in the window's timezone
pub(crate) fn daily_series(
    orders: &[Order],
    window: &ReportWindow,
    dates: impl Iterator<Item = NaiveDate>,
) -> Vec<DailyTimelinePoint> {
    let mut buckets: BTreeMap<NaiveDate, (Decimal, usize)> =
        dates.map(|d| (d, (Decimal::ZERO, 0))).collect();

    for order in orders.iter().filter(|o| o.status.is_revenue()) {
        if let Some((revenue, count)) = buckets.get_mut(&window.local_date(order.created_at)) {
            *revenue += order.total;
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (revenue, order_count))| DailyTimelinePoint {
            date,
            revenue: to_f64(revenue),
            order_count,
        })
        .collect()
}
