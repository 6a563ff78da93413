//! Headline sales figures with comparison against the previous window

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;

use crate::money::{self, to_f64};
use crate::period::{Period, ReportWindow, WindowPosition};

/// Overview statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    pub cancelled_orders: usize,
    pub previous_revenue: f64,
    pub previous_orders: usize,
    /// Percent change vs previous window (0 when the previous value is 0)
    pub revenue_change: f64,
    pub orders_change: f64,
    pub avg_order_value_change: f64,
}

#[derive(Default)]
struct Totals {
    revenue: Decimal,
    orders: usize,
}

impl Totals {
    fn add(&mut self, order: &Order) {
        self.revenue += order.total;
        self.orders += 1;
    }

    fn avg_order_value(&self) -> Decimal {
        money::average(self.revenue, self.orders)
    }
}

pub fn overview(orders: &[Order], window: &ReportWindow) -> OverviewStats {
    let mut current = Totals::default();
    let mut previous = Totals::default();
    let mut cancelled_orders = 0;

    for order in orders {
        let position = window.position(order.created_at);
        if !order.status.is_revenue() {
            if position == WindowPosition::Current {
                cancelled_orders += 1;
            }
            continue;
        }
        match position {
            WindowPosition::Current => current.add(order),
            WindowPosition::Previous => previous.add(order),
            WindowPosition::Earlier | WindowPosition::Later => {}
        }
    }

    let revenue = to_f64(current.revenue);
    let previous_revenue = to_f64(previous.revenue);
    let aov = to_f64(current.avg_order_value());
    let previous_aov = to_f64(previous.avg_order_value());

    tracing::debug!(
        period = window.period.as_str(),
        orders = current.orders,
        revenue,
        "Computed overview"
    );

    OverviewStats {
        period: window.period,
        start_date: window.start,
        end_date: window.end,
        total_revenue: revenue,
        total_orders: current.orders,
        avg_order_value: aov,
        cancelled_orders,
        previous_revenue,
        previous_orders: previous.orders,
        revenue_change: money::percent_change(revenue, previous_revenue),
        orders_change: money::percent_change(current.orders as f64, previous.orders as f64),
        avg_order_value_change: money::percent_change(aov, previous_aov),
    }
}
