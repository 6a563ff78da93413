//! Customer acquisition and retention figures

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Order, User};

use crate::money;
use crate::period::{Period, ReportWindow, WindowPosition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Registered on or before the window end
    pub total_customers: usize,
    pub new_customers: usize,
    pub previous_new_customers: usize,
    pub new_customers_change: f64,
    /// Distinct buyers in the window
    pub active_customers: usize,
    /// Active buyers who also ordered before the window
    pub returning_customers: usize,
    /// Percent of the previous window's buyers who bought again
    pub retention_rate: f64,
}

/// `orders` should reach back far enough to decide returning customers
pub fn customer_stats(users: &[User], orders: &[Order], window: &ReportWindow) -> CustomerStats {
    let mut total_customers = 0;
    let mut new_customers = 0;
    let mut previous_new_customers = 0;
    for user in users {
        match window.position(user.created_at) {
            WindowPosition::Later => continue,
            WindowPosition::Current => new_customers += 1,
            WindowPosition::Previous => previous_new_customers += 1,
            WindowPosition::Earlier => {}
        }
        total_customers += 1;
    }

    let mut active: BTreeSet<i64> = BTreeSet::new();
    let mut previous_active: BTreeSet<i64> = BTreeSet::new();
    let mut bought_before: BTreeSet<i64> = BTreeSet::new();
    for order in orders.iter().filter(|o| o.status.is_revenue()) {
        match window.position(order.created_at) {
            WindowPosition::Current => {
                active.insert(order.user_id);
            }
            WindowPosition::Previous => {
                previous_active.insert(order.user_id);
                bought_before.insert(order.user_id);
            }
            WindowPosition::Earlier => {
                bought_before.insert(order.user_id);
            }
            WindowPosition::Later => {}
        }
    }

    let returning_customers = active.intersection(&bought_before).count();
    let retained = previous_active.intersection(&active).count();
    let retention_rate = money::round2(
        money::ratio(retained as f64, previous_active.len() as f64) * 100.0,
    );

    CustomerStats {
        period: window.period,
        start_date: window.start,
        end_date: window.end,
        total_customers,
        new_customers,
        previous_new_customers,
        new_customers_change: money::percent_change(
            new_customers as f64,
            previous_new_customers as f64,
        ),
        active_customers: active.len(),
        returning_customers,
        retention_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, order, user, window_30d};
    use shared::models::OrderStatus;

    #[test]
    fn test_empty_snapshot() {
        let stats = customer_stats(&[], &[], &window_30d());
        assert_eq!(stats.total_customers, 0);
        assert_eq!(stats.retention_rate, 0.0);
        assert_eq!(stats.new_customers_change, 0.0);
    }

    #[test]
    fn test_acquisition_and_retention() {
        let users = vec![
            user(1, at(2025, 6, 1)),
            user(2, at(2026, 2, 5)),
            user(3, at(2026, 3, 4)),
            user(4, at(2026, 3, 20)),
            // registered after the window end
            user(5, at(2026, 4, 2)),
        ];
        let orders = vec![
            order(1, 1, "100", OrderStatus::Delivered, at(2025, 7, 1)),
            order(2, 1, "100", OrderStatus::Delivered, at(2026, 3, 2)),
            order(3, 2, "100", OrderStatus::Delivered, at(2026, 2, 6)),
            order(4, 2, "100", OrderStatus::Delivered, at(2026, 3, 6)),
            order(5, 3, "100", OrderStatus::Delivered, at(2026, 3, 7)),
            order(6, 4, "100", OrderStatus::Cancelled, at(2026, 3, 21)),
        ];
        let stats = customer_stats(&users, &orders, &window_30d());
        assert_eq!(stats.total_customers, 4);
        assert_eq!(stats.new_customers, 2);
        assert_eq!(stats.previous_new_customers, 1);
        assert_eq!(stats.new_customers_change, 100.0);
        assert_eq!(stats.active_customers, 3);
        assert_eq!(stats.returning_customers, 2);
        // user 2 was the only previous-window buyer and came back
        assert_eq!(stats.retention_rate, 100.0);
    }
}
