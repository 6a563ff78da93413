//! Fixtures for unit tests

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus, Product, User};

use crate::period::{Period, ReportWindow};

/// Reference "now" for every fixture window: 2026-03-30 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 30, 12, 0, 0).unwrap()
}

/// Noon UTC on the given date
pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn window(period: Period) -> ReportWindow {
    ReportWindow::new(period, now(), Tz::UTC)
}

/// 2026-03-01..=2026-03-30, previous 2026-01-30..=2026-02-28
pub fn window_30d() -> ReportWindow {
    window(Period::Month)
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn order(
    id: i64,
    user_id: i64,
    total: &str,
    status: OrderStatus,
    created_at: DateTime<Utc>,
) -> Order {
    Order {
        id,
        user_id,
        total: dec(total),
        status,
        created_at,
    }
}

pub fn item(order_id: i64, product_id: i64, quantity: i32, unit_price: &str) -> OrderItem {
    OrderItem {
        order_id,
        product_id,
        quantity,
        unit_price: dec(unit_price),
    }
}

pub fn product(id: i64, brand: &str, category: &str, price: &str, stock: i32) -> Product {
    Product {
        id,
        name: format!("{brand} tyre #{id}"),
        brand: brand.to_string(),
        category: category.to_string(),
        price: dec(price),
        stock,
        cost: None,
    }
}

pub fn user(id: i64, created_at: DateTime<Utc>) -> User {
    User {
        id,
        name: format!("Customer {id}"),
        email: format!("customer{id}@example.com"),
        created_at,
    }
}
