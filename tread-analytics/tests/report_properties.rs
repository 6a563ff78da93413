//! Whole-snapshot properties across the report functions

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus, Product, User};
use tread_analytics::{
    AnalyticsConfig, ForecastReport, Metric, Period, ReportWindow, customers, forecast, inventory,
    overview, quadrant, rollup, segmentation, timeline,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 30, 9, 0, 0).unwrap()
}

fn manila() -> Tz {
    "Asia/Manila".parse().unwrap()
}

struct Snapshot {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    products: Vec<Product>,
    users: Vec<User>,
}

/// Sixty days of trade for a handful of customers and products
fn snapshot() -> Snapshot {
    let statuses = [
        OrderStatus::Delivered,
        OrderStatus::Shipped,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::PendingPayment,
    ];
    let products: Vec<Product> = (1..=6)
        .map(|id| Product {
            id,
            name: format!("Tyre {id}"),
            brand: ["Michelin", "Bridgestone", "Pirelli"][(id % 3) as usize].to_string(),
            category: ["SUV", "Passenger"][(id % 2) as usize].to_string(),
            price: Decimal::new(2500 + id * 500, 0),
            stock: (id * 7 % 40) as i32,
            cost: (id % 2 == 0).then(|| Decimal::new(1500 + id * 300, 0)),
        })
        .collect();

    let mut orders = Vec::new();
    let mut items = Vec::new();
    for n in 0..120_i64 {
        let product_id = n % 6 + 1;
        let quantity = (n % 4 + 1) as i32;
        let unit_price = Decimal::new(2500 + product_id * 500, 0);
        let created_at = now() - chrono::Duration::hours(n * 12 + 1);
        orders.push(Order {
            id: n + 1,
            user_id: n % 9 + 1,
            total: unit_price * Decimal::from(quantity),
            status: statuses[(n % 6) as usize],
            created_at,
        });
        items.push(OrderItem {
            order_id: n + 1,
            product_id,
            quantity,
            unit_price,
        });
    }

    let users = (1..=10)
        .map(|id| User {
            id,
            name: format!("Customer {id}"),
            email: format!("c{id}@example.com"),
            created_at: now() - chrono::Duration::days(id * 9),
        })
        .collect();

    Snapshot {
        orders,
        items,
        products,
        users,
    }
}

/// Every report serialized into one JSON string
fn render(s: &Snapshot, config: &AnalyticsConfig) -> String {
    let window = ReportWindow::new(Period::Month, now(), manila());
    let stock_window = ReportWindow::new(config.inventory.lookback, now(), manila());
    let value = serde_json::json!({
        "overview": overview::overview(&s.orders, &window),
        "timeline": timeline::daily_timeline(&s.orders, &window),
        "best_sellers": rollup::best_sellers(&s.orders, &s.items, &s.products, &window, 10),
        "brands": rollup::revenue_by_brand(&s.orders, &s.items, &s.products, &window),
        "categories": rollup::revenue_by_category(&s.orders, &s.items, &s.products, &window),
        "statuses": rollup::order_status_distribution(&s.orders, &window),
        "customers": customers::customer_stats(&s.users, &s.orders, &window),
        "forecast": forecast::forecast(&s.orders, &window, Metric::Revenue, &config.forecast),
        "segments": segmentation::customer_segments(&s.orders, now(), manila(), &config.churn),
        "churn": segmentation::churn_risk(&s.orders, now(), manila(), &config.churn),
        "inventory": inventory::recommendations(
            &s.orders, &s.items, &s.products, &stock_window, &config.inventory,
        ),
        "insights": quadrant::product_insights(&s.orders, &s.items, &s.products, &window),
    });
    serde_json::to_string(&value).unwrap()
}

#[test]
fn repeated_runs_are_byte_identical() {
    let config = AnalyticsConfig::default();
    let first = render(&snapshot(), &config);

    let mut shuffled = snapshot();
    shuffled.orders.reverse();
    shuffled.items.reverse();
    shuffled.products.reverse();
    shuffled.users.reverse();

    assert_eq!(first, render(&snapshot(), &config));
    assert_eq!(first, render(&shuffled, &config));
}

/// Non-finite floats serialize as `null`; the only optional field is the churn gap
fn unexpected_nulls(value: &serde_json::Value, key: &str) -> usize {
    match value {
        serde_json::Value::Null if key != "avg_gap_days" => 1,
        serde_json::Value::Array(items) => items.iter().map(|v| unexpected_nulls(v, key)).sum(),
        serde_json::Value::Object(map) => map.iter().map(|(k, v)| unexpected_nulls(v, k)).sum(),
        _ => 0,
    }
}

#[test]
fn no_non_finite_values_reach_the_output() {
    let json = render(&snapshot(), &AnalyticsConfig::default());
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(unexpected_nulls(&value, ""), 0);
    assert!(value["overview"]["total_revenue"].is_number());
}

#[test]
fn thirty_day_overview_of_three_orders() {
    let window = ReportWindow::new(Period::parse("30d"), now(), manila());
    let orders = vec![
        Order {
            id: 1,
            user_id: 1,
            total: Decimal::new(4000, 0),
            status: OrderStatus::Delivered,
            created_at: now() - chrono::Duration::days(3),
        },
        Order {
            id: 2,
            user_id: 2,
            total: Decimal::new(3500, 0),
            status: OrderStatus::Shipped,
            created_at: now() - chrono::Duration::days(10),
        },
        Order {
            id: 3,
            user_id: 3,
            total: Decimal::new(2500, 0),
            status: OrderStatus::Processing,
            created_at: now() - chrono::Duration::days(20),
        },
    ];

    let stats = overview::overview(&orders, &window);
    assert_eq!(stats.total_revenue, 10000.0);
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.avg_order_value, 3333.33);

    let series = timeline::daily_timeline(&orders, &window);
    assert_eq!(series.len(), 30);
    let summed: f64 = series.iter().map(|p| p.revenue).sum();
    assert_eq!(summed, 10000.0);
}

#[test]
fn sparse_history_reports_insufficient_data() {
    let window = ReportWindow::new(Period::Week, now(), manila());
    let orders: Vec<Order> = (0..3)
        .map(|d| Order {
            id: d + 1,
            user_id: 1,
            total: Decimal::new(100, 0),
            status: OrderStatus::Delivered,
            created_at: now() - chrono::Duration::days(d),
        })
        .collect();
    let report = forecast::forecast(
        &orders,
        &window,
        Metric::parse("nonsense"),
        &AnalyticsConfig::default().forecast,
    );
    assert!(matches!(
        report,
        ForecastReport::InsufficientData {
            metric: Metric::Revenue,
            available_days: 3,
            ..
        }
    ));
}
