//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Variant order is the canonical display order for status charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    /// Stock reserved, being prepared
    #[serde(alias = "reserved")]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::PendingPayment,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order counts toward revenue figures
    pub fn is_revenue(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized order status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending_payment" | "pending" => Ok(Self::PendingPayment),
            "processing" | "reserved" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownOrderStatus(s.to_string())),
        }
    }
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Order line; `unit_price` is frozen at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// quantity × unit_price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("reserved".parse::<OrderStatus>(), Ok(OrderStatus::Processing));
        assert_eq!(" Delivered ".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!("canceled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"pending_payment\"");
        let parsed: OrderStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(parsed, OrderStatus::Processing);
    }

    #[test]
    fn test_only_cancelled_excluded_from_revenue() {
        let revenue: Vec<_> = OrderStatus::ALL
            .iter()
            .filter(|s| s.is_revenue())
            .collect();
        assert_eq!(revenue.len(), 4);
        assert!(!OrderStatus::Cancelled.is_revenue());
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            order_id: 1,
            product_id: 7,
            quantity: 4,
            unit_price: Decimal::new(349_950, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(1_399_800, 2));
    }
}
