//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product (tyre SKU)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    /// Tyre type (e.g. "all_season", "performance", "off_road")
    pub category: String,
    /// Current list price
    pub price: Decimal,
    /// Units on hand
    pub stock: i32,
    /// Unit cost, when purchasing has recorded one
    pub cost: Option<Decimal>,
}
