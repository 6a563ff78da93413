//! Money and ratio helpers
//!
//! Amounts are summed as `Decimal` and converted to `f64` only when a report
//! value is emitted. Every float leaving the engine goes through [`round2`] or
//! [`to_f64`], so NaN/Infinity never reach a caller.

use rust_decimal::prelude::*;

/// Rounding for emitted values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert Decimal to f64 for output, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// Round a computed float to 2 decimal places; non-finite input becomes 0
#[inline]
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator`, or 0 when the denominator is zero
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

/// Decimal average, 0 when `count` is zero
pub fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

/// Percent change `(current - previous) / previous × 100`, rounded
///
/// Defined as 0 when there is no previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    round2(ratio(current - previous, previous) * 100.0)
}
