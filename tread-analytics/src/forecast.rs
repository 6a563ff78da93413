//! Short-horizon sales forecast
//!
//! Linear trend over the daily history, optionally scaled by day-of-week
//! factors, with a symmetric confidence band of `z × residual_std`.
//!
//! The history is a trailing lookback ending today, independent of the
//! report window's own first day.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared::models::Order;

use crate::config::ForecastConfig;
use crate::money::{self, round2};
use crate::period::ReportWindow;
use crate::stats::LinearFit;
use crate::timeline::{DailyTimelinePoint, daily_series};

/// Forecast target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    Revenue,
    Orders,
}

impl Metric {
    /// Unrecognized values resolve to [`Metric::Revenue`]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "orders" | "order_count" => Self::Orders,
            "revenue" => Self::Revenue,
            other => {
                tracing::debug!(metric = %other, "Unrecognized metric, using revenue");
                Self::Revenue
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Orders => "orders",
        }
    }

    fn value(&self, point: &DailyTimelinePoint) -> f64 {
        match self {
            Self::Revenue => point.revenue,
            Self::Orders => point.order_count as f64,
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

/// Forecast outcome; too little history is a result, not an error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastReport {
    Available {
        metric: Metric,
        history: Vec<HistoricalPoint>,
        forecast: Vec<ForecastPoint>,
        /// Trend change per day
        trend_slope: f64,
        seasonality_applied: bool,
    },
    InsufficientData {
        metric: Metric,
        required_days: usize,
        available_days: usize,
        history: Vec<HistoricalPoint>,
    },
}

/// Days of history needed before weekday factors are used
const SEASONALITY_MIN_DAYS: usize = 14;

/// First date of the forecast lookback: `max(period, history_days)` days ending today
pub fn lookback_start(window: &ReportWindow, config: &ForecastConfig) -> NaiveDate {
    let days = window.days().max(i64::from(config.history_days));
    window.end - Duration::days(days - 1)
}

/// Daily metric series over the lookback, starting at the first day with activity
fn history(
    orders: &[Order],
    window: &ReportWindow,
    metric: Metric,
    config: &ForecastConfig,
) -> Vec<HistoricalPoint> {
    let end = window.end;
    let dates = lookback_start(window, config)
        .iter_days()
        .take_while(move |d| *d <= end);
    daily_series(orders, window, dates)
        .iter()
        .skip_while(|p| p.order_count == 0)
        .map(|p| HistoricalPoint {
            date: p.date,
            value: metric.value(p),
        })
        .collect()
}

/// Weekday factor (Mon = 0) = weekday average / overall average
fn weekday_factors(history: &[HistoricalPoint]) -> [f64; 7] {
    let mut sums = [0.0_f64; 7];
    let mut counts = [0_usize; 7];
    for point in history {
        let day = point.date.weekday().num_days_from_monday() as usize;
        sums[day] += point.value;
        counts[day] += 1;
    }

    let overall = money::ratio(history.iter().map(|p| p.value).sum(), history.len() as f64);
    let mut factors = [1.0_f64; 7];
    if overall <= 0.0 {
        return factors;
    }
    for day in 0..7 {
        if counts[day] > 0 {
            factors[day] = sums[day] / counts[day] as f64 / overall;
        }
    }
    factors
}

pub fn forecast(
    orders: &[Order],
    window: &ReportWindow,
    metric: Metric,
    config: &ForecastConfig,
) -> ForecastReport {
    let history = history(orders, window, metric, config);
    if history.len() < config.min_history_days {
        tracing::debug!(
            metric = metric.as_str(),
            available = history.len(),
            required = config.min_history_days,
            "Not enough history to forecast"
        );
        return ForecastReport::InsufficientData {
            metric,
            required_days: config.min_history_days,
            available_days: history.len(),
            history,
        };
    }

    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let fit = LinearFit::fit(&values);
    let seasonality_applied = config.seasonality && history.len() >= SEASONALITY_MIN_DAYS;
    let factors = if seasonality_applied {
        weekday_factors(&history)
    } else {
        [1.0; 7]
    };
    let margin = config.z_score * fit.residual_std;

    let last_date = history.last().map_or(window.end, |p| p.date);
    let n = history.len();
    let forecast = (0..config.horizon_days as usize)
        .map(|offset| {
            let date = last_date + Duration::days(offset as i64 + 1);
            let factor = factors[date.weekday().num_days_from_monday() as usize];
            let predicted = (fit.predict((n + offset) as f64) * factor).max(0.0);
            ForecastPoint {
                date,
                predicted: round2(predicted),
                confidence_lower: round2((predicted - margin).max(0.0)),
                confidence_upper: round2(predicted + margin),
            }
        })
        .collect();

    tracing::debug!(
        metric = metric.as_str(),
        history_days = n,
        slope = fit.slope,
        seasonality_applied,
        "Computed forecast"
    );

    ForecastReport::Available {
        metric,
        history,
        forecast,
        trend_slope: round2(fit.slope),
        seasonality_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::testing::{at, order, window, window_30d};
    use shared::models::OrderStatus;

    /// One delivered order per day for the given March dates
    fn daily_orders(days: std::ops::RangeInclusive<u32>, total: &str) -> Vec<Order> {
        days.map(|d| order(d as i64, 1, total, OrderStatus::Delivered, at(2026, 3, d)))
            .collect()
    }

    #[test]
    fn test_metric_parse_defaults_to_revenue() {
        assert_eq!(Metric::parse("orders"), Metric::Orders);
        assert_eq!(Metric::parse("profit"), Metric::Revenue);
    }

    #[test]
    fn test_short_history_is_insufficient() {
        // first activity on 2026-03-25 leaves 6 days up to 2026-03-30
        let orders = daily_orders(25..=30, "100");
        let report = forecast(&orders, &window_30d(), Metric::Revenue, &ForecastConfig::default());
        match report {
            ForecastReport::InsufficientData {
                required_days,
                available_days,
                history,
                ..
            } => {
                assert_eq!(required_days, 7);
                assert_eq!(available_days, 6);
                assert_eq!(history.len(), 6);
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
    }

    /// Daily delivered orders over `first..=last`, skipping `idle`
    fn orders_between(first: NaiveDate, last: NaiveDate, idle: &[NaiveDate]) -> Vec<Order> {
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| !idle.contains(d))
            .enumerate()
            .map(|(i, d)| {
                order(
                    i as i64 + 1,
                    1,
                    "100",
                    OrderStatus::Delivered,
                    at(d.year(), d.month(), d.day()),
                )
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_idle_first_window_day_keeps_earlier_history() {
        // the 7d window starts on the only idle day
        let idle = date(2026, 3, 24);
        let orders = orders_between(date(2026, 2, 1), date(2026, 3, 30), &[idle]);
        let report = forecast(
            &orders,
            &window(Period::Week),
            Metric::Revenue,
            &ForecastConfig::default(),
        );
        let ForecastReport::Available { history, .. } = report else {
            panic!("expected a forecast");
        };
        assert_eq!(history.len(), 58);
        assert_eq!(history[0].date, date(2026, 2, 1));
        let idle_point = history.iter().find(|p| p.date == idle).unwrap();
        assert_eq!(idle_point.value, 0.0);
    }

    #[test]
    fn test_lookback_bounds_history() {
        let orders = orders_between(date(2026, 2, 1), date(2026, 3, 30), &[]);
        let config = ForecastConfig {
            history_days: 14,
            ..ForecastConfig::default()
        };
        let report = forecast(&orders, &window(Period::Week), Metric::Orders, &config);
        let ForecastReport::Available { history, .. } = report else {
            panic!("expected a forecast");
        };
        assert_eq!(history.len(), 14);
        assert_eq!(history[0].date, date(2026, 3, 17));

        // a longer period widens the lookback
        assert_eq!(lookback_start(&window_30d(), &config), date(2026, 3, 1));
    }

    #[test]
    fn test_no_orders_is_insufficient() {
        let report = forecast(&[], &window(Period::Week), Metric::Orders, &ForecastConfig::default());
        assert!(matches!(
            report,
            ForecastReport::InsufficientData { available_days: 0, .. }
        ));
    }

    #[test]
    fn test_flat_history_forecasts_flat() {
        let orders = daily_orders(1..=30, "100");
        let report = forecast(&orders, &window_30d(), Metric::Revenue, &ForecastConfig::default());
        let ForecastReport::Available {
            forecast,
            history,
            seasonality_applied,
            trend_slope,
            ..
        } = report
        else {
            panic!("expected a forecast");
        };
        assert_eq!(history.len(), 30);
        assert!(seasonality_applied);
        assert_eq!(trend_slope, 0.0);
        assert_eq!(forecast.len(), 30);
        assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        for point in &forecast {
            assert_eq!(point.predicted, 100.0);
            assert_eq!(point.confidence_lower, 100.0);
            assert_eq!(point.confidence_upper, 100.0);
        }
        for pair in forecast.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
    }

    #[test]
    fn test_bounds_are_ordered_and_non_negative() {
        // steep decline with noise pushes the trend below zero
        let orders: Vec<Order> = (1..=30)
            .map(|d| {
                let total = if d % 2 == 0 { 3000 - d * 90 } else { 2500 - d * 80 };
                order(d as i64, 1, &total.to_string(), OrderStatus::Delivered, at(2026, 3, d))
            })
            .collect();
        let report = forecast(&orders, &window_30d(), Metric::Revenue, &ForecastConfig::default());
        let ForecastReport::Available { forecast, .. } = report else {
            panic!("expected a forecast");
        };
        for point in &forecast {
            assert!(point.predicted >= 0.0);
            assert!(point.confidence_lower >= 0.0);
            assert!(point.confidence_lower <= point.predicted);
            assert!(point.predicted <= point.confidence_upper);
            assert!(point.confidence_upper.is_finite());
        }
    }

    #[test]
    fn test_orders_metric_without_seasonality() {
        let orders = daily_orders(20..=30, "50");
        let config = ForecastConfig {
            seasonality: false,
            horizon_days: 5,
            ..ForecastConfig::default()
        };
        let report = forecast(&orders, &window_30d(), Metric::Orders, &config);
        let ForecastReport::Available {
            forecast,
            seasonality_applied,
            ..
        } = report
        else {
            panic!("expected a forecast");
        };
        assert!(!seasonality_applied);
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[0].predicted, 1.0);
    }

    #[test]
    fn test_report_is_tagged_by_status() {
        let report = forecast(&[], &window_30d(), Metric::Revenue, &ForecastConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["metric"], "revenue");
    }
}
