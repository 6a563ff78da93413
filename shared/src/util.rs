//! Time helpers for store timezone conversion
//!
//! Reports bucket orders by the calendar date they were placed on in the
//! store's timezone. Conversions between UTC instants and store dates live here
//! so the engine and the SQL range bounds agree on day boundaries.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date of a UTC instant in the store timezone
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Start of a store-local date (00:00:00) as a UTC instant
///
/// DST gap fallback: if local midnight does not exist, the naive time is taken as UTC.
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// End of a store-local date → next day's 00:00:00 as a UTC instant
///
/// Callers use `< end` (exclusive) semantics.
pub fn day_end_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_utc(next_day, tz)
}

/// Parse an IANA timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse timezone '{}': {}, falling back to UTC", name, e);
        Tz::UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        // 2026-03-01 17:30 UTC is already 2026-03-02 in Manila (UTC+8)
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 17, 30, 0).unwrap();
        let tz: Tz = "Asia/Manila".parse().unwrap();
        assert_eq!(local_date(at, tz), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(
            local_date(at, Tz::UTC),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_day_bounds() {
        let tz: Tz = "Asia/Manila".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(
            day_start_utc(date, tz),
            Utc.with_ymd_and_hms(2026, 3, 1, 16, 0, 0).unwrap()
        );
        assert_eq!(
            day_end_utc(date, tz),
            Utc.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(parse_timezone("Not/AZone"), Tz::UTC);
        assert_eq!(parse_timezone("Asia/Manila").name(), "Asia/Manila");
    }
}
