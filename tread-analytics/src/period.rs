//! Report periods and the calendar windows they resolve to

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared::util;

/// Reporting period selectable from the dashboard
///
/// Unrecognized values resolve to [`Period::Month`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    /// `7d`
    Week,
    /// `30d`
    #[default]
    Month,
    /// `90d`
    Quarter,
    /// `1y`
    Year,
}

impl Period {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "7d" => Self::Week,
            "30d" => Self::Month,
            "90d" => Self::Quarter,
            "1y" | "365d" => Self::Year,
            other => {
                tracing::debug!(period = %other, "Unrecognized period, using 30d");
                Self::Month
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::Year => "1y",
        }
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Where an instant falls relative to a [`ReportWindow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Before the previous window
    Earlier,
    /// Inside the comparison window
    Previous,
    /// Inside the reported window
    Current,
    /// After the window end (clock skew, future-dated rows)
    Later,
}

/// Calendar window of a report, in store-local dates (both ends inclusive)
///
/// The current window spans exactly `period.days()` dates ending today; the
/// previous window is the same number of dates immediately before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub period: Period,
    #[serde(skip)]
    pub tz: Tz,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub previous_start: NaiveDate,
    pub previous_end: NaiveDate,
}

impl ReportWindow {
    pub fn new(period: Period, now: DateTime<Utc>, tz: Tz) -> Self {
        let end = util::local_date(now, tz);
        let days = period.days();
        let start = end - Duration::days(days - 1);
        let previous_end = start - Duration::days(1);
        let previous_start = previous_end - Duration::days(days - 1);
        Self {
            period,
            tz,
            start,
            end,
            previous_start,
            previous_end,
        }
    }

    pub fn days(&self) -> i64 {
        self.period.days()
    }

    /// Store-local calendar date of an instant
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        util::local_date(at, self.tz)
    }

    pub fn position(&self, at: DateTime<Utc>) -> WindowPosition {
        self.position_of_date(self.local_date(at))
    }

    pub fn position_of_date(&self, date: NaiveDate) -> WindowPosition {
        if date > self.end {
            WindowPosition::Later
        } else if date >= self.start {
            WindowPosition::Current
        } else if date >= self.previous_start {
            WindowPosition::Previous
        } else {
            WindowPosition::Earlier
        }
    }

    /// Every date of the current window, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..self.days()).map(move |offset| start + Duration::days(offset))
    }

    /// UTC bounds `[from, to)` covering previous + current window, for data fetches
    pub fn fetch_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            util::day_start_utc(self.previous_start, self.tz),
            util::day_end_utc(self.end, self.tz),
        )
    }
}
