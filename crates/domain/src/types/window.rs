//! Month-granularity reporting windows.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive month range, both ends in `YYYY-MM` form.
///
/// Containment is a lexical string comparison. That is deliberate: the
/// zero-padded ISO format makes string order identical to chronological
/// order, and both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub start: String,
    pub end: String,
}

impl MonthWindow {
    /// Window spanning `start` through `end`, both inclusive.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    /// Window covering a single month.
    pub fn single(month: impl Into<String>) -> Self {
        let month = month.into();
        Self { start: month.clone(), end: month }
    }

    /// The previous calendar month relative to `now`.
    pub fn previous_month(now: DateTime<Utc>) -> Self {
        Self::single(previous_month_string(now))
    }

    /// January of the report year through the previous calendar month
    /// relative to `now`.
    pub fn year_to_date(now: DateTime<Utc>) -> Self {
        Self::ytd_through(&previous_month_string(now))
    }

    /// January of `month`'s year through `month`. Falls back to a
    /// single-month window when the string is too short to carry a year.
    pub fn ytd_through(month: &str) -> Self {
        match month.get(..4) {
            Some(year) => Self::new(format!("{year}-01"), month),
            None => Self::single(month),
        }
    }

    /// Whether `month` (`YYYY-MM`) falls inside the window, bounds
    /// included.
    pub fn contains(&self, month: &str) -> bool {
        self.start.as_str() <= month && month <= self.end.as_str()
    }

    /// Human-readable form for logs and report labels.
    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.clone()
        } else {
            format!("{} to {}", self.start, self.end)
        }
    }
}

fn previous_month_string(now: DateTime<Utc>) -> String {
    let (year, month) = match now.month() {
        1 => (now.year() - 1, 12),
        m => (now.year(), m - 1),
    };
    format!("{year:04}-{month:02}")
}

/// Month (`YYYY-MM`) of an epoch-milliseconds timestamp, in UTC.
///
/// Returns `None` for timestamps outside chrono's representable range,
/// which callers treat the same as a missing timestamp.
pub fn month_of_epoch_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.format("%Y-%m").to_string())
}
