//! Default date window for new queries.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the trailing window, in days.
pub const TRAILING_WINDOW_DAYS: u64 = 14;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Number of days between `start` and `end`.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// The two-week window ending on `end`.
#[must_use]
pub fn trailing_window(end: NaiveDate) -> DateRange {
    let start = end
        .checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);
    DateRange { start, end }
}

/// The two-week window ending today (local time).
#[must_use]
pub fn past_two_weeks() -> DateRange {
    trailing_window(Local::now().date_naive())
}

/// Parse a date as it appears in URLs. Accepts `YYYY-MM-DD` optionally followed
/// by a time part, which is ignored.
#[must_use]
pub fn parse_url_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
