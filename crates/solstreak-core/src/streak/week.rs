//! Monday-anchored calendar weeks.
//!
//! Streak weeks always start on Monday. This is independent of any display
//! preference for the first day of the week in calendar views.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Returns the Monday on or before `date`.
///
/// A Sunday belongs to the week that started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Calendar date of `at` as seen at the given UTC offset.
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Build a fixed offset from whole hours, falling back to UTC when out of range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix())
}

/// One week in which an owner had qualifying activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekMarker {
    pub owner_id: String,
    /// Always a Monday.
    pub week_start: NaiveDate,
}

impl WeekMarker {
    /// Marker for the week containing `date`.
    pub fn for_date(owner_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            owner_id: owner_id.into(),
            week_start: week_start(date),
        }
    }
}
