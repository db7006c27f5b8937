//! Hourly status line rotation.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Edge-triggered counter that advances when the wall-clock hour changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTicker {
    pub status_line_index: u32,
    pub last_status_change: DateTime<Utc>,
}

impl StatusTicker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status_line_index: 0,
            last_status_change: now,
        }
    }

    /// Advance by one if `(day, hour)` at `now` differs from the last change.
    ///
    /// Several skipped hours still count as a single advance.
    pub fn observe(self, now: DateTime<Utc>, offset: FixedOffset) -> (Self, bool) {
        if day_hour(now, offset) == day_hour(self.last_status_change, offset) {
            return (self, false);
        }

        let next = Self {
            status_line_index: self.status_line_index.wrapping_add(1),
            last_status_change: now,
        };
        (next, true)
    }
}

fn day_hour(at: DateTime<Utc>, offset: FixedOffset) -> (u32, u32) {
    let local = at.with_timezone(&offset);
    (local.day(), local.hour())
}

/// Line for `index`, cycling through `lines`.
pub fn status_line<S: AsRef<str>>(index: u32, lines: &[S]) -> Option<&str> {
    if lines.is_empty() {
        return None;
    }
    Some(lines[index as usize % lines.len()].as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn same_hour_does_not_advance() {
        let ticker = StatusTicker::new(at("2024-06-12T10:05:00Z"));
        let (next, advanced) = ticker.observe(at("2024-06-12T10:59:59Z"), utc());
        assert!(!advanced);
        assert_eq!(next, ticker);
    }

    #[test]
    fn crossing_hour_boundary_advances_before_sixty_minutes() {
        let ticker = StatusTicker::new(at("2024-06-12T10:55:00Z"));
        let now = at("2024-06-12T11:01:00Z");
        let (next, advanced) = ticker.observe(now, utc());
        assert!(advanced);
        assert_eq!(next.status_line_index, 1);
        assert_eq!(next.last_status_change, now);
    }

    #[test]
    fn many_hours_advance_once() {
        let ticker = StatusTicker::new(at("2024-06-12T10:00:00Z"));
        let (next, _) = ticker.observe(at("2024-06-12T10:00:00Z") + Duration::hours(7), utc());
        assert_eq!(next.status_line_index, 1);
    }

    #[test]
    fn same_hour_on_another_day_advances() {
        let ticker = StatusTicker::new(at("2024-06-12T10:15:00Z"));
        let (_, advanced) = ticker.observe(at("2024-06-13T10:20:00Z"), utc());
        assert!(advanced);
    }

    #[test]
    fn status_line_cycles() {
        let lines = ["a", "b", "c"];
        assert_eq!(status_line(0, &lines), Some("a"));
        assert_eq!(status_line(4, &lines), Some("b"));
        assert_eq!(status_line::<&str>(1, &[]), None);
    }
}
