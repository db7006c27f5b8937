//! Consecutive-week streak calculation.
//!
//! Weeks are compared as calendar dates (their Monday), never as elapsed
//! hours, so daylight-saving transitions cannot shift a week boundary.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::week::{week_start, WeekMarker};

/// Current and longest streak for one owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Streak calculator over a snapshot of week markers.
#[derive(Debug, Clone)]
pub struct StreakCalculator {
    longest_includes_current: bool,
}

impl StreakCalculator {
    /// Calculator whose longest streak always covers the current one.
    pub fn new() -> Self {
        Self {
            longest_includes_current: true,
        }
    }

    /// When `false`, the longest streak only reflects the forward history scan.
    pub fn with_longest_includes_current(longest_includes_current: bool) -> Self {
        Self {
            longest_includes_current,
        }
    }

    /// Compute both streaks for `markers` as of the calendar date `today`.
    ///
    /// Markers are normalized to their Monday and deduplicated first, so both
    /// numbers come from the same set of weeks.
    pub fn calculate<'a, I>(&self, markers: I, today: NaiveDate) -> StreakResult
    where
        I: IntoIterator<Item = &'a WeekMarker>,
    {
        let weeks = distinct_weeks(markers);
        let current_streak = Self::current_streak(&weeks, today);
        let historical = Self::longest_streak(&weeks);

        let longest_streak = if self.longest_includes_current {
            historical.max(current_streak)
        } else {
            historical
        };

        StreakResult {
            current_streak,
            longest_streak,
        }
    }

    /// Consecutive weeks ending at the current week.
    ///
    /// If the current week has no activity yet, the run may instead end at the
    /// previous week: an unfinished week does not break a streak. Weeks after
    /// the current one are ignored here rather than ending the streak.
    pub fn current_streak(weeks: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
        let this_week = week_start(today);
        let last_week = this_week - Duration::days(7);

        let mut check = if weeks.contains(&this_week) {
            this_week
        } else if weeks.contains(&last_week) {
            last_week
        } else {
            return 0;
        };

        let mut streak = 0;
        while weeks.contains(&check) {
            streak += 1;
            check -= Duration::days(7);
        }
        streak
    }

    /// Longest run of weeks exactly seven days apart, anywhere in history.
    pub fn longest_streak(weeks: &BTreeSet<NaiveDate>) -> u32 {
        let mut iter = weeks.iter();
        let Some(mut prev) = iter.next() else {
            return 0;
        };

        let mut max_streak = 1;
        let mut run = 1;
        for week in iter {
            if (*week - *prev).num_days() == 7 {
                run += 1;
                max_streak = max_streak.max(run);
            } else {
                run = 1;
            }
            prev = week;
        }
        max_streak
    }
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized, deduplicated week starts in ascending order.
pub fn distinct_weeks<'a, I>(markers: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a WeekMarker>,
{
    markers
        .into_iter()
        .map(|m| week_start(m.week_start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday; its week starts on Monday 2024-06-10.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn this_week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn weeks_ago(n: i64) -> WeekMarker {
        WeekMarker {
            owner_id: "amy".into(),
            week_start: this_week() - Duration::weeks(n),
        }
    }

    fn calc(markers: &[WeekMarker]) -> StreakResult {
        StreakCalculator::new().calculate(markers, today())
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(calc(&[]), StreakResult::default());
    }

    #[test]
    fn single_marker_this_week() {
        let result = calc(&[weeks_ago(0)]);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
    }

    #[test]
    fn three_consecutive_weeks() {
        let result = calc(&[weeks_ago(0), weeks_ago(1), weeks_ago(2)]);
        assert_eq!(result.current_streak, 3);
        assert_eq!(result.longest_streak, 3);
    }

    #[test]
    fn gap_breaks_streak() {
        let result = calc(&[weeks_ago(0), weeks_ago(2)]);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
    }

    #[test]
    fn longest_can_exceed_current() {
        let mut markers: Vec<WeekMarker> = (3..8).map(weeks_ago).collect();
        markers.push(weeks_ago(0));
        let result = calc(&markers);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 5);
    }

    #[test]
    fn unfinished_week_does_not_break_streak() {
        let result = calc(&[weeks_ago(1), weeks_ago(2)]);
        assert_eq!(result.current_streak, 2);
    }

    #[test]
    fn two_idle_weeks_reset_current() {
        let result = calc(&[weeks_ago(2), weeks_ago(3)]);
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.longest_streak, 2);
    }

    #[test]
    fn duplicates_count_once() {
        let once = calc(&[weeks_ago(0), weeks_ago(1)]);
        let twice = calc(&[weeks_ago(0), weeks_ago(0), weeks_ago(1)]);
        assert_eq!(once, twice);
        assert_eq!(twice.longest_streak, 2);
    }

    #[test]
    fn unnormalized_dates_are_snapped_to_monday() {
        let mut thursday = weeks_ago(1);
        thursday.week_start += Duration::days(3);
        let result = calc(&[weeks_ago(0), thursday]);
        assert_eq!(result.current_streak, 2);
        assert_eq!(result.longest_streak, 2);
    }

    #[test]
    fn sunday_belongs_to_preceding_week() {
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let result = StreakCalculator::new().calculate(&[weeks_ago(0), weeks_ago(1)], sunday);
        assert_eq!(result.current_streak, 2);
    }

    #[test]
    fn future_weeks_do_not_extend_current() {
        let future = WeekMarker {
            owner_id: "amy".into(),
            week_start: this_week() + Duration::weeks(1),
        };
        let result = calc(&[future, weeks_ago(0)]);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 2);
    }

    #[test]
    fn longest_covers_current_by_default() {
        let markers: Vec<WeekMarker> = (0..4).map(weeks_ago).collect();
        let result = calc(&markers);
        assert!(result.longest_streak >= result.current_streak);
        assert_eq!(result.longest_streak, 4);
    }

    #[test]
    fn independent_mode_reports_history_only() {
        let markers: Vec<WeekMarker> = (0..4).map(weeks_ago).collect();
        let result =
            StreakCalculator::with_longest_includes_current(false).calculate(&markers, today());
        // Normalized input means the historical scan already sees the current run.
        assert_eq!(result.longest_streak, 4);
        assert_eq!(result.current_streak, 4);
    }

    #[test]
    fn longest_streak_of_single_week() {
        let weeks: BTreeSet<NaiveDate> = [this_week()].into_iter().collect();
        assert_eq!(StreakCalculator::longest_streak(&weeks), 1);
        assert_eq!(StreakCalculator::longest_streak(&BTreeSet::new()), 0);
    }
}
