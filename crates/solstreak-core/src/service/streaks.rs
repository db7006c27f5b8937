//! Weekly activity recording and streak reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::require_owner;
use crate::error::Result;
use crate::storage::{Database, StreakConfig};
use crate::streak::{distinct_weeks, local_date, WeekMarker};

/// Streak payload for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStreakReport {
    /// Most recent first.
    pub weekly_activity: Vec<WeekMarker>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_active_weeks: usize,
}

/// Result of recording one activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedActivity {
    pub marker: WeekMarker,
    /// `false` when the week already had activity.
    pub newly_recorded: bool,
}

/// Mark the week containing `at` as active for `owner_id`.
pub fn record_activity(
    db: &Database,
    config: &StreakConfig,
    owner_id: &str,
    at: DateTime<Utc>,
) -> Result<RecordedActivity> {
    require_owner(owner_id)?;
    let marker = WeekMarker::for_date(owner_id, local_date(at, config.offset()));
    let newly_recorded = db.record_week(owner_id, marker.week_start, at)?;

    if newly_recorded {
        info!(owner_id, week_start = %marker.week_start, "recorded weekly activity");
    } else {
        debug!(owner_id, week_start = %marker.week_start, "week already active");
    }

    Ok(RecordedActivity {
        marker,
        newly_recorded,
    })
}

/// Current and longest streak for `owner_id` as of `now`.
pub fn weekly_report(
    db: &Database,
    config: &StreakConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<WeeklyStreakReport> {
    require_owner(owner_id)?;
    let weekly_activity = db.weekly_markers(owner_id)?;
    let today = local_date(now, config.offset());
    let result = config.calculator().calculate(&weekly_activity, today);

    Ok(WeeklyStreakReport {
        total_active_weeks: distinct_weeks(&weekly_activity).len(),
        current_streak: result.current_streak,
        longest_streak: result.longest_streak,
        weekly_activity,
    })
}
