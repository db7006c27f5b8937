//! Daily villager harvests.
//!
//! Each villager can be harvested once per game day. The game day rolls over
//! at a configurable local hour rather than at midnight.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Default roster.
pub const VILLAGER_NAMES: [&str; 6] = ["Ajax", "Leonidas", "Banner", "Lana", "Sapphira", "Tessa"];

/// One harvest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillagerHarvest {
    pub owner_id: String,
    pub villager_name: String,
    pub harvest_date: NaiveDate,
    pub has_harvested: bool,
}

/// Game day for `now`: the local date, moved to tomorrow once the local hour
/// reaches `reset_hour`.
pub fn game_day(now: DateTime<Utc>, offset: FixedOffset, reset_hour: u32) -> NaiveDate {
    let local = now.with_timezone(&offset);
    if local.hour() >= reset_hour {
        local.date_naive() + Duration::days(1)
    } else {
        local.date_naive()
    }
}
