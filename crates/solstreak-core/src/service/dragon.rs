//! Dragon hunger and status, backed by one row per owner.
//!
//! Every write of the time marker is conditional on the marker that was read,
//! so two sessions feeding at once cannot both spend the same slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::require_owner;
use crate::error::{CoreError, FeedError, Result};
use crate::hunger::{format_remaining, status_line, HungerClock, HungerState, StatusTicker};
use crate::storage::{Database, DragonConfig, DragonRow};

/// Dragon snapshot for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragonStatus {
    pub owner_id: String,
    pub current_slots: u8,
    pub max_slots: u8,
    pub milliseconds_until_next_slot: i64,
    /// Countdown text, absent when full.
    pub next_slot_in: Option<String>,
    pub status_line_index: u32,
    pub status_line: Option<String>,
    pub time_marker: DateTime<Utc>,
}

/// Outcome of a successful feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedOutcome {
    pub slots_before: u8,
    pub slots_after: u8,
    pub state: HungerState,
}

/// Fetch the owner's row, creating a full one on first access.
pub fn load_or_init(
    db: &Database,
    config: &DragonConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<DragonRow> {
    require_owner(owner_id)?;
    let clock = config.clock();

    if let Some(row) = db.dragon_row(owner_id)? {
        if clock.is_marker_ahead(&row.hunger(), now) {
            warn!(owner_id, time_marker = %row.time_marker, "time marker is in the future; reading as full");
        }
        return Ok(row);
    }

    let initial = clock.initial_state(owner_id, now);
    let row = DragonRow {
        owner_id: owner_id.to_string(),
        time_marker: initial.time_marker,
        status_line_index: 0,
        last_status_change: now,
    };

    if db.insert_dragon_row(&row)? {
        info!(owner_id, "created dragon state");
        return Ok(row);
    }

    // Another session created it between our read and insert.
    db.dragon_row(owner_id)?
        .ok_or_else(|| CoreError::Custom(format!("dragon state for '{owner_id}' vanished")))
}

/// Current slots and status line, advancing the hourly status if needed.
pub fn status(
    db: &Database,
    config: &DragonConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<DragonStatus> {
    let row = load_or_init(db, config, owner_id, now)?;

    let (ticker, advanced) = row.ticker().observe(now, config.offset());
    if advanced {
        db.update_status(owner_id, &ticker)?;
        debug!(owner_id, index = ticker.status_line_index, "status line advanced");
    }

    Ok(snapshot(&config.clock(), config, &row.hunger(), ticker, now))
}

/// Spend one slot.
///
/// Fails with [`FeedError::NoSlotsAvailable`] when empty, without writing.
pub fn feed(
    db: &Database,
    config: &DragonConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<FeedOutcome> {
    let clock = config.clock();
    let attempts = config.feed_retry_limit.max(1);

    for attempt in 1..=attempts {
        let current = load_or_init(db, config, owner_id, now)?.hunger();
        let slots_before = clock.calculate_slots(&current, now).current_slots;

        let next = match clock.feed(&current, now) {
            Ok(next) => next,
            Err(FeedError::NoSlotsAvailable) => {
                info!(owner_id, "feed refused: no slots available");
                return Err(FeedError::NoSlotsAvailable.into());
            }
        };

        if db.compare_and_set_time_marker(owner_id, current.time_marker, next.time_marker)? {
            let slots_after = clock.calculate_slots(&next, now).current_slots;
            info!(owner_id, slots_before, slots_after, "fed dragon");
            return Ok(FeedOutcome {
                slots_before,
                slots_after,
                state: next,
            });
        }

        warn!(owner_id, attempt, "time marker changed during feed; retrying");
    }

    Err(CoreError::ConcurrentUpdate {
        owner_id: owner_id.to_string(),
        attempts,
    })
}

/// Debug helper: add one slot (never past full).
pub fn grant_slot(
    db: &Database,
    config: &DragonConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<HungerState> {
    let clock = config.clock();
    let attempts = config.feed_retry_limit.max(1);

    for _ in 0..attempts {
        let current = load_or_init(db, config, owner_id, now)?.hunger();
        let next = clock.grant_slot(&current, now);
        if next == current {
            return Ok(current);
        }
        if db.compare_and_set_time_marker(owner_id, current.time_marker, next.time_marker)? {
            info!(owner_id, "granted food slot");
            return Ok(next);
        }
    }

    Err(CoreError::ConcurrentUpdate {
        owner_id: owner_id.to_string(),
        attempts,
    })
}

/// Debug helper: forget the owner's dragon state entirely.
pub fn reset(db: &Database, owner_id: &str) -> Result<bool> {
    require_owner(owner_id)?;
    let removed = db.delete_dragon_row(owner_id)?;
    if removed {
        warn!(owner_id, "dragon state reset");
    }
    Ok(removed)
}

fn snapshot(
    clock: &HungerClock,
    config: &DragonConfig,
    hunger: &HungerState,
    ticker: StatusTicker,
    now: DateTime<Utc>,
) -> DragonStatus {
    let reading = clock.calculate_slots(hunger, now);
    let next_slot_in = (reading.current_slots < clock.max_slots())
        .then(|| format_remaining(reading.milliseconds_until_next_slot));

    DragonStatus {
        owner_id: hunger.owner_id.clone(),
        current_slots: reading.current_slots,
        max_slots: clock.max_slots(),
        milliseconds_until_next_slot: reading.milliseconds_until_next_slot,
        next_slot_in,
        status_line_index: ticker.status_line_index,
        status_line: status_line(ticker.status_line_index, &config.status_lines).map(String::from),
        time_marker: hunger.time_marker,
    }
}
