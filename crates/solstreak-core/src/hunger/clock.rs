//! Regenerating food-slot clock.
//!
//! The only persisted value is a time marker. Slots are derived from the hours
//! elapsed since that marker: one slot per `hours_per_slot`, capped at
//! `max_slots`. Feeding moves the marker forward instead of storing a count.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Default hours needed to regenerate one slot.
pub const HOURS_PER_SLOT: i64 = 8;
/// Default slot capacity.
pub const FOOD_SLOTS_MAX: u8 = 3;
/// Longest slot width accepted: one year.
pub const MAX_HOURS_PER_SLOT: i64 = 24 * 365;

/// Persisted hunger state for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HungerState {
    pub owner_id: String,
    /// Reference point for elapsed time. Not the last feeding time.
    pub time_marker: DateTime<Utc>,
}

/// Slots derived from a [`HungerState`] at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotReading {
    pub current_slots: u8,
    /// Zero once the clock is full.
    pub milliseconds_until_next_slot: i64,
}

/// Slot thresholds and transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HungerClock {
    hours_per_slot: i64,
    max_slots: u8,
}

impl HungerClock {
    /// Eight hours per slot, three slots.
    pub fn new() -> Self {
        Self {
            hours_per_slot: HOURS_PER_SLOT,
            max_slots: FOOD_SLOTS_MAX,
        }
    }

    /// Custom cadence. Zero values are raised to one and the slot width is
    /// capped at [`MAX_HOURS_PER_SLOT`].
    pub fn with_cadence(hours_per_slot: i64, max_slots: u8) -> Self {
        Self {
            hours_per_slot: hours_per_slot.clamp(1, MAX_HOURS_PER_SLOT),
            max_slots: max_slots.max(1),
        }
    }

    pub fn hours_per_slot(&self) -> i64 {
        self.hours_per_slot
    }

    pub fn max_slots(&self) -> u8 {
        self.max_slots
    }

    fn slot_width(&self) -> Duration {
        Duration::hours(self.hours_per_slot)
    }

    /// `at` moved back by `slots` slot widths, saturating at the earliest
    /// representable instant (which still reads as full).
    fn slots_before(&self, at: DateTime<Utc>, slots: u8) -> DateTime<Utc> {
        at.checked_sub_signed(self.slot_width() * i32::from(slots))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// State for a new owner, full as of `now`.
    pub fn initial_state(&self, owner_id: impl Into<String>, now: DateTime<Utc>) -> HungerState {
        HungerState {
            owner_id: owner_id.into(),
            time_marker: self.slots_before(now, self.max_slots),
        }
    }

    /// Slots available at `now`.
    ///
    /// Threshold lower bounds are inclusive. A marker in the future reads as full.
    pub fn calculate_slots(&self, state: &HungerState, now: DateTime<Utc>) -> SlotReading {
        let elapsed_ms = (now - state.time_marker).num_milliseconds();
        if elapsed_ms < 0 {
            return self.full();
        }

        let slot_ms = self.slot_width().num_milliseconds();
        let earned = elapsed_ms / slot_ms;
        if earned >= i64::from(self.max_slots) {
            return self.full();
        }

        SlotReading {
            current_slots: earned as u8,
            milliseconds_until_next_slot: slot_ms * (earned + 1) - elapsed_ms,
        }
    }

    /// Whether `state` holds a marker later than `now`.
    pub fn is_marker_ahead(&self, state: &HungerState, now: DateTime<Utc>) -> bool {
        state.time_marker > now
    }

    /// Consume one slot.
    ///
    /// From full, the marker resets to `now` minus all but one slot width, so
    /// unused regeneration is not banked. From a partial level the marker
    /// advances by exactly one slot width, keeping progress toward the next slot.
    pub fn feed(&self, state: &HungerState, now: DateTime<Utc>) -> Result<HungerState, FeedError> {
        let reading = self.calculate_slots(state, now);

        let time_marker = match reading.current_slots {
            0 => return Err(FeedError::NoSlotsAvailable),
            n if n >= self.max_slots => self.slots_before(now, self.max_slots - 1),
            // A partial reading means a full slot width has elapsed, so this
            // cannot pass `now`.
            _ => state
                .time_marker
                .checked_add_signed(self.slot_width())
                .unwrap_or(now),
        };

        Ok(HungerState {
            owner_id: state.owner_id.clone(),
            time_marker,
        })
    }

    /// Add one slot by moving the marker back a slot width. No-op when full.
    pub fn grant_slot(&self, state: &HungerState, now: DateTime<Utc>) -> HungerState {
        let reading = self.calculate_slots(state, now);
        if reading.current_slots >= self.max_slots {
            return state.clone();
        }

        HungerState {
            owner_id: state.owner_id.clone(),
            time_marker: self.slots_before(state.time_marker, 1),
        }
    }

    fn full(&self) -> SlotReading {
        SlotReading {
            current_slots: self.max_slots,
            milliseconds_until_next_slot: 0,
        }
    }
}

impl Default for HungerClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown text: `"3h 12m"`, or `"45m"` below an hour.
pub fn format_remaining(milliseconds: i64) -> String {
    let total_minutes = milliseconds.max(0) / (1000 * 60);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
