mod clock;
mod status;

pub use clock::{
    format_remaining, HungerClock, HungerState, SlotReading, FOOD_SLOTS_MAX, HOURS_PER_SLOT,
    MAX_HOURS_PER_SLOT,
};
pub use status::{status_line, StatusTicker};
