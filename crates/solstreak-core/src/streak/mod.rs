mod calculator;
mod week;

pub use calculator::{distinct_weeks, StreakCalculator, StreakResult};
pub use week::{local_date, offset_from_hours, week_start, WeekMarker};
