//! # Solstreak Core Library
//!
//! Time-based state for a small habit-and-pet companion: weekly activity
//! streaks, a dragon whose food slots regenerate over time, and daily
//! villager harvests.
//!
//! ## Architecture
//!
//! - **Calculators**: pure functions over timestamps. Every operation takes
//!   "now" as a parameter and never reads the wall clock.
//! - **Storage**: SQLite rows and TOML configuration. The [`Database`] handle
//!   is passed explicitly to each call.
//! - **Service**: loads rows, runs the calculators, writes results back and
//!   logs anomalies.
//!
//! ## Key Components
//!
//! - [`StreakCalculator`]: current and longest consecutive-week streaks
//! - [`HungerClock`]: slot regeneration and the feed transition
//! - [`StatusTicker`]: hourly status line rotation
//! - [`Config`]: application configuration management

pub mod error;
pub mod harvest;
pub mod hunger;
pub mod service;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, FeedError, ValidationError};
pub use harvest::{game_day, VillagerHarvest};
pub use hunger::{format_remaining, HungerClock, HungerState, SlotReading, StatusTicker};
pub use storage::{Config, Database, DragonRow};
pub use streak::{week_start, StreakCalculator, StreakResult, WeekMarker};
