pub mod config;
pub mod dragon;
pub mod harvest;
pub mod streak;

use chrono::{DateTime, Utc};
use solstreak_core::Config;

/// Settings shared by every storage-backed command.
pub struct Context {
    pub config: Config,
    pub owner_id: String,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn new(
        owner: Option<String>,
        now: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let owner_id = owner.unwrap_or_else(|| config.profile.owner_id.clone());
        let now = match now {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| format!("invalid --now '{raw}': {e}"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };
        tracing::debug!(owner_id = %owner_id, %now, "command context");

        Ok(Self {
            config,
            owner_id,
            now,
        })
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
