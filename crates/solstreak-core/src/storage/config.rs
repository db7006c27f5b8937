//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The default owner for CLI commands
//! - Streak week anchoring offset
//! - Dragon hunger cadence and status lines
//! - Harvest day rollover and villager roster
//!
//! Configuration is stored at `~/.config/solstreak/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::harvest::VILLAGER_NAMES;
use crate::hunger::{HungerClock, FOOD_SLOTS_MAX, HOURS_PER_SLOT, MAX_HOURS_PER_SLOT};
use crate::streak::{offset_from_hours, StreakCalculator};

/// Profile configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_owner_id")]
    pub owner_id: String,
}

/// Weekly streak configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Offset used to decide which calendar day "now" is.
    #[serde(default)]
    pub utc_offset_hours: i32,
    #[serde(default = "default_true")]
    pub longest_includes_current: bool,
}

/// Dragon hunger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragonConfig {
    #[serde(default = "default_hours_per_slot")]
    pub hours_per_slot: i64,
    #[serde(default = "default_max_slots")]
    pub max_slots: u8,
    #[serde(default = "default_feed_retry_limit")]
    pub feed_retry_limit: u32,
    /// Offset used for hourly status rotation.
    #[serde(default)]
    pub utc_offset_hours: i32,
    #[serde(default = "default_status_lines")]
    pub status_lines: Vec<String>,
}

/// Villager harvest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default = "default_eastern_offset")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,
    #[serde(default = "default_villagers")]
    pub villagers: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/solstreak/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub dragon: DragonConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
}

// Default functions
fn default_owner_id() -> String {
    "local".into()
}
fn default_true() -> bool {
    true
}
fn default_hours_per_slot() -> i64 {
    HOURS_PER_SLOT
}
fn default_max_slots() -> u8 {
    FOOD_SLOTS_MAX
}
fn default_feed_retry_limit() -> u32 {
    3
}
fn default_eastern_offset() -> i32 {
    -4
}
fn default_reset_hour() -> u32 {
    23
}
fn default_status_lines() -> Vec<String> {
    [
        "Solis is curled up by the hearth, tail flicking.",
        "Solis is watching the temple doors with great interest.",
        "Solis is chasing sunbeams across the floor.",
        "Solis is napping on a pile of warm stones.",
        "Solis sniffs the air, hoping for a snack.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_villagers() -> Vec<String> {
    VILLAGER_NAMES.into_iter().map(String::from).collect()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            owner_id: default_owner_id(),
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            longest_includes_current: true,
        }
    }
}

impl Default for DragonConfig {
    fn default() -> Self {
        Self {
            hours_per_slot: default_hours_per_slot(),
            max_slots: default_max_slots(),
            feed_retry_limit: default_feed_retry_limit(),
            utc_offset_hours: 0,
            status_lines: default_status_lines(),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_eastern_offset(),
            reset_hour: default_reset_hour(),
            villagers: default_villagers(),
        }
    }
}

impl StreakConfig {
    pub fn offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }

    pub fn calculator(&self) -> StreakCalculator {
        StreakCalculator::with_longest_includes_current(self.longest_includes_current)
    }
}

impl DragonConfig {
    pub fn offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }

    pub fn clock(&self) -> HungerClock {
        HungerClock::with_cadence(self.hours_per_slot, self.max_slots)
    }
}

impl HarvestConfig {
    pub fn offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }

    pub fn is_villager(&self, name: &str) -> bool {
        self.villagers.iter().any(|v| v == name)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Returns error if key is unknown.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Range checks that the type system does not express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.dragon.hours_per_slot;
        if !(1..=MAX_HOURS_PER_SLOT).contains(&hours) {
            return Err(ConfigError::InvalidValue {
                key: "dragon.hours_per_slot".into(),
                message: format!("{hours} is outside 1..={MAX_HOURS_PER_SLOT}"),
            });
        }
        if self.dragon.max_slots == 0 {
            return Err(ConfigError::InvalidValue {
                key: "dragon.max_slots".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.dragon.hours_per_slot, 8);
        assert_eq!(parsed.dragon.max_slots, 3);
        assert_eq!(parsed.harvest.reset_hour, 23);
        assert_eq!(parsed.harvest.villagers.len(), 6);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[dragon]\nhours_per_slot = 4\n").unwrap();
        assert_eq!(parsed.dragon.hours_per_slot, 4);
        assert_eq!(parsed.dragon.max_slots, 3);
        assert_eq!(parsed.profile.owner_id, "local");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("streak.longest_includes_current").as_deref(), Some("true"));
        assert_eq!(cfg.get("dragon.hours_per_slot").as_deref(), Some("8"));
        assert_eq!(cfg.get("profile.owner_id").as_deref(), Some("local"));
        assert!(cfg.get("dragon.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("streak.longest_includes_current", "false").unwrap();
        cfg.apply("harvest.utc_offset_hours", "-5").unwrap();
        cfg.apply("profile.owner_id", "amy").unwrap();
        cfg.apply("harvest.villagers", r#"["Ajax"]"#).unwrap();

        assert!(!cfg.streak.longest_includes_current);
        assert_eq!(cfg.harvest.utc_offset_hours, -5);
        assert_eq!(cfg.profile.owner_id, "amy");
        assert_eq!(cfg.harvest.villagers, vec!["Ajax".to_string()]);
    }

    #[test]
    fn apply_rejects_unknown_and_malformed() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("dragon.wings", "2"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("dragon.max_slots", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // out of range for u8
        assert!(cfg.apply("dragon.max_slots", "300").is_err());
        assert_eq!(cfg.dragon.max_slots, 3);
    }

    #[test]
    fn apply_rejects_out_of_range_cadence() {
        let mut cfg = Config::default();
        let err = cfg
            .apply("dragon.hours_per_slot", "1000000000000000")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "dragon.hours_per_slot"));
        assert!(cfg.apply("dragon.hours_per_slot", "0").is_err());
        assert!(cfg.apply("dragon.max_slots", "0").is_err());
        assert_eq!(cfg.dragon.hours_per_slot, 8);
        assert_eq!(cfg.dragon.max_slots, 3);

        cfg.apply("dragon.hours_per_slot", "8760").unwrap();
        assert_eq!(cfg.dragon.clock().hours_per_slot(), 8760);
    }

    #[test]
    fn load_from_rejects_out_of_range_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dragon]\nhours_per_slot = 1000000000000000\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.profile.owner_id, "local");
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("dragon.feed_retry_limit", "5").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dragon.feed_retry_limit, 5);
    }

    #[test]
    fn derived_helpers_use_configured_values() {
        let mut cfg = Config::default();
        cfg.apply("dragon.hours_per_slot", "6").unwrap();
        assert_eq!(cfg.dragon.clock().hours_per_slot(), 6);
        assert_eq!(cfg.harvest.offset().local_minus_utc(), -4 * 3600);
        assert!(cfg.harvest.is_villager("Tessa"));
        assert!(!cfg.harvest.is_villager("Solis"));
    }
}
