mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DragonConfig, HarvestConfig, ProfileConfig, StreakConfig};
pub use database::{Database, DragonRow};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/solstreak[-dev]/` based on SOLSTREAK_ENV.
///
/// Set SOLSTREAK_ENV=dev to use the development data directory, or
/// SOLSTREAK_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SOLSTREAK_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SOLSTREAK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("solstreak-dev")
            } else {
                base_dir.join("solstreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
