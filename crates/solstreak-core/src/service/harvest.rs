//! Villager harvests for the current game day.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::require_owner;
use crate::error::{Result, ValidationError};
use crate::harvest::{game_day, VillagerHarvest};
use crate::storage::{Database, HarvestConfig};

pub fn today(config: &HarvestConfig, now: DateTime<Utc>) -> NaiveDate {
    game_day(now, config.offset(), config.reset_hour)
}

/// Every configured villager with today's harvest flag.
pub fn roster(
    db: &Database,
    config: &HarvestConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<VillagerHarvest>> {
    require_owner(owner_id)?;
    let day = today(config, now);
    let done = db.harvests_on(owner_id, day)?;

    Ok(config
        .villagers
        .iter()
        .map(|name| VillagerHarvest {
            owner_id: owner_id.to_string(),
            villager_name: name.clone(),
            harvest_date: day,
            has_harvested: done
                .iter()
                .any(|h| &h.villager_name == name && h.has_harvested),
        })
        .collect())
}

pub fn has_harvested(
    db: &Database,
    config: &HarvestConfig,
    owner_id: &str,
    villager_name: &str,
    now: DateTime<Utc>,
) -> Result<bool> {
    require_owner(owner_id)?;
    Ok(db.has_harvested(owner_id, villager_name, today(config, now))?)
}

/// Mark `villager_name` harvested for today's game day.
pub fn mark(
    db: &Database,
    config: &HarvestConfig,
    owner_id: &str,
    villager_name: &str,
    now: DateTime<Utc>,
) -> Result<VillagerHarvest> {
    require_owner(owner_id)?;
    if !config.is_villager(villager_name) {
        return Err(ValidationError::UnknownVillager(villager_name.to_string()).into());
    }

    let harvest = db.upsert_harvest(owner_id, villager_name, today(config, now))?;
    info!(owner_id, villager_name, day = %harvest.harvest_date, "villager harvested");
    Ok(harvest)
}

/// Debug helper: clear today's harvests. Returns the number removed.
pub fn reset(
    db: &Database,
    config: &HarvestConfig,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<usize> {
    require_owner(owner_id)?;
    let removed = db.delete_harvests_on(owner_id, today(config, now))?;
    info!(owner_id, removed, "reset today's harvests");
    Ok(removed)
}
