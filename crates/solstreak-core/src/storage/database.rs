//! SQLite-backed storage for streaks and game state.
//!
//! Provides persistent storage for:
//! - Weekly activity markers (one row per owner and week)
//! - Dragon hunger and status state (one row per owner)
//! - Daily villager harvests
//!
//! The handle is passed explicitly to every service call; there is no
//! process-wide client.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, DatabaseError};
use crate::harvest::VillagerHarvest;
use crate::hunger::{HungerState, StatusTicker};
use crate::streak::WeekMarker;

use super::{data_dir, migrations};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted dragon row: hunger marker plus status rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonRow {
    pub owner_id: String,
    pub time_marker: DateTime<Utc>,
    pub status_line_index: u32,
    pub last_status_change: DateTime<Utc>,
}

impl DragonRow {
    pub fn hunger(&self) -> HungerState {
        HungerState {
            owner_id: self.owner_id.clone(),
            time_marker: self.time_marker,
        }
    }

    pub fn ticker(&self) -> StatusTicker {
        StatusTicker {
            status_line_index: self.status_line_index,
            last_status_change: self.last_status_change,
        }
    }
}

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/solstreak/solstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("solstreak.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // Weekly activity

    /// Record activity for the week starting `week_start`.
    ///
    /// Returns `false` when the week was already recorded.
    pub fn record_week(
        &self,
        owner_id: &str,
        week_start: NaiveDate,
        recorded_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO weekly_activity (owner_id, week_start, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                owner_id,
                week_start.format(DATE_FORMAT).to_string(),
                recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(inserted == 1)
    }

    /// All active weeks for an owner, most recent first.
    pub fn weekly_markers(&self, owner_id: &str) -> Result<Vec<WeekMarker>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT week_start FROM weekly_activity
             WHERE owner_id = ?1
             ORDER BY week_start DESC",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| row.get::<_, String>(0))?;

        let mut markers = Vec::new();
        for row in rows {
            markers.push(WeekMarker {
                owner_id: owner_id.to_string(),
                week_start: parse_date("week_start", &row?)?,
            });
        }
        Ok(markers)
    }

    // Dragon state

    pub fn dragon_row(&self, owner_id: &str) -> Result<Option<DragonRow>, DatabaseError> {
        let raw = self
            .conn
            .query_row(
                "SELECT time_marker, status_line_index, last_status_change
                 FROM dragon_state WHERE owner_id = ?1",
                params![owner_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        raw.map(|(marker, index, changed)| -> Result<DragonRow, DatabaseError> {
            Ok(DragonRow {
                owner_id: owner_id.to_string(),
                time_marker: parse_timestamp("time_marker", &marker)?,
                status_line_index: index,
                last_status_change: parse_timestamp("last_status_change", &changed)?,
            })
        })
        .transpose()
    }

    /// Insert a row unless one already exists. Returns whether it was inserted.
    pub fn insert_dragon_row(&self, row: &DragonRow) -> Result<bool, DatabaseError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO dragon_state
                (owner_id, time_marker, status_line_index, last_status_change, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.owner_id,
                row.time_marker.to_rfc3339(),
                row.status_line_index,
                row.last_status_change.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(inserted == 1)
    }

    /// Write `new` only if the stored marker still equals `expected`.
    ///
    /// Markers are compared as instants, so a row written with `Z` or a
    /// different fractional precision still matches. The write itself is
    /// guarded on the exact text that was read.
    ///
    /// Returns `false` when another writer got there first.
    pub fn compare_and_set_time_marker(
        &self,
        owner_id: &str,
        expected: DateTime<Utc>,
        new: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT time_marker FROM dragon_state WHERE owner_id = ?1",
                params![owner_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(false);
        };
        if parse_timestamp("time_marker", &stored)? != expected {
            return Ok(false);
        }

        let updated = self.conn.execute(
            "UPDATE dragon_state
             SET time_marker = ?3, updated_at = ?4
             WHERE owner_id = ?1 AND time_marker = ?2",
            params![owner_id, stored, new.to_rfc3339(), Utc::now().to_rfc3339()],
        )?;
        Ok(updated == 1)
    }

    pub fn update_status(&self, owner_id: &str, ticker: &StatusTicker) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE dragon_state
             SET status_line_index = ?2, last_status_change = ?3, updated_at = ?4
             WHERE owner_id = ?1",
            params![
                owner_id,
                ticker.status_line_index,
                ticker.last_status_change.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Remove the dragon row. Returns whether a row existed.
    pub fn delete_dragon_row(&self, owner_id: &str) -> Result<bool, DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM dragon_state WHERE owner_id = ?1",
            params![owner_id],
        )?;
        Ok(deleted > 0)
    }

    // Villager harvests

    pub fn harvests_on(
        &self,
        owner_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<VillagerHarvest>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT villager_name, has_harvested FROM villager_harvests
             WHERE owner_id = ?1 AND harvest_date = ?2
             ORDER BY villager_name",
        )?;
        let rows = stmt.query_map(params![owner_id, day.format(DATE_FORMAT).to_string()], |row| {
            Ok(VillagerHarvest {
                owner_id: owner_id.to_string(),
                villager_name: row.get(0)?,
                harvest_date: day,
                has_harvested: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn has_harvested(
        &self,
        owner_id: &str,
        villager_name: &str,
        day: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let flag = self
            .conn
            .query_row(
                "SELECT has_harvested FROM villager_harvests
                 WHERE owner_id = ?1 AND villager_name = ?2 AND harvest_date = ?3",
                params![owner_id, villager_name, day.format(DATE_FORMAT).to_string()],
                |row| row.get::<_, bool>(0),
            )
            .optional()?;
        Ok(flag.unwrap_or(false))
    }

    /// Mark a villager harvested for `day`; repeating the call is harmless.
    pub fn upsert_harvest(
        &self,
        owner_id: &str,
        villager_name: &str,
        day: NaiveDate,
    ) -> Result<VillagerHarvest, DatabaseError> {
        self.conn.execute(
            "INSERT INTO villager_harvests (owner_id, villager_name, harvest_date, has_harvested)
             VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(owner_id, villager_name, harvest_date)
             DO UPDATE SET has_harvested = 1",
            params![owner_id, villager_name, day.format(DATE_FORMAT).to_string()],
        )?;
        Ok(VillagerHarvest {
            owner_id: owner_id.to_string(),
            villager_name: villager_name.to_string(),
            harvest_date: day,
            has_harvested: true,
        })
    }

    /// Delete all harvests for `day`. Returns the number of rows removed.
    pub fn delete_harvests_on(&self, owner_id: &str, day: NaiveDate) -> Result<usize, DatabaseError> {
        Ok(self.conn.execute(
            "DELETE FROM villager_harvests WHERE owner_id = ?1 AND harvest_date = ?2",
            params![owner_id, day.format(DATE_FORMAT).to_string()],
        )?)
    }
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::Corrupt {
            column: column.to_string(),
            value: value.to_string(),
        })
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DatabaseError::Corrupt {
        column: column.to_string(),
        value: value.to_string(),
    })
}
