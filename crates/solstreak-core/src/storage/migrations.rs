//! Database schema migrations for solstreak.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    match conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: weekly activity and dragon state.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS weekly_activity (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id    TEXT NOT NULL,
            week_start  TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            UNIQUE(owner_id, week_start)
        );

        CREATE TABLE IF NOT EXISTS dragon_state (
            owner_id            TEXT PRIMARY KEY,
            time_marker         TEXT NOT NULL,
            status_line_index   INTEGER NOT NULL DEFAULT 0,
            last_status_change  TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_weekly_activity_owner ON weekly_activity(owner_id, week_start);",
    )?;
    set_schema_version(conn, 1)
}

/// Migration v2: villager harvests.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS villager_harvests (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id       TEXT NOT NULL,
            villager_name  TEXT NOT NULL,
            harvest_date   TEXT NOT NULL,
            has_harvested  INTEGER NOT NULL DEFAULT 0,
            UNIQUE(owner_id, villager_name, harvest_date)
        );

        CREATE INDEX IF NOT EXISTS idx_villager_harvests_day ON villager_harvests(owner_id, harvest_date);",
    )?;
    set_schema_version(conn, 2)
}
