//! Database schema migrations for fighting-demons.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

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
pub(crate) fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: profile, daily records, achievement unlocks.
///
/// The profile table holds at most one row (`slot = 1`). Records and
/// unlocks are keyed so that upserts and repeated unlocks collapse.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc::indoc! {"
        CREATE TABLE IF NOT EXISTS profile (
            slot        INTEGER PRIMARY KEY CHECK (slot = 1),
            id          TEXT NOT NULL,
            data        TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_records (
            date        TEXT PRIMARY KEY,
            data        TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS achievement_unlocks (
            id          TEXT PRIMARY KEY,
            unlocked_at TEXT NOT NULL
        );
    "})?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    tx.commit()
}

/// Migration v2: denormalised slot count backing the active-dates query
/// that streaks are computed from.
///
/// Rows written before v2 are backfilled from their JSON payload.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc::indoc! {"
        ALTER TABLE daily_records ADD COLUMN completed_slots INTEGER NOT NULL DEFAULT 0;
        UPDATE daily_records SET completed_slots =
              (COALESCE(json_extract(data, '$.dawn.completed'), 0) = 1)
            + (COALESCE(json_extract(data, '$.noon.completed'), 0) = 1)
            + (COALESCE(json_extract(data, '$.dusk.completed'), 0) = 1)
            WHERE json_valid(data);
        CREATE INDEX IF NOT EXISTS idx_daily_records_active
            ON daily_records(date) WHERE completed_slots > 0;
    "})?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
        for table in ["profile", "daily_records", "achievement_unlocks"] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }

        let has_column: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('daily_records') WHERE name = 'completed_slots'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(has_column, 1);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_incremental_migration() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        conn.execute(
            "INSERT INTO daily_records (date, data, updated_at) VALUES ('2024-01-01', '{}', '')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO daily_records (date, data, updated_at) VALUES ('2024-01-02', ?1, '')",
            [r#"{"date":"2024-01-02","dawn":{"completed":true},"dusk":{"completed":true}}"#],
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
        let slots = |date: &str| -> i64 {
            conn.query_row(
                "SELECT completed_slots FROM daily_records WHERE date = ?1",
                [date],
                |row| row.get(0),
            )
            .unwrap()
        };
        assert_eq!(slots("2024-01-01"), 0);
        assert_eq!(slots("2024-01-02"), 2);
    }

    #[test]
    fn failed_v2_leaves_version_at_one() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute_batch("ALTER TABLE daily_records ADD COLUMN completed_slots INTEGER")
            .unwrap();

        assert!(migrate_v2(&conn).is_err());
        assert_eq!(get_schema_version(&conn), 1);
    }

    #[test]
    fn profile_table_holds_one_row() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let err = conn.execute(
            "INSERT INTO profile (slot, id, data, updated_at) VALUES (2, 'x', '{}', '')",
            [],
        );
        assert!(err.is_err());
    }
}
