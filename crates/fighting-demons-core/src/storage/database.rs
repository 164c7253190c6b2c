//! SQLite-backed progress storage.
//!
//! Provides persistent storage for:
//! - The single user profile
//! - One daily record per calendar date
//! - Achievement unlocks (one row per id)
//!
//! Aggregates are stored as JSON documents keyed by their natural id so
//! that new fields only need a serde default, not a migration.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use super::{data_dir, migrations, DateRange, ProgressStore};
use crate::achievements::{AchievementId, AchievementUnlock};
use crate::error::StorageError;
use crate::profile::UserProfile;
use crate::record::DailyRecord;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "fighting-demons.db";

/// SQLite database for profile, records and unlocks.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/fighting-demons.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(data_dir()?.join(DB_FILE_NAME))
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened progress database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn decode<T: serde::de::DeserializeOwned>(
        entity: &'static str,
        key: &str,
        json: &str,
    ) -> Result<T, StorageError> {
        serde_json::from_str(json).map_err(|e| StorageError::Corrupt {
            entity,
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn encode<T: serde::Serialize>(
        entity: &'static str,
        key: &str,
        value: &T,
    ) -> Result<String, StorageError> {
        serde_json::to_string(value).map_err(|e| StorageError::Corrupt {
            entity,
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn record_for(&self, date: NaiveDate) -> Result<Option<DailyRecord>, StorageError> {
        let key = date.to_string();
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM daily_records WHERE date = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|json| Self::decode("daily_record", &key, &json))
            .transpose()
    }
}

impl ProgressStore for Database {
    fn get_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row("SELECT id, data FROM profile WHERE slot = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;
        row.map(|(id, json)| Self::decode("profile", &id, &json))
            .transpose()
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StorageError> {
        let id = profile.id.to_string();
        let data = Self::encode("profile", &id, profile)?;
        self.conn.execute(
            "INSERT INTO profile (slot, id, data, updated_at) VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                id = excluded.id,
                data = excluded.data,
                updated_at = excluded.updated_at",
            params![id, data, Utc::now().to_rfc3339()],
        )?;
        debug!(profile = %id, total_points = profile.total_points, "saved profile");
        Ok(())
    }

    fn records_in_range(&self, range: DateRange) -> Result<Vec<DailyRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, data FROM daily_records
             WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(
            params![range.start.to_string(), range.end.map(|d| d.to_string())],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (date, json) = row?;
            records.push(Self::decode("daily_record", &date, &json)?);
        }
        debug!(count = records.len(), "loaded daily records");
        Ok(records)
    }

    fn get_or_create_record(&mut self, date: NaiveDate) -> Result<DailyRecord, StorageError> {
        if let Some(record) = self.record_for(date)? {
            return Ok(record);
        }
        let record = DailyRecord::new(date);
        self.save_record(&record)?;
        Ok(record)
    }

    fn save_record(&mut self, record: &DailyRecord) -> Result<(), StorageError> {
        let key = record.date.to_string();
        let data = Self::encode("daily_record", &key, record)?;
        self.conn.execute(
            "INSERT INTO daily_records (date, data, updated_at, completed_slots)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                completed_slots = excluded.completed_slots",
            params![
                key,
                data,
                Utc::now().to_rfc3339(),
                record.completed_slots()
            ],
        )?;
        debug!(date = %key, "saved daily record");
        Ok(())
    }

    fn unlocked_achievements(&self) -> Result<Vec<AchievementUnlock>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, unlocked_at FROM achievement_unlocks ORDER BY unlocked_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut unlocks = Vec::new();
        for row in rows {
            let (id, at) = row?;
            let parsed_id = id
                .parse::<AchievementId>()
                .map_err(|e| StorageError::Corrupt {
                    entity: "achievement_unlock",
                    key: id.clone(),
                    message: e.to_string(),
                })?;
            let unlocked_at = DateTime::parse_from_rfc3339(&at)
                .map_err(|e| StorageError::Corrupt {
                    entity: "achievement_unlock",
                    key: id.clone(),
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            unlocks.push(AchievementUnlock {
                id: parsed_id,
                unlocked_at,
            });
        }
        Ok(unlocks)
    }

    fn record_achievement_unlock(
        &mut self,
        id: AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO achievement_unlocks (id, unlocked_at) VALUES (?1, ?2)",
            params![id.as_str(), at.to_rfc3339()],
        )?;
        debug!(achievement = %id, inserted = inserted > 0, "recorded unlock");
        Ok(inserted > 0)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let sp = self.conn.savepoint()?;
        sp.execute_batch(
            "DELETE FROM achievement_unlocks;
             DELETE FROM daily_records;
             DELETE FROM profile;",
        )?;
        sp.commit()?;
        debug!("cleared all progress");
        Ok(())
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>,
    {
        // Savepoints nest, so units of work may contain `clear` or each other.
        self.conn
            .execute_batch("SAVEPOINT unit_of_work")
            .map_err(StorageError::from)?;
        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch("RELEASE unit_of_work")
                    .map_err(StorageError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self
                    .conn
                    .execute_batch("ROLLBACK TO unit_of_work; RELEASE unit_of_work")
                {
                    warn!(error = %rollback, "failed to roll back unit of work");
                }
                debug!("rolled back unit of work");
                Err(e)
            }
        }
    }

    fn active_dates(&self) -> Result<Vec<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM daily_records WHERE completed_slots > 0 ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            let key = row?;
            let date = key
                .parse::<NaiveDate>()
                .map_err(|e| StorageError::Corrupt {
                    entity: "daily_record",
                    key: key.clone(),
                    message: e.to_string(),
                })?;
            dates.push(date);
        }
        Ok(dates)
    }
}
