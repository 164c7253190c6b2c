//! Persistence for profile, daily records and achievement unlocks.
//!
//! The engine only talks to [`ProgressStore`]. [`Database`] is the SQLite
//! backing used by the CLI; [`MemoryStore`] backs tests and throwaway
//! sessions.

mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{Config, DeferralConfig};
pub use database::Database;
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::FailingStore;

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{AchievementId, AchievementUnlock};
use crate::error::StorageError;
use crate::profile::UserProfile;
use crate::record::DailyRecord;

/// Inclusive date window. `end: None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: None,
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn since(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && !matches!(self.end, Some(end) if date > end)
    }
}

/// Single-writer store for everything the game persists.
///
/// Callers serialise read-modify-write cycles; implementations do no
/// locking of their own.
pub trait ProgressStore {
    fn get_profile(&self) -> Result<Option<UserProfile>, StorageError>;

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Records whose date falls in `range`, ascending by date.
    fn records_in_range(&self, range: DateRange) -> Result<Vec<DailyRecord>, StorageError>;

    /// The record for `date`, persisting an empty one if none exists yet.
    fn get_or_create_record(&mut self, date: NaiveDate) -> Result<DailyRecord, StorageError>;

    /// Upsert by date.
    fn save_record(&mut self, record: &DailyRecord) -> Result<(), StorageError>;

    fn unlocked_achievements(&self) -> Result<Vec<AchievementUnlock>, StorageError>;

    /// Insert an unlock. Returns `false` when `id` was already held, in
    /// which case the stored timestamp is left alone.
    fn record_achievement_unlock(
        &mut self,
        id: AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Drop the profile, every record and every unlock.
    fn clear(&mut self) -> Result<(), StorageError>;

    /// Run `f` as one unit of work. When `f` fails, none of the writes it
    /// made are kept.
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>;

    /// Dates with at least one completed slot, ascending.
    fn active_dates(&self) -> Result<Vec<NaiveDate>, StorageError> {
        Ok(self
            .all_records()?
            .into_iter()
            .filter(DailyRecord::is_active_day)
            .map(|record| record.date)
            .collect())
    }

    fn all_records(&self) -> Result<Vec<DailyRecord>, StorageError> {
        self.records_in_range(DateRange::all())
    }

    fn unlocked_ids(&self) -> Result<HashSet<AchievementId>, StorageError> {
        Ok(self
            .unlocked_achievements()?
            .into_iter()
            .map(|unlock| unlock.id)
            .collect())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `FIGHTING_DEMONS_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/fighting-demons[-dev]/`, with the `-dev` suffix selected by
/// `FIGHTING_DEMONS_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FIGHTING_DEMONS_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FIGHTING_DEMONS_ENV")
                .unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("fighting-demons-dev")
            } else {
                base_dir.join("fighting-demons")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
