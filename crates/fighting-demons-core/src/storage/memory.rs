use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::{DateRange, ProgressStore};
use crate::achievements::{AchievementId, AchievementUnlock};
use crate::error::StorageError;
use crate::profile::UserProfile;
use crate::record::DailyRecord;

/// In-process store. Nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profile: Option<UserProfile>,
    records: BTreeMap<NaiveDate, DailyRecord>,
    unlocks: BTreeMap<AchievementId, DateTime<Utc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StorageError> {
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn records_in_range(&self, range: DateRange) -> Result<Vec<DailyRecord>, StorageError> {
        let upper = range.end.unwrap_or(NaiveDate::MAX);
        if upper < range.start {
            return Ok(Vec::new());
        }
        Ok(self
            .records
            .range(range.start..=upper)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn get_or_create_record(&mut self, date: NaiveDate) -> Result<DailyRecord, StorageError> {
        Ok(self
            .records
            .entry(date)
            .or_insert_with(|| DailyRecord::new(date))
            .clone())
    }

    fn save_record(&mut self, record: &DailyRecord) -> Result<(), StorageError> {
        self.records.insert(record.date, record.clone());
        Ok(())
    }

    fn unlocked_achievements(&self) -> Result<Vec<AchievementUnlock>, StorageError> {
        let mut unlocks: Vec<_> = self
            .unlocks
            .iter()
            .map(|(id, at)| AchievementUnlock {
                id: *id,
                unlocked_at: *at,
            })
            .collect();
        unlocks.sort_by_key(|u| (u.unlocked_at, u.id.as_str()));
        Ok(unlocks)
    }

    fn record_achievement_unlock(
        &mut self,
        id: AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        if self.unlocks.contains_key(&id) {
            return Ok(false);
        }
        self.unlocks.insert(id, at);
        Ok(true)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self = Self::default();
        Ok(())
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>,
    {
        let before = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = before;
        }
        result
    }
}

/// [`MemoryStore`] that fails a set number of writes on demand.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    pub inner: MemoryStore,
    pub profile_save_failures: u32,
    pub unlock_failures: u32,
}

#[cfg(test)]
impl FailingStore {
    fn injected(what: &str) -> StorageError {
        StorageError::QueryFailed(format!("injected {what} failure"))
    }
}

#[cfg(test)]
impl ProgressStore for FailingStore {
    fn get_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        self.inner.get_profile()
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StorageError> {
        if self.profile_save_failures > 0 {
            self.profile_save_failures -= 1;
            return Err(Self::injected("profile save"));
        }
        self.inner.save_profile(profile)
    }

    fn records_in_range(&self, range: DateRange) -> Result<Vec<DailyRecord>, StorageError> {
        self.inner.records_in_range(range)
    }

    fn get_or_create_record(&mut self, date: NaiveDate) -> Result<DailyRecord, StorageError> {
        self.inner.get_or_create_record(date)
    }

    fn save_record(&mut self, record: &DailyRecord) -> Result<(), StorageError> {
        self.inner.save_record(record)
    }

    fn unlocked_achievements(&self) -> Result<Vec<AchievementUnlock>, StorageError> {
        self.inner.unlocked_achievements()
    }

    fn record_achievement_unlock(
        &mut self,
        id: AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        if self.unlock_failures > 0 {
            self.unlock_failures -= 1;
            return Err(Self::injected("unlock"));
        }
        self.inner.record_achievement_unlock(id, at)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.inner.clear()
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StorageError>,
    {
        let before = self.inner.clone();
        let result = f(self);
        if result.is_err() {
            self.inner = before;
        }
        result
    }
}
