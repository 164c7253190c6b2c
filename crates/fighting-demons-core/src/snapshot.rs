//! Whole-state export and import.
//!
//! A snapshot carries the profile, every daily record and every unlock under
//! a format tag. Import replaces the store contents in one unit of work;
//! it never merges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::achievements::AchievementUnlock;
use crate::error::{Result, SnapshotError, ValidationError};
use crate::profile::UserProfile;
use crate::record::DailyRecord;
use crate::stats::aggregate;
use crate::storage::ProgressStore;

pub const SNAPSHOT_FORMAT: &str = "fighting-demons/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format: String,
    pub exported_at: DateTime<Utc>,
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub records: Vec<DailyRecord>,
    #[serde(default)]
    pub achievements: Vec<AchievementUnlock>,
}

impl Snapshot {
    /// Read everything out of `store`.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn capture<S: ProgressStore>(store: &S, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            format: SNAPSHOT_FORMAT.to_string(),
            exported_at: now,
            profile: store.get_profile()?,
            records: store.all_records()?,
            achievements: store.unlocked_achievements()?,
        })
    }

    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the format tag and record dates.
    ///
    /// # Errors
    /// [`SnapshotError::UnsupportedFormat`] for a foreign tag,
    /// [`SnapshotError::Malformed`] for bad JSON, and
    /// [`ValidationError::DuplicateDate`] when two records share a date.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(SnapshotError::Malformed)?;
        let found = value
            .get("format")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if found != SNAPSHOT_FORMAT {
            return Err(SnapshotError::UnsupportedFormat {
                found: found.to_string(),
                expected: SNAPSHOT_FORMAT.to_string(),
            }
            .into());
        }

        let snapshot: Snapshot = serde_json::from_value(value).map_err(SnapshotError::Malformed)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        aggregate(&self.records).map(|_| ())
    }

    /// Replace the contents of `store` with this snapshot.
    ///
    /// # Errors
    /// Propagates storage failures, in which case the store keeps its
    /// previous contents.
    pub fn restore<S: ProgressStore>(&self, store: &mut S) -> Result<()> {
        self.validate()?;
        store.atomically(|store| -> Result<()> {
            store.clear()?;
            if let Some(profile) = &self.profile {
                store.save_profile(profile)?;
            }
            for record in &self.records {
                store.save_record(record)?;
            }
            for unlock in &self.achievements {
                store.record_achievement_unlock(unlock.id, unlock.unlocked_at)?;
            }
            Ok(())
        })?;
        info!(
            records = self.records.len(),
            achievements = self.achievements.len(),
            "snapshot restored"
        );
        Ok(())
    }
}
