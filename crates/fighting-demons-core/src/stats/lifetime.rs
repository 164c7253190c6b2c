//! Lifetime statistics folded from daily records.
//!
//! [`aggregate`] is a pure fold over records with distinct dates. Every field
//! is additive, so recomputing from scratch after appending a record equals
//! adding that record's [`LifetimeStats::contribution_of`] to the old result.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Add, AddAssign};

use crate::error::ValidationError;
use crate::record::DailyRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    /// Records with the mile walked
    #[serde(default)]
    pub total_miles: u64,
    #[serde(default)]
    pub total_pushups: u64,
    #[serde(default)]
    pub total_pullups: u64,
    #[serde(default)]
    pub total_meditation_minutes: u64,
    /// Completed slots across all records
    #[serde(default)]
    pub total_face_offs: u64,
    #[serde(default)]
    pub perfect_days: u64,
}

impl LifetimeStats {
    /// What a single record adds to the lifetime totals.
    pub fn contribution_of(record: &DailyRecord) -> Self {
        Self {
            total_miles: u64::from(record.mile_completed),
            total_pushups: u64::from(record.pushup_count.unwrap_or(0)),
            total_pullups: u64::from(record.pullup_count.unwrap_or(0)),
            total_meditation_minutes: u64::from(record.meditation_minutes),
            total_face_offs: u64::from(record.completed_slots()),
            perfect_days: u64::from(record.is_perfect_day()),
        }
    }
}

impl Add for LifetimeStats {
    type Output = LifetimeStats;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for LifetimeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.total_miles += rhs.total_miles;
        self.total_pushups += rhs.total_pushups;
        self.total_pullups += rhs.total_pullups;
        self.total_meditation_minutes += rhs.total_meditation_minutes;
        self.total_face_offs += rhs.total_face_offs;
        self.perfect_days += rhs.perfect_days;
    }
}

/// Fold records into lifetime totals.
///
/// # Errors
/// Returns [`ValidationError::DuplicateDate`] if two records share a date.
pub fn aggregate<'a, I>(records: I) -> Result<LifetimeStats, ValidationError>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let mut seen = HashSet::new();
    let mut stats = LifetimeStats::default();
    for record in records {
        if !seen.insert(record.date) {
            return Err(ValidationError::DuplicateDate(record.date));
        }
        stats += LifetimeStats::contribution_of(record);
    }
    Ok(stats)
}
