//! Per-day activity records.
//!
//! One [`DailyRecord`] exists per calendar date. It holds the three face-off
//! slots, raw measurements, and an inline log of sub-events.
//!
//! Slot lifecycle for a single date:
//!
//! ```text
//! pending -> deferred -> pending (deferral expired) -> completed
//! ```
//!
//! `completed` is terminal for that date. Deferral expiry is never scheduled
//! here; [`DailyRecord::slot_state`] observes it against the instant passed in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// A scheduled daily challenge slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceOffSlot {
    Dawn,
    Noon,
    Dusk,
}

impl FaceOffSlot {
    pub const ALL: [FaceOffSlot; 3] = [FaceOffSlot::Dawn, FaceOffSlot::Noon, FaceOffSlot::Dusk];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceOffSlot::Dawn => "dawn",
            FaceOffSlot::Noon => "noon",
            FaceOffSlot::Dusk => "dusk",
        }
    }

    /// Physical half of the slot. The other half is always meditation.
    pub fn physical_task(&self) -> ActivityKind {
        match self {
            FaceOffSlot::Dawn => ActivityKind::Mile,
            FaceOffSlot::Noon => ActivityKind::Pushups,
            FaceOffSlot::Dusk => ActivityKind::Pullups,
        }
    }
}

impl fmt::Display for FaceOffSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceOffSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dawn" => Ok(FaceOffSlot::Dawn),
            "noon" => Ok(FaceOffSlot::Noon),
            "dusk" => Ok(FaceOffSlot::Dusk),
            other => Err(ValidationError::InvalidValue {
                field: "slot".to_string(),
                message: format!("expected dawn, noon or dusk, got '{other}'"),
            }),
        }
    }
}

/// Kinds of measured activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Mile,
    Pushups,
    Pullups,
    Meditation,
}

/// Persisted state of one slot on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferral_reason: Option<String>,
    /// Times this slot was postponed on this date.
    #[serde(default)]
    pub deferral_count: u32,
}

/// Observed state of a slot at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotState {
    Pending,
    Deferred {
        until: DateTime<Utc>,
        reason: Option<String>,
    },
    Completed,
}

/// Sub-event logged inline on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayEvent {
    Activity {
        id: Uuid,
        activity: ActivityKind,
        at: DateTime<Utc>,
        /// Reps for pushups/pullups, minutes for meditation, miles for walks.
        amount: u32,
    },
    FaceOff {
        id: Uuid,
        slot: FaceOffSlot,
        at: DateTime<Utc>,
        points_awarded: u64,
        #[serde(default)]
        personal_record: bool,
    },
}

impl DayEvent {
    pub fn id(&self) -> Uuid {
        match self {
            DayEvent::Activity { id, .. } | DayEvent::FaceOff { id, .. } => *id,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            DayEvent::Activity { at, .. } | DayEvent::FaceOff { at, .. } => *at,
        }
    }
}

/// Everything that happened on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub dawn: SlotEntry,
    #[serde(default)]
    pub noon: SlotEntry,
    #[serde(default)]
    pub dusk: SlotEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushup_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pullup_count: Option<u32>,
    #[serde(default)]
    pub mile_completed: bool,
    #[serde(default)]
    pub meditation_minutes: u32,
    #[serde(default)]
    pub events: Vec<DayEvent>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            dawn: SlotEntry::default(),
            noon: SlotEntry::default(),
            dusk: SlotEntry::default(),
            pushup_count: None,
            pullup_count: None,
            mile_completed: false,
            meditation_minutes: 0,
            events: Vec::new(),
        }
    }

    pub fn slot(&self, slot: FaceOffSlot) -> &SlotEntry {
        match slot {
            FaceOffSlot::Dawn => &self.dawn,
            FaceOffSlot::Noon => &self.noon,
            FaceOffSlot::Dusk => &self.dusk,
        }
    }

    fn slot_mut(&mut self, slot: FaceOffSlot) -> &mut SlotEntry {
        match slot {
            FaceOffSlot::Dawn => &mut self.dawn,
            FaceOffSlot::Noon => &mut self.noon,
            FaceOffSlot::Dusk => &mut self.dusk,
        }
    }

    pub fn dawn_completed(&self) -> bool {
        self.dawn.completed
    }

    pub fn noon_completed(&self) -> bool {
        self.noon.completed
    }

    pub fn dusk_completed(&self) -> bool {
        self.dusk.completed
    }

    pub fn is_completed(&self, slot: FaceOffSlot) -> bool {
        self.slot(slot).completed
    }

    /// Number of completed slots (0..=3).
    pub fn completed_slots(&self) -> u32 {
        FaceOffSlot::ALL
            .iter()
            .filter(|s| self.is_completed(**s))
            .count() as u32
    }

    /// All three slots complete on this date.
    pub fn is_perfect_day(&self) -> bool {
        self.dawn.completed && self.noon.completed && self.dusk.completed
    }

    /// At least one slot complete on this date.
    pub fn is_active_day(&self) -> bool {
        self.completed_slots() > 0
    }

    /// Mark a slot complete. Returns false when it already was.
    pub fn complete_slot(&mut self, slot: FaceOffSlot, at: DateTime<Utc>) -> bool {
        let entry = self.slot_mut(slot);
        if entry.completed {
            return false;
        }
        entry.completed = true;
        entry.completed_at = Some(at);
        true
    }

    /// Postpone a slot until `until`.
    ///
    /// # Errors
    /// Fails when the slot is already completed for this date, or when
    /// `until` is not after `now`.
    pub fn defer_slot(
        &mut self,
        slot: FaceOffSlot,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<(), ValidationError> {
        let date = self.date;
        let entry = self.slot_mut(slot);
        if entry.completed {
            return Err(ValidationError::SlotAlreadyCompleted {
                date,
                slot: slot.to_string(),
            });
        }
        if until <= now {
            return Err(ValidationError::DeferralInPast {
                slot: slot.to_string(),
                at: now.to_rfc3339(),
            });
        }
        entry.deferred_until = Some(until);
        entry.deferral_reason = reason.filter(|r| !r.trim().is_empty());
        entry.deferral_count += 1;
        Ok(())
    }

    /// State of `slot` as observed at `now`.
    pub fn slot_state(&self, slot: FaceOffSlot, now: DateTime<Utc>) -> SlotState {
        let entry = self.slot(slot);
        if entry.completed {
            return SlotState::Completed;
        }
        match entry.deferred_until {
            Some(until) if until > now => SlotState::Deferred {
                until,
                reason: entry.deferral_reason.clone(),
            },
            _ => SlotState::Pending,
        }
    }

    /// Fold a measurement into the day's raw totals.
    pub fn apply_measurement(&mut self, activity: ActivityKind, amount: u32) {
        match activity {
            ActivityKind::Mile => {
                if amount > 0 {
                    self.mile_completed = true;
                }
            }
            ActivityKind::Pushups => {
                self.pushup_count = Some(self.pushup_count.unwrap_or(0).saturating_add(amount));
            }
            ActivityKind::Pullups => {
                self.pullup_count = Some(self.pullup_count.unwrap_or(0).saturating_add(amount));
            }
            ActivityKind::Meditation => {
                self.meditation_minutes = self.meditation_minutes.saturating_add(amount);
            }
        }
    }

    /// Apply a measurement and log it as an activity event.
    pub fn log_activity(&mut self, activity: ActivityKind, amount: u32, at: DateTime<Utc>) -> Uuid {
        self.apply_measurement(activity, amount);
        let id = Uuid::new_v4();
        self.events.push(DayEvent::Activity {
            id,
            activity,
            at,
            amount,
        });
        id
    }

    pub fn log_face_off(
        &mut self,
        slot: FaceOffSlot,
        at: DateTime<Utc>,
        points_awarded: u64,
        personal_record: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.events.push(DayEvent::FaceOff {
            id,
            slot,
            at,
            points_awarded,
            personal_record,
        });
        id
    }

    /// Points awarded by face-offs on this date.
    pub fn points_awarded(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                DayEvent::FaceOff { points_awarded, .. } => *points_awarded,
                DayEvent::Activity { .. } => 0,
            })
            .sum()
    }
}
