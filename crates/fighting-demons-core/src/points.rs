//! Point awards and the life-force gauge.
//!
//! This is the single home of point constants. A perfect day earns
//! dawn + noon + dusk = 22 points, plus 5 for each personal record beaten.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::record::FaceOffSlot;

/// Points awarded per completed face-off slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConfig {
    #[serde(default = "default_dawn")]
    pub dawn: u64,
    #[serde(default = "default_noon")]
    pub noon: u64,
    #[serde(default = "default_dusk")]
    pub dusk: u64,
    #[serde(default = "default_pr_bonus")]
    pub personal_record_bonus: u64,
}

/// Bounded display gauge fed by awarded points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeForceConfig {
    #[serde(default = "default_life_force_cap")]
    pub cap: u32,
}

fn default_dawn() -> u64 {
    10
}
fn default_noon() -> u64 {
    6
}
fn default_dusk() -> u64 {
    6
}
fn default_pr_bonus() -> u64 {
    5
}
fn default_life_force_cap() -> u32 {
    200
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            dawn: default_dawn(),
            noon: default_noon(),
            dusk: default_dusk(),
            personal_record_bonus: default_pr_bonus(),
        }
    }
}

impl Default for LifeForceConfig {
    fn default() -> Self {
        Self {
            cap: default_life_force_cap(),
        }
    }
}

impl PointsConfig {
    /// Largest value any single award setting may take.
    pub const MAX_AWARD: u64 = 10_000;

    /// Every setting with its config key, in file order.
    pub fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("points.dawn", self.dawn),
            ("points.noon", self.noon),
            ("points.dusk", self.dusk),
            ("points.personal_record_bonus", self.personal_record_bonus),
        ]
    }

    /// Base award for completing a slot.
    pub fn slot_points(&self, slot: FaceOffSlot) -> u64 {
        match slot {
            FaceOffSlot::Dawn => self.dawn,
            FaceOffSlot::Noon => self.noon,
            FaceOffSlot::Dusk => self.dusk,
        }
    }

    /// Total award for a completed slot, including the record bonus.
    pub fn award_for(&self, slot: FaceOffSlot, personal_record: bool) -> u64 {
        let bonus = if personal_record {
            self.personal_record_bonus
        } else {
            0
        };
        self.slot_points(slot).saturating_add(bonus)
    }

    /// Points for completing all three slots without any records.
    pub fn perfect_day_total(&self) -> u64 {
        FaceOffSlot::ALL
            .iter()
            .fold(0u64, |total, s| total.saturating_add(self.slot_points(*s)))
    }
}

impl LifeForceConfig {
    /// Raise the gauge by `delta`, saturating at the cap.
    pub fn raise(&self, current: u32, delta: u64) -> u32 {
        let delta = u32::try_from(delta).unwrap_or(u32::MAX);
        current.saturating_add(delta).min(self.cap)
    }
}

/// Convert an untyped total into a point count.
///
/// # Errors
/// Returns [`ValidationError::NegativePoints`] for totals below zero.
pub fn checked_total(raw: i64) -> Result<u64, ValidationError> {
    u64::try_from(raw).map_err(|_| ValidationError::NegativePoints(raw))
}
