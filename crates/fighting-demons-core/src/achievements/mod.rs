//! Achievement badges: static catalog, stateless evaluator, unlock records.

mod catalog;
mod evaluator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use catalog::{AchievementCategory, AchievementDef, AchievementId, Condition, ACHIEVEMENTS};
pub use evaluator::{evaluate, AchievementContext, AchievementEvaluator, TriggerEvent};

/// A persisted unlock. Unlocks form a set keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub id: AchievementId,
    pub unlocked_at: DateTime<Utc>,
}
