//! Static achievement catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::record::FaceOffSlot;

/// Stable achievement slug. Serialized as the snake_case id stored in unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_light")]
    FirstLight,
    #[serde(rename = "perfect_day")]
    PerfectDay,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_14")]
    Streak14,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "streak_100")]
    Streak100,
    #[serde(rename = "first_pr")]
    FirstPr,
    #[serde(rename = "pushup_50")]
    Pushup50,
    #[serde(rename = "pushup_100")]
    Pushup100,
    #[serde(rename = "pullup_20")]
    Pullup20,
    #[serde(rename = "pullup_50")]
    Pullup50,
    #[serde(rename = "miles_10")]
    Miles10,
    #[serde(rename = "miles_50")]
    Miles50,
    #[serde(rename = "miles_100")]
    Miles100,
    #[serde(rename = "miles_500")]
    Miles500,
    #[serde(rename = "meditation_100")]
    Meditation100,
    #[serde(rename = "meditation_500")]
    Meditation500,
    #[serde(rename = "meditation_1000")]
    Meditation1000,
    #[serde(rename = "points_100")]
    Points100,
    #[serde(rename = "points_500")]
    Points500,
    #[serde(rename = "points_1000")]
    Points1000,
    #[serde(rename = "first_evolution")]
    FirstEvolution,
    #[serde(rename = "guardian_reached")]
    GuardianReached,
    #[serde(rename = "seraph_reached")]
    SeraphReached,
    #[serde(rename = "early_bird")]
    EarlyBird,
    #[serde(rename = "night_owl")]
    NightOwl,
    #[serde(rename = "comeback")]
    Comeback,
}

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstLight => "first_light",
            AchievementId::PerfectDay => "perfect_day",
            AchievementId::Streak3 => "streak_3",
            AchievementId::Streak7 => "streak_7",
            AchievementId::Streak14 => "streak_14",
            AchievementId::Streak30 => "streak_30",
            AchievementId::Streak100 => "streak_100",
            AchievementId::FirstPr => "first_pr",
            AchievementId::Pushup50 => "pushup_50",
            AchievementId::Pushup100 => "pushup_100",
            AchievementId::Pullup20 => "pullup_20",
            AchievementId::Pullup50 => "pullup_50",
            AchievementId::Miles10 => "miles_10",
            AchievementId::Miles50 => "miles_50",
            AchievementId::Miles100 => "miles_100",
            AchievementId::Miles500 => "miles_500",
            AchievementId::Meditation100 => "meditation_100",
            AchievementId::Meditation500 => "meditation_500",
            AchievementId::Meditation1000 => "meditation_1000",
            AchievementId::Points100 => "points_100",
            AchievementId::Points500 => "points_500",
            AchievementId::Points1000 => "points_1000",
            AchievementId::FirstEvolution => "first_evolution",
            AchievementId::GuardianReached => "guardian_reached",
            AchievementId::SeraphReached => "seraph_reached",
            AchievementId::EarlyBird => "early_bird",
            AchievementId::NightOwl => "night_owl",
            AchievementId::Comeback => "comeback",
        }
    }

    /// Catalog entry for this id.
    pub fn definition(&self) -> Option<&'static AchievementDef> {
        ACHIEVEMENTS.iter().find(|def| def.id == *self)
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACHIEVEMENTS
            .iter()
            .map(|def| def.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "achievement".to_string(),
                message: format!("unknown achievement id '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Milestones,
    Streaks,
    Strength,
    Endurance,
    Mindfulness,
    Evolution,
    Secret,
}

/// Threshold predicate attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    FaceOffsAtLeast(u64),
    PerfectDaysAtLeast(u64),
    StreakAtLeast(u32),
    /// The triggering face-off beat a personal record
    PersonalRecord,
    PushupsInSetAtLeast(u32),
    PullupsInSetAtLeast(u32),
    MilesAtLeast(u64),
    MeditationMinutesAtLeast(u64),
    PointsAtLeast(u64),
    /// Guide has left its starting stage
    GuideEvolved,
    GuideStageReached(&'static str),
    /// Triggering slot completed before `hour:00` local time
    SlotBefore { slot: FaceOffSlot, hour: u32 },
    /// Triggering slot completed at or after `hour:00` local time
    SlotFrom { slot: FaceOffSlot, hour: u32 },
    /// Triggering slot had been deferred at least this many times
    DeferredAtLeast(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    /// Hidden from listings until unlocked
    pub secret: bool,
    #[serde(skip)]
    pub condition: Condition,
}

const fn def(
    id: AchievementId,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: AchievementCategory,
    secret: bool,
    condition: Condition,
) -> AchievementDef {
    AchievementDef {
        id,
        name,
        description,
        icon,
        category,
        secret,
        condition,
    }
}

use AchievementCategory as Cat;
use AchievementId as Id;

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    def(Id::FirstLight, "First Light", "Complete your first face-off", "🌅", Cat::Milestones, false, Condition::FaceOffsAtLeast(1)),
    def(Id::PerfectDay, "Perfect Day", "Complete all 3 face-offs in one day", "⭐", Cat::Milestones, false, Condition::PerfectDaysAtLeast(1)),
    def(Id::Streak3, "Kindling", "3-day streak", "🔥", Cat::Streaks, false, Condition::StreakAtLeast(3)),
    def(Id::Streak7, "Week Warrior", "7-day streak", "💪", Cat::Streaks, false, Condition::StreakAtLeast(7)),
    def(Id::Streak14, "Fortnight Fighter", "14-day streak", "⚡", Cat::Streaks, false, Condition::StreakAtLeast(14)),
    def(Id::Streak30, "Monthly Master", "30-day streak", "🏆", Cat::Streaks, false, Condition::StreakAtLeast(30)),
    def(Id::Streak100, "Centurion", "100-day streak", "👑", Cat::Streaks, false, Condition::StreakAtLeast(100)),
    def(Id::FirstPr, "Iron Will", "Beat a personal record", "🎯", Cat::Strength, false, Condition::PersonalRecord),
    def(Id::Pushup50, "Push It", "50 pushups in a single set", "💥", Cat::Strength, false, Condition::PushupsInSetAtLeast(50)),
    def(Id::Pushup100, "Century Club", "100 pushups in a single set", "💯", Cat::Strength, false, Condition::PushupsInSetAtLeast(100)),
    def(Id::Pullup20, "Rising Up", "20 pullups in a single set", "🧗", Cat::Strength, false, Condition::PullupsInSetAtLeast(20)),
    def(Id::Pullup50, "Gravity Defier", "50 pullups in a single set", "🦅", Cat::Strength, false, Condition::PullupsInSetAtLeast(50)),
    def(Id::Miles10, "Trailblazer", "Walk/run 10 total miles", "🚶", Cat::Endurance, false, Condition::MilesAtLeast(10)),
    def(Id::Miles50, "Road Warrior", "Walk/run 50 total miles", "🏃", Cat::Endurance, false, Condition::MilesAtLeast(50)),
    def(Id::Miles100, "Marathon Mind", "Walk/run 100 total miles", "🏅", Cat::Endurance, false, Condition::MilesAtLeast(100)),
    def(Id::Miles500, "Pilgrim", "Walk/run 500 total miles", "🗺️", Cat::Endurance, true, Condition::MilesAtLeast(500)),
    def(Id::Meditation100, "Still Mind", "100 total minutes of meditation", "🧘", Cat::Mindfulness, false, Condition::MeditationMinutesAtLeast(100)),
    def(Id::Meditation500, "Inner Peace", "500 total minutes of meditation", "☯️", Cat::Mindfulness, false, Condition::MeditationMinutesAtLeast(500)),
    def(Id::Meditation1000, "Enlightened", "1000 total minutes of meditation", "🕉️", Cat::Mindfulness, false, Condition::MeditationMinutesAtLeast(1000)),
    def(Id::Points100, "Rising Power", "Earn 100 total points", "✨", Cat::Milestones, false, Condition::PointsAtLeast(100)),
    def(Id::Points500, "Force of Nature", "Earn 500 total points", "🌊", Cat::Milestones, false, Condition::PointsAtLeast(500)),
    def(Id::Points1000, "Thousand Strong", "Earn 1000 total points", "⚔️", Cat::Milestones, false, Condition::PointsAtLeast(1000)),
    def(Id::FirstEvolution, "Awakening", "Spirit Guide evolves for the first time", "🦋", Cat::Evolution, false, Condition::GuideEvolved),
    def(Id::GuardianReached, "Guardian Bond", "Spirit Guide reaches Guardian stage", "🛡️", Cat::Evolution, false, Condition::GuideStageReached("guardian")),
    def(Id::SeraphReached, "Seraphic Bond", "Spirit Guide reaches Seraph stage", "👼", Cat::Evolution, false, Condition::GuideStageReached("seraph")),
    def(Id::EarlyBird, "Early Bird", "Complete Dawn face-off before 5 AM", "🐦", Cat::Secret, true, Condition::SlotBefore { slot: FaceOffSlot::Dawn, hour: 5 }),
    def(Id::NightOwl, "Night Owl", "Complete Dusk face-off after 11 PM", "🦉", Cat::Secret, true, Condition::SlotFrom { slot: FaceOffSlot::Dusk, hour: 23 }),
    def(Id::Comeback, "The Comeback", "Complete a face-off after deferring 3 times", "🔄", Cat::Secret, true, Condition::DeferredAtLeast(3)),
];
