//! The acting user's profile aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::points::LifeForceConfig;
use crate::progression::{detect_transition, ProgressionTables, TierTransition};
use crate::record::ActivityKind;
use crate::stats::{LifetimeStats, StreakSummary};

/// Best single set per strength exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalRecords {
    #[serde(default)]
    pub pushups: u32,
    #[serde(default)]
    pub pullups: u32,
}

impl PersonalRecords {
    pub fn best(&self, activity: ActivityKind) -> Option<u32> {
        match activity {
            ActivityKind::Pushups => Some(self.pushups),
            ActivityKind::Pullups => Some(self.pullups),
            ActivityKind::Mile | ActivityKind::Meditation => None,
        }
    }

    /// Record a set and report whether it beat an existing best.
    ///
    /// The very first set only establishes the baseline.
    pub fn observe(&mut self, activity: ActivityKind, count: u32) -> bool {
        let slot = match activity {
            ActivityKind::Pushups => &mut self.pushups,
            ActivityKind::Pullups => &mut self.pullups,
            ActivityKind::Mile | ActivityKind::Meditation => return false,
        };
        let beaten = *slot > 0 && count > *slot;
        if count > *slot {
            *slot = count;
        }
        beaten
    }
}

/// One recorded tier crossing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionLogEntry {
    /// Table the crossing happened on
    pub axis: String,
    pub from: String,
    pub to: String,
    pub at: DateTime<Utc>,
}

/// Crossings produced by a single award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionUpdate {
    pub previous_total: u64,
    pub new_total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution: Option<TierTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_up: Option<TierTransition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub total_points: u64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub personal_records: PersonalRecords,
    #[serde(flatten)]
    pub lifetime: LifetimeStats,
    /// Display gauge only; progression reads `total_points`.
    #[serde(default)]
    pub life_force: u32,
    pub last_evolution_stage: String,
    #[serde(default)]
    pub evolution_log: Vec<EvolutionLogEntry>,
}

impl UserProfile {
    pub fn new(name: &str, joined: DateTime<Utc>, tables: &ProgressionTables) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            join_date: joined,
            total_points: 0,
            current_streak: 0,
            longest_streak: 0,
            personal_records: PersonalRecords::default(),
            lifetime: LifetimeStats::default(),
            life_force: 0,
            last_evolution_stage: tables.spirit_guide.resolve(0).id.clone(),
            evolution_log: Vec::new(),
        }
    }

    /// Add points and report any tier crossings on either axis.
    pub fn award_points(
        &mut self,
        delta: u64,
        at: DateTime<Utc>,
        tables: &ProgressionTables,
        life_force: &LifeForceConfig,
    ) -> ProgressionUpdate {
        let previous_total = self.total_points;
        let new_total = previous_total.saturating_add(delta);
        self.total_points = new_total;
        self.life_force = life_force.raise(self.life_force, delta);

        let evolution = detect_transition(&tables.spirit_guide, previous_total, new_total);
        let title = detect_transition(&tables.user_title, previous_total, new_total);

        let evolution = evolution.crossed.then(|| {
            self.last_evolution_stage = evolution.to.id.clone();
            self.log_crossing(tables.spirit_guide.name(), &evolution, at);
            evolution
        });
        let title_up = title.crossed.then(|| {
            self.log_crossing(tables.user_title.name(), &title, at);
            title
        });

        ProgressionUpdate {
            previous_total,
            new_total,
            evolution,
            title_up,
        }
    }

    fn log_crossing(&mut self, axis: &str, transition: &TierTransition, at: DateTime<Utc>) {
        self.evolution_log.push(EvolutionLogEntry {
            axis: axis.to_string(),
            from: transition.from.id.clone(),
            to: transition.to.id.clone(),
            at,
        });
    }

    /// Replace cached lifetime sums with a fresh aggregate.
    pub fn refresh_lifetime(&mut self, stats: LifetimeStats) {
        self.lifetime = stats;
    }

    pub fn apply_streaks(&mut self, streaks: &StreakSummary) {
        self.current_streak = streaks.current;
        self.longest_streak = self.longest_streak.max(streaks.longest);
    }
}
