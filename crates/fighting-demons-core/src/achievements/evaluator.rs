//! Stateless achievement evaluation.
//!
//! The evaluator checks every catalog predicate against the values passed
//! in. It never reads a clock and never consults unlock history: callers
//! filter out ids they already hold and persist the rest once.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::catalog::{AchievementDef, AchievementId, Condition, ACHIEVEMENTS};
use crate::progression::TierTable;
use crate::record::FaceOffSlot;
use crate::stats::LifetimeStats;

/// The action that triggered an evaluation: a face-off, or a set logged
/// on its own (`slot: None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(default)]
    pub slot: Option<FaceOffSlot>,
    /// Wall-clock time in the user's own zone
    pub local_time: NaiveTime,
    #[serde(default)]
    pub pushups: Option<u32>,
    #[serde(default)]
    pub pullups: Option<u32>,
    /// Deferrals of this slot on this date before it was completed
    #[serde(default)]
    pub deferral_count: u32,
    #[serde(default)]
    pub personal_record: bool,
}

impl TriggerEvent {
    pub fn face_off(slot: FaceOffSlot, local_time: NaiveTime) -> Self {
        Self {
            slot: Some(slot),
            ..Self::standalone(local_time)
        }
    }

    pub fn standalone(local_time: NaiveTime) -> Self {
        Self {
            slot: None,
            local_time,
            pushups: None,
            pullups: None,
            deferral_count: 0,
            personal_record: false,
        }
    }
}

/// Inputs beyond lifetime stats and streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementContext {
    pub total_points: u64,
    #[serde(default)]
    pub event: Option<TriggerEvent>,
}

impl AchievementContext {
    pub fn new(total_points: u64) -> Self {
        Self {
            total_points,
            event: None,
        }
    }

    pub fn with_event(mut self, event: TriggerEvent) -> Self {
        self.event = Some(event);
        self
    }
}

pub struct AchievementEvaluator<'a> {
    catalog: &'a [AchievementDef],
    guide: &'a TierTable,
}

impl<'a> AchievementEvaluator<'a> {
    /// Evaluate the built-in catalog against `guide` stages.
    pub fn new(guide: &'a TierTable) -> Self {
        Self {
            catalog: ACHIEVEMENTS,
            guide,
        }
    }

    pub fn with_catalog(guide: &'a TierTable, catalog: &'a [AchievementDef]) -> Self {
        Self { catalog, guide }
    }

    /// Ids whose condition holds for the given inputs, in catalog order.
    pub fn evaluate(
        &self,
        stats: &LifetimeStats,
        streak: u32,
        ctx: &AchievementContext,
    ) -> Vec<AchievementId> {
        self.catalog
            .iter()
            .filter(|def| self.is_satisfied(&def.condition, stats, streak, ctx))
            .map(|def| def.id)
            .collect()
    }

    /// Like [`evaluate`](Self::evaluate), minus ids already held.
    pub fn newly_unlocked(
        &self,
        stats: &LifetimeStats,
        streak: u32,
        ctx: &AchievementContext,
        held: &HashSet<AchievementId>,
    ) -> Vec<AchievementId> {
        self.evaluate(stats, streak, ctx)
            .into_iter()
            .filter(|id| !held.contains(id))
            .collect()
    }

    pub fn is_satisfied(
        &self,
        condition: &Condition,
        stats: &LifetimeStats,
        streak: u32,
        ctx: &AchievementContext,
    ) -> bool {
        let event = ctx.event.as_ref();
        match *condition {
            Condition::FaceOffsAtLeast(n) => stats.total_face_offs >= n,
            Condition::PerfectDaysAtLeast(n) => stats.perfect_days >= n,
            Condition::StreakAtLeast(n) => streak >= n,
            Condition::PersonalRecord => event.is_some_and(|e| e.personal_record),
            Condition::PushupsInSetAtLeast(n) => {
                event.and_then(|e| e.pushups).is_some_and(|count| count >= n)
            }
            Condition::PullupsInSetAtLeast(n) => {
                event.and_then(|e| e.pullups).is_some_and(|count| count >= n)
            }
            Condition::MilesAtLeast(n) => stats.total_miles >= n,
            Condition::MeditationMinutesAtLeast(n) => stats.total_meditation_minutes >= n,
            Condition::PointsAtLeast(n) => ctx.total_points >= n,
            Condition::GuideEvolved => self.guide.rank_for(ctx.total_points) > 0,
            Condition::GuideStageReached(stage) => self
                .guide
                .rank_of(stage)
                .is_some_and(|rank| self.guide.rank_for(ctx.total_points) >= rank),
            Condition::SlotBefore { slot, hour } => {
                event.is_some_and(|e| e.slot == Some(slot) && e.local_time.hour() < hour)
            }
            Condition::SlotFrom { slot, hour } => {
                event.is_some_and(|e| e.slot == Some(slot) && e.local_time.hour() >= hour)
            }
            Condition::DeferredAtLeast(n) => event.is_some_and(|e| e.deferral_count >= n),
        }
    }
}

/// Evaluate the built-in catalog against the built-in Spirit Guide stages.
pub fn evaluate(stats: &LifetimeStats, streak: u32, ctx: &AchievementContext) -> Vec<AchievementId> {
    let guide = crate::progression::spirit_guide_stages();
    AchievementEvaluator::new(&guide).evaluate(stats, streak, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::spirit_guide_stages;

    fn event(slot: FaceOffSlot, hour: u32) -> TriggerEvent {
        TriggerEvent::face_off(slot, NaiveTime::from_hms_opt(hour, 30, 0).unwrap())
    }

    #[test]
    fn miles_threshold_is_inclusive() {
        let ctx = AchievementContext::default();
        let nine = LifetimeStats {
            total_miles: 9,
            ..Default::default()
        };
        let ten = LifetimeStats {
            total_miles: 10,
            ..Default::default()
        };
        assert!(!evaluate(&nine, 0, &ctx).contains(&AchievementId::Miles10));
        assert!(evaluate(&ten, 0, &ctx).contains(&AchievementId::Miles10));
    }

    #[test]
    fn nothing_unlocks_from_zero() {
        assert!(evaluate(&LifetimeStats::default(), 0, &AchievementContext::default()).is_empty());
    }

    #[test]
    fn streak_thresholds_accumulate() {
        let got = evaluate(&LifetimeStats::default(), 14, &AchievementContext::default());
        assert_eq!(
            got,
            vec![
                AchievementId::Streak3,
                AchievementId::Streak7,
                AchievementId::Streak14
            ]
        );
    }

    #[test]
    fn evolution_conditions_follow_guide_table() {
        let guide = spirit_guide_stages();
        let evaluator = AchievementEvaluator::new(&guide);
        let stats = LifetimeStats::default();

        let at_43 = evaluator.evaluate(&stats, 0, &AchievementContext::new(43));
        assert!(!at_43.contains(&AchievementId::FirstEvolution));

        let at_44 = evaluator.evaluate(&stats, 0, &AchievementContext::new(44));
        assert!(at_44.contains(&AchievementId::FirstEvolution));
        assert!(!at_44.contains(&AchievementId::GuardianReached));

        let at_1200 = evaluator.evaluate(&stats, 0, &AchievementContext::new(1200));
        assert!(at_1200.contains(&AchievementId::GuardianReached));
        assert!(at_1200.contains(&AchievementId::SeraphReached));
        assert!(at_1200.contains(&AchievementId::Points1000));
    }

    #[test]
    fn time_of_day_comes_from_context() {
        let stats = LifetimeStats::default();
        let early = AchievementContext::new(0).with_event(event(FaceOffSlot::Dawn, 4));
        assert!(evaluate(&stats, 0, &early).contains(&AchievementId::EarlyBird));

        let on_time = AchievementContext::new(0).with_event(event(FaceOffSlot::Dawn, 5));
        assert!(!evaluate(&stats, 0, &on_time).contains(&AchievementId::EarlyBird));

        // early noon does not count
        let noon = AchievementContext::new(0).with_event(event(FaceOffSlot::Noon, 4));
        assert!(!evaluate(&stats, 0, &noon).contains(&AchievementId::EarlyBird));

        let late = AchievementContext::new(0).with_event(event(FaceOffSlot::Dusk, 23));
        assert!(evaluate(&stats, 0, &late).contains(&AchievementId::NightOwl));
    }

    #[test]
    fn single_set_and_deferral_conditions() {
        let mut e = event(FaceOffSlot::Noon, 12);
        e.pushups = Some(100);
        e.deferral_count = 3;
        e.personal_record = true;
        let got = evaluate(
            &LifetimeStats::default(),
            0,
            &AchievementContext::new(0).with_event(e),
        );
        assert!(got.contains(&AchievementId::Pushup50));
        assert!(got.contains(&AchievementId::Pushup100));
        assert!(got.contains(&AchievementId::Comeback));
        assert!(got.contains(&AchievementId::FirstPr));
        assert!(!got.contains(&AchievementId::Pullup20));
    }

    #[test]
    fn standalone_set_counts_for_set_and_record_badges_only() {
        let mut e = TriggerEvent::standalone(NaiveTime::from_hms_opt(4, 0, 0).unwrap());
        e.pullups = Some(50);
        e.personal_record = true;
        let got = evaluate(
            &LifetimeStats::default(),
            0,
            &AchievementContext::new(0).with_event(e),
        );
        assert!(got.contains(&AchievementId::Pullup20));
        assert!(got.contains(&AchievementId::Pullup50));
        assert!(got.contains(&AchievementId::FirstPr));
        assert!(!got.contains(&AchievementId::EarlyBird));
    }

    #[test]
    fn held_ids_are_filtered() {
        let guide = spirit_guide_stages();
        let evaluator = AchievementEvaluator::new(&guide);
        let stats = LifetimeStats {
            total_face_offs: 3,
            perfect_days: 1,
            ..Default::default()
        };
        let held: HashSet<_> = [AchievementId::FirstLight].into_iter().collect();
        let fresh = evaluator.newly_unlocked(&stats, 0, &AchievementContext::new(22), &held);
        assert_eq!(fresh, vec![AchievementId::PerfectDay]);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let stats = LifetimeStats {
            total_face_offs: 40,
            total_meditation_minutes: 150,
            ..Default::default()
        };
        let ctx = AchievementContext::new(500).with_event(event(FaceOffSlot::Dusk, 23));
        assert_eq!(evaluate(&stats, 7, &ctx), evaluate(&stats, 7, &ctx));
    }

    #[test]
    fn unknown_stage_never_satisfies() {
        let guide = spirit_guide_stages();
        let evaluator = AchievementEvaluator::new(&guide);
        assert!(!evaluator.is_satisfied(
            &Condition::GuideStageReached("phoenix"),
            &LifetimeStats::default(),
            0,
            &AchievementContext::new(u64::MAX),
        ));
    }
}
