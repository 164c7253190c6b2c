//! Game orchestration over a [`ProgressStore`].
//!
//! One call per user action. Each call loads what it needs, applies the
//! pure domain rules, then writes back: record first, unlocks next, profile
//! last, all in one [`ProgressStore::atomically`] unit. The caller supplies
//! every instant; the engine never reads a clock.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievements::{
    AchievementContext, AchievementEvaluator, AchievementId, AchievementUnlock, TriggerEvent,
};
use crate::error::{CoreError, Result, ValidationError};
use crate::lore::{unlocked_chapters, LoreChapter};
use crate::points::{LifeForceConfig, PointsConfig};
use crate::profile::UserProfile;
use crate::progression::{ProgressReport, ProgressionTables, TierTransition};
use crate::record::{ActivityKind, DailyRecord, FaceOffSlot, SlotState};
use crate::stats::{aggregate, compute_streaks, streaks_from_dates, LifetimeStats, StreakSummary};
use crate::storage::{Config, DateRange, DeferralConfig, ProgressStore};

/// One completed face-off as reported by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceOffSubmission {
    pub slot: FaceOffSlot,
    /// Completion instant in the user's own offset. Its local date picks the
    /// daily record; its local time feeds time-of-day achievements.
    pub at: DateTime<FixedOffset>,
    #[serde(default)]
    pub pushups: Option<u32>,
    #[serde(default)]
    pub pullups: Option<u32>,
    #[serde(default)]
    pub mile: bool,
    #[serde(default)]
    pub meditation_minutes: Option<u32>,
}

impl FaceOffSubmission {
    pub fn new(slot: FaceOffSlot, at: DateTime<FixedOffset>) -> Self {
        Self {
            slot,
            at,
            pushups: None,
            pullups: None,
            mile: false,
            meditation_minutes: None,
        }
    }

    pub fn with_pushups(mut self, count: u32) -> Self {
        self.pushups = Some(count);
        self
    }

    pub fn with_pullups(mut self, count: u32) -> Self {
        self.pullups = Some(count);
        self
    }

    pub fn with_mile(mut self) -> Self {
        self.mile = true;
        self
    }

    pub fn with_meditation(mut self, minutes: u32) -> Self {
        self.meditation_minutes = Some(minutes);
        self
    }
}

/// What a face-off submission changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceOffOutcome {
    pub date: NaiveDate,
    pub slot: FaceOffSlot,
    /// The slot was already done for this date; nothing was written.
    pub already_completed: bool,
    pub points_awarded: u64,
    pub personal_record: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution: Option<TierTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_up: Option<TierTransition>,
    pub new_achievements: Vec<AchievementId>,
    pub progress: ProgressReport,
}

/// What a standalone activity log changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOutcome {
    pub date: NaiveDate,
    pub activity: ActivityKind,
    pub amount: u32,
    pub personal_record: bool,
    pub new_achievements: Vec<AchievementId>,
}

/// Observed state of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot: FaceOffSlot,
    #[serde(flatten)]
    pub state: SlotState,
    pub deferral_count: u32,
}

pub struct GameEngine<S: ProgressStore> {
    store: S,
    tables: ProgressionTables,
    points: PointsConfig,
    life_force: LifeForceConfig,
    deferral: DeferralConfig,
}

impl<S: ProgressStore> GameEngine<S> {
    /// Engine with the built-in tables and default tunables.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            tables: ProgressionTables::default(),
            points: config.points.clone(),
            life_force: config.life_force.clone(),
            deferral: config.deferral.clone(),
        }
    }

    /// Swap in custom tier tables.
    pub fn with_tables(mut self, tables: ProgressionTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn tables(&self) -> &ProgressionTables {
        &self.tables
    }

    pub fn points_config(&self) -> &PointsConfig {
        &self.points
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create the single profile.
    ///
    /// # Errors
    /// Fails when a profile already exists or the name is blank.
    pub fn register(&mut self, name: &str, now: DateTime<Utc>) -> Result<UserProfile> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        if let Some(existing) = self.store.get_profile()? {
            return Err(CoreError::ProfileExists {
                name: existing.name,
            });
        }
        let profile = UserProfile::new(name, now, &self.tables);
        self.store.save_profile(&profile)?;
        info!(profile = %profile.id, name = %profile.name, "registered profile");
        Ok(profile)
    }

    /// # Errors
    /// [`CoreError::ProfileMissing`] before [`register`](Self::register).
    pub fn profile(&self) -> Result<UserProfile> {
        self.store.get_profile()?.ok_or(CoreError::ProfileMissing)
    }

    /// Record a completed face-off and settle everything it affects.
    ///
    /// Completing a slot twice on the same date is a no-op that awards
    /// nothing and writes nothing. The record, unlocks and profile are
    /// written as one unit: on failure none of them change, so a retry
    /// starts from scratch.
    ///
    /// # Errors
    /// Propagates storage failures and [`CoreError::ProfileMissing`].
    pub fn complete_face_off(&mut self, submission: FaceOffSubmission) -> Result<FaceOffOutcome> {
        let mut profile = self.profile()?;
        let date = submission.at.date_naive();
        let at = submission.at.with_timezone(&Utc);
        let slot = submission.slot;
        let tables = &self.tables;
        let points = &self.points;
        let life_force = &self.life_force;

        self.store.atomically(|store| -> Result<FaceOffOutcome> {
            let mut record = store.get_or_create_record(date)?;
            if record.is_completed(slot) {
                debug!(%date, %slot, "slot already completed, ignoring");
                return Ok(FaceOffOutcome {
                    date,
                    slot,
                    already_completed: true,
                    points_awarded: 0,
                    personal_record: false,
                    evolution: None,
                    title_up: None,
                    new_achievements: Vec::new(),
                    progress: ProgressReport::for_total(tables, profile.total_points),
                });
            }

            let mut personal_record = false;
            if let Some(count) = submission.pushups {
                record.log_activity(ActivityKind::Pushups, count, at);
                personal_record |= profile.personal_records.observe(ActivityKind::Pushups, count);
            }
            if let Some(count) = submission.pullups {
                record.log_activity(ActivityKind::Pullups, count, at);
                personal_record |= profile.personal_records.observe(ActivityKind::Pullups, count);
            }
            if submission.mile {
                record.log_activity(ActivityKind::Mile, 1, at);
            }
            if let Some(minutes) = submission.meditation_minutes.filter(|m| *m > 0) {
                record.log_activity(ActivityKind::Meditation, minutes, at);
            }

            let deferral_count = record.slot(slot).deferral_count;
            record.complete_slot(slot, at);
            let points_awarded = points.award_for(slot, personal_record);
            record.log_face_off(slot, at, points_awarded, personal_record);
            store.save_record(&record)?;

            let update = profile.award_points(points_awarded, at, tables, life_force);
            if let Some(evolution) = &update.evolution {
                info!(from = %evolution.from.id, to = %evolution.to.id, "spirit guide evolved");
            }
            if let Some(title) = &update.title_up {
                info!(from = %title.from.id, to = %title.to.id, "title earned");
            }

            let event = TriggerEvent {
                pushups: submission.pushups,
                pullups: submission.pullups,
                deferral_count,
                personal_record,
                ..TriggerEvent::face_off(slot, submission.at.time())
            };
            let new_achievements = settle(store, tables, &mut profile, date, at, event)?;

            info!(
                %date,
                %slot,
                points = points_awarded,
                total = profile.total_points,
                "face-off completed"
            );

            Ok(FaceOffOutcome {
                date,
                slot,
                already_completed: false,
                points_awarded,
                personal_record,
                evolution: update.evolution,
                title_up: update.title_up,
                new_achievements,
                progress: ProgressReport::for_total(tables, profile.total_points),
            })
        })
    }

    /// Log training outside a face-off. Awards no points but feeds lifetime
    /// stats, personal records, single-set and record achievements.
    ///
    /// # Errors
    /// Propagates storage failures and [`CoreError::ProfileMissing`].
    pub fn log_activity(
        &mut self,
        activity: ActivityKind,
        amount: u32,
        at: DateTime<FixedOffset>,
    ) -> Result<ActivityOutcome> {
        let mut profile = self.profile()?;
        let date = at.date_naive();
        let at_utc = at.with_timezone(&Utc);
        let tables = &self.tables;

        self.store.atomically(|store| -> Result<ActivityOutcome> {
            let mut record = store.get_or_create_record(date)?;
            record.log_activity(activity, amount, at_utc);
            store.save_record(&record)?;

            let personal_record = profile.personal_records.observe(activity, amount);
            let mut event = TriggerEvent::standalone(at.time());
            event.personal_record = personal_record;
            match activity {
                ActivityKind::Pushups => event.pushups = Some(amount),
                ActivityKind::Pullups => event.pullups = Some(amount),
                ActivityKind::Mile | ActivityKind::Meditation => {}
            }
            let new_achievements = settle(store, tables, &mut profile, date, at_utc, event)?;
            debug!(%date, ?activity, amount, personal_record, "activity logged");

            Ok(ActivityOutcome {
                date,
                activity,
                amount,
                personal_record,
                new_achievements,
            })
        })
    }

    /// Postpone a slot. `until` defaults to the configured deferral length
    /// after `now`.
    ///
    /// # Errors
    /// Fails for completed slots, for `until <= now`, and on storage errors.
    pub fn defer_face_off(
        &mut self,
        slot: FaceOffSlot,
        now: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
        reason: Option<String>,
    ) -> Result<DailyRecord> {
        self.profile()?;
        let date = now.date_naive();
        let until = until.unwrap_or_else(|| {
            now + Duration::minutes(i64::from(self.deferral.default_minutes))
        });

        let mut record = self.store.get_or_create_record(date)?;
        record.defer_slot(
            slot,
            now.with_timezone(&Utc),
            until.with_timezone(&Utc),
            reason,
        )?;
        self.store.save_record(&record)?;
        info!(%date, %slot, until = %until, "face-off deferred");
        Ok(record)
    }

    /// The stored record for `date`, if any. Never creates one.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn record_for(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self
            .store
            .records_in_range(DateRange::between(date, date))?
            .into_iter()
            .next())
    }

    /// State of every slot on the local date of `now`.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn slot_statuses(&self, now: DateTime<FixedOffset>) -> Result<Vec<SlotStatus>> {
        let date = now.date_naive();
        let record = self
            .record_for(date)?
            .unwrap_or_else(|| DailyRecord::new(date));
        let now = now.with_timezone(&Utc);
        Ok(FaceOffSlot::ALL
            .iter()
            .map(|slot| SlotStatus {
                slot: *slot,
                state: record.slot_state(*slot, now),
                deferral_count: record.slot(*slot).deferral_count,
            })
            .collect())
    }

    /// # Errors
    /// [`CoreError::ProfileMissing`] or storage failures.
    pub fn progress(&self) -> Result<ProgressReport> {
        let profile = self.profile()?;
        Ok(ProgressReport::for_total(&self.tables, profile.total_points))
    }

    /// Fresh aggregate over every stored record.
    ///
    /// # Errors
    /// Propagates storage failures and duplicate dates.
    pub fn lifetime_stats(&self) -> Result<LifetimeStats> {
        let records = self.store.all_records()?;
        Ok(aggregate(&records)?)
    }

    /// # Errors
    /// Propagates storage failures.
    pub fn streaks(&self, today: NaiveDate) -> Result<StreakSummary> {
        Ok(streaks_from_dates(self.store.active_dates()?, today))
    }

    /// # Errors
    /// Propagates storage failures.
    pub fn unlocked_achievements(&self) -> Result<Vec<AchievementUnlock>> {
        Ok(self.store.unlocked_achievements()?)
    }

    /// Lore chapters open as of `today`.
    ///
    /// # Errors
    /// [`CoreError::ProfileMissing`] or storage failures.
    pub fn lore(&self, today: NaiveDate) -> Result<Vec<&'static LoreChapter>> {
        let profile = self.profile()?;
        let records = self.store.all_records()?;
        let stats = aggregate(&records)?;
        let streak = compute_streaks(&records, today).current;
        Ok(unlocked_chapters(
            &stats,
            streak,
            profile.total_points,
            &self.tables.spirit_guide,
        ))
    }

    /// Wipe all progress, profile included.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        info!("all progress reset");
        Ok(())
    }
}

/// Refresh derived profile fields, persist new unlocks, save the profile.
fn settle<S: ProgressStore>(
    store: &mut S,
    tables: &ProgressionTables,
    profile: &mut UserProfile,
    today: NaiveDate,
    at: DateTime<Utc>,
    event: TriggerEvent,
) -> Result<Vec<AchievementId>> {
    let records = store.all_records()?;
    let stats = aggregate(&records)?;
    let streaks = compute_streaks(&records, today);
    profile.refresh_lifetime(stats);
    profile.apply_streaks(&streaks);

    let ctx = AchievementContext::new(profile.total_points).with_event(event);
    let held = store.unlocked_ids()?;
    let candidates = AchievementEvaluator::new(&tables.spirit_guide).newly_unlocked(
        &stats,
        streaks.current,
        &ctx,
        &held,
    );

    let mut unlocked = Vec::with_capacity(candidates.len());
    for id in candidates {
        if store.record_achievement_unlock(id, at)? {
            info!(achievement = %id, "achievement unlocked");
            unlocked.push(id);
        }
    }

    store.save_profile(profile)?;
    Ok(unlocked)
}
