//! End-to-end game flow against both store implementations.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use fighting_demons_core::{
    AchievementId, Config, CoreError, Database, FaceOffSlot, FaceOffSubmission, GameEngine,
    MemoryStore, ProgressStore, Snapshot,
};

fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 4, day, hour, 0, 0)
        .unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
}

/// Three perfect days in a row, with a growing pushup set at noon.
fn play_three_days<S: ProgressStore>(engine: &mut GameEngine<S>) -> Vec<AchievementId> {
    let mut unlocked = Vec::new();
    for day in 1..=3 {
        for (slot, hour) in [
            (FaceOffSlot::Dawn, 6),
            (FaceOffSlot::Noon, 12),
            (FaceOffSlot::Dusk, 18),
        ] {
            let mut submission = FaceOffSubmission::new(slot, at(day, hour));
            if slot == FaceOffSlot::Noon {
                submission = submission.with_pushups(20 + day);
            }
            if slot == FaceOffSlot::Dawn {
                submission = submission.with_mile();
            }
            let outcome = engine.complete_face_off(submission).unwrap();
            unlocked.extend(outcome.new_achievements);
        }
    }
    unlocked
}

fn assert_three_day_state<S: ProgressStore>(engine: &GameEngine<S>, unlocked: &[AchievementId]) {
    let profile = engine.profile().unwrap();
    // 3 * 22 plus two pushup records at +5
    assert_eq!(profile.total_points, 76);
    assert_eq!(profile.current_streak, 3);
    assert_eq!(profile.lifetime.perfect_days, 3);
    assert_eq!(profile.lifetime.total_miles, 3);
    assert_eq!(profile.lifetime.total_pushups, 21 + 22 + 23);
    assert_eq!(profile.personal_records.pushups, 23);
    assert_eq!(profile.last_evolution_stage, "shade");

    for id in [
        AchievementId::FirstLight,
        AchievementId::PerfectDay,
        AchievementId::FirstPr,
        AchievementId::Streak3,
        AchievementId::FirstEvolution,
    ] {
        assert!(unlocked.contains(&id), "expected {id} to unlock");
    }

    let held = engine.unlocked_achievements().unwrap();
    assert_eq!(held.len(), unlocked.len(), "every unlock is persisted once");

    let progress = engine.progress().unwrap();
    assert_eq!(progress.spirit_guide.current.id, "shade");
    assert_eq!(progress.user_title.current.id, "acolyte");
    assert_eq!(progress.spirit_guide.points_to_next, Some(24));

    assert_eq!(engine.streaks(date(4)).unwrap().current, 3);
    assert_eq!(engine.streaks(date(5)).unwrap().current, 0);
}

#[test]
fn memory_store_full_flow() {
    let mut engine = GameEngine::new(MemoryStore::new());
    engine.register("Ana", Utc::now()).unwrap();
    let unlocked = play_three_days(&mut engine);
    assert_three_day_state(&engine, &unlocked);
}

#[test]
fn sqlite_store_full_flow_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fighting-demons.db");

    let unlocked = {
        let mut engine = GameEngine::new(Database::open_at(&path).unwrap());
        engine.register("Ana", Utc::now()).unwrap();
        play_three_days(&mut engine)
    };

    let engine = GameEngine::new(Database::open_at(&path).unwrap());
    assert_three_day_state(&engine, &unlocked);
    assert!(engine.record_for(date(2)).unwrap().unwrap().is_perfect_day());
}

#[test]
fn configured_points_are_used() {
    let mut config = Config::default();
    config.set("points.dawn", "15").unwrap();
    let mut engine = GameEngine::with_config(MemoryStore::new(), &config);
    engine.register("Ana", Utc::now()).unwrap();

    let outcome = engine
        .complete_face_off(FaceOffSubmission::new(FaceOffSlot::Dawn, at(1, 6)))
        .unwrap();
    assert_eq!(outcome.points_awarded, 15);
}

#[test]
fn snapshot_moves_progress_between_stores() {
    let mut source = GameEngine::new(MemoryStore::new());
    source.register("Ana", Utc::now()).unwrap();
    play_three_days(&mut source);

    let json = Snapshot::capture(source.store(), Utc::now())
        .unwrap()
        .to_json()
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open_at(dir.path().join("fighting-demons.db")).unwrap();
    Snapshot::from_json(&json).unwrap().restore(&mut db).unwrap();

    let target = GameEngine::new(db);
    assert_eq!(target.profile().unwrap(), source.profile().unwrap());
    assert_eq!(
        target.lifetime_stats().unwrap(),
        source.lifetime_stats().unwrap()
    );
    assert_eq!(
        target.unlocked_achievements().unwrap(),
        source.unlocked_achievements().unwrap()
    );
}

#[test]
fn lore_follows_progress() {
    let mut engine = GameEngine::new(MemoryStore::new());
    assert!(matches!(engine.lore(date(1)), Err(CoreError::ProfileMissing)));

    engine.register("Ana", Utc::now()).unwrap();
    assert!(engine.lore(date(1)).unwrap().is_empty());

    play_three_days(&mut engine);
    let ids: Vec<_> = engine.lore(date(3)).unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["lore_origin", "lore_guides"]);
}
