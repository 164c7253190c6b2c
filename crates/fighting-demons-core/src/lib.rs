//! # Fighting Demons Core Library
//!
//! This library provides the progression core for Fighting Demons, a habit
//! game built around three daily "face-offs" (dawn, noon, dusk). It follows
//! a CLI-first philosophy: every operation is reachable through the
//! standalone `fighting-demons` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Progression**: ascending threshold tables resolve one cumulative point
//!   total into a Spirit Guide stage and a user title
//! - **Records and stats**: one daily record per date, folded into lifetime
//!   totals and streaks
//! - **Achievements**: a static catalog checked by a stateless evaluator
//! - **Storage**: a store trait with SQLite and in-memory implementations,
//!   plus TOML configuration
//!
//! ## Key Components
//!
//! - [`GameEngine`]: orchestrates a face-off from submission to unlocks
//! - [`TierTable`]: threshold table with resolve/next/percent queries
//! - [`ProgressStore`]: storage collaborator
//! - [`Database`]: SQLite persistence
//! - [`Config`]: game configuration management

pub mod achievements;
pub mod engine;
pub mod error;
pub mod lore;
pub mod points;
pub mod profile;
pub mod progression;
pub mod record;
pub mod snapshot;
pub mod stats;
pub mod storage;

pub use achievements::{
    AchievementCategory, AchievementContext, AchievementDef, AchievementEvaluator, AchievementId,
    AchievementUnlock, TriggerEvent, ACHIEVEMENTS,
};
pub use engine::{ActivityOutcome, FaceOffOutcome, FaceOffSubmission, GameEngine, SlotStatus};
pub use error::{
    ConfigError, CoreError, ProgressionError, SnapshotError, StorageError, ValidationError,
};
pub use lore::{LoreChapter, LORE};
pub use points::{LifeForceConfig, PointsConfig};
pub use profile::{PersonalRecords, UserProfile};
pub use progression::{
    detect_transition, ProgressReport, ProgressionTables, Tier, TierTable, TierTransition,
};
pub use record::{ActivityKind, DailyRecord, FaceOffSlot, SlotState};
pub use snapshot::{Snapshot, SNAPSHOT_FORMAT};
pub use stats::{aggregate, compute_streaks, streaks_from_dates, LifetimeStats, StreakSummary};
pub use storage::{Config, DateRange, Database, MemoryStore, ProgressStore};
