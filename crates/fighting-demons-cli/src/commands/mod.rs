pub mod achievements;
pub mod config;
pub mod data;
pub mod faceoff;
pub mod profile;
pub mod progress;
pub mod stats;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use fighting_demons_core::{Config, Database, GameEngine};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Engine over the on-disk database, tuned by the on-disk config.
pub fn open_engine() -> Result<GameEngine<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(points = ?config.points, life_force = ?config.life_force, "loaded config");
    let db = Database::open()?;
    Ok(GameEngine::with_config(db, &config))
}

/// `--at` if given, otherwise the local wall clock.
pub fn instant(at: Option<DateTime<FixedOffset>>) -> DateTime<FixedOffset> {
    at.unwrap_or_else(|| Local::now().fixed_offset())
}

/// `--date` if given, otherwise today's local date.
pub fn day(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
