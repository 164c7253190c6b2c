//! Statistics derived from daily records.
//!
//! Lifetime totals and streaks are recomputed from record history rather
//! than maintained incrementally; both are pure over their inputs.

mod lifetime;
mod streak;

pub use lifetime::{aggregate, LifetimeStats};
pub use streak::{compute_streaks, streaks_from_dates, StreakSummary};
