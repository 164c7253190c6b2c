use chrono::NaiveDate;
use clap::Subcommand;
use fighting_demons_core::{DateRange, ProgressStore};

use super::{day, open_engine, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Lifetime totals recomputed from every record
    Lifetime,
    /// Current and longest streak
    Streak {
        /// Reference date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// One day's record
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Records in an inclusive date window
    History {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let engine = open_engine()?;

    match action {
        StatsAction::Lifetime => print_json(&engine.lifetime_stats()?),
        StatsAction::Streak { date } => print_json(&engine.streaks(day(date))?),
        StatsAction::Day { date } => print_json(&engine.record_for(day(date))?),
        StatsAction::History { from, to } => {
            let range = DateRange { start: from, end: to };
            print_json(&engine.store().records_in_range(range)?)
        }
    }
}
