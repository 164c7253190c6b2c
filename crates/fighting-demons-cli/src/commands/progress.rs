//! Progression commands.

use clap::{Subcommand, ValueEnum};
use fighting_demons_core::points::checked_total;
use fighting_demons_core::ProgressReport;

use super::{open_engine, print_json, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum TableArg {
    Guide,
    Title,
}

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Current stage, title and distance to the next of each
    Show,
    /// Resolve an arbitrary total without touching stored progress
    Preview {
        #[arg(allow_negative_numbers = true)]
        total: i64,
    },
    /// Print a threshold table
    Tiers {
        #[arg(long, value_enum, default_value = "guide")]
        table: TableArg,
    },
}

pub fn run(action: ProgressAction) -> CmdResult {
    match action {
        ProgressAction::Show => print_json(&open_engine()?.progress()?),
        ProgressAction::Preview { total } => {
            let total = checked_total(total)?;
            let engine = open_engine()?;
            print_json(&ProgressReport::for_total(engine.tables(), total))
        }
        ProgressAction::Tiers { table } => {
            let engine = open_engine()?;
            let tables = engine.tables();
            let table = match table {
                TableArg::Guide => &tables.spirit_guide,
                TableArg::Title => &tables.user_title,
            };
            print_json(table)
        }
    }
}
