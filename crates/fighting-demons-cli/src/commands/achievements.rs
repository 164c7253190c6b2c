use chrono::NaiveDate;
use clap::Subcommand;
use fighting_demons_core::{AchievementCategory, ProgressStore, ACHIEVEMENTS};
use serde::Serialize;

use super::{day, open_engine, print_json, CmdResult};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// Unlocked achievements
    List,
    /// The full catalog; secret entries stay hidden until unlocked
    Catalog,
    /// Unlocked lore chapters
    Lore {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: AchievementCategory,
    unlocked: bool,
}

pub fn run(action: AchievementsAction) -> CmdResult {
    let engine = open_engine()?;
    match action {
        AchievementsAction::List => print_json(&engine.unlocked_achievements()?),
        AchievementsAction::Catalog => {
            let held = engine.store().unlocked_ids()?;
            let entries: Vec<_> = ACHIEVEMENTS
                .iter()
                .map(|def| {
                    let unlocked = held.contains(&def.id);
                    let hidden = def.secret && !unlocked;
                    CatalogEntry {
                        id: def.id.as_str(),
                        name: if hidden { "???" } else { def.name },
                        description: if hidden { "???" } else { def.description },
                        icon: if hidden { "❔" } else { def.icon },
                        category: def.category,
                        unlocked,
                    }
                })
                .collect();
            print_json(&entries)
        }
        AchievementsAction::Lore { date } => print_json(&engine.lore(day(date))?),
    }
}
