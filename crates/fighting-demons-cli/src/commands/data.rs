//! Export/import of the whole progress state.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use fighting_demons_core::{Database, ProgressStore, Snapshot};

use super::CmdResult;

#[derive(Subcommand)]
pub enum DataAction {
    /// Write a snapshot as JSON (stdout unless --output)
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all progress with a snapshot file
    Import {
        path: PathBuf,
    },
    /// Delete all progress, profile included
    Reset {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    let mut db = Database::open()?;
    match action {
        DataAction::Export { output } => {
            let json = Snapshot::capture(&db, Utc::now())?.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let snapshot = Snapshot::from_json(&json)?;
            snapshot.restore(&mut db)?;
            println!(
                "imported {} records and {} achievements",
                snapshot.records.len(),
                snapshot.achievements.len()
            );
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            db.clear()?;
            println!("all progress deleted");
        }
    }
    Ok(())
}
