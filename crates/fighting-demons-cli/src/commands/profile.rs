//! Profile commands.

use chrono::Utc;
use clap::Subcommand;

use super::{open_engine, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create the profile (once)
    Create {
        /// Display name
        name: String,
    },
    /// Show the profile as JSON
    Show,
}

pub fn run(action: ProfileAction) -> CmdResult {
    let mut engine = open_engine()?;
    match action {
        ProfileAction::Create { name } => {
            let profile = engine.register(&name, Utc::now())?;
            print_json(&profile)
        }
        ProfileAction::Show => print_json(&engine.profile()?),
    }
}
